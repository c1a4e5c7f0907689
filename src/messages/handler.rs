//! # Handler abstraction and function-backed handlers.
//!
//! This module defines the [`Handler`] trait (async, fallible) and two
//! closure-backed implementations:
//! - [`HandlerFn`] wraps `Fn(MessageRef) -> Fut` and receives the erased message;
//! - [`TypedHandlerFn`] wraps `Fn(Arc<T>) -> Fut` and converts the message to
//!   `T` first: directly, or through supertypes declared with
//!   [`MessageType::supertype`](crate::MessageType::supertype). Anything else
//!   fails with [`HandlerError::TypeMismatch`].
//!
//! The common handle type is [`HandlerRef`], an `Arc<dyn Handler>` that the
//! broker snapshots and hands to executors.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use weakbus::{HandlerFn, HandlerRef, HandlerError, Message};
//!
//! #[derive(Debug)]
//! struct Ping(u32);
//! impl Message for Ping {}
//!
//! let h: HandlerRef = HandlerFn::typed("pong", |ping: Arc<Ping>| async move {
//!     println!("ping {}", ping.0);
//!     Ok::<_, HandlerError>(())
//! });
//! assert_eq!(h.name(), "pong");
//! ```

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::messages::message::{Message, MessageRef};

/// # Asynchronous message handler.
///
/// Handlers are untrusted: they may fail or panic. Executors catch both and
/// route them through the configured failure policy.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Returns a human-readable handler name (logs, diagnostics).
    fn name(&self) -> &str;

    /// Processes one message.
    async fn handle(&self, message: MessageRef) -> Result<(), HandlerError>;
}

/// Shared handle to a handler.
pub type HandlerRef = Arc<dyn Handler>;

/// Immutable snapshot of handlers resolved for one `send`.
pub type HandlerList = Arc<[HandlerRef]>;

/// Closure-backed handler receiving the type-erased message.
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F, Fut> HandlerFn<F>
where
    F: Fn(MessageRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    /// Creates a new function-backed handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl HandlerFn<()> {
    /// Creates a [`TypedHandlerFn`] for messages of type `T`.
    pub fn typed<T, F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Arc<TypedHandlerFn<T, F>>
    where
        T: Message,
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Arc::new(TypedHandlerFn::new(name, f))
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(MessageRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, message: MessageRef) -> Result<(), HandlerError> {
        (self.f)(message).await
    }
}

/// Closure-backed handler for a concrete message type `T`.
pub struct TypedHandlerFn<T, F> {
    name: Cow<'static, str>,
    f: F,
    _message: PhantomData<fn(Arc<T>)>,
}

impl<T, F> TypedHandlerFn<T, F> {
    /// Creates a new typed handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _message: PhantomData,
        }
    }
}

impl<T, F> fmt::Debug for TypedHandlerFn<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedHandlerFn")
            .field("name", &self.name)
            .field("message", &type_name::<T>())
            .finish()
    }
}

#[async_trait]
impl<T, F, Fut> Handler for TypedHandlerFn<T, F>
where
    T: Message,
    F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, message: MessageRef) -> Result<(), HandlerError> {
        let message_type = message.message_type();
        let typed = message_type
            .upcast::<T>(message.into_any())
            .ok_or(HandlerError::TypeMismatch {
                expected: type_name::<T>(),
                actual: message_type.name(),
            })?;
        (self.f)(typed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageType;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct Ping(u32);
    impl Message for Ping {}

    #[derive(Debug)]
    struct Pong;
    impl Message for Pong {}

    #[derive(Debug)]
    struct LoudPing(u32);
    impl Message for LoudPing {
        fn supertypes() -> Vec<MessageType> {
            vec![MessageType::supertype(|l: Arc<LoudPing>| Arc::new(Ping(l.0 * 10)))]
        }
    }

    #[tokio::test]
    async fn test_handler_fn_receives_erased_message() {
        let seen = Arc::new(AtomicU32::new(0));
        let s = Arc::clone(&seen);
        let h = HandlerFn::arc("erased", move |m: MessageRef| {
            let s = Arc::clone(&s);
            async move {
                if let Some(p) = m.downcast_ref::<Ping>() {
                    s.store(p.0, Ordering::SeqCst);
                }
                Ok(())
            }
        });

        h.handle(Arc::new(Ping(7))).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 7);
        assert_eq!(h.name(), "erased");
    }

    #[tokio::test]
    async fn test_typed_handler_downcasts() {
        let seen = Arc::new(AtomicU32::new(0));
        let s = Arc::clone(&seen);
        let h = HandlerFn::typed("typed", move |p: Arc<Ping>| {
            let s = Arc::clone(&s);
            async move {
                s.store(p.0, Ordering::SeqCst);
                Ok(())
            }
        });

        h.handle(Arc::new(Ping(3))).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_typed_handler_receives_upcast_subtype() {
        let seen = Arc::new(AtomicU32::new(0));
        let s = Arc::clone(&seen);
        let h = HandlerFn::typed("typed", move |p: Arc<Ping>| {
            let s = Arc::clone(&s);
            async move {
                s.store(p.0, Ordering::SeqCst);
                Ok(())
            }
        });

        h.handle(Arc::new(LoudPing(4))).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 40);
    }

    #[tokio::test]
    async fn test_typed_handler_rejects_other_type() {
        let h = HandlerFn::typed("typed", |_p: Arc<Ping>| async { Ok(()) });
        let err = h.handle(Arc::new(Pong)).await.unwrap_err();
        assert!(matches!(
            err,
            HandlerError::TypeMismatch { expected, actual }
                if expected == type_name::<Ping>() && actual == type_name::<Pong>()
        ));
    }
}
