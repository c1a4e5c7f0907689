//! # Batch registration bound to one broker.
//!
//! [`RegistrationSet`] collects (type, handler) pairs and registers or
//! unregisters them together. It owns the resulting [`Subscription`]s, so the
//! handlers stay registered for as long as the set lives (or until
//! [`RegistrationSet::unregister`]).
//!
//! ## Rules
//! - Mutation takes `&mut self`: a set is driven by one owner at a time.
//! - `register` is idempotent: entries already registered are skipped.
//! - `unregister` unsubscribes every entry and forgets the handles; a later
//!   `register` starts over with the same entries.
//! - Dropping the set drops its subscriptions, which ends delivery lazily.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use weakbus::{Broker, HandlerError, Message, RegistrationSet};
//!
//! #[derive(Debug)]
//! struct Opened;
//! impl Message for Opened {}
//!
//! #[derive(Debug)]
//! struct Closed;
//! impl Message for Closed {}
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), HandlerError> {
//! let broker = Broker::new();
//! let mut set = RegistrationSet::new(&broker);
//! set.add_fn("on-open", |_m: Arc<Opened>| async { Ok(()) })
//!    .add_fn("on-close", |_m: Arc<Closed>| async { Ok(()) });
//!
//! set.register().await;
//! assert_eq!(set.registered_count(), 2);
//!
//! broker.send(Opened).await?;
//! set.unregister().await;
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::core::Broker;
use crate::core::registration::Subscription;
use crate::error::HandlerError;
use crate::messages::{HandlerFn, HandlerRef, Message, MessageType};

/// One tracked pair and, once registered, its subscription.
struct Entry {
    message_type: MessageType,
    handler: HandlerRef,
    subscription: Option<Subscription>,
}

/// Group of registrations managed together.
pub struct RegistrationSet {
    broker: Broker,
    entries: Vec<Entry>,
}

impl RegistrationSet {
    /// Creates an empty set bound to `broker`.
    pub fn new(broker: &Broker) -> Self {
        Self {
            broker: broker.clone(),
            entries: Vec::new(),
        }
    }

    /// Tracks `handler` for `message_type`. Not registered until [`register`](Self::register).
    pub fn add(&mut self, message_type: MessageType, handler: HandlerRef) -> &mut Self {
        self.entries.push(Entry {
            message_type,
            handler,
            subscription: None,
        });
        self
    }

    /// Tracks a typed closure handler for `T`.
    pub fn add_fn<T, F, Fut>(&mut self, name: impl Into<Cow<'static, str>>, f: F) -> &mut Self
    where
        T: Message,
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.add(MessageType::of::<T>(), HandlerFn::typed(name, f))
    }

    /// Registers every entry that is not registered yet.
    pub async fn register(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| e.subscription.is_none()) {
            let subscription = self
                .broker
                .register(entry.message_type.clone(), Arc::clone(&entry.handler))
                .await;
            entry.subscription = Some(subscription);
        }
    }

    /// Unsubscribes every registered entry and clears the handles.
    pub async fn unregister(&mut self) {
        for entry in &mut self.entries {
            if let Some(subscription) = entry.subscription.take() {
                subscription.unsubscribe().await;
            }
        }
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries currently holding a subscription.
    pub fn registered_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.subscription.is_some())
            .count()
    }
}

impl fmt::Debug for RegistrationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationSet")
            .field("len", &self.len())
            .field("registered", &self.registered_count())
            .finish()
    }
}
