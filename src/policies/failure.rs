//! # Failure policies for handler errors.
//!
//! A [`FailurePolicy`] decides what happens when a handler fails (returns an
//! error or panics) while an executor is dispatching a message.
//!
//! - [`Rethrow`] returns the original error unchanged; for a blocking
//!   executor this fails the `send` call (default).
//! - [`Swallow`] discards the error and logs it.
//! - [`FailureFn`] forwards `(error, message, handler)` to a user closure.
//!
//! ## Identity
//! Errors are passed **by value**: [`Rethrow`] hands back the very value it
//! received, so the caller of `send` can use
//! [`HandlerError::same_as`](crate::HandlerError::same_as) against what the
//! handler produced.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::logging::{LogSink, Logger};
use crate::messages::{HandlerRef, MessageRef};

/// Disposition of a handler failure.
#[async_trait]
pub trait FailurePolicy: Send + Sync + 'static {
    /// Handles `error` raised by `handler` while processing `message`.
    ///
    /// `Ok(())` means the failure was dispositioned; `Err` re-raises it.
    async fn on_failure(
        &self,
        error: HandlerError,
        message: &MessageRef,
        handler: &HandlerRef,
    ) -> Result<(), HandlerError>;
}

/// Re-raises the original error.
#[derive(Clone, Debug)]
pub struct Rethrow {
    log: Logger,
}

impl Rethrow {
    pub fn new() -> Self {
        Self {
            log: Logger::null("rethrow"),
        }
    }

    /// Routes this policy's diagnostics to `sink`.
    pub fn with_log(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = Logger::new("rethrow", sink);
        self
    }
}

impl Default for Rethrow {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FailurePolicy for Rethrow {
    async fn on_failure(
        &self,
        error: HandlerError,
        _message: &MessageRef,
        handler: &HandlerRef,
    ) -> Result<(), HandlerError> {
        self.log.debug(format_args!(
            "re-raising failure of handler '{}': {error}",
            handler.name()
        ));
        Err(error)
    }
}

/// Discards the error.
#[derive(Clone, Debug)]
pub struct Swallow {
    log: Logger,
}

impl Swallow {
    pub fn new() -> Self {
        Self {
            log: Logger::null("swallow"),
        }
    }

    /// Routes swallowed failures to `sink` at `info` level.
    pub fn with_log(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = Logger::new("swallow", sink);
        self
    }
}

impl Default for Swallow {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FailurePolicy for Swallow {
    async fn on_failure(
        &self,
        error: HandlerError,
        message: &MessageRef,
        handler: &HandlerRef,
    ) -> Result<(), HandlerError> {
        self.log.info(format_args!(
            "swallowed failure of handler '{}' for {message:?}: {error}",
            handler.name()
        ));
        Ok(())
    }
}

/// Forwards failures to an async closure and returns its result.
///
/// The closure's own errors are not treated specially: an `Err` it returns is
/// re-raised exactly like [`Rethrow`] would.
///
/// ## Example
/// ```rust
/// use weakbus::{FailureFn, HandlerError, HandlerRef, MessageRef};
///
/// let report = FailureFn::new(|err: HandlerError, _m: MessageRef, h: HandlerRef| async move {
///     eprintln!("handler {} failed: {}", h.name(), err.as_label());
///     Ok(())
/// });
/// # let _ = report;
/// ```
pub struct FailureFn<F> {
    f: F,
}

impl<F, Fut> FailureFn<F>
where
    F: Fn(HandlerError, MessageRef, HandlerRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FailureFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FailureFn")
    }
}

#[async_trait]
impl<F, Fut> FailurePolicy for FailureFn<F>
where
    F: Fn(HandlerError, MessageRef, HandlerRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn on_failure(
        &self,
        error: HandlerError,
        message: &MessageRef,
        handler: &HandlerRef,
    ) -> Result<(), HandlerError> {
        (self.f)(error, Arc::clone(message), Arc::clone(handler)).await
    }
}
