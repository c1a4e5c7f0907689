//! # Closure-backed executor.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::executors::Executor;
use crate::messages::{HandlerList, MessageRef};

/// Hands the message and the handler snapshot to an async closure.
///
/// The closure owns the whole dispatch: concurrency, failure handling and
/// whether to wait at all.
///
/// ## Example
/// ```rust
/// use weakbus::{ExecutorFn, HandlerList, MessageRef};
///
/// // Only the most recently registered handler gets the message.
/// let last_wins = ExecutorFn::new(|message: MessageRef, handlers: HandlerList| async move {
///     match handlers.last() {
///         Some(h) => h.handle(message).await,
///         None => Ok(()),
///     }
/// });
/// # let _ = last_wins;
/// ```
pub struct ExecutorFn<F> {
    f: F,
}

impl<F, Fut> ExecutorFn<F>
where
    F: Fn(MessageRef, HandlerList) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for ExecutorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExecutorFn")
    }
}

#[async_trait]
impl<F, Fut> Executor for ExecutorFn<F>
where
    F: Fn(MessageRef, HandlerList) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn execute(&self, message: MessageRef, handlers: HandlerList) -> Result<(), HandlerError> {
        (self.f)(message, handlers).await
    }

    fn name(&self) -> &'static str {
        "delegate"
    }
}
