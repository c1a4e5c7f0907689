//! # Parallel executor.
//!
//! Spawns every handler of the snapshot as its own tokio task and waits for
//! all of them.
//!
//! ## Architecture
//! ```text
//! execute(message, [h1, h2, h3])
//!     ├──► spawn ──► invoke_guarded(h1) ─┐
//!     ├──► spawn ──► invoke_guarded(h2) ─┼──► join all (snapshot order)
//!     └──► spawn ──► invoke_guarded(h3) ─┘         └──► first Err, if any
//! ```
//!
//! ## Rules
//! - Every handler starts regardless of its siblings; there is no ordering
//!   between them.
//! - Failures are isolated: each one goes to the failure policy inside its own
//!   task, and a failing sibling never cancels the others.
//! - `execute` completes only after every task finished. If one or more
//!   policies re-raised, the first error in snapshot order is returned.
//! - Spawning (rather than polling the handlers in place) keeps handlers that
//!   complete synchronously from serializing the batch.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::error::HandlerError;
use crate::executors::Executor;
use crate::executors::runner::{invoke_guarded, launch, panic_info};
use crate::logging::{LogSink, Logger};
use crate::messages::{HandlerList, MessageRef};
use crate::policies::{FailurePolicy, Rethrow};

/// Runs all handlers concurrently.
#[derive(Clone)]
pub struct ParallelExecutor {
    fire_and_forget: bool,
    on_failure: Arc<dyn FailurePolicy>,
    log: Logger,
}

impl ParallelExecutor {
    /// Blocking, [`Rethrow`].
    pub fn new() -> Self {
        Self {
            fire_and_forget: false,
            on_failure: Arc::new(Rethrow::new()),
            log: Logger::null("parallel_executor"),
        }
    }

    /// Enables or disables fire-and-forget dispatch.
    pub fn fire_and_forget(mut self, enabled: bool) -> Self {
        self.fire_and_forget = enabled;
        self
    }

    pub fn with_failure_policy(mut self, on_failure: Arc<dyn FailurePolicy>) -> Self {
        self.on_failure = on_failure;
        self
    }

    pub fn with_log(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = Logger::new("parallel_executor", sink);
        self
    }

    pub fn is_fire_and_forget(&self) -> bool {
        self.fire_and_forget
    }

    async fn run(self, message: MessageRef, handlers: HandlerList) -> Result<(), HandlerError> {
        let joins: Vec<JoinHandle<Result<(), HandlerError>>> = handlers
            .iter()
            .map(|handler| {
                let handler = Arc::clone(handler);
                let message = message.clone();
                let on_failure = Arc::clone(&self.on_failure);
                tokio::spawn(async move {
                    invoke_guarded(&handler, &message, &*on_failure).await
                })
            })
            .collect();

        let mut first_err = None;
        for join in joins {
            let res = match join.await {
                Ok(res) => res,
                // The policy itself panicked.
                Err(je) if je.is_panic() => {
                    Err(HandlerError::panicked(panic_info(&*je.into_panic())))
                }
                Err(_) => Err(HandlerError::panicked("handler task cancelled")),
            };
            if let Err(e) = res {
                self.log.debug(format_args!("parallel handler failed: {e}"));
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParallelExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelExecutor")
            .field("fire_and_forget", &self.fire_and_forget)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Executor for ParallelExecutor {
    async fn execute(&self, message: MessageRef, handlers: HandlerList) -> Result<(), HandlerError> {
        self.log.trace(format_args!(
            "received {} handlers for {message:?}",
            handlers.len()
        ));
        let count = handlers.len();
        let this = self.clone();
        launch(self.fire_and_forget, &self.log, count, this.run(message, handlers)).await
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}
