//! # Sequential executor.
//!
//! Walks the handler snapshot in order, awaiting each handler before starting
//! the next one.
//!
//! ## Failure flow
//! ```text
//! for handler in snapshot:
//!   ├─ Ok                         ──► next
//!   └─ Err / panic ──► on_failure(error, message, handler)
//!         ├─ Err(e)               ──► return Err(e)       (remaining skipped)
//!         └─ Ok(())
//!               ├─ Continue       ──► next
//!               └─ Stop           ──► return Ok(())       (remaining skipped)
//! ```
//!
//! ## Rules
//! - Two concurrent `execute` calls walk their own snapshots independently;
//!   the executor does not serialize across calls.
//! - With the default configuration (`Rethrow`, blocking) the first failure
//!   aborts the walk and is returned to the caller unchanged.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::executors::Executor;
use crate::executors::runner::{invoke, launch};
use crate::logging::{LogSink, Logger};
use crate::messages::{HandlerList, MessageRef};
use crate::policies::{FailurePolicy, Rethrow, SequentialPolicy};

/// Runs handlers one after another.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use weakbus::{SequentialExecutor, SequentialPolicy, Swallow};
///
/// let exec = SequentialExecutor::new()
///     .with_policy(SequentialPolicy::Stop)
///     .with_failure_policy(Arc::new(Swallow::new()));
/// assert!(!exec.is_fire_and_forget());
/// ```
#[derive(Clone)]
pub struct SequentialExecutor {
    fire_and_forget: bool,
    policy: SequentialPolicy,
    on_failure: Arc<dyn FailurePolicy>,
    log: Logger,
}

impl SequentialExecutor {
    /// Blocking, [`SequentialPolicy::Continue`], [`Rethrow`].
    pub fn new() -> Self {
        Self {
            fire_and_forget: false,
            policy: SequentialPolicy::default(),
            on_failure: Arc::new(Rethrow::new()),
            log: Logger::null("sequential_executor"),
        }
    }

    /// Enables or disables fire-and-forget dispatch.
    pub fn fire_and_forget(mut self, enabled: bool) -> Self {
        self.fire_and_forget = enabled;
        self
    }

    pub fn with_policy(mut self, policy: SequentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_failure_policy(mut self, on_failure: Arc<dyn FailurePolicy>) -> Self {
        self.on_failure = on_failure;
        self
    }

    pub fn with_log(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = Logger::new("sequential_executor", sink);
        self
    }

    pub fn is_fire_and_forget(&self) -> bool {
        self.fire_and_forget
    }

    pub fn policy(&self) -> SequentialPolicy {
        self.policy
    }

    async fn run(self, message: MessageRef, handlers: HandlerList) -> Result<(), HandlerError> {
        for handler in handlers.iter() {
            if let Err(e) = invoke(handler, message.clone()).await {
                self.on_failure.on_failure(e, &message, handler).await?;
                if self.policy == SequentialPolicy::Stop {
                    self.log.debug(format_args!(
                        "handler '{}' failed, skipping the remaining handlers for {message:?}",
                        handler.name()
                    ));
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Default for SequentialExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SequentialExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequentialExecutor")
            .field("fire_and_forget", &self.fire_and_forget)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Executor for SequentialExecutor {
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
        "sequential"
    }
}
