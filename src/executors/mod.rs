//! Dispatch strategies.
//!
//! An [`Executor`] receives one message together with the immutable handler
//! snapshot resolved by the broker and drives their invocation. It owns the
//! concurrency model, fire-and-forget semantics and failure isolation.
//!
//! ## Contents
//! - [`SequentialExecutor`] snapshot order, one handler at a time (default)
//! - [`ParallelExecutor`]   one tokio task per handler, awaited together
//! - [`ExecutorFn`]         custom strategy backed by an async closure
//!
//! ## Fire-and-forget
//! Both built-in executors carry a `fire_and_forget` flag. When set,
//! `execute` spawns the dispatch onto the tokio runtime and returns `Ok(())`
//! without waiting for any handler. This requires a running tokio runtime.
//!
//! ```text
//! blocking:         execute ──► h1 ──► h2 ──► h3 ──► return
//! fire-and-forget:  execute ──► spawn(h1 ──► h2 ──► h3)
//!                          └──► return
//! ```

mod delegate;
mod parallel;
mod runner;
mod sequential;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::messages::{HandlerList, MessageRef};

pub use delegate::ExecutorFn;
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Strategy driving the invocation of a handler snapshot for one message.
///
/// Implementations must not mutate or re-resolve the snapshot: handlers added
/// or removed after the broker resolved it are irrelevant to this call.
#[async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Invokes `handlers` with `message`.
    ///
    /// Returns `Err` only when the failure policy re-raises a handler failure.
    async fn execute(&self, message: MessageRef, handlers: HandlerList) -> Result<(), HandlerError>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
