//! Failure-handling policies.
//!
//! This module groups the knobs that control **what happens** when a handler
//! fails during dispatch.
//!
//! ## Contents
//! - [`FailurePolicy`]    disposition of a single failure (rethrow / swallow / closure)
//! - [`SequentialPolicy`] whether a sequential walk continues after a dispositioned failure
//!
//! ## Quick wiring
//! ```text
//! SequentialExecutor { policy: SequentialPolicy, on_failure: Arc<dyn FailurePolicy> }
//! ParallelExecutor   {                            on_failure: Arc<dyn FailurePolicy> }
//!      └─► on handler Err/panic: on_failure(error, message, handler)
//!           ├─ Err(e) → execute() returns Err(e)
//!           └─ Ok(()) → Stop / Continue (sequential), nothing else (parallel)
//! ```
//!
//! ## Defaults
//! - [`Rethrow`] for both executors.
//! - [`SequentialPolicy::Continue`].

mod failure;
mod sequential;

pub use failure::{FailureFn, FailurePolicy, Rethrow, Swallow};
pub use sequential::SequentialPolicy;
