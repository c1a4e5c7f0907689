//! # Continuation policy for sequential dispatch.
//!
//! [`SequentialPolicy`] decides whether a [`SequentialExecutor`](crate::SequentialExecutor)
//! keeps walking the handler snapshot after a failure that the
//! [`FailurePolicy`](crate::FailurePolicy) dispositioned without re-raising.
//!
//! ```text
//! handlers: [A (fails), B]
//!
//! SequentialPolicy::Stop      → A, failure policy, done (B never runs)
//! SequentialPolicy::Continue  → A, failure policy, B (default)
//! ```
//!
//! A failure that the failure policy re-raises always ends the walk.

/// What a sequential executor does after a dispositioned handler failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequentialPolicy {
    /// Skip the remaining handlers for this message.
    Stop,
    /// Run every remaining handler (default).
    Continue,
}

impl Default for SequentialPolicy {
    /// Returns [`SequentialPolicy::Continue`].
    fn default() -> Self {
        SequentialPolicy::Continue
    }
}
