//! # Logging collaborator.
//!
//! The broker never writes to a concrete sink. Every component holds a
//! [`Logger`] (its component name plus an `Arc<dyn LogSink>`) handed to it at
//! construction. The default sink is [`NullSink`], which discards everything.
//!
//! ## Sinks
//! - [`NullSink`]    discards all records (default)
//! - [`TracingSink`] forwards records to [`tracing`] events
//!
//! ## Levels used by the broker
//! ```text
//! trace  register / unregister, key removed after purge
//! debug  "no handlers", rethrow, fire-and-forget scheduling
//! info   broadcast, purge counts, swallowed failures
//! error  failures escaping a fire-and-forget dispatch
//! ```

pub(crate) mod sink;
mod tracing_sink;

pub use tracing_sink::TracingSink;
pub use sink::{LogLevel, LogSink, Logger, NullSink};
