//! Error types produced while dispatching messages.
//!
//! [`HandlerError`] is the single failure type that flows through the broker:
//! handlers return it, failure policies receive and optionally re-raise it, and
//! [`Broker::send`](crate::Broker::send) surfaces it when a policy re-raises.
//!
//! The type provides helper methods (`as_label`, `as_message`) for logs/metrics
//! and [`HandlerError::same_as`] to check that a re-raised error is the very
//! value the handler produced.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Shared, type-erased error source.
pub type BoxError = Arc<dyn StdError + Send + Sync + 'static>;

/// # Errors produced by message handlers.
///
/// Cloning is cheap: the underlying source lives behind an `Arc`, so a clone
/// still refers to the same error value (see [`HandlerError::same_as`]).
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("handler failed: {source}")]
    Failed {
        /// The error returned by the handler.
        source: BoxError,
    },

    /// The handler panicked while processing a message.
    #[error("handler panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// A typed handler received a message of an unexpected type.
    #[error("expected a {expected}, got a {actual} instead")]
    TypeMismatch {
        /// Type the handler was written for.
        expected: &'static str,
        /// Runtime type of the message that was delivered.
        actual: &'static str,
    },
}

impl HandlerError {
    /// Wraps any error (or string) as [`HandlerError::Failed`].
    ///
    /// # Example
    /// ```
    /// use weakbus::HandlerError;
    ///
    /// let err = HandlerError::failed("connection refused");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn failed(error: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        HandlerError::Failed {
            source: Arc::from(error.into()),
        }
    }

    /// Shorthand for a failure carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::failed(message.into())
    }

    pub(crate) fn panicked(info: impl Into<String>) -> Self {
        HandlerError::Panicked { info: info.into() }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
            HandlerError::TypeMismatch { .. } => "handler_type_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { source } => format!("error: {source}"),
            HandlerError::Panicked { info } => format!("panic: {info}"),
            HandlerError::TypeMismatch { expected, actual } => {
                format!("type mismatch: expected={expected} actual={actual}")
            }
        }
    }

    /// True when `other` carries the same underlying error value.
    ///
    /// For [`HandlerError::Failed`] this compares the shared source by pointer;
    /// other variants carry no identity and compare by content.
    ///
    /// # Example
    /// ```
    /// use weakbus::HandlerError;
    ///
    /// let a = HandlerError::msg("boom");
    /// let b = a.clone();
    /// assert!(a.same_as(&b));
    /// assert!(!a.same_as(&HandlerError::msg("boom")));
    /// ```
    pub fn same_as(&self, other: &HandlerError) -> bool {
        match (self, other) {
            (HandlerError::Failed { source: a }, HandlerError::Failed { source: b }) => {
                Arc::ptr_eq(a, b)
            }
            (HandlerError::Panicked { info: a }, HandlerError::Panicked { info: b }) => a == b,
            (
                HandlerError::TypeMismatch {
                    expected: ea,
                    actual: aa,
                },
                HandlerError::TypeMismatch {
                    expected: eb,
                    actual: ab,
                },
            ) => ea == eb && aa == ab,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn test_failed_wraps_typed_error() {
        let err = HandlerError::failed(DiskFull);
        assert_eq!(err.to_string(), "handler failed: disk full");
        match &err {
            HandlerError::Failed { source } => assert!(source.downcast_ref::<DiskFull>().is_some()),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_clone_keeps_identity() {
        let err = HandlerError::msg("boom");
        let copy = err.clone();
        assert!(err.same_as(&copy));
        assert!(!err.same_as(&HandlerError::msg("boom")));
    }

    #[test]
    fn test_labels() {
        assert_eq!(HandlerError::msg("x").as_label(), "handler_failed");
        assert_eq!(HandlerError::panicked("x").as_label(), "handler_panicked");
        let mismatch = HandlerError::TypeMismatch {
            expected: "A",
            actual: "B",
        };
        assert_eq!(mismatch.as_label(), "handler_type_mismatch");
        assert_eq!(mismatch.to_string(), "expected a A, got a B instead");
    }
}
