//! # Broker configuration.
//!
//! Provides [`BrokerConfig`], the wiring of a [`Broker`](crate::Broker):
//! how handlers are matched, which executor dispatches them and where logs go.
//!
//! ## Wirings
//! - **Standard** ([`BrokerConfig::default`]): [`AssignableType`] discriminator,
//!   blocking [`SequentialExecutor`] with `Rethrow`, [`NullSink`].
//! - **Basic** ([`BrokerConfig::basic`]): exact matching through a direct key
//!   lookup (no key scan, no discriminator), caller-chosen executor.
//!
//! Both wirings skip the executor entirely when no handler matches.

use std::fmt;
use std::sync::Arc;

use crate::discriminators::{AssignableType, Discriminator};
use crate::executors::{Executor, SequentialExecutor};
use crate::logging::{LogSink, NullSink};

/// How `send` resolves the handlers of a message.
#[derive(Clone)]
pub enum Matching {
    /// Exact type match via direct key lookup.
    Direct,
    /// Every registered key is tested with the discriminator.
    Discriminator(Arc<dyn Discriminator>),
}

impl Matching {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Matching::Direct => "direct",
            Matching::Discriminator(d) => d.name(),
        }
    }
}

impl Default for Matching {
    /// Returns [`Matching::Discriminator`] with [`AssignableType`].
    fn default() -> Self {
        Matching::Discriminator(Arc::new(AssignableType))
    }
}

impl fmt::Debug for Matching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Wiring of a broker.
///
/// ## Field semantics
/// - `matching`: direct lookup or discriminator-driven key scan
/// - `executor`: dispatch strategy applied to every non-empty snapshot
/// - `log`: sink receiving the broker's and the store's log records
///
/// Executors and failure policies carry their own sink (`with_log`).
#[derive(Clone)]
pub struct BrokerConfig {
    pub matching: Matching,
    pub executor: Arc<dyn Executor>,
    pub log: Arc<dyn LogSink>,
}

impl BrokerConfig {
    /// Basic wiring: direct exact-type lookup with the given executor.
    pub fn basic(executor: Arc<dyn Executor>) -> Self {
        Self {
            matching: Matching::Direct,
            executor,
            log: Arc::new(NullSink),
        }
    }
}

impl Default for BrokerConfig {
    /// Standard wiring:
    ///
    /// - `matching = Discriminator(AssignableType)`
    /// - `executor = SequentialExecutor::default()` (blocking, continue, rethrow)
    /// - `log = NullSink`
    fn default() -> Self {
        Self {
            matching: Matching::default(),
            executor: Arc::new(SequentialExecutor::default()),
            log: Arc::new(NullSink),
        }
    }
}

impl fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("matching", &self.matching)
            .field("executor", &self.executor.name())
            .finish_non_exhaustive()
    }
}
