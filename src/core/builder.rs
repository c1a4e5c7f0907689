use std::sync::Arc;

use crate::core::{Broker, BrokerConfig, Matching};
use crate::discriminators::Discriminator;
use crate::executors::Executor;
use crate::logging::LogSink;

/// Builder for constructing a [`Broker`] from a [`BrokerConfig`].
pub struct BrokerBuilder {
    cfg: BrokerConfig,
}

impl BrokerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: BrokerConfig) -> Self {
        Self { cfg }
    }

    /// Sets the dispatch strategy.
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.cfg.executor = executor;
        self
    }

    /// Matches handlers through `discriminator` (standard wiring).
    pub fn with_discriminator(mut self, discriminator: Arc<dyn Discriminator>) -> Self {
        self.cfg.matching = Matching::Discriminator(discriminator);
        self
    }

    /// Matches handlers by exact type through direct key lookup (basic wiring).
    pub fn with_direct_matching(mut self) -> Self {
        self.cfg.matching = Matching::Direct;
        self
    }

    /// Sets the sink for broker and store logs.
    pub fn with_log(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.cfg.log = sink;
        self
    }

    /// Builds the broker.
    pub fn build(self) -> Broker {
        Broker::from_config(self.cfg)
    }
}
