//! Broker core: registration storage, subscriptions and dispatch wiring.
//!
//! Internal modules:
//! - [`store`]: weak multi-value map, purged on read;
//! - [`registration`]: registrations and the [`Subscription`] handle owning them;
//! - [`broker`]: matching, snapshotting and handing off to the executor;
//! - [`registration_set`]: batch register/unregister helper;
//! - [`config`] / [`builder`]: broker wiring.

mod broker;
mod builder;
mod config;
mod registration;
mod registration_set;
mod store;

pub use broker::Broker;
pub use builder::BrokerBuilder;
pub use config::{BrokerConfig, Matching};
pub use registration::{Registration, Subscription};
pub use registration_set::RegistrationSet;
pub use store::WeakMultiMap;
