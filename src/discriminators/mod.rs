//! Type-compatibility strategies.
//!
//! A [`Discriminator`] decides, for every registered key, whether a message of
//! a given runtime type should be delivered to handlers registered under it.
//! It is consulted once per candidate key during `send` and must be pure.
//!
//! ## Contents
//! - [`ExactType`]       delivers only to handlers registered for the exact type
//! - [`AssignableType`]  also delivers to handlers of declared supertypes (default)
//! - [`DiscriminatorFn`] delegates to a user closure
//!
//! ## Quick reference
//! ```text
//! message: Circle (supertypes: Shape)
//!
//!                      registered: Circle   Shape   Square
//! ExactType                        yes      no      no
//! AssignableType                   yes      yes     no
//! ```

mod assignable;
mod delegate;
mod exact;

use crate::messages::MessageType;

pub use assignable::AssignableType;
pub use delegate::DiscriminatorFn;
pub use exact::ExactType;

/// Predicate deciding message-to-handler type compatibility.
pub trait Discriminator: Send + Sync + 'static {
    /// Returns `true` if a message of type `message` may be delivered to
    /// handlers registered under `registered`.
    fn is_compatible(&self, message: &MessageType, registered: &MessageType) -> bool;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
