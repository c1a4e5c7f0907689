//! # Polymorphic (assignable) type matching.

use crate::discriminators::Discriminator;
use crate::messages::MessageType;

/// Compatible iff the message type is the registered type or declares it,
/// directly or transitively, through [`Message::supertypes`](crate::Message::supertypes).
///
/// This is the default discriminator of a standard [`Broker`](crate::Broker).
#[derive(Clone, Copy, Debug, Default)]
pub struct AssignableType;

impl Discriminator for AssignableType {
    fn is_compatible(&self, message: &MessageType, registered: &MessageType) -> bool {
        message.is_assignable_to(registered)
    }

    fn name(&self) -> &'static str {
        "assignable"
    }
}
