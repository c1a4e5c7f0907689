//! # Exact type matching.

use crate::discriminators::Discriminator;
use crate::messages::MessageType;

/// Compatible iff the message type equals the registered type.
///
/// No subtype matching: a handler registered for `Shape` never receives a
/// `Circle`, even when `Circle` declares `Shape` as a supertype.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactType;

impl Discriminator for ExactType {
    fn is_compatible(&self, message: &MessageType, registered: &MessageType) -> bool {
        message == registered
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}
