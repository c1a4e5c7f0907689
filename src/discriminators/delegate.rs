//! # Closure-backed discriminator.

use std::fmt;

use crate::discriminators::Discriminator;
use crate::messages::MessageType;

/// Forwards both type tokens, unchanged, to a user predicate.
///
/// ## Example
/// ```rust
/// use weakbus::{Discriminator, DiscriminatorFn, Message, MessageType};
///
/// #[derive(Debug)]
/// struct Audit;
/// impl Message for Audit {}
///
/// // Everything is delivered to handlers registered for `Audit`.
/// let audit = DiscriminatorFn::new(|message: &MessageType, registered: &MessageType| {
///     registered == &MessageType::of::<Audit>() || message == registered
/// });
/// let t = MessageType::of::<Audit>();
/// assert!(audit.is_compatible(&t, &t));
/// ```
pub struct DiscriminatorFn<F> {
    f: F,
}

impl<F> DiscriminatorFn<F>
where
    F: Fn(&MessageType, &MessageType) -> bool + Send + Sync + 'static,
{
    /// Wraps the predicate.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for DiscriminatorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DiscriminatorFn")
    }
}

impl<F> Discriminator for DiscriminatorFn<F>
where
    F: Fn(&MessageType, &MessageType) -> bool + Send + Sync + 'static,
{
    fn is_compatible(&self, message: &MessageType, registered: &MessageType) -> bool {
        (self.f)(message, registered)
    }

    fn name(&self) -> &'static str {
        "delegate"
    }
}
