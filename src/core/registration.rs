//! # Registrations and their owning handle.
//!
//! A [`Registration`] pairs a [`MessageType`] with a handler. The broker's
//! store only keeps a `Weak` to it; the one strong owner is the
//! [`Subscription`] returned to the caller.
//!
//! ## Lifecycle
//! ```text
//! Broker::register ──► Arc<Registration> ──► Subscription (caller keeps it)
//!                           └─ Weak ──► store
//!
//! Subscription::unsubscribe().await   → removed from the store now (idempotent)
//! drop(Subscription)                  → Weak is dead; purged on the next read
//! ```
//!
//! The subscription reaches back into the store through a `Weak` as well, so a
//! subscription that outlives its broker neither keeps the broker alive nor
//! fails: unsubscribing simply does nothing.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::core::broker::RegistrationStore;
use crate::logging::Logger;
use crate::messages::{HandlerRef, MessageType};

/// One (message type, handler) association.
pub struct Registration {
    message_type: MessageType,
    handler: HandlerRef,
}

impl Registration {
    pub(crate) fn new(message_type: MessageType, handler: HandlerRef) -> Self {
        Self {
            message_type,
            handler,
        }
    }

    pub fn message_type(&self) -> &MessageType {
        &self.message_type
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("message_type", &self.message_type)
            .field("handler", &self.handler.name())
            .finish()
    }
}

/// Handle keeping a registration alive.
///
/// Dropping it ends delivery (lazily); [`Subscription::unsubscribe`] ends it
/// immediately. Keep it for as long as the handler should receive messages.
#[must_use = "dropping a Subscription unregisters its handler"]
pub struct Subscription {
    registration: Arc<Registration>,
    store: Weak<RegistrationStore>,
    unsubscribed: AtomicBool,
    log: Logger,
}

impl Subscription {
    pub(crate) fn new(
        registration: Arc<Registration>,
        store: Weak<RegistrationStore>,
        log: Logger,
    ) -> Self {
        Self {
            registration,
            store,
            unsubscribed: AtomicBool::new(false),
            log,
        }
    }

    /// Removes the registration from the broker.
    ///
    /// Completes once the store no longer holds it: a `send` whose matching
    /// step starts afterwards will not see the handler. Calling it again is a
    /// no-op. A `send` that already took its snapshot still runs the handler.
    ///
    /// The subscription is only marked unsubscribed after the removal, so a
    /// call dropped before completion can be retried.
    pub async fn unsubscribe(&self) {
        if self.is_unsubscribed() {
            return;
        }
        if let Some(store) = self.store.upgrade() {
            self.log.trace(format_args!(
                "handler '{}' was manually unregistered from {}",
                self.registration.handler.name(),
                self.registration.message_type
            ));
            store
                .remove(&self.registration.message_type, &self.registration)
                .await;
        }
        self.unsubscribed.store(true, Ordering::Release);
    }

    /// True once [`Subscription::unsubscribe`] has completed.
    pub fn is_unsubscribed(&self) -> bool {
        self.unsubscribed.load(Ordering::Acquire)
    }

    pub fn message_type(&self) -> &MessageType {
        &self.registration.message_type
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.registration.handler
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("registration", &self.registration)
            .field("unsubscribed", &self.is_unsubscribed())
            .finish()
    }
}
