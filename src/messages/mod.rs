//! # Messages, type tokens and handlers.
//!
//! This module provides the core message-related types:
//! - [`Message`] - marker trait for values that can be sent
//! - [`AnyMessage`] / [`MessageRef`] - type-erased message view
//! - [`MessageType`] - registration key with subtype query
//! - [`Handler`] - trait for async message handlers
//! - [`HandlerFn`] / [`TypedHandlerFn`] - closure-backed handlers
//! - [`HandlerRef`] / [`HandlerList`] - shared handles and dispatch snapshots

mod handler;
mod message;

pub use handler::{Handler, HandlerFn, HandlerList, HandlerRef, TypedHandlerFn};
pub use message::{AnyMessage, Message, MessageRef, MessageType};
