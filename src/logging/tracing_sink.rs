//! # `tracing` bridge.

use std::error::Error as StdError;
use std::fmt;

use tracing::Level;

use crate::logging::sink::{LogLevel, LogSink};

/// Forwards broker log records to [`tracing`] events.
///
/// Events use target `weakbus` and carry the component as a field:
/// ```text
/// TRACE weakbus: registering handler 'pong' for app::Ping component="broker"
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

macro_rules! emit {
    ($lvl:expr, $component:expr, $message:expr, $error:expr) => {
        match $error {
            Some(err) => tracing::event!(
                target: "weakbus",
                $lvl,
                component = $component,
                error = %err,
                "{}",
                $message
            ),
            None => tracing::event!(target: "weakbus", $lvl, component = $component, "{}", $message),
        }
    };
}

impl LogSink for TracingSink {
    fn log(
        &self,
        component: &'static str,
        level: LogLevel,
        message: fmt::Arguments<'_>,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        match level {
            LogLevel::Trace => emit!(Level::TRACE, component, message, error),
            LogLevel::Debug => emit!(Level::DEBUG, component, message, error),
            LogLevel::Info => emit!(Level::INFO, component, message, error),
            LogLevel::Warn => emit!(Level::WARN, component, message, error),
            LogLevel::Error => emit!(Level::ERROR, component, message, error),
        }
    }
}
