//! # Log sink contract and per-component logger.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Severity of a log record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns a short stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrow write interface the broker logs through.
///
/// `message` is lazily formatted: sinks that drop records pay nothing for it.
/// Implementations must not panic and should not block.
pub trait LogSink: Send + Sync + 'static {
    fn log(
        &self,
        component: &'static str,
        level: LogLevel,
        message: fmt::Arguments<'_>,
        error: Option<&(dyn StdError + 'static)>,
    );
}

/// Sink that discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(
        &self,
        _component: &'static str,
        _level: LogLevel,
        _message: fmt::Arguments<'_>,
        _error: Option<&(dyn StdError + 'static)>,
    ) {
    }
}

/// Logger bound to one component.
#[derive(Clone)]
pub struct Logger {
    component: &'static str,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(component: &'static str, sink: Arc<dyn LogSink>) -> Self {
        Self { component, sink }
    }

    /// Logger for `component` writing to [`NullSink`].
    pub fn null(component: &'static str) -> Self {
        Self::new(component, Arc::new(NullSink))
    }

    /// Same sink, different component name.
    pub fn for_component(&self, component: &'static str) -> Self {
        Self {
            component,
            sink: Arc::clone(&self.sink),
        }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    pub fn trace(&self, message: fmt::Arguments<'_>) {
        self.sink.log(self.component, LogLevel::Trace, message, None);
    }

    pub fn debug(&self, message: fmt::Arguments<'_>) {
        self.sink.log(self.component, LogLevel::Debug, message, None);
    }

    pub fn info(&self, message: fmt::Arguments<'_>) {
        self.sink.log(self.component, LogLevel::Info, message, None);
    }

    pub fn warn(&self, message: fmt::Arguments<'_>) {
        self.sink.log(self.component, LogLevel::Warn, message, None);
    }

    pub fn error(&self, message: fmt::Arguments<'_>, error: Option<&(dyn StdError + 'static)>) {
        self.sink.log(self.component, LogLevel::Error, message, error);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// One captured log record.
    #[derive(Clone, Debug)]
    pub(crate) struct Record {
        pub component: &'static str,
        pub level: LogLevel,
        pub message: String,
        pub error: Option<String>,
    }

    /// Sink that keeps every record in memory.
    #[derive(Default)]
    pub(crate) struct MemorySink {
        records: Mutex<Vec<Record>>,
    }

    impl MemorySink {
        pub(crate) fn records(&self) -> Vec<Record> {
            self.records.lock().unwrap().clone()
        }

        pub(crate) fn contains(&self, level: LogLevel, needle: &str) -> bool {
            self.records()
                .iter()
                .any(|r| r.level == level && r.message.contains(needle))
        }
    }

    impl LogSink for MemorySink {
        fn log(
            &self,
            component: &'static str,
            level: LogLevel,
            message: fmt::Arguments<'_>,
            error: Option<&(dyn StdError + 'static)>,
        ) {
            self.records.lock().unwrap().push(Record {
                component,
                level,
                message: message.to_string(),
                error: error.map(|e| e.to_string()),
            });
        }
    }
}
