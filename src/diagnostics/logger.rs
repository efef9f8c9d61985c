//! Leveled diagnostics logging with a persisted ring buffer.

use std::cell::RefCell;
use std::rc::Rc;

use diag_store::{push_bounded, read_all, Storage};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::RunMode;

/// Storage key holding the bounded array of recent log entries.
pub const LOG_BUFFER_KEY: &str = "vitrine_logs";
/// Maximum number of persisted log entries; the oldest are evicted first.
pub const LOG_BUFFER_CAPACITY: usize = 100;

/// Structured key/value payload attached to entries and reports.
pub type Context = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Immutable once created; only ring-buffer eviction destroys one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: Option<Context>,
    pub timestamp: String,
    pub user_id: Option<String>,
}

/// Console-side output for log entries. Injectable so tests record
/// emissions instead of writing to the terminal.
pub trait LogSink {
    fn emit(&mut self, entry: &LogEntry);
}

/// Default sink writing one line per entry to stderr.
#[derive(Debug, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn emit(&mut self, entry: &LogEntry) {
        let mut line = format!("[{}] {}", entry.level.as_str(), entry.message);
        if let Some(user_id) = &entry.user_id {
            line.push_str(&format!(" user={user_id}"));
        }
        if let Some(context) = &entry.context {
            for (key, value) in context {
                line.push_str(&format!(" {key}={value}"));
            }
        }
        eprintln!("{line}");
    }
}

/// Explicitly constructed logging service; share it via `Rc`.
///
/// Every call stamps and persists an entry. The sink only sees entries that
/// pass the mode gate: Development shows all levels, Production only warn
/// and error.
pub struct Logger {
    mode: RunMode,
    storage: Rc<dyn Storage>,
    sink: RefCell<Box<dyn LogSink>>,
    user_id: RefCell<Option<String>>,
    verbose: RefCell<bool>,
}

impl Logger {
    pub fn new(mode: RunMode, storage: Rc<dyn Storage>) -> Self {
        Self::with_sink(mode, storage, Box::new(StderrSink))
    }

    pub fn with_sink(mode: RunMode, storage: Rc<dyn Storage>, sink: Box<dyn LogSink>) -> Self {
        Self {
            mode,
            storage,
            sink: RefCell::new(sink),
            user_id: RefCell::new(None),
            verbose: RefCell::new(false),
        }
    }

    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Tags subsequent entries with the signed-in user, if any.
    pub fn set_user_id(&self, user_id: Option<String>) {
        *self.user_id.borrow_mut() = user_id;
    }

    /// Opens the sink gate for all levels regardless of mode. Persistence
    /// and fallback detail are unaffected.
    pub fn set_verbose(&self, verbose: bool) {
        *self.verbose.borrow_mut() = verbose;
    }

    pub fn debug(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Debug, message, context);
    }

    pub fn info(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Info, message, context);
    }

    pub fn warn(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Warn, message, context);
    }

    pub fn error(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Error, message, context);
    }

    fn log(&self, level: LogLevel, message: &str, context: Option<Context>) {
        let entry = LogEntry {
            level,
            message: message.to_string(),
            context,
            timestamp: now_rfc3339(),
            user_id: self.user_id.borrow().clone(),
        };

        if self.should_emit(level) {
            self.sink.borrow_mut().emit(&entry);
        }

        // Best-effort persistence: a failed write costs only this entry.
        let _ = push_bounded(
            self.storage.as_ref(),
            LOG_BUFFER_KEY,
            &entry,
            LOG_BUFFER_CAPACITY,
        );
    }

    fn should_emit(&self, level: LogLevel) -> bool {
        match self.mode {
            RunMode::Development => true,
            RunMode::Production => *self.verbose.borrow() || level >= LogLevel::Warn,
        }
    }

    /// Persisted entries, oldest first. Unreadable storage reads as empty.
    #[must_use]
    pub fn recent_entries(&self) -> Vec<LogEntry> {
        read_all(self.storage.as_ref(), LOG_BUFFER_KEY).unwrap_or_default()
    }

    pub fn clear_entries(&self) {
        let _ = self.storage.remove(LOG_BUFFER_KEY);
    }
}

pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
