//! Diagnostics pipeline: leveled logging plus error reporting, persisted as
//! bounded ring buffers through injectable `diag_store` backends.

pub mod logger;
pub mod reporter;

use std::path::PathBuf;
use std::rc::Rc;

use diag_store::{FileStorage, MemoryStorage, Storage};

use crate::config::{EnvConfig, RunMode};

pub use logger::{
    Context, LogEntry, LogLevel, LogSink, Logger, StderrSink, LOG_BUFFER_CAPACITY, LOG_BUFFER_KEY,
};
pub use reporter::{
    CapturedError, ComponentInfo, ErrorReport, ErrorReporter, FALLBACK_SESSION_ID,
    REPORT_BUFFER_CAPACITY, REPORT_BUFFER_KEY, SESSION_ID_KEY,
};

const DEFAULT_DIAG_DIR: &str = ".vitrine/diag";

/// Wired diagnostics services as an application embeds them: file-backed
/// log/report buffers plus a process-scoped session store.
pub struct Diagnostics {
    logger: Rc<Logger>,
    reporter: Rc<ErrorReporter>,
}

impl Diagnostics {
    pub fn new(config: &EnvConfig) -> Self {
        let root = config
            .diag_dir
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIAG_DIR));
        let diagnostics = Self::with_storage(
            config.mode,
            Rc::new(FileStorage::new(root)),
            Rc::new(MemoryStorage::new()),
        );
        diagnostics.logger.set_verbose(config.debug);
        diagnostics
    }

    /// Both stores in memory; for tests and headless embedding.
    pub fn in_memory(mode: RunMode) -> Self {
        Self::with_storage(
            mode,
            Rc::new(MemoryStorage::new()),
            Rc::new(MemoryStorage::new()),
        )
    }

    pub fn with_storage(
        mode: RunMode,
        storage: Rc<dyn Storage>,
        session_storage: Rc<dyn Storage>,
    ) -> Self {
        let logger = Rc::new(Logger::new(mode, Rc::clone(&storage)));
        let reporter = Rc::new(ErrorReporter::new(
            Rc::clone(&logger),
            storage,
            session_storage,
        ));
        Self { logger, reporter }
    }

    #[must_use]
    pub fn logger(&self) -> Rc<Logger> {
        Rc::clone(&self.logger)
    }

    #[must_use]
    pub fn reporter(&self) -> Rc<ErrorReporter> {
        Rc::clone(&self.reporter)
    }
}
