//! Uniform capture and enrichment of runtime failures.
//!
//! Every entry point normalizes what it is given into a [`CapturedError`],
//! merges caller context with derived context (session id, runtime
//! descriptor, active screen), forwards a summary to the logger, and
//! persists the report. Nothing in this pipeline propagates its own
//! failures: reporting an error can never raise a second one.

use std::any::Any;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use diag_store::{push_bounded, read_all, Storage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RunMode;
use crate::diagnostics::logger::{now_rfc3339, Context, Logger};

/// Storage key holding the bounded array of error reports.
pub const REPORT_BUFFER_KEY: &str = "vitrine_error_reports";
/// Maximum number of persisted reports; the oldest are evicted first.
pub const REPORT_BUFFER_CAPACITY: usize = 50;
/// Session-store key holding the per-run session identifier.
pub const SESSION_ID_KEY: &str = "vitrine_session_id";
/// Returned when no session-scoped storage is usable.
pub const FALLBACK_SESSION_ID: &str = "detached-session";

const OPAQUE_PANIC_MESSAGE: &str = "panic with non-string payload";

/// Normalized exception shape: message plus optional detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedError {
    pub message: String,
    pub detail: Option<String>,
}

impl CapturedError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Normalizes a std error, folding its source chain into the detail.
    #[must_use]
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            detail: if chain.is_empty() {
                None
            } else {
                Some(chain.join(": "))
            },
        }
    }

    /// Normalizes an arbitrary panic payload. `&str` and `String` payloads
    /// keep their text; anything else maps to a fixed opaque message.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        if let Some(text) = payload.downcast_ref::<&str>() {
            return Self::new(*text);
        }
        if let Some(text) = payload.downcast_ref::<String>() {
            return Self::new(text.clone());
        }
        Self::new(OPAQUE_PANIC_MESSAGE)
    }
}

/// Structural description of the failing component subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub component_stack: String,
}

impl ComponentInfo {
    #[must_use]
    pub fn new(component_stack: impl Into<String>) -> Self {
        Self {
            component_stack: component_stack.into(),
        }
    }
}

/// Persisted append-only, oldest evicted first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: CapturedError,
    pub component_info: Option<ComponentInfo>,
    pub context: Context,
    pub timestamp: String,
}

/// Explicitly constructed reporting service; share it via `Rc`.
pub struct ErrorReporter {
    logger: Rc<Logger>,
    storage: Rc<dyn Storage>,
    session_storage: Rc<dyn Storage>,
    session_id: RefCell<Option<String>>,
    active_screen: RefCell<Option<String>>,
}

impl ErrorReporter {
    pub fn new(
        logger: Rc<Logger>,
        storage: Rc<dyn Storage>,
        session_storage: Rc<dyn Storage>,
    ) -> Self {
        Self {
            logger,
            storage,
            session_storage,
            session_id: RefCell::new(None),
            active_screen: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.logger.mode()
    }

    /// Names the screen recorded in derived context, if the application
    /// tracks one.
    pub fn set_active_screen(&self, screen: Option<String>) {
        *self.active_screen.borrow_mut() = screen;
    }

    /// Session identifier for this run. Generated lazily, cached in the
    /// session store; a failing session store yields the fixed placeholder
    /// without caching it, so a recovered store still gets a real id.
    pub fn session_id(&self) -> String {
        if let Some(id) = self.session_id.borrow().as_ref() {
            return id.clone();
        }

        let loaded = match self.session_storage.load(SESSION_ID_KEY) {
            Ok(loaded) => loaded,
            Err(_) => return FALLBACK_SESSION_ID.to_string(),
        };

        let id = match loaded {
            Some(id) if !id.is_empty() => id,
            _ => {
                let id = uuid::Uuid::new_v4().to_string();
                if self.session_storage.store(SESSION_ID_KEY, &id).is_err() {
                    return FALLBACK_SESSION_ID.to_string();
                }
                id
            }
        };

        *self.session_id.borrow_mut() = Some(id.clone());
        id
    }

    /// Builds, logs, and persists a report.
    pub fn report(
        &self,
        error: CapturedError,
        component_info: Option<ComponentInfo>,
        context: Option<Context>,
    ) {
        let report = ErrorReport {
            context: self.enriched_context(context),
            timestamp: now_rfc3339(),
            error,
            component_info,
        };

        let mut summary = Context::new();
        if let Some(session) = report.context.get("session_id") {
            summary.insert("session_id".to_string(), session.clone());
        }
        for key in ["component", "action"] {
            if let Some(value) = report.context.get(key) {
                summary.insert(key.to_string(), value.clone());
            }
        }
        self.logger.error(
            &format!("reported: {}", report.error.message),
            Some(summary),
        );

        let _ = push_bounded(
            self.storage.as_ref(),
            REPORT_BUFFER_KEY,
            &report,
            REPORT_BUFFER_CAPACITY,
        );
    }

    /// Report for a failure intercepted by a render boundary.
    pub fn report_boundary_error(
        &self,
        error: CapturedError,
        component_info: ComponentInfo,
        component_name: &str,
    ) {
        let mut context = Context::new();
        context.insert(
            "component".to_string(),
            Value::String(component_name.to_string()),
        );
        context.insert(
            "action".to_string(),
            Value::String("error-boundary".to_string()),
        );
        self.report(error, Some(component_info), Some(context));
    }

    /// Report for a failure outside the render path (event handlers,
    /// timers, background callbacks); those never reach a boundary.
    pub fn report_async_error(
        &self,
        error: CapturedError,
        action: &str,
        context: Option<Context>,
    ) {
        let mut context = context.unwrap_or_default();
        context.insert("action".to_string(), Value::String(action.to_string()));
        self.report(error, None, Some(context));
    }

    /// Normalizes an arbitrary caught value and reports it. Callers never
    /// type-check what they caught.
    pub fn capture(&self, value: &(dyn Any + Send), context: Option<Context>) {
        self.report(CapturedError::from_panic(value), None, context);
    }

    /// Reports any displayable error value.
    pub fn capture_display(&self, value: impl Display, context: Option<Context>) {
        self.report(CapturedError::new(value.to_string()), None, context);
    }

    fn enriched_context(&self, context: Option<Context>) -> Context {
        let mut merged = context.unwrap_or_default();
        merged.insert("session_id".to_string(), Value::String(self.session_id()));
        merged.insert("runtime".to_string(), Value::String(runtime_descriptor()));
        if let Some(screen) = self.active_screen.borrow().as_ref() {
            merged.insert("screen".to_string(), Value::String(screen.clone()));
        }
        merged
    }

    /// Persisted reports, oldest first. Unreadable storage reads as empty.
    #[must_use]
    pub fn recent_reports(&self) -> Vec<ErrorReport> {
        read_all(self.storage.as_ref(), REPORT_BUFFER_KEY).unwrap_or_default()
    }

    pub fn clear_reports(&self) {
        let _ = self.storage.remove(REPORT_BUFFER_KEY);
    }
}

fn runtime_descriptor() -> String {
    format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
