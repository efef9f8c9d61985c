//! Terminal component kit with a built-in diagnostics core.
//!
//! Invariant: the diagnostics pipeline never propagates its own failures —
//! a storage or sink fault costs at most the entry being recorded.
//!
//! # Public API Overview
//! - Record leveled diagnostics through [`Logger`] and enriched failure
//!   reports through [`ErrorReporter`]; both persist bounded ring buffers
//!   via `diag_store` backends. [`Diagnostics`] wires the pair.
//! - Isolate render panics with [`ErrorBoundary`] and constrain Tab/Shift+Tab
//!   cycling with [`FocusTrap`].
//! - Compose [`Component`]s and the built-in [`Text`] / [`Button`] widgets.

pub mod config;
pub mod diagnostics;

/// Storage backends for the diagnostics buffers.
pub use diag_store;

pub mod core;
pub mod runtime;
pub mod widgets;

/// Environment configuration and build mode.
pub use crate::config::{EnvConfig, RunMode};

/// Diagnostics services and record types.
pub use crate::diagnostics::{
    CapturedError, ComponentInfo, Context, Diagnostics, ErrorReport, ErrorReporter, LogEntry,
    LogLevel, LogSink, Logger, StderrSink, FALLBACK_SESSION_ID,
};

/// Runtime component traits and input events.
pub use crate::core::component::{Component, Focusable};
pub use crate::core::input_event::InputEvent;

/// Runtime behaviors.
pub use crate::runtime::boundary::{ErrorBoundary, FallbackRenderer, RecoveryAction};
pub use crate::runtime::focus::{ComponentHandle, FocusState, FocusTrap};

/// Built-in UI components.
pub use crate::widgets::{Button, Text};

/// Width and wrapping helpers.
pub use crate::core::text::{pad_to_width, truncate_to_width, visible_width, wrap_text};

/// Returns whether a component exposes focus behavior via [`Focusable`].
pub fn is_focusable(component: &mut dyn Component) -> bool {
    component.as_focusable().is_some()
}
