//! Runtime behaviors: focus trapping and render failure isolation.

pub mod boundary;
pub mod focus;

pub use boundary::{ErrorBoundary, FallbackRenderer, RecoveryAction};
pub use focus::{ComponentHandle, FocusState, FocusTrap};
