//! Render failure barrier for a component subtree.
//!
//! An explicit two-state machine: Healthy renders the child, Failed renders
//! a fallback until reset. Only panics raised inside `render` are caught;
//! failures in event handlers or background work never reach a boundary and
//! must go through `ErrorReporter::capture` / `report_async_error` at the
//! call site.

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::config::RunMode;
use crate::core::component::Component;
use crate::core::input_event::InputEvent;
use crate::core::text::wrap_text;
use crate::diagnostics::reporter::{CapturedError, ComponentInfo, ErrorReporter};

/// Terminal recovery paths offered by the built-in fallback, distinct from
/// the in-place reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    Reload,
    GoHome,
}

/// Caller-supplied fallback UI: error and width in, lines out.
pub type FallbackRenderer = Box<dyn Fn(&CapturedError, usize) -> Vec<String>>;

enum BoundaryState {
    Healthy,
    Failed {
        error: CapturedError,
        info: ComponentInfo,
    },
}

pub struct ErrorBoundary {
    name: String,
    child: Box<dyn Component>,
    reporter: Rc<ErrorReporter>,
    mode: RunMode,
    state: BoundaryState,
    fallback: Option<FallbackRenderer>,
    on_recover: Option<Box<dyn FnMut(RecoveryAction)>>,
}

impl ErrorBoundary {
    pub fn new(
        name: impl Into<String>,
        child: Box<dyn Component>,
        reporter: Rc<ErrorReporter>,
    ) -> Self {
        let mode = reporter.mode();
        Self {
            name: name.into(),
            child,
            reporter,
            mode,
            state: BoundaryState::Healthy,
            fallback: None,
            on_recover: None,
        }
    }

    /// Replaces the built-in fallback UI. The custom renderer is
    /// display-only; `enter` still resets the boundary.
    pub fn set_fallback(&mut self, fallback: Option<FallbackRenderer>) {
        self.fallback = fallback;
    }

    /// Receives the terminal recovery actions picked from the built-in
    /// fallback.
    pub fn set_on_recover(&mut self, handler: Option<Box<dyn FnMut(RecoveryAction)>>) {
        self.on_recover = handler;
    }

    #[must_use]
    pub fn has_failed(&self) -> bool {
        matches!(self.state, BoundaryState::Failed { .. })
    }

    #[must_use]
    pub fn captured_error(&self) -> Option<&CapturedError> {
        match &self.state {
            BoundaryState::Failed { error, .. } => Some(error),
            BoundaryState::Healthy => None,
        }
    }

    /// Clears the captured failure; the next render re-attempts the child.
    pub fn reset(&mut self) {
        self.state = BoundaryState::Healthy;
        self.child.invalidate();
    }

    fn fail(&mut self, error: CapturedError) {
        let info = ComponentInfo::new(format!("in {}", self.name));
        self.reporter
            .report_boundary_error(error.clone(), info.clone(), &self.name);
        self.state = BoundaryState::Failed { error, info };
    }

    fn render_fallback(&self, width: usize) -> Vec<String> {
        let BoundaryState::Failed { error, info } = &self.state else {
            return Vec::new();
        };

        if let Some(renderer) = self.fallback.as_ref() {
            return renderer(error, width);
        }

        let mut lines = wrap_text("Something went wrong.", width);
        lines.extend(wrap_text(
            "Press enter to try again, r to reload, h to go home.",
            width,
        ));

        // Raw failure detail is a development aid; production keeps it out
        // of the terminal.
        if self.mode.is_development() {
            lines.push(String::new());
            lines.extend(wrap_text(&error.message, width));
            if let Some(detail) = &error.detail {
                lines.extend(wrap_text(detail, width));
            }
            lines.extend(wrap_text(&info.component_stack, width));
        }

        lines
    }
}

impl Component for ErrorBoundary {
    fn render(&mut self, width: usize) -> Vec<String> {
        if self.has_failed() {
            return self.render_fallback(width);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.child.render(width))) {
            Ok(lines) => lines,
            Err(payload) => {
                self.fail(CapturedError::from_panic(payload.as_ref()));
                self.render_fallback(width)
            }
        }
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if !self.has_failed() {
            self.child.handle_event(event);
            return;
        }

        if event.is_key("enter") {
            self.reset();
            return;
        }

        if self.fallback.is_some() {
            return;
        }

        if let InputEvent::Text { text } = event {
            let action = match text.as_str() {
                "r" => Some(RecoveryAction::Reload),
                "h" => Some(RecoveryAction::GoHome),
                _ => None,
            };
            if let (Some(action), Some(handler)) = (action, self.on_recover.as_mut()) {
                handler(action);
            }
        }
    }

    fn invalidate(&mut self) {
        self.child.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorBoundary, RecoveryAction};
    use crate::config::RunMode;
    use crate::core::component::Component;
    use crate::core::input_event::InputEvent;
    use crate::diagnostics::Diagnostics;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::OnceLock;

    fn silence_panics() {
        static HOOK: OnceLock<()> = OnceLock::new();
        HOOK.get_or_init(|| {
            std::panic::set_hook(Box::new(|_| {}));
        });
    }

    struct Flaky {
        healthy: Rc<RefCell<bool>>,
    }

    impl Component for Flaky {
        fn render(&mut self, _width: usize) -> Vec<String> {
            if *self.healthy.borrow() {
                vec!["content".to_string()]
            } else {
                panic!("render exploded");
            }
        }
    }

    fn boundary_over_flaky(mode: RunMode) -> (ErrorBoundary, Rc<RefCell<bool>>, Diagnostics) {
        let diagnostics = Diagnostics::in_memory(mode);
        let healthy = Rc::new(RefCell::new(false));
        let child = Flaky {
            healthy: Rc::clone(&healthy),
        };
        let boundary = ErrorBoundary::new("panel", Box::new(child), diagnostics.reporter());
        (boundary, healthy, diagnostics)
    }

    #[test]
    fn panic_during_render_switches_to_the_fallback() {
        silence_panics();
        let (mut boundary, _healthy, _diagnostics) = boundary_over_flaky(RunMode::Development);

        let lines = boundary.render(40);
        assert!(boundary.has_failed());
        assert!(lines.iter().any(|line| line.contains("Something went wrong")));
        assert!(lines.iter().any(|line| line.contains("render exploded")));
    }

    #[test]
    fn each_throw_is_reported_exactly_once() {
        silence_panics();
        let (mut boundary, healthy, diagnostics) = boundary_over_flaky(RunMode::Production);
        let reporter = diagnostics.reporter();

        boundary.render(40);
        boundary.render(40);
        boundary.render(40);
        assert_eq!(reporter.recent_reports().len(), 1);

        boundary.reset();
        boundary.render(40);
        assert_eq!(reporter.recent_reports().len(), 2);

        *healthy.borrow_mut() = true;
        boundary.reset();
        assert_eq!(boundary.render(40), vec!["content"]);
        assert_eq!(reporter.recent_reports().len(), 2);
    }

    #[test]
    fn production_fallback_hides_failure_detail() {
        silence_panics();
        let (mut boundary, _healthy, _diagnostics) = boundary_over_flaky(RunMode::Production);

        let lines = boundary.render(40);
        assert!(lines.iter().any(|line| line.contains("Something went wrong")));
        assert!(!lines.iter().any(|line| line.contains("render exploded")));
        assert!(!lines.iter().any(|line| line.contains("in panel")));
    }

    #[test]
    fn custom_fallback_replaces_the_built_in_ui() {
        silence_panics();
        let (mut boundary, _healthy, _diagnostics) = boundary_over_flaky(RunMode::Development);
        boundary.set_fallback(Some(Box::new(|error, _width| {
            vec![format!("custom: {}", error.message)]
        })));

        let lines = boundary.render(40);
        assert_eq!(lines, vec!["custom: render exploded"]);
    }

    #[test]
    fn enter_resets_and_reattempts_the_child() {
        silence_panics();
        let (mut boundary, healthy, _diagnostics) = boundary_over_flaky(RunMode::Production);

        boundary.render(40);
        assert!(boundary.has_failed());

        *healthy.borrow_mut() = true;
        boundary.handle_event(&InputEvent::key("enter"));
        assert!(!boundary.has_failed());
        assert_eq!(boundary.render(40), vec!["content"]);
    }

    #[test]
    fn built_in_fallback_offers_terminal_recovery_paths() {
        silence_panics();
        let (mut boundary, _healthy, _diagnostics) = boundary_over_flaky(RunMode::Production);
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picked);
        boundary.set_on_recover(Some(Box::new(move |action| sink.borrow_mut().push(action))));

        boundary.render(40);
        boundary.handle_event(&InputEvent::text("r"));
        boundary.handle_event(&InputEvent::text("h"));
        boundary.handle_event(&InputEvent::text("x"));

        assert_eq!(
            *picked.borrow(),
            vec![RecoveryAction::Reload, RecoveryAction::GoHome]
        );
    }

    #[test]
    fn events_while_healthy_reach_the_child() {
        silence_panics();
        struct Recorder {
            seen: Rc<RefCell<usize>>,
        }
        impl Component for Recorder {
            fn render(&mut self, _width: usize) -> Vec<String> {
                Vec::new()
            }
            fn handle_event(&mut self, _event: &InputEvent) {
                *self.seen.borrow_mut() += 1;
            }
        }

        let diagnostics = Diagnostics::in_memory(RunMode::Production);
        let seen = Rc::new(RefCell::new(0));
        let mut boundary = ErrorBoundary::new(
            "panel",
            Box::new(Recorder {
                seen: Rc::clone(&seen),
            }),
            diagnostics.reporter(),
        );

        boundary.handle_event(&InputEvent::key("enter"));
        assert_eq!(*seen.borrow(), 1);
    }
}
