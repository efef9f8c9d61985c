//! Focus management: focused-component tracking and Tab-cycle trapping.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::component::Component;
use crate::core::input_event::InputEvent;

/// Shared handle to a boxed component, as stored in focus order.
pub type ComponentHandle = Rc<RefCell<Box<dyn Component>>>;

/// Tracks which component holds focus, toggling `Focusable` flags on change.
#[derive(Default)]
pub struct FocusState {
    focused: Option<ComponentHandle>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_focus(&mut self, target: Option<ComponentHandle>) {
        if let (Some(prev), Some(next)) = (self.focused.as_ref(), target.as_ref()) {
            if Rc::ptr_eq(prev, next) {
                return;
            }
        }

        if let Some(prev) = self.focused.take() {
            let mut component = prev.borrow_mut();
            if let Some(focusable) = component.as_focusable() {
                focusable.set_focused(false);
            }
        }

        if let Some(next) = target {
            {
                let mut component = next.borrow_mut();
                if let Some(focusable) = component.as_focusable() {
                    focusable.set_focused(true);
                }
            }
            self.focused = Some(next);
        }
    }

    pub fn clear(&mut self) {
        self.set_focus(None);
    }

    #[must_use]
    pub fn focused(&self) -> Option<ComponentHandle> {
        self.focused.as_ref().map(Rc::clone)
    }
}

/// Container that constrains Tab/Shift+Tab cycling to its focusable
/// children while active.
///
/// The focusable set is captured once at activation, in insertion order.
/// Children added or removed while the trap is active do not change the
/// cycle until the next activation.
#[derive(Default)]
pub struct FocusTrap {
    children: Vec<ComponentHandle>,
    enabled: bool,
    active: bool,
    focus: FocusState,
    cycle: Vec<ComponentHandle>,
    cursor: usize,
}

impl FocusTrap {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_children(children: Vec<ComponentHandle>) -> Self {
        Self {
            children,
            enabled: true,
            ..Self::default()
        }
    }

    pub fn add_child(&mut self, child: ComponentHandle) {
        self.children.push(child);
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling an active trap deactivates it; the current focus flags are
    /// left as they are.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.deactivate();
        }
        self.enabled = enabled;
    }

    /// Captures the focusable children and moves focus to the first one.
    /// Children whose `Focusable` opts out of focus are skipped.
    pub fn activate(&mut self) {
        if !self.enabled {
            return;
        }

        self.cycle = self
            .children
            .iter()
            .filter(|handle| {
                let mut component = handle.borrow_mut();
                match component.as_focusable() {
                    Some(focusable) => focusable.accepts_focus(),
                    None => false,
                }
            })
            .map(Rc::clone)
            .collect();
        self.cursor = 0;
        self.active = !self.cycle.is_empty();

        if self.active {
            self.focus.set_focus(Some(Rc::clone(&self.cycle[0])));
        }
    }

    /// Stops intercepting keys. Whatever currently holds focus keeps it;
    /// there is no forced focus restoration.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn focused(&self) -> Option<ComponentHandle> {
        self.focus.focused()
    }

    fn shift_focus(&mut self, forward: bool) {
        if self.cycle.is_empty() {
            return;
        }
        let len = self.cycle.len();
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
        self.focus.set_focus(Some(Rc::clone(&self.cycle[self.cursor])));
    }
}

impl Component for FocusTrap {
    fn render(&mut self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for child in &self.children {
            lines.extend(child.borrow_mut().render(width));
        }
        lines
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if self.active && self.enabled {
            if event.is_key("tab") {
                self.shift_focus(true);
                return;
            }
            if event.is_key("shift+tab") {
                self.shift_focus(false);
                return;
            }
        }

        if let Some(focused) = self.focus.focused() {
            focused.borrow_mut().handle_event(event);
        }
    }

    fn invalidate(&mut self) {
        for child in &self.children {
            child.borrow_mut().invalidate();
        }
    }
}
