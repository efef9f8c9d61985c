//! Focusable button widget.

use crate::core::component::{Component, Focusable};
use crate::core::input_event::InputEvent;
use crate::core::text::truncate_to_width;

pub struct Button {
    label: String,
    focused: bool,
    focus_enabled: bool,
    on_press: Option<Box<dyn FnMut()>>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            focused: false,
            focus_enabled: true,
            on_press: None,
        }
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_on_press(&mut self, handler: Option<Box<dyn FnMut()>>) {
        self.on_press = handler;
    }

    /// Removes the button from focus cycling while keeping it rendered.
    pub fn set_focus_enabled(&mut self, focus_enabled: bool) {
        self.focus_enabled = focus_enabled;
    }

    pub fn press(&mut self) {
        if let Some(handler) = self.on_press.as_mut() {
            handler();
        }
    }
}

impl Component for Button {
    fn render(&mut self, width: usize) -> Vec<String> {
        let marker = if self.focused { "→" } else { " " };
        let label = truncate_to_width(&self.label, width.saturating_sub(4));
        vec![format!("{marker} [{label}]")]
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if !self.focused {
            return;
        }
        let pressed =
            event.is_key("enter") || matches!(event, InputEvent::Text { text } if text == " ");
        if pressed {
            self.press();
        }
    }

    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl Focusable for Button {
    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn accepts_focus(&self) -> bool {
        self.focus_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::Button;
    use crate::core::component::{Component, Focusable};
    use crate::core::input_event::InputEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn render_marks_the_focused_state() {
        let mut button = Button::new("Save");
        assert_eq!(button.render(12), vec!["  [Save]"]);

        button.set_focused(true);
        assert_eq!(button.render(12), vec!["→ [Save]"]);
    }

    #[test]
    fn long_labels_are_truncated() {
        let mut button = Button::new("Save changes");
        assert_eq!(button.render(8), vec!["  [Save]"]);
    }

    #[test]
    fn enter_and_space_press_only_while_focused() {
        let presses = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&presses);
        let mut button = Button::new("Save");
        button.set_on_press(Some(Box::new(move || *counter.borrow_mut() += 1)));

        button.handle_event(&InputEvent::key("enter"));
        assert_eq!(*presses.borrow(), 0);

        button.set_focused(true);
        button.handle_event(&InputEvent::key("enter"));
        button.handle_event(&InputEvent::text(" "));
        button.handle_event(&InputEvent::text("x"));
        assert_eq!(*presses.borrow(), 2);
    }

    #[test]
    fn focus_opt_out_is_reported() {
        let mut button = Button::new("Save");
        assert!(button.accepts_focus());
        button.set_focus_enabled(false);
        assert!(!button.accepts_focus());
    }
}
