//! Structured input events delivered to components.

/// Input event delivered to components.
///
/// `key_id` is a normalized identifier ("tab", "shift+tab", "enter",
/// "escape", ...); printable input arrives as `Text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key { key_id: String },
    Text { text: String },
    Resize { columns: u16, rows: u16 },
}

impl InputEvent {
    pub fn key(key_id: impl Into<String>) -> Self {
        Self::Key {
            key_id: key_id.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Whether this event is a key press with the given normalized id.
    #[must_use]
    pub fn is_key(&self, id: &str) -> bool {
        matches!(self, Self::Key { key_id } if key_id == id)
    }
}
