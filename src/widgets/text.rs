//! Static text block widget.

use crate::core::component::Component;
use crate::core::text::{pad_to_width, wrap_text};

pub struct Text {
    text: String,
    padding_x: usize,
    padding_y: usize,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            padding_x: 1,
            padding_y: 1,
        }
    }

    pub fn with_padding(text: impl Into<String>, padding_x: usize, padding_y: usize) -> Self {
        Self {
            text: text.into(),
            padding_x,
            padding_y,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_padding(&mut self, padding_x: usize, padding_y: usize) {
        self.padding_x = padding_x;
        self.padding_y = padding_y;
    }
}

impl Component for Text {
    fn render(&mut self, width: usize) -> Vec<String> {
        if self.text.trim().is_empty() {
            return Vec::new();
        }

        let content_width = width.saturating_sub(self.padding_x * 2).max(1);
        let margin = " ".repeat(self.padding_x);
        let blank = " ".repeat(width);

        let mut lines = vec![blank.clone(); self.padding_y];
        for line in wrap_text(&self.text, content_width) {
            lines.push(pad_to_width(&format!("{margin}{line}"), width));
        }
        lines.extend(vec![blank; self.padding_y]);
        lines
    }
}
