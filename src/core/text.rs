//! Width helpers for plain widget text.
//!
//! Widths are computed per grapheme so multi-codepoint clusters count once.
//! Input is assumed free of ANSI control sequences.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

pub fn grapheme_width(grapheme: &str) -> usize {
    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

pub fn visible_width(input: &str) -> usize {
    input.graphemes(true).map(grapheme_width).sum()
}

/// Longest prefix of `input` that fits in `max_width` columns.
pub fn truncate_to_width(input: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in input.graphemes(true) {
        let width = grapheme_width(grapheme);
        if used + width > max_width {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out
}

/// Pads `input` with trailing spaces up to `width` columns. Wider input is
/// returned unchanged.
pub fn pad_to_width(input: &str, width: usize) -> String {
    let visible = visible_width(input);
    if visible >= width {
        return input.to_string();
    }
    format!("{input}{}", " ".repeat(width - visible))
}

/// Word-wraps `input` to `width` columns, hard-breaking words wider than a
/// full line. Embedded newlines start new lines; blank lines survive.
pub fn wrap_text(input: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw_line in input.split('\n') {
        let words: Vec<&str> = raw_line.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0;

        for word in words {
            let word_width = visible_width(word);
            let separator = usize::from(current_width > 0);

            if current_width + separator + word_width <= width {
                if separator == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += separator + word_width;
                continue;
            }

            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                for grapheme in word.graphemes(true) {
                    let grapheme_w = grapheme_width(grapheme);
                    if current_width + grapheme_w > width && current_width > 0 {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push_str(grapheme);
                    current_width += grapheme_w;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
