// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::LineBuffer;
use crate::display_width;

/// Mark shown in place of the prompt when the start of the line is scrolled away.
pub const SCROLLED_LEFT_MARK: char = '<';
/// Mark shown in the last column when the text continues past the screen edge.
pub const CONTINUES_RIGHT_MARK: char = '>';

/// What to paint for a [`LineBuffer`] in an area `width` columns wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    /// The prompt, or [`SCROLLED_LEFT_MARK`] when scrolled.
    pub lead: String,
    pub body: String,
    /// Paint [`CONTINUES_RIGHT_MARK`] after the body.
    pub continues: bool,
    /// Screen column of the cursor relative to the start of the area.
    pub cursor_col: usize,
}

impl LineBuffer {
    /// Slice the line for display using the current offset.
    #[must_use]
    pub fn view(&self, width: usize) -> LineView {
        let lead = if self.offset() == 0 {
            self.prompt().to_string()
        } else {
            SCROLLED_LEFT_MARK.to_string()
        };
        let lead_width = display_width(&lead);
        let available = width.saturating_sub(lead_width);

        let visible: Vec<char> = self.text().chars().skip(self.offset()).collect();
        let (body, continues) = if visible.len() > available {
            (
                visible[..available.saturating_sub(1)].iter().collect::<String>(),
                true,
            )
        } else {
            (visible.iter().collect::<String>(), false)
        };

        let cursor_col = lead_width + self.cursor().saturating_sub(self.offset());
        LineView {
            lead,
            body,
            continues,
            cursor_col,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_view_fits() {
        let mut line = LineBuffer::new("$ ");
        line.put_str("ls");
        let view = line.view(20);
        assert_eq!(view.lead, "$ ");
        assert_eq!(view.body, "ls");
        assert!(!view.continues);
        assert_eq!(view.cursor_col, 4);
    }

    #[test]
    fn test_view_scrolled_and_continued() {
        let mut line = LineBuffer::new("$ ");
        line.put_str(&"0123456789".repeat(6));
        line.set_cursor(30);
        line.adjust_offset(20);
        assert_eq!(line.offset(), 16);
        let view = line.view(20);
        assert_eq!(view.lead, "<");
        assert_eq!(view.body.chars().count(), 18);
        assert!(view.body.starts_with("6789"));
        assert!(view.continues);
        assert_eq!(view.cursor_col, 15);
    }
}
