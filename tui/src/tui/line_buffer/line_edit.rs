// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::{Display, EnumIter};

use super::LineBuffer;

/// The line editing operations that can be bound to keys. Typed characters are not
/// here; the dispatcher inserts them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum LineEdit {
    Begin,
    End,
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    Backspace,
    DeleteChar,
    DeleteToEnd,
    DeleteWord,
    Kill,
}

impl LineEdit {
    /// Apply to `line`; `screen_cols` is the row length used by [`LineEdit::Up`] and
    /// [`LineEdit::Down`]. Returns false when there was nothing to do (eg: a backspace
    /// at the start of the line, or a word delete on a space).
    pub fn apply(self, line: &mut LineBuffer, screen_cols: usize) -> bool {
        let before = line.cursor();
        match self {
            LineEdit::Begin => line.begin(),
            LineEdit::End => line.end(),
            LineEdit::Left => return line.left(),
            LineEdit::Right => return line.right(),
            LineEdit::Up => line.up(screen_cols),
            LineEdit::Down => line.down(screen_cols),
            LineEdit::WordLeft => line.word_left(),
            LineEdit::WordRight => line.word_right(),
            LineEdit::Backspace => return line.backspace(),
            LineEdit::DeleteChar => return line.delete_char(),
            LineEdit::DeleteWord => return line.delete_word(),
            LineEdit::DeleteToEnd => {
                let had_tail = line.cursor() < line.len();
                line.delete_to_end();
                return had_tail;
            }
            LineEdit::Kill => {
                let had_text = !line.is_empty();
                line.kill();
                return had_text;
            }
        }
        before != line.cursor()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_edit_keeps_cursor_in_bounds() {
        for op in LineEdit::iter() {
            for start in 0..=7 {
                let mut line = LineBuffer::new("$ ");
                line.put_str("ab cd e");
                line.set_cursor(start);
                op.apply(&mut line, 3);
                assert!(line.cursor() <= line.len(), "{op} from {start}");
            }
        }
    }

    #[test]
    fn test_apply_reports_no_op() {
        let mut line = LineBuffer::new("");
        assert!(!LineEdit::Backspace.apply(&mut line, 80));
        assert!(!LineEdit::Kill.apply(&mut line, 80));
        line.put_str("abc");
        assert!(LineEdit::Begin.apply(&mut line, 80));
        assert!(!LineEdit::Begin.apply(&mut line, 80));
        assert!(LineEdit::DeleteToEnd.apply(&mut line, 80));
        assert_eq!(line.text(), "");
    }
}
