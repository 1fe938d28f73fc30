// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The per line undo ring.
//!
//! # Layout
//!
//! ```text
//!            base
//!             │
//!   slots  [ S3 │ S0 │ S1 │ S2 ]        capacity = UNDO_LEVELS
//!             └─ undo_count ─┘ └ redo ┘
//! ```
//!
//! - The `undo_count` slots starting at `base` hold the states *before* each recorded
//!   edit, oldest first.
//! - The `redo_count` slots after them hold states that were undone.
//! - When the ring is full, recording one more edit overwrites the oldest entry and
//!   advances `base`.
//!
//! # Merging
//!
//! Typing a word should be one undo step, not one step per key:
//!
//! - An insert merges with the previous insert when it starts where that one ended and
//!   the two lengths add up to less than [`INSERT_MERGE_LIMIT`]. Only the latest
//!   insert is remembered, so a run of typed characters is one entry while a long
//!   paste starts a new one.
//! - A single char delete merges with a previous single char delete at the same
//!   position (forward delete) or one to the left (backspace).
//! - [`EditOp::Change`] never merges.
//!
//! Any recorded edit, merged or not, discards the redo entries.

use super::EditOp;

/// Capacity of the ring.
pub const UNDO_LEVELS: usize = 10;

/// Two consecutive inserts merge when their lengths add up to less than this.
pub const INSERT_MERGE_LIMIT: usize = 10;

/// A saved copy of a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub cursor: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoHistory {
    slots: [Snapshot; UNDO_LEVELS],
    base: usize,
    undo_count: usize,
    redo_count: usize,
    last_op: EditOp,
}

impl UndoHistory {
    #[must_use]
    pub fn undo_count(&self) -> usize { self.undo_count }

    #[must_use]
    pub fn redo_count(&self) -> usize { self.redo_count }

    #[must_use]
    pub fn last_op(&self) -> EditOp { self.last_op }

    /// Forget everything, eg: when the line starts serving a different context.
    pub fn reset(&mut self) {
        self.undo_count = 0;
        self.redo_count = 0;
        self.last_op = EditOp::None;
    }

    /// Record an edit described by `op`; `before` is the line state prior to it.
    /// Returns true if a new entry was pushed (false for no-ops and merges).
    pub fn record(&mut self, before: Snapshot, op: EditOp) -> bool {
        if op == EditOp::None {
            return false;
        }
        let merged = match (op, self.last_op) {
            (
                EditOp::Insert { pos, len },
                EditOp::Insert {
                    pos: last_pos,
                    len: last_len,
                },
            ) => len + last_len < INSERT_MERGE_LIMIT && pos == last_pos + last_len,
            (
                EditOp::Delete { pos, len: 1 },
                EditOp::Delete {
                    pos: last_pos,
                    len: 1,
                },
            ) => pos == last_pos || pos + 1 == last_pos,
            _ => false,
        };
        self.last_op = op;

        self.redo_count = 0;
        if merged {
            return false;
        }

        let index = (self.base + self.undo_count) % UNDO_LEVELS;
        if self.undo_count < UNDO_LEVELS {
            self.undo_count += 1;
        } else {
            self.base = (self.base + 1) % UNDO_LEVELS;
        }
        self.slots[index] = before;
        true
    }

    /// Step back. `live` is the current line state, it is kept for a later redo.
    /// Returns the state to install, or `None` when there is nothing to undo.
    pub fn undo(&mut self, live: Snapshot) -> Option<Snapshot> {
        if self.undo_count == 0 {
            return None;
        }
        self.undo_count -= 1;
        self.redo_count += 1;
        Some(self.exchange(self.undo_count, live))
    }

    /// Step forward again after an undo. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, live: Snapshot) -> Option<Snapshot> {
        if self.redo_count == 0 {
            return None;
        }
        let level = self.undo_count;
        self.undo_count += 1;
        self.redo_count -= 1;
        Some(self.exchange(level, live))
    }

    fn exchange(&mut self, level: usize, live: Snapshot) -> Snapshot {
        let index = (self.base + level) % UNDO_LEVELS;
        self.last_op = EditOp::Change;
        std::mem::replace(&mut self.slots[index], live)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use crate::{LineBuffer, Quoting};

    /// Run `edit` on `line` bracketed the way the kernel brackets a keystroke.
    fn keystroke(line: &mut LineBuffer, edit: impl FnOnce(&mut LineBuffer)) {
        let before = line.snapshot();
        edit(line);
        line.commit_edit(before);
    }

    fn type_text(line: &mut LineBuffer, text: &str) {
        for ch in text.chars() {
            keystroke(line, |it| it.insert_char(ch));
        }
    }

    #[test]
    fn test_typed_word_then_backspace_scenario() {
        let mut line = LineBuffer::new("");
        type_text(&mut line, "abc");
        keystroke(&mut line, |it| {
            it.backspace();
        });
        assert_eq!(line.text(), "ab");
        assert_eq!(line.history.undo_count(), 2);

        assert!(line.undo());
        assert_eq!(line.text(), "abc");
        assert!(line.undo());
        assert_eq!(line.text(), "");
        assert!(!line.undo());
    }

    #[test_case(1)]
    #[test_case(9)]
    #[test_case(10)]
    #[test_case(20)]
    #[test_case(40)]
    fn test_a_typing_run_is_one_undo_step(n: usize) {
        let mut line = LineBuffer::new("");
        type_text(&mut line, &"x".repeat(n));
        assert_eq!(line.history.undo_count(), 1);
        assert!(line.undo());
        assert_eq!(line.text(), "");
    }

    #[test]
    fn test_long_insert_after_typing_is_a_new_step() {
        let mut line = LineBuffer::new("");
        type_text(&mut line, "ls ");
        keystroke(&mut line, |it| it.insert_str("file_name.txt", Quoting::Literal));
        assert_eq!(line.history.undo_count(), 2);
        assert!(line.undo());
        assert_eq!(line.text(), "ls ");
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut line = LineBuffer::new("");
        type_text(&mut line, "echo");
        keystroke(&mut line, |it| it.insert_char(' '));
        keystroke(&mut line, LineBuffer::word_left);
        keystroke(&mut line, |it| it.put_str("ls -l"));
        keystroke(&mut line, |it| {
            it.backspace();
        });
        let final_state = (line.text().to_string(), line.cursor());

        let mut undone = 0;
        while line.undo() {
            undone += 1;
        }
        assert_eq!(line.text(), "");
        for _ in 0..undone {
            assert!(line.redo());
        }
        assert!(!line.redo());
        assert_eq!((line.text().to_string(), line.cursor()), final_state);
    }

    #[test]
    fn test_new_edit_after_undo_clears_redo() {
        let mut line = LineBuffer::new("");
        type_text(&mut line, "ab");
        keystroke(&mut line, LineBuffer::kill);
        assert!(line.undo());
        assert_eq!(line.history.redo_count(), 1);
        keystroke(&mut line, |it| it.insert_char('c'));
        assert_eq!(line.history.redo_count(), 0);
        assert!(!line.redo());
        assert_eq!(line.text(), "abc");
    }

    #[test]
    fn test_backspace_and_delete_streaks_merge() {
        let mut line = LineBuffer::new("");
        line.put_str("abcdef");
        for _ in 0..3 {
            keystroke(&mut line, |it| {
                it.backspace();
            });
        }
        assert_eq!(line.history.undo_count(), 1);

        line.begin();
        // Not adjacent to the backspace streak, so this starts a new entry.
        for _ in 0..2 {
            keystroke(&mut line, |it| {
                it.delete_char();
            });
        }
        assert_eq!(line.text(), "c");
        assert_eq!(line.history.undo_count(), 2);
        assert!(line.undo());
        assert_eq!(line.text(), "abc");
    }

    #[test]
    fn test_ring_overwrites_oldest_entry() {
        let mut line = LineBuffer::new("");
        for i in 0..15 {
            keystroke(&mut line, |it| it.put_str(&format!("v{i}")));
        }
        assert_eq!(line.history.undo_count(), 10);
        let mut undone = 0;
        while line.undo() {
            undone += 1;
        }
        assert_eq!(undone, 10);
        assert_eq!(line.text(), "v4");
        assert_eq!(line.history.undo_count() + line.history.redo_count(), 10);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut line = LineBuffer::new("");
        type_text(&mut line, "abc");
        line.history.reset();
        assert!(!line.undo());
        assert_eq!(line.history.last_op(), super::EditOp::None);
    }
}
