// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// What a single keystroke did to a line, found by diffing the text before and after.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditOp {
    /// Text unchanged (the cursor may have moved). Never recorded.
    #[default]
    None,
    /// `len` characters spliced in at `pos`.
    Insert { pos: usize, len: usize },
    /// `len` characters removed at `pos`.
    Delete { pos: usize, len: usize },
    /// Anything else, eg: a replaced line or an undo. Never merged.
    Change,
}

impl EditOp {
    /// Positional diff. The inserted text must end at the cursor, the deleted text must
    /// start at the cursor; any other difference is a [`EditOp::Change`].
    #[must_use]
    pub fn classify(before: &str, after: &str, cursor_after: usize) -> EditOp {
        let before: Vec<char> = before.chars().collect();
        let after: Vec<char> = after.chars().collect();

        if after.len() > before.len() {
            let len = after.len() - before.len();
            if let Some(pos) = cursor_after.checked_sub(len) {
                if is_splice(&before, &after, pos, len) {
                    return EditOp::Insert { pos, len };
                }
            }
        } else if after.len() < before.len() {
            let len = before.len() - after.len();
            if is_splice(&after, &before, cursor_after, len) {
                return EditOp::Delete {
                    pos: cursor_after,
                    len,
                };
            }
        } else if before == after {
            return EditOp::None;
        }

        EditOp::Change
    }
}

/// True if `long` is `short` with `len` chars inserted at `pos`.
fn is_splice(short: &[char], long: &[char], pos: usize, len: usize) -> bool {
    pos <= short.len()
        && short[..pos] == long[..pos]
        && short[pos..] == long[pos + len..]
}
