// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EditOp, Snapshot, UndoHistory, display_width};

/// The horizontal scroll offset moves in steps of this many characters.
pub const OFFSET_STEP: usize = 16;

/// Characters that a shell would interpret. They get a backslash when a name is pasted
/// into a command line with [`Quoting::Shell`].
pub const SHELL_SPECIAL_CHARS: &str = "\t ()<>[]{}#$&\\|?*;'\"`~";

/// How [`LineBuffer::insert_str`] treats shell metacharacters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting<'a> {
    Literal,
    /// Backslash [`SHELL_SPECIAL_CHARS`] plus any of the `extra` chars.
    Shell { extra: &'a str },
}

/// One editable line: its text, a cursor and the horizontal scroll offset used when the
/// text is wider than the screen. Positions count characters, not bytes.
///
/// The cursor is kept in `[0, len]` by every operation. The offset is only meaningful
/// after [`LineBuffer::adjust_offset`], which the kernel runs after each key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    prompt: String,
    text: String,
    cursor: usize,
    offset: usize,
    pub history: UndoHistory,
}

fn signed(n: usize) -> isize { isize::try_from(n).unwrap_or(isize::MAX) }

fn unsigned(n: isize) -> usize { usize::try_from(n).unwrap_or(0) }

fn round_up(n: isize) -> isize {
    let step = signed(OFFSET_STEP);
    (n + step - 1) / step * step
}

fn round_down(n: isize) -> isize {
    let step = signed(OFFSET_STEP);
    n / step * step
}

impl LineBuffer {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str { &self.prompt }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) { self.prompt = prompt.into(); }

    #[must_use]
    pub fn prompt_width(&self) -> usize { display_width(&self.prompt) }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize { self.text.chars().count() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn offset(&self) -> usize { self.offset }

    pub fn set_cursor(&mut self, cursor: usize) { self.cursor = cursor.min(self.len()); }

    /// The text before the cursor.
    #[must_use]
    pub fn before_cursor(&self) -> &str { &self.text[..self.byte_index(self.cursor)] }

    #[must_use]
    pub fn char_at(&self, pos: usize) -> Option<char> { self.text.chars().nth(pos) }

    fn byte_index(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map_or(self.text.len(), |(index, _)| index)
    }

    fn chars(&self) -> Vec<char> { self.text.chars().collect() }

    // Cursor movement.

    pub fn begin(&mut self) { self.cursor = 0; }

    pub fn end(&mut self) { self.cursor = self.len(); }

    /// Returns false when already at the start.
    pub fn left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Returns false when already at the end.
    pub fn right(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move one screen row up, `screen_cols` characters back.
    pub fn up(&mut self, screen_cols: usize) { self.cursor = self.cursor.saturating_sub(screen_cols); }

    /// Move one screen row down, `screen_cols` characters forward.
    pub fn down(&mut self, screen_cols: usize) {
        self.cursor = (self.cursor + screen_cols).min(self.len());
    }

    /// Words are delimited by spaces only.
    pub fn word_left(&mut self) {
        let chars = self.chars();
        let mut curs = self.cursor;
        while curs > 0 && chars[curs - 1] == ' ' {
            curs -= 1;
        }
        while curs > 0 && chars[curs - 1] != ' ' {
            curs -= 1;
        }
        self.cursor = curs;
    }

    pub fn word_right(&mut self) {
        let chars = self.chars();
        let mut curs = self.cursor;
        while curs < chars.len() && chars[curs] != ' ' {
            curs += 1;
        }
        while curs < chars.len() && chars[curs] == ' ' {
            curs += 1;
        }
        self.cursor = curs;
    }

    // Deletion.

    fn delete_range(&mut self, from: usize, to: usize) {
        let start = self.byte_index(from);
        let end = self.byte_index(to);
        self.text.replace_range(start..end, "");
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.delete_range(self.cursor, self.cursor + 1);
        true
    }

    pub fn delete_char(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.delete_range(self.cursor, self.cursor + 1);
        true
    }

    pub fn delete_to_end(&mut self) {
        let start = self.byte_index(self.cursor);
        self.text.truncate(start);
    }

    /// Delete the word under the cursor together with the spaces that follow it.
    /// Returns false (and does nothing) when the cursor is on a space or at the end.
    pub fn delete_word(&mut self) -> bool {
        let chars = self.chars();
        match chars.get(self.cursor) {
            None | Some(' ') => return false,
            Some(_) => {}
        }
        let mut start = self.cursor;
        while start > 0 && chars[start - 1] != ' ' {
            start -= 1;
        }
        let mut eow = self.cursor;
        while eow < chars.len() && chars[eow] != ' ' {
            eow += 1;
        }
        while eow < chars.len() && chars[eow] == ' ' {
            eow += 1;
        }
        self.delete_range(start, eow);
        self.cursor = start;
        true
    }

    /// Clear the line.
    pub fn kill(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.offset = 0;
    }

    // Insertion.

    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert `text` at the cursor, leaving the cursor after it.
    pub fn insert_str(&mut self, text: &str, quoting: Quoting<'_>) {
        let mut acc = String::with_capacity(text.len());
        for ch in text.chars() {
            let special = match quoting {
                Quoting::Literal => false,
                Quoting::Shell { extra } => {
                    SHELL_SPECIAL_CHARS.contains(ch) || extra.contains(ch)
                }
            };
            if special {
                acc.push('\\');
            }
            acc.push(ch);
        }
        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, &acc);
        self.cursor += acc.chars().count();
    }

    /// Replace the whole content, cursor at the end.
    pub fn put_str(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = self.len();
    }

    // Display.

    /// Recompute the scroll offset for a line area `area_width` columns wide. The offset
    /// moves in [`OFFSET_STEP`] increments so the text doesn't jitter while typing. One
    /// column is reserved for the `>` continuation mark unless the cursor is at the end.
    /// Returns true when the offset changed.
    pub fn adjust_offset(&mut self, area_width: usize) -> bool {
        let old_offset = self.offset;
        let size = signed(self.len());
        let curs = signed(self.cursor);
        let mut screen = signed(area_width);
        let mut offset = signed(self.offset);

        // Cursor too far left.
        if offset > curs {
            offset = round_down(curs);
        }

        if offset != 0 {
            // Space left blank at the end, eliminate it as much as possible.
            let delta = screen - (1 + size - offset);
            if delta >= signed(OFFSET_STEP) {
                offset = (offset - round_down(delta)).max(0);
            }
        }

        if curs != size {
            screen -= 1;
        }

        // Cursor too far right, with the prompt.
        if offset == 0 && signed(self.prompt_width()) + curs > screen {
            offset = signed(OFFSET_STEP);
        }
        // Cursor too far right, with the `<` mark.
        if offset != 0 {
            let delta = 1 + curs - offset - screen;
            if delta > 0 {
                offset += round_up(delta);
            }
        }

        self.offset = unsigned(offset);
        old_offset != self.offset
    }

    /// True when the line doesn't fit on one screen row.
    #[must_use]
    pub fn is_long(&self, area_width: usize) -> bool {
        self.offset > 0 || self.prompt_width() + self.len() > area_width + 1
    }

    // Undo support.

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            cursor: self.cursor,
            offset: self.offset,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.cursor = snapshot.cursor.min(self.len());
        self.offset = snapshot.offset;
    }

    /// Classify the edit that turned `before` into the current state and record it in
    /// the history, merging it with the previous one when possible.
    pub fn commit_edit(&mut self, before: Snapshot) {
        let op = EditOp::classify(&before.text, &self.text, self.cursor);
        self.history.record(before, op);
    }

    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let live = self.snapshot();
        match self.history.undo(live) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let live = self.snapshot();
        match self.history.redo(live) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }
}
