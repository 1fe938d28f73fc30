// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallstr::SmallString;
use strum_macros::Display;

/// Longest filter expression in characters.
pub const FILTER_MAX_LEN: usize = 24;

pub type FilterString = SmallString<[u8; 32]>;

/// Which input has the keyboard while a panel is filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum FilterFocus {
    /// The panel is not filtered.
    #[default]
    Off,
    /// Typed characters go to the filter expression.
    Filter,
    /// The filter stays applied, typed characters go to the edit line.
    Line,
}

/// The small one line input holding a panel's filter expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterLine {
    text: FilterString,
    cursor: usize,
    /// Set by every modification, cleared once the panel has been refiltered.
    pub changed: bool,
}

/// Bindable operations on a [`FilterLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FilterEdit {
    Backspace,
    Kill,
    DeleteToEnd,
    DeleteChar,
    Left,
    Right,
    Begin,
    End,
}

impl FilterLine {
    #[must_use]
    pub fn text(&self) -> &str { self.text.as_str() }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    fn len(&self) -> usize { self.text.chars().count() }

    fn byte_index(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map_or(self.text.len(), |(index, _)| index)
    }

    /// Empty the expression without marking it changed, used when filtering starts.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.changed = false;
    }

    /// Returns false when the expression is already [`FILTER_MAX_LEN`] long.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.len() >= FILTER_MAX_LEN {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        self.changed = true;
        true
    }

    pub fn apply(&mut self, edit: FilterEdit) {
        match edit {
            FilterEdit::Begin => self.cursor = 0,
            FilterEdit::End => self.cursor = self.len(),
            FilterEdit::Left => self.cursor = self.cursor.saturating_sub(1),
            FilterEdit::Right => self.cursor = (self.cursor + 1).min(self.len()),
            FilterEdit::Kill => {
                self.text.clear();
                self.cursor = 0;
                self.changed = true;
            }
            FilterEdit::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                    self.changed = true;
                }
            }
            FilterEdit::DeleteChar => {
                if self.cursor < self.len() {
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                    self.changed = true;
                }
            }
            FilterEdit::DeleteToEnd => {
                let at = self.byte_index(self.cursor);
                self.text.truncate(at);
                self.changed = true;
            }
        }
    }
}
