// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Display, Formatter, Result};

/// One keystroke as the dispatcher sees it.
///
/// Control characters are kept as [`Key::Ctrl`] with the lowercase letter, so `Enter`
/// is `Ctrl('m')` and `Tab` is `Ctrl('i')`, just like the bytes a terminal sends. Alt
/// combinations never show up here: the key source splits them into [`Key::Esc`]
/// followed by the plain key, and the [`crate::KeyReader`] turns that into the one bit
/// "escape pending" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Esc,
    /// The `DEL` (`\177`) key, delete the char under the cursor.
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    ShiftLeft,
    ShiftRight,
    F(u8),
}

impl Key {
    pub const ENTER: Key = Key::Ctrl('m');
    pub const TAB: Key = Key::Ctrl('i');
    pub const BACKSPACE: Key = Key::Ctrl('h');
    pub const CANCEL: Key = Key::Ctrl('c');

    /// Letters are matched case insensitively against the tables.
    #[must_use]
    pub fn fold_case(self) -> Key {
        match self {
            Key::Char(ch) if ch.is_uppercase() => {
                Key::Char(ch.to_lowercase().next().unwrap_or(ch))
            }
            other => other,
        }
    }

    /// A plain character that may be inserted into a line as typed.
    #[must_use]
    pub fn printable(self) -> Option<char> {
        match self {
            Key::Char(ch) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Key::Char(' ') => write!(f, "<space>"),
            Key::Char(ch) => write!(f, "{ch}"),
            Key::Ctrl('m') => write!(f, "<enter>"),
            Key::Ctrl('i') => write!(f, "<tab>"),
            Key::Ctrl('h') => write!(f, "<bs>"),
            Key::Ctrl(ch) => write!(f, "ctrl-{}", ch.to_ascii_uppercase()),
            Key::Esc => write!(f, "<esc>"),
            Key::Delete => write!(f, "<del>"),
            Key::Left => write!(f, "<left>"),
            Key::Right => write!(f, "<right>"),
            Key::Up => write!(f, "<up>"),
            Key::Down => write!(f, "<down>"),
            Key::Home => write!(f, "<home>"),
            Key::End => write!(f, "<end>"),
            Key::PageUp => write!(f, "<pgup>"),
            Key::PageDown => write!(f, "<pgdn>"),
            Key::Insert => write!(f, "<ins>"),
            Key::ShiftLeft => write!(f, "<shift-left>"),
            Key::ShiftRight => write!(f, "<shift-right>"),
            Key::F(n) => write!(f, "F{n}"),
        }
    }
}

/// What a [`crate::KeySource`] delivers. Only [`InputEvent::Key`] ever reaches the
/// dispatcher; the others are handled by the kernel while it keeps blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Resize { cols: u16, rows: u16 },
    /// `ctrl-L`, repaint the whole screen.
    Redraw,
}

/// Shorthand for writing key sequences, mostly in tests and tables.
///
/// ```
/// use clex_tui::{Key, keypress};
/// assert_eq!(keypress!('a'), Key::Char('a'));
/// assert_eq!(keypress!(ctrl 'c'), Key::CANCEL);
/// assert_eq!(keypress!(F 5), Key::F(5));
/// ```
#[macro_export]
macro_rules! keypress {
    (ctrl $ch:literal) => {
        $crate::Key::Ctrl($ch)
    };
    (F $n:literal) => {
        $crate::Key::F($n)
    };
    ($ch:literal) => {
        $crate::Key::Char($ch)
    };
}
