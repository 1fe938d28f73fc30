// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::Key;

/// Remembers the last two keys so the dispatcher can ask whether the key it is
/// resolving was preceded by `<esc>`.
///
/// `<esc>` followed by a digit is folded into a function key: `<esc> 1` is `F1` and
/// `<esc> 0` is `F10`. That combination consumes the escape, so the resulting function
/// key is never escape prefixed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyReader {
    prev: Option<Key>,
    current: Option<Key>,
}

impl KeyReader {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Record a freshly read key and return the key to dispatch.
    pub fn accept(&mut self, key: Key) -> Key {
        self.prev = self.current;
        let key = match (self.prev, key) {
            (Some(Key::Esc), Key::Char(digit @ '0'..='9')) => {
                self.prev = None;
                // '1' -> F1 ... '9' -> F9, '0' -> F10
                let n = (digit as u8 - b'0' + 9) % 10 + 1;
                Key::F(n)
            }
            _ => key,
        };
        self.current = Some(key);
        key
    }

    /// True when the key being processed came right after `<esc>`.
    #[must_use]
    pub fn escape_pending(&self) -> bool { self.prev == Some(Key::Esc) }

    #[must_use]
    pub fn current(&self) -> Option<Key> { self.current }
}
