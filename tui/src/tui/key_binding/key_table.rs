// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Key;

/// One immutable table entry. `key` is `None` for menu items that can only be picked
/// with the cursor; `needs_cursor` entries run only when the active panel's cursor is
/// on a real entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding<A> {
    pub escape: bool,
    pub key: Option<Key>,
    pub action: A,
    pub needs_cursor: bool,
}

impl<A> KeyBinding<A> {
    /// Bound to `key` pressed on its own.
    pub const fn plain(key: Key, action: A) -> Self {
        Self {
            escape: false,
            key: Some(key),
            action,
            needs_cursor: false,
        }
    }

    /// Bound to `<esc>` followed by `key` (or alt-`key`).
    pub const fn escaped(key: Key, action: A) -> Self {
        Self {
            escape: true,
            key: Some(key),
            action,
            needs_cursor: false,
        }
    }

    /// A menu row without a hotkey.
    pub const fn menu_item(action: A) -> Self {
        Self {
            escape: false,
            key: None,
            action,
            needs_cursor: false,
        }
    }

    /// Only run when the cursor is on a real entry.
    #[must_use]
    pub const fn with_cursor(self) -> Self {
        let mut binding = self;
        binding.needs_cursor = true;
        binding
    }
}

/// An ordered list of bindings. Within the tables active in a mode, the first entry
/// found for a key wins (subject to the escape priority rule). `menu` tables mirror the
/// rows of a menu panel: entry `i` describes row `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTable<A: 'static> {
    pub name: &'static str,
    pub bindings: &'static [KeyBinding<A>],
    pub menu: bool,
}

/// Find the entry for `key` in `tables`. An entry whose escape requirement matches
/// `escape` wins at once. With `escape` set, the first entry for the key that doesn't
/// require escape is only a fallback, used if no escape entry exists anywhere.
/// Returns `(table index, entry index)`.
#[must_use]
pub fn resolve_binding<A>(
    key: Key,
    escape: bool,
    tables: &[&KeyTable<A>],
) -> Option<(usize, usize)> {
    let mut fallback = None;
    for (table_index, table) in tables.iter().enumerate() {
        for (entry_index, binding) in table.bindings.iter().enumerate() {
            if binding.key != Some(key) {
                continue;
            }
            if escape && !binding.escape {
                fallback.get_or_insert((table_index, entry_index));
            } else if escape || !binding.escape {
                return Some((table_index, entry_index));
            }
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    static FIRST: KeyTable<&str> = KeyTable {
        name: "first",
        bindings: &[
            KeyBinding::plain(Key::Char('k'), "plain k"),
            KeyBinding::plain(Key::ENTER, "enter"),
            KeyBinding::menu_item("no key"),
        ],
        menu: false,
    };

    static SECOND: KeyTable<&str> = KeyTable {
        name: "second",
        bindings: &[
            KeyBinding::escaped(Key::Char('k'), "esc k"),
            KeyBinding::escaped(Key::ENTER, "esc enter").with_cursor(),
            KeyBinding::plain(Key::Char('x'), "plain x"),
        ],
        menu: false,
    };

    fn action(key: Key, escape: bool) -> Option<&'static str> {
        let tables = [&FIRST, &SECOND];
        resolve_binding(key, escape, &tables).map(|(t, i)| tables[t].bindings[i].action)
    }

    #[test]
    fn test_escape_entry_has_priority_over_earlier_plain_entry() {
        assert_eq!(action(Key::Char('k'), true), Some("esc k"));
        assert_eq!(action(Key::Char('k'), false), Some("plain k"));
    }

    #[test]
    fn test_plain_entry_is_fallback_for_escape() {
        assert_eq!(action(Key::Char('x'), true), Some("plain x"));
        assert_eq!(action(Key::Char('x'), false), Some("plain x"));
    }

    #[test]
    fn test_escape_entry_needs_escape() {
        let only_second = [&SECOND];
        assert_eq!(resolve_binding(Key::Char('k'), false, &only_second), None);
    }

    #[test]
    fn test_keyless_entries_never_match() {
        assert_eq!(action(Key::Char('z'), false), None);
        assert!(SECOND.bindings[1].needs_cursor);
    }
}
