// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

use crate::{CommonResult, InputEvent, Key, KeySource, SessionError};

/// A [`KeySource`] that plays back a fixed list of events. Once the list runs out it
/// reports [`SessionError::InputClosed`], which ends any session driven by it.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeys {
    events: VecDeque<InputEvent>,
}

impl ScriptedKeys {
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            events: keys.into_iter().map(InputEvent::Key).collect(),
        }
    }

    #[must_use]
    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Keys for every char of `text`, handy for typing into a line.
    #[must_use]
    pub fn typed(text: &str) -> impl Iterator<Item = Key> + '_ { text.chars().map(Key::Char) }

    #[must_use]
    pub fn remaining(&self) -> usize { self.events.len() }
}

impl KeySource for ScriptedKeys {
    fn next_event(&mut self) -> CommonResult<InputEvent> {
        Ok(self.events.pop_front().ok_or(SessionError::InputClosed)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plays_back_then_closes() {
        let mut keys = ScriptedKeys::new(ScriptedKeys::typed("ab"));
        assert_eq!(keys.remaining(), 2);
        assert_eq!(keys.next_event().unwrap(), InputEvent::Key(Key::Char('a')));
        assert_eq!(keys.next_event().unwrap(), InputEvent::Key(Key::Char('b')));
        let err = keys.next_event().unwrap_err();
        assert!(err.downcast_ref::<SessionError>().is_some());
    }
}
