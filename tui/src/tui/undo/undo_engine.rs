// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use super::Snapshot;
use crate::LineBuffer;

/// Where the engine is within one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoState<L> {
    /// Nothing is being watched; the next [`UndoEngine::end`] is a no-op.
    Idle,
    /// A keystroke is being dispatched and `before` is the state of `line` prior to it.
    Watching { line: L, before: Snapshot },
    /// An undo or redo was applied during this keystroke. Its effect on the line must
    /// not be recorded as a new edit.
    Applying,
}

/// Brackets every keystroke: [`UndoEngine::begin`] takes a snapshot of the active line,
/// [`UndoEngine::end`] hands it back for recording if the keystroke edited that same
/// line. `L` identifies a line (eg: an enum of line slots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEngine<L> {
    state: UndoState<L>,
}

impl<L: Copy + PartialEq + Debug> Default for UndoEngine<L> {
    fn default() -> Self { Self::new() }
}

impl<L: Copy + PartialEq + Debug> UndoEngine<L> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: UndoState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &UndoState<L> { &self.state }

    pub fn begin(&mut self, line: L, buffer: &LineBuffer) {
        self.state = UndoState::Watching {
            line,
            before: buffer.snapshot(),
        };
    }

    /// Stop watching without recording anything.
    pub fn disarm(&mut self) { self.state = UndoState::Idle; }

    /// Called after an undo or redo has been applied to the watched line.
    pub fn applying(&mut self) { self.state = UndoState::Applying; }

    /// Finish the keystroke. Returns the watched line and its pre-keystroke snapshot
    /// when the edit should be committed: the engine was watching and `active` is still
    /// the same line.
    pub fn end(&mut self, active: Option<L>) -> Option<(L, Snapshot)> {
        match std::mem::replace(&mut self.state, UndoState::Idle) {
            UndoState::Watching { line, before } if Some(line) == active => {
                Some((line, before))
            }
            UndoState::Watching { line, .. } => {
                tracing::debug!(message = "active line switched mid keystroke", ?line, ?active);
                None
            }
            UndoState::Idle | UndoState::Applying => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Slot {
        A,
        B,
    }

    #[test]
    fn test_end_returns_snapshot_for_same_line() {
        let mut buffer = LineBuffer::new("");
        buffer.put_str("x");
        let mut engine = UndoEngine::new();
        engine.begin(Slot::A, &buffer);
        let (line, before) = engine.end(Some(Slot::A)).unwrap();
        assert_eq!(line, Slot::A);
        assert_eq!(before.text, "x");
        assert_eq!(engine.state(), &UndoState::Idle);
    }

    #[test]
    fn test_end_ignores_switched_line() {
        let buffer = LineBuffer::new("");
        let mut engine = UndoEngine::new();
        engine.begin(Slot::A, &buffer);
        assert_eq!(engine.end(Some(Slot::B)), None);
        engine.begin(Slot::A, &buffer);
        assert_eq!(engine.end(None), None);
    }

    #[test]
    fn test_end_while_applying_is_ignored() {
        let buffer = LineBuffer::new("");
        let mut engine = UndoEngine::new();
        engine.begin(Slot::A, &buffer);
        engine.applying();
        assert_eq!(engine.end(Some(Slot::A)), None);
        assert_eq!(engine.state(), &UndoState::<Slot>::Idle);
    }

    #[test]
    fn test_disarm() {
        let buffer = LineBuffer::new("");
        let mut engine = UndoEngine::new();
        engine.begin(Slot::B, &buffer);
        engine.disarm();
        assert_eq!(engine.end(Some(Slot::B)), None);
    }
}
