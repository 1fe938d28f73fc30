// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use smallvec::{SmallVec, smallvec};

use super::{InputEvent, Key};
use crate::{CommonResult, SessionError};

/// The one place where the kernel blocks. Implementations return the next event or an
/// error when input is gone for good (eg: stdin closed).
pub trait KeySource {
    /// # Errors
    ///
    /// Returns an error when no more input can be read.
    fn next_event(&mut self) -> CommonResult<InputEvent>;
}

/// Reads the real terminal via [`crossterm::event::read`]. Raw mode must already be
/// enabled by the caller.
#[derive(Debug, Default)]
pub struct CrosstermKeySource {
    pending: VecDeque<InputEvent>,
}

impl CrosstermKeySource {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl KeySource for CrosstermKeySource {
    fn next_event(&mut self) -> CommonResult<InputEvent> {
        loop {
            if let Some(it) = self.pending.pop_front() {
                return Ok(it);
            }
            let event = crossterm::event::read().map_err(SessionError::TerminalInput)?;
            self.pending.extend(convert_event(event));
        }
    }
}

/// Translate one crossterm event. Alt modified keys become two events, `<esc>` and the
/// key itself. Events the kernel has no use for (mouse, focus, key release) produce
/// nothing.
#[must_use]
pub fn convert_event(event: Event) -> SmallVec<[InputEvent; 2]> {
    match event {
        Event::Resize(cols, rows) => smallvec![InputEvent::Resize { cols, rows }],
        Event::Key(key_event) => convert_key_event(key_event),
        _ => smallvec![],
    }
}

fn convert_key_event(key_event: KeyEvent) -> SmallVec<[InputEvent; 2]> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = key_event;

    if kind == KeyEventKind::Release {
        return smallvec![];
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    let key = match code {
        KeyCode::Char(ch) if ctrl => match ch.to_ascii_lowercase() {
            'l' => return smallvec![InputEvent::Redraw],
            'g' => Key::CANCEL,
            lower if lower.is_ascii_alphabetic() => Key::Ctrl(lower),
            _ => return smallvec![],
        },
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::ENTER,
        KeyCode::Tab | KeyCode::BackTab => Key::TAB,
        KeyCode::Backspace => Key::BACKSPACE,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Esc,
        KeyCode::Left if shift => Key::ShiftLeft,
        KeyCode::Right if shift => Key::ShiftRight,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::F(n) => Key::F(n),
        _ => return smallvec![],
    };

    if modifiers.contains(KeyModifiers::ALT) {
        smallvec![InputEvent::Key(Key::Esc), InputEvent::Key(key)]
    } else {
        smallvec![InputEvent::Key(key)]
    }
}
