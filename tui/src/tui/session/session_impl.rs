// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The nested control loop.
//!
//! Every [`Session::run_mode`] call is one frame on the Rust call stack and one
//! [`ModeFrame`] in [`Session`]. A handler that wants a sub mode simply calls
//! `run_mode` again from inside [`SessionApp::invoke`]; when that call returns, the
//! parent's view and line are restored.
//!
//! ```text
//! run_mode(FILE) ─┬─ prepare(FILE) ─ sync ─ key loop ──────────────────────────┐
//!                 │                          │ key: invoke(action)             │
//!                 │                          └─ run_mode(HELP) ─┬─ ... Return  │
//!                 │                             restore parent ◄┘              │
//!                 └─ pending Quit: shutdown once, every frame returns Quit ◄───┘
//! ```

use std::fmt::Debug;

use crate::{CommonResult, ContextChange, Geometry, InputEvent, Key, KeyReader, KeySource,
            ModeDef, ModeExit, ModeRegistry, SessionApp, StatusLine, Transition,
            UndoEngine};

pub const RETURN_AT_ROOT_REMARK: &str = "to quit CLEX press <esc> Q";
pub const NOTHING_TO_UNDO_REMARK: &str = "nothing to undo";
pub const NOTHING_TO_REDO_REMARK: &str = "nothing to redo";

/// One active mode. `observed_*` is what the screen currently shows for this frame;
/// a difference to the session's active view or line means a repaint is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFrame<M, V, L> {
    pub mode: M,
    pub observed_view: Option<V>,
    pub observed_line: Option<L>,
}

pub struct Session<A: SessionApp> {
    registry: &'static ModeRegistry<A::Mode, A::Action>,
    source: Box<dyn KeySource>,
    reader: KeyReader,
    frames: Vec<ModeFrame<A::Mode, A::View, A::Line>>,
    pending: Option<Transition<A::Mode>>,
    active_view: A::View,
    active_line: Option<A::Line>,
    undo: UndoEngine<A::Line>,
    status: StatusLine,
    geometry: Geometry,
    quitting: bool,
    shut_down: bool,
}

impl<A: SessionApp> Debug for Session<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("frames", &self.frames)
            .field("pending", &self.pending)
            .field("active_view", &self.active_view)
            .field("active_line", &self.active_line)
            .field("geometry", &self.geometry)
            .field("quitting", &self.quitting)
            .finish_non_exhaustive()
    }
}

impl<A: SessionApp> Session<A> {
    pub fn new(
        registry: &'static ModeRegistry<A::Mode, A::Action>,
        source: Box<dyn KeySource>,
        initial_view: A::View,
        geometry: Geometry,
    ) -> Self {
        Self {
            registry,
            source,
            reader: KeyReader::new(),
            frames: Vec::new(),
            pending: None,
            active_view: initial_view,
            active_line: None,
            undo: UndoEngine::new(),
            status: StatusLine::new(),
            geometry,
            quitting: false,
            shut_down: false,
        }
    }

    // Queries.

    #[must_use]
    pub fn registry(&self) -> &'static ModeRegistry<A::Mode, A::Action> { self.registry }

    #[must_use]
    pub fn current_mode(&self) -> Option<A::Mode> { self.frames.last().map(|it| it.mode) }

    /// Mode of the parent frame, eg: the mode the help was called from.
    #[must_use]
    pub fn previous_mode(&self) -> Option<A::Mode> {
        self.frames
            .len()
            .checked_sub(2)
            .and_then(|index| self.frames.get(index))
            .map(|it| it.mode)
    }

    /// Number of nested frames, 1 in the root mode.
    #[must_use]
    pub fn depth(&self) -> usize { self.frames.len() }

    #[must_use]
    pub fn frames(&self) -> &[ModeFrame<A::Mode, A::View, A::Line>] { &self.frames }

    #[must_use]
    pub fn active_view(&self) -> A::View { self.active_view }

    #[must_use]
    pub fn active_line(&self) -> Option<A::Line> { self.active_line }

    #[must_use]
    pub fn geometry(&self) -> Geometry { self.geometry }

    #[must_use]
    pub fn status(&self) -> &StatusLine { &self.status }

    #[must_use]
    pub fn undo_engine(&self) -> &UndoEngine<A::Line> { &self.undo }

    /// The key being dispatched came right after `<esc>`.
    #[must_use]
    pub fn escape_pending(&self) -> bool { self.reader.escape_pending() }

    #[must_use]
    pub fn pending_transition(&self) -> Option<Transition<A::Mode>> { self.pending }

    #[must_use]
    pub fn is_quitting(&self) -> bool { self.quitting }

    // Requests from prepare steps and handlers.

    pub fn set_view(&mut self, view: A::View) { self.active_view = view; }

    pub fn set_line(&mut self, line: Option<A::Line>) { self.active_line = line; }

    /// Takes effect once the current key has been fully processed. Nothing overrides a
    /// requested quit.
    pub fn set_transition(&mut self, transition: Transition<A::Mode>) {
        if self.quitting {
            return;
        }
        tracing::debug!(message = "transition requested", ?transition);
        if transition == Transition::Quit {
            self.quitting = true;
        }
        self.pending = Some(transition);
    }

    /// Withdraw a requested transition (but never a quit).
    pub fn cancel_transition(&mut self) {
        if !self.quitting {
            self.pending = None;
        }
    }

    pub fn remark(&mut self, text: impl Into<String>) { self.status.remark(text); }

    pub fn undo(&mut self, app: &mut A) {
        match self.active_line {
            Some(line) if app.line_mut(line).undo() => {
                tracing::debug!(message = "undo", ?line);
                self.undo.applying();
                self.adjust_line(app);
            }
            _ => self.remark(NOTHING_TO_UNDO_REMARK),
        }
    }

    pub fn redo(&mut self, app: &mut A) {
        match self.active_line {
            Some(line) if app.line_mut(line).redo() => {
                tracing::debug!(message = "redo", ?line);
                self.undo.applying();
                self.adjust_line(app);
            }
            _ => self.remark(NOTHING_TO_REDO_REMARK),
        }
    }

    /// Block for one key without escape processing, eg: the char after ctrl-V.
    ///
    /// # Errors
    ///
    /// The key source failed.
    pub fn read_raw_key(&mut self, app: &mut A) -> CommonResult<Key> { self.next_key(app) }

    /// Scroll the active line so its cursor is visible.
    pub fn adjust_line(&self, app: &mut A) {
        if let Some(line) = self.active_line {
            app.line_mut(line).adjust_offset(self.geometry.screen_cols);
        }
    }

    // The control loop.

    /// Run `mode` in a new frame until it returns or the session quits.
    ///
    /// # Errors
    ///
    /// Unknown modes and failures of the key source or the app's callbacks. They
    /// propagate through every frame.
    pub fn run_mode(&mut self, app: &mut A, mode: A::Mode) -> CommonResult<ModeExit> {
        if self.quitting {
            return Ok(ModeExit::Quit);
        }

        let (observed_view, observed_line) = match self.frames.last() {
            Some(parent) => (parent.observed_view, parent.observed_line),
            None => (None, None),
        };
        self.frames.push(ModeFrame {
            mode,
            observed_view,
            observed_line,
        });
        tracing::debug!(message = "enter mode", ?mode, depth = self.frames.len());

        let result = self.run_frame(app, mode);
        let frame = self.frames.pop();
        let exit = result?;
        tracing::debug!(message = "leave mode", ?frame, ?exit);

        match exit {
            ModeExit::Return => self.restore_parent(app),
            ModeExit::Quit => {
                if !self.frames.is_empty() {
                    self.pending = Some(Transition::Quit);
                }
            }
        }
        Ok(exit)
    }

    fn run_frame(&mut self, app: &mut A, mode: A::Mode) -> CommonResult<ModeExit> {
        let mut next = mode;
        loop {
            let def = self.registry.lookup(next)?;
            if let Some(frame) = self.frames.last_mut() {
                frame.mode = next;
            }
            self.pending = None;
            app.prepare(self, next)?;
            self.sync_context(app);

            if !self.transition_ready() {
                self.key_loop(app, def)?;
            }

            match self.pending.take() {
                Some(Transition::Quit) => {
                    self.pending = Some(Transition::Quit);
                    if !self.shut_down {
                        self.shut_down = true;
                        tracing::info!(message = "shutdown", mode = ?next);
                        app.shutdown(self);
                    }
                    return Ok(ModeExit::Quit);
                }
                Some(Transition::Return) => return Ok(ModeExit::Return),
                Some(Transition::Mode(mode)) => next = mode,
                Some(Transition::Refresh) | None => {}
            }
        }
    }

    fn key_loop(&mut self, app: &mut A, def: &'static ModeDef<A::Mode, A::Action>) -> CommonResult<()> {
        loop {
            let key = self.read_key(app)?;

            if let Some(line) = self.active_line {
                self.undo.begin(line, app.line(line));
            }
            let outcome = self.dispatch(app, def, key)?;
            if let Some((line, before)) = self.undo.end(self.active_line) {
                app.line_mut(line).commit_edit(before);
            }
            self.adjust_line(app);

            if self.transition_ready() {
                return Ok(());
            }

            app.after_key(self, def.mode, &outcome);
            self.refilter_if_changed(app);

            if self.transition_ready() {
                return Ok(());
            }
        }
    }

    /// True when the pending transition must end the key loop. A return from the
    /// root frame is dropped here.
    fn transition_ready(&mut self) -> bool {
        match self.pending {
            None => false,
            Some(Transition::Return) if self.frames.len() <= 1 => {
                self.pending = None;
                self.remark(RETURN_AT_ROOT_REMARK);
                false
            }
            Some(_) => true,
        }
    }

    /// After a prepare step: compare the active view and line with what this frame
    /// shows and bring the screen up to date with one notification.
    fn sync_context(&mut self, app: &mut A) {
        let Some(frame) = self.frames.last().copied() else {
            return;
        };
        let view = self.active_view;
        let mut change = ContextChange::default();

        if frame.observed_view != Some(view) {
            if app.panel(view).is_filtering() {
                app.filter_update(self, view);
                if let Some(filter) = app.panel_mut(view).filter.as_mut() {
                    filter.changed = false;
                }
            }
            app.panel_mut(view).adjust(self.geometry.panel_lines);
            change.view = true;
        }

        if frame.observed_line != self.active_line {
            self.undo.disarm();
            if let Some(line) = self.active_line {
                app.line_mut(line).history.reset();
            }
            self.adjust_line(app);
            change.line = true;
        }

        if let Some(frame) = self.frames.last_mut() {
            frame.observed_view = Some(view);
            frame.observed_line = self.active_line;
        }
        if change.any() {
            app.on_context_changed(self, change);
        }
    }

    /// After a frame returned: put back the view and line its parent was showing.
    fn restore_parent(&mut self, app: &mut A) {
        let Some(parent) = self.frames.last().copied() else {
            return;
        };
        let mut change = ContextChange::default();

        if let Some(view) = parent.observed_view {
            if view != self.active_view {
                self.active_view = view;
                app.panel_mut(view).adjust(self.geometry.panel_lines);
                change.view = true;
            }
        }

        if parent.observed_line != self.active_line {
            if let Some(left) = self.active_line {
                app.line_mut(left).history.reset();
            }
            self.undo.disarm();
            self.active_line = parent.observed_line;
            self.adjust_line(app);
            change.line = true;
        }

        if change.any() {
            app.on_context_changed(self, change);
        }
    }

    fn refilter_if_changed(&mut self, app: &mut A) {
        let view = self.active_view;
        let panel = app.panel(view);
        let changed = panel.is_filtering() && panel.filter.as_ref().is_some_and(|it| it.changed);
        if changed {
            app.filter_update(self, view);
            let panel = app.panel_mut(view);
            if let Some(filter) = panel.filter.as_mut() {
                filter.changed = false;
            }
            panel.adjust(self.geometry.panel_lines);
        }
    }

    // Input.

    fn read_key(&mut self, app: &mut A) -> CommonResult<Key> {
        let key = self.next_key(app)?;
        Ok(self.reader.accept(key))
    }

    /// The only place where the session blocks. Resize and redraw requests are served
    /// here and never reach the dispatcher.
    fn next_key(&mut self, app: &mut A) -> CommonResult<Key> {
        loop {
            app.render(self)?;
            match self.source.next_event()? {
                InputEvent::Key(key) => {
                    self.status.clear();
                    return Ok(key);
                }
                InputEvent::Resize { cols, rows } => {
                    self.geometry = app.on_resize(cols, rows);
                    tracing::debug!(message = "resize", geometry = ?self.geometry);
                    app.panel_mut(self.active_view)
                        .adjust(self.geometry.panel_lines);
                    self.adjust_line(app);
                    app.on_context_changed(self, ContextChange {
                        screen: true,
                        ..ContextChange::default()
                    });
                }
                InputEvent::Redraw => {
                    app.on_context_changed(self, ContextChange {
                        screen: true,
                        ..ContextChange::default()
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ScriptedKeys, SessionError,
                core::test_fixtures::test_session_app::{QUIT_KEYS, TestApp, TestLine,
                                                        TestMode, TestView,
                                                        new_test_session, run_with_keys}};

    fn keys(first: &[Key]) -> Vec<Key> { first.iter().copied().chain(QUIT_KEYS).collect() }

    #[test]
    fn test_quit_from_root() {
        let mut app = TestApp::default();
        let (result, session) = run_with_keys(&mut app, QUIT_KEYS);
        assert_eq!(result.unwrap(), ModeExit::Quit);
        assert_eq!(app.shutdowns, 1);
        assert_eq!(session.depth(), 0);
        assert!(session.is_quitting());
    }

    #[test]
    fn test_return_at_root_is_suppressed() {
        let mut app = TestApp::default();
        let (result, session) = run_with_keys(&mut app, keys(&[Key::F(3)]));
        assert_eq!(result.unwrap(), ModeExit::Quit);
        assert_eq!(app.log, vec![
            "prepare Main",
            "context view line",
            "Return",
            "Quit",
            "shutdown"
        ]);
        assert!(
            session
                .status()
                .log()
                .any(|it| it.text == RETURN_AT_ROOT_REMARK)
        );
    }

    #[test]
    fn test_nested_return_restores_line_and_notifies_once() {
        let mut app = TestApp::default();
        let (result, session) =
            run_with_keys(&mut app, keys(&[Key::F(2), Key::Char('x'), Key::F(3)]));
        assert_eq!(result.unwrap(), ModeExit::Quit);
        assert_eq!(app.log, vec![
            "prepare Main",
            "context view line",
            "EnterChild",
            "prepare Child",
            "context view line",
            "Return",
            "context view line",
            "exit Return",
            "Quit",
            "shutdown",
        ]);
        assert_eq!(session.active_line(), Some(TestLine::Cmd));
        assert_eq!(session.active_view(), TestView::Files);
        assert_eq!(app.tmp.text(), "x");
        assert_eq!(app.tmp.history.undo_count(), 0);
    }

    #[test]
    fn test_quit_in_child_unwinds_every_frame() {
        let mut app = TestApp::default();
        let (result, session) = run_with_keys(&mut app, keys(&[Key::F(2)]));
        assert_eq!(result.unwrap(), ModeExit::Quit);
        assert_eq!(app.shutdowns, 1);
        assert_eq!(session.depth(), 0);
        assert_eq!(&app.log[2..], &[
            "EnterChild",
            "prepare Child",
            "context view line",
            "Quit",
            "shutdown",
            "exit Quit",
        ]);
    }

    #[test]
    fn test_typing_and_undo_through_keys() {
        let mut app = TestApp::default();
        let typed = [
            Key::Char('a'),
            Key::Char('b'),
            Key::Char('c'),
            Key::BACKSPACE,
            Key::Ctrl('u'),
            Key::Ctrl('u'),
            Key::Ctrl('u'),
            Key::Ctrl('y'),
        ];
        let (result, session) = run_with_keys(&mut app, keys(&typed));
        assert!(result.is_ok());
        assert_eq!(&app.log[2..6], &[
            "Undo -> abc",
            "Undo -> ",
            "Undo -> ",
            "Redo -> abc"
        ]);
        assert_eq!(
            session
                .status()
                .log()
                .filter(|it| it.text == NOTHING_TO_UNDO_REMARK)
                .count(),
            1
        );
        assert_eq!(app.cmd.text(), "abc");
    }

    #[test]
    fn test_picker_inherits_context_and_returns_after_typing() {
        let mut app = TestApp::default();
        let (result, _) = run_with_keys(&mut app, keys(&[Key::F(7), Key::Char('z')]));
        assert!(result.is_ok());
        assert_eq!(&app.log[2..5], &["EnterPicker", "prepare Picker", "exit Return"]);
        assert_eq!(app.cmd.text(), "z");
        assert_eq!(app.cmd.history.undo_count(), 1);
    }

    #[test]
    fn test_refresh_prepares_again_without_repaint() {
        let mut app = TestApp::default();
        let (result, _) = run_with_keys(&mut app, keys(&[Key::F(9)]));
        assert!(result.is_ok());
        assert_eq!(app.log, vec![
            "prepare Main",
            "context view line",
            "Refresh",
            "prepare Main",
            "Quit",
            "shutdown"
        ]);
    }

    #[test]
    fn test_previous_mode() {
        let mut app = TestApp::default();
        let (result, _) = run_with_keys(&mut app, keys(&[Key::F(2), Key::F(12), Key::F(3)]));
        assert!(result.is_ok());
        assert!(app.log.contains(&"modes Some(Child) Some(Main)".to_string()));
    }

    #[test]
    fn test_unknown_mode_is_fatal() {
        let mut app = TestApp::default();
        let (result, session) = run_with_keys(&mut app, [Key::F(2), Key::F(10)]);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::UnknownMode { .. })
        ));
        assert_eq!(app.shutdowns, 0);
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_closed_input_ends_session_with_error() {
        let mut app = TestApp::default();
        let (result, session) = run_with_keys(&mut app, [Key::F(2), Key::Char('a')]);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::InputClosed)
        ));
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_resize_is_not_a_key() {
        let mut app = TestApp::default();
        let events = [
            InputEvent::Resize {
                cols: 100,
                rows: 30,
            },
            InputEvent::Redraw,
            InputEvent::Key(Key::Esc),
            InputEvent::Key(Key::Char('q')),
        ];
        let mut session = new_test_session(ScriptedKeys::from_events(events));
        let result = session.run_mode(&mut app, TestMode::Main);
        assert_eq!(result.unwrap(), ModeExit::Quit);
        assert_eq!(session.geometry(), Geometry {
            panel_lines: 24,
            screen_cols: 100
        });
        assert_eq!(
            app.log
                .iter()
                .filter(|it| it.as_str() == "context screen")
                .count(),
            2
        );
    }

    #[test]
    fn test_read_raw_key_skips_escape_handling() {
        let mut app = TestApp::default();
        let (result, _) = run_with_keys(&mut app, keys(&[Key::Ctrl('v'), Key::Ctrl('k')]));
        assert!(result.is_ok());
        assert!(app.log.contains(&"raw ctrl-K".to_string()));
    }

    #[test]
    fn test_transition_after_quit_is_ignored() {
        let mut session = new_test_session(ScriptedKeys::default());
        session.set_transition(Transition::Quit);
        session.set_transition(Transition::Return);
        session.cancel_transition();
        assert_eq!(session.pending_transition(), Some(Transition::Quit));
    }
}
