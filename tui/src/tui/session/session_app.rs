// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use crate::{CommonResult, DispatchOutcome, LineBuffer, PanelDesc, Session};

/// Rows of the screen that are not panel lines: heading, two frame lines, the info
/// line, the remark line and the edit line.
pub const NON_PANEL_ROWS: u16 = 6;

/// Screen dimensions as the kernel needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Visible entries of a list panel, at least 1.
    pub panel_lines: i32,
    pub screen_cols: usize,
}

impl Geometry {
    #[must_use]
    pub fn from_screen(cols: u16, rows: u16) -> Self {
        Self {
            panel_lines: i32::from(rows.saturating_sub(NON_PANEL_ROWS).max(1)),
            screen_cols: usize::from(cols.max(1)),
        }
    }
}

impl Default for Geometry {
    fn default() -> Self { Self::from_screen(80, 24) }
}

/// Which parts of the screen are stale. Sent to
/// [`SessionApp::on_context_changed`] at most once per mode entry, per unwind and
/// per resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextChange {
    /// A different panel is active.
    pub view: bool,
    /// A different line (or no line) is active.
    pub line: bool,
    /// Everything must be repainted (resize, ctrl-L).
    pub screen: bool,
}

impl ContextChange {
    #[must_use]
    pub fn any(&self) -> bool { self.view || self.line || self.screen }
}

/// The application side of a [`Session`]: it owns every panel and line, knows how to
/// prepare each mode and runs the actions named in the key tables.
///
/// Views and lines are identified by small `Copy` ids; the kernel only compares them
/// to find out when the screen context changed and asks the app for the actual
/// [`PanelDesc`] or [`LineBuffer`] when it needs one.
pub trait SessionApp: Sized {
    type Mode: Copy + PartialEq + Debug + 'static;
    type Action: Copy + Debug + 'static;
    type View: Copy + PartialEq + Debug;
    type Line: Copy + PartialEq + Debug;

    fn panel(&self, view: Self::View) -> &PanelDesc<Self::Mode, Self::Action>;

    fn panel_mut(&mut self, view: Self::View) -> &mut PanelDesc<Self::Mode, Self::Action>;

    fn line(&self, line: Self::Line) -> &LineBuffer;

    fn line_mut(&mut self, line: Self::Line) -> &mut LineBuffer;

    /// Set up `mode`: pick the active view and line (via [`Session::set_view`] and
    /// [`Session::set_line`]), load lists and so on. Called every time the mode is
    /// entered or refreshed.
    ///
    /// # Errors
    ///
    /// Fatal failures only; anything the user can fix should be a remark.
    fn prepare(&mut self, session: &mut Session<Self>, mode: Self::Mode) -> CommonResult<()>;

    /// Run one action from a key table, an extra line, or a menu.
    ///
    /// # Errors
    ///
    /// Fatal failures only, eg: a nested [`Session::run_mode`] that failed.
    fn invoke(&mut self, session: &mut Session<Self>, action: Self::Action)
    -> CommonResult<()>;

    /// The filter expression of `view` changed; refilter its list.
    fn filter_update(&mut self, session: &mut Session<Self>, view: Self::View);

    /// Stop filtering `view` and show its whole list again.
    fn filter_off(&mut self, session: &mut Session<Self>, view: Self::View);

    /// Mode specific adjustments after every dispatched key. May request a transition.
    fn after_key(
        &mut self,
        _session: &mut Session<Self>,
        _mode: Self::Mode,
        _outcome: &DispatchOutcome,
    ) {
    }

    /// Parts of the screen have to be repainted.
    fn on_context_changed(&mut self, _session: &Session<Self>, _change: ContextChange) {}

    /// Draw the screen. Called before the kernel blocks for the next key.
    ///
    /// # Errors
    ///
    /// Terminal output failures.
    fn render(&mut self, _session: &Session<Self>) -> CommonResult<()> { Ok(()) }

    /// The terminal was resized.
    fn on_resize(&mut self, cols: u16, rows: u16) -> Geometry { Geometry::from_screen(cols, rows) }

    /// Last call of a session that is quitting, made exactly once.
    fn shutdown(&mut self, _session: &mut Session<Self>) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_geometry_from_screen() {
        let it = Geometry::from_screen(100, 30);
        assert_eq!((it.panel_lines, it.screen_cols), (24, 100));
        let tiny = Geometry::from_screen(0, 3);
        assert_eq!((tiny.panel_lines, tiny.screen_cols), (1, 1));
    }
}
