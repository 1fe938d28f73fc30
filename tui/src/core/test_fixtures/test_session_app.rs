// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A tiny [`SessionApp`] for exercising the kernel: a root mode with a command line,
//! a child mode with its own panel and line, a menu, and a picker that inherits the
//! root's view and line. Everything interesting is written to [`TestApp::log`].

use crate::{CommonResult, ContextChange, DispatchOutcome, ExtraLine, FilterEdit,
            FilterFocus, Geometry, Key, KeyBinding, KeyTable, LineBuffer, ModeDef,
            ModeExit, ModeRegistry, PanelDesc, PanelMove, ScriptedKeys, Session,
            SessionApp, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    Main,
    Child,
    Menu,
    Picker,
    /// Never registered.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestAction {
    Record(&'static str),
    EnterChild,
    EnterMenu,
    EnterPicker,
    Return,
    Quit,
    Refresh,
    UnknownMode,
    CursorDown,
    FilterOn,
    FilterBackspace,
    Backspace,
    Undo,
    Redo,
    RawKey,
    ReportModes,
    MenuPick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestView {
    Files,
    Other,
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestLine {
    Cmd,
    Tmp,
}

pub const QUIT_KEYS: [Key; 2] = [Key::Esc, Key::Char('q')];

static MAIN_TABLE: KeyTable<TestAction> = KeyTable {
    name: "main",
    bindings: &[
        KeyBinding::plain(Key::F(2), TestAction::EnterChild),
        KeyBinding::plain(Key::F(3), TestAction::Return),
        KeyBinding::plain(Key::F(4), TestAction::EnterMenu),
        KeyBinding::plain(Key::F(5), TestAction::Record("plain F5")),
        KeyBinding::plain(Key::F(6), TestAction::Record("cursor")).with_cursor(),
        KeyBinding::plain(Key::F(7), TestAction::EnterPicker),
        KeyBinding::plain(Key::F(8), TestAction::FilterOn),
        KeyBinding::plain(Key::F(9), TestAction::Refresh),
        KeyBinding::plain(Key::F(10), TestAction::UnknownMode),
        KeyBinding::plain(Key::Down, TestAction::CursorDown),
        KeyBinding::plain(Key::Ctrl('v'), TestAction::RawKey),
    ],
    menu: false,
};

static CHILD_TABLE: KeyTable<TestAction> = KeyTable {
    name: "child",
    bindings: &[
        KeyBinding::plain(Key::F(3), TestAction::Return),
        KeyBinding::plain(Key::F(10), TestAction::UnknownMode),
        KeyBinding::plain(Key::F(12), TestAction::ReportModes),
    ],
    menu: false,
};

static MENU_TABLE: KeyTable<TestAction> = KeyTable {
    name: "menu",
    bindings: &[
        KeyBinding::menu_item(TestAction::Record("one")),
        KeyBinding::menu_item(TestAction::Record("two")),
        KeyBinding::plain(Key::Char('x'), TestAction::Record("x")),
    ],
    menu: true,
};

static MENU_CONTROL_TABLE: KeyTable<TestAction> = KeyTable {
    name: "menu control",
    bindings: &[
        KeyBinding::plain(Key::ENTER, TestAction::MenuPick),
        KeyBinding::plain(Key::F(3), TestAction::Return),
    ],
    menu: false,
};

static EDIT_TABLE: KeyTable<TestAction> = KeyTable {
    name: "edit",
    bindings: &[KeyBinding::plain(Key::BACKSPACE, TestAction::Backspace)],
    menu: false,
};

static FILTER_EDIT_TABLE: KeyTable<TestAction> = KeyTable {
    name: "filter edit",
    bindings: &[KeyBinding::plain(Key::BACKSPACE, TestAction::FilterBackspace)],
    menu: false,
};

static COMMON_TABLE: KeyTable<TestAction> = KeyTable {
    name: "common",
    bindings: &[
        KeyBinding::escaped(Key::Char('q'), TestAction::Quit),
        KeyBinding::escaped(Key::F(5), TestAction::Record("esc F5")),
        KeyBinding::plain(Key::Ctrl('u'), TestAction::Undo),
        KeyBinding::plain(Key::Ctrl('y'), TestAction::Redo),
    ],
    menu: false,
};

pub static TEST_REGISTRY: ModeRegistry<TestMode, TestAction> = ModeRegistry {
    modes: &[
        ModeDef {
            mode: TestMode::Main,
            tables: &[&MAIN_TABLE],
            menu_panel: false,
        },
        ModeDef {
            mode: TestMode::Child,
            tables: &[&CHILD_TABLE],
            menu_panel: false,
        },
        ModeDef {
            mode: TestMode::Menu,
            tables: &[&MENU_TABLE, &MENU_CONTROL_TABLE],
            menu_panel: true,
        },
        ModeDef {
            mode: TestMode::Picker,
            tables: &[&CHILD_TABLE],
            menu_panel: false,
        },
    ],
    edit: &EDIT_TABLE,
    filter_edit: &FILTER_EDIT_TABLE,
    common: &COMMON_TABLE,
};

static FILES_EXTRA: [ExtraLine<TestMode, TestAction>; 1] = [ExtraLine {
    text: Some("Child"),
    info: None,
    transition: Some(Transition::Mode(TestMode::Child)),
    action: Some(TestAction::Record("extra")),
}];

#[derive(Debug)]
pub struct TestApp {
    pub files: PanelDesc<TestMode, TestAction>,
    pub other: PanelDesc<TestMode, TestAction>,
    pub menu: PanelDesc<TestMode, TestAction>,
    pub cmd: LineBuffer,
    pub tmp: LineBuffer,
    pub log: Vec<String>,
    pub shutdowns: usize,
}

impl Default for TestApp {
    fn default() -> Self {
        let mut files = PanelDesc::new().with_extra(&FILES_EXTRA).with_filter();
        files.set_count(3);
        let mut other = PanelDesc::new();
        other.set_count(2);
        let mut menu = PanelDesc::new();
        menu.set_count(3);
        Self {
            files,
            other,
            menu,
            cmd: LineBuffer::new("$ "),
            tmp: LineBuffer::new("> "),
            log: Vec::new(),
            shutdowns: 0,
        }
    }
}

impl TestApp {
    fn active_text(&self, session: &Session<Self>) -> String {
        session
            .active_line()
            .map(|line| self.line(line).text().to_string())
            .unwrap_or_default()
    }

    fn enter(&mut self, session: &mut Session<Self>, mode: TestMode) -> CommonResult<()> {
        self.log.push(format!("Enter{mode:?}"));
        let exit = session.run_mode(self, mode)?;
        self.log.push(format!("exit {exit:?}"));
        Ok(())
    }
}

impl SessionApp for TestApp {
    type Mode = TestMode;
    type Action = TestAction;
    type View = TestView;
    type Line = TestLine;

    fn panel(&self, view: TestView) -> &PanelDesc<TestMode, TestAction> {
        match view {
            TestView::Files => &self.files,
            TestView::Other => &self.other,
            TestView::Menu => &self.menu,
        }
    }

    fn panel_mut(&mut self, view: TestView) -> &mut PanelDesc<TestMode, TestAction> {
        match view {
            TestView::Files => &mut self.files,
            TestView::Other => &mut self.other,
            TestView::Menu => &mut self.menu,
        }
    }

    fn line(&self, line: TestLine) -> &LineBuffer {
        match line {
            TestLine::Cmd => &self.cmd,
            TestLine::Tmp => &self.tmp,
        }
    }

    fn line_mut(&mut self, line: TestLine) -> &mut LineBuffer {
        match line {
            TestLine::Cmd => &mut self.cmd,
            TestLine::Tmp => &mut self.tmp,
        }
    }

    fn prepare(&mut self, session: &mut Session<Self>, mode: TestMode) -> CommonResult<()> {
        self.log.push(format!("prepare {mode:?}"));
        match mode {
            TestMode::Main => {
                session.set_view(TestView::Files);
                session.set_line(Some(TestLine::Cmd));
            }
            TestMode::Child => {
                session.set_view(TestView::Other);
                session.set_line(Some(TestLine::Tmp));
            }
            TestMode::Menu => {
                session.set_view(TestView::Menu);
                session.set_line(None);
            }
            TestMode::Picker | TestMode::Missing => {}
        }
        Ok(())
    }

    fn invoke(&mut self, session: &mut Session<Self>, action: TestAction) -> CommonResult<()> {
        let view = session.active_view();
        match action {
            TestAction::Record(text) => self.log.push(text.to_string()),
            TestAction::EnterChild => self.enter(session, TestMode::Child)?,
            TestAction::EnterMenu => self.enter(session, TestMode::Menu)?,
            TestAction::EnterPicker => self.enter(session, TestMode::Picker)?,
            TestAction::Return => {
                self.log.push("Return".into());
                session.set_transition(Transition::Return);
            }
            TestAction::Quit => {
                self.log.push("Quit".into());
                session.set_transition(Transition::Quit);
            }
            TestAction::Refresh => {
                self.log.push("Refresh".into());
                session.set_transition(Transition::Refresh);
            }
            TestAction::UnknownMode => session.set_transition(Transition::Mode(TestMode::Missing)),
            TestAction::CursorDown => {
                let lines = session.geometry().panel_lines;
                self.panel_mut(view).move_cursor(PanelMove::Down, lines);
            }
            TestAction::FilterOn => {
                self.log.push("FilterOn".into());
                let panel = self.panel_mut(view);
                panel.filtering = FilterFocus::Filter;
                if let Some(filter) = panel.filter.as_mut() {
                    filter.clear();
                }
            }
            TestAction::FilterBackspace => {
                if let Some(filter) = self.panel_mut(view).filter.as_mut() {
                    filter.apply(FilterEdit::Backspace);
                }
            }
            TestAction::Backspace => {
                if let Some(line) = session.active_line() {
                    self.line_mut(line).backspace();
                }
            }
            TestAction::Undo => {
                session.undo(self);
                let text = self.active_text(session);
                self.log.push(format!("Undo -> {text}"));
            }
            TestAction::Redo => {
                session.redo(self);
                let text = self.active_text(session);
                self.log.push(format!("Redo -> {text}"));
            }
            TestAction::RawKey => {
                let key = session.read_raw_key(self)?;
                self.log.push(format!("raw {key}"));
            }
            TestAction::ReportModes => self.log.push(format!(
                "modes {:?} {:?}",
                session.current_mode(),
                session.previous_mode()
            )),
            TestAction::MenuPick => self.log.push(format!("pick {}", self.menu.curs)),
        }
        Ok(())
    }

    fn filter_update(&mut self, _session: &mut Session<Self>, view: TestView) {
        let text = self.panel(view).filter_text().unwrap_or_default().to_string();
        self.log.push(format!("filter {text}"));
    }

    fn filter_off(&mut self, _session: &mut Session<Self>, view: TestView) {
        let panel = self.panel_mut(view);
        panel.filtering = FilterFocus::Off;
        if let Some(filter) = panel.filter.as_mut() {
            filter.clear();
        }
        self.log.push("filter off".into());
    }

    fn after_key(
        &mut self,
        session: &mut Session<Self>,
        mode: TestMode,
        outcome: &DispatchOutcome,
    ) {
        let leave = match mode {
            TestMode::Menu => outcome.matched_table() == Some("menu"),
            TestMode::Picker => {
                matches!(outcome, DispatchOutcome::InsertChar(_))
                    || outcome.matched_table() == Some("edit")
            }
            _ => false,
        };
        if leave {
            session.set_transition(Transition::Return);
        }
    }

    fn on_context_changed(&mut self, _session: &Session<Self>, change: ContextChange) {
        let mut text = String::from("context");
        for (flag, name) in [(change.view, " view"), (change.line, " line"), (change.screen, " screen")] {
            if flag {
                text.push_str(name);
            }
        }
        self.log.push(text);
    }

    fn shutdown(&mut self, _session: &mut Session<Self>) {
        self.shutdowns += 1;
        self.log.push("shutdown".into());
    }
}

#[must_use]
pub fn new_test_session(keys: ScriptedKeys) -> Session<TestApp> {
    Session::new(&TEST_REGISTRY, Box::new(keys), TestView::Files, Geometry::default())
}

/// Run the root mode until the keys run out or the app quits.
pub fn run_with_keys(
    app: &mut TestApp,
    keys: impl IntoIterator<Item = Key>,
) -> (CommonResult<ModeExit>, Session<TestApp>) {
    let mut session = new_test_session(ScriptedKeys::new(keys));
    let result = session.run_mode(app, TestMode::Main);
    (result, session)
}
