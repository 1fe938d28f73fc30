// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The key tables of every mode and the registry that ties them together.
//!
//! The tables flagged `menu` describe the rows of a menu panel in order, so their
//! entries can't be reordered without changing the menus in [`super::menus`].

use clex_tui::{FilterEdit, Key, KeyBinding, KeyTable, LineEdit, ModeDef, ModeRegistry,
               PanelMove};

use super::{Action, ComplKind, Mode, ui_str};

type Kb = KeyBinding<Action>;

static COMMON: KeyTable<Action> = KeyTable {
    name: "common",
    bindings: &[
        Kb::plain(Key::CANCEL, Action::Return),
        Kb::escaped(Key::Char('q'), Action::Quit),
        Kb::escaped(Key::Char('v'), Action::Version),
        Kb::plain(Key::Ctrl('f'), Action::Filter),
        Kb::escaped(Key::Char('m'), Action::MenuNotAvailable),
        Kb::plain(Key::F(1), Action::Enter(Mode::Help)),
    ],
    menu: false,
};

static EDIT: KeyTable<Action> = KeyTable {
    name: "edit",
    bindings: &[
        Kb::escaped(Key::Char('b'), Action::Edit(LineEdit::WordLeft)),
        Kb::plain(Key::ShiftLeft, Action::Edit(LineEdit::WordLeft)),
        Kb::escaped(Key::Char('d'), Action::Edit(LineEdit::DeleteWord)),
        Kb::escaped(Key::Char('f'), Action::Edit(LineEdit::WordRight)),
        Kb::plain(Key::ShiftRight, Action::Edit(LineEdit::WordRight)),
        Kb::plain(Key::BACKSPACE, Action::Edit(LineEdit::Backspace)),
        Kb::plain(Key::Ctrl('k'), Action::Edit(LineEdit::DeleteToEnd)),
        Kb::plain(Key::Ctrl('u'), Action::Edit(LineEdit::Kill)),
        Kb::plain(Key::Ctrl('v'), Action::InsertLiteral),
        Kb::plain(Key::Ctrl('z'), Action::Undo),
        Kb::escaped(Key::Ctrl('z'), Action::Redo),
        Kb::plain(Key::Delete, Action::Edit(LineEdit::DeleteChar)),
        Kb::plain(Key::Left, Action::Edit(LineEdit::Left)),
        Kb::plain(Key::Right, Action::Edit(LineEdit::Right)),
        Kb::plain(Key::Home, Action::Edit(LineEdit::Begin)),
        Kb::plain(Key::End, Action::Edit(LineEdit::End)),
        Kb::escaped(Key::Up, Action::Edit(LineEdit::Up)),
        Kb::escaped(Key::Down, Action::Edit(LineEdit::Down)),
        // Emacs habits.
        Kb::plain(
            Key::Ctrl('b'),
            Action::EditHint(LineEdit::WordLeft, ui_str::USE_ALT_B),
        ),
        Kb::plain(
            Key::Ctrl('d'),
            Action::EditHint(LineEdit::DeleteWord, ui_str::USE_ALT_D),
        ),
        Kb::plain(
            Key::Ctrl('w'),
            Action::EditHint(LineEdit::WordRight, ui_str::USE_ALT_F),
        ),
        Kb::plain(
            Key::Ctrl('y'),
            Action::EditHint(LineEdit::DeleteToEnd, ui_str::USE_CTRL_K),
        ),
    ],
    menu: false,
};

static FILTER_EDIT: KeyTable<Action> = KeyTable {
    name: "filteredit",
    bindings: &[
        Kb::plain(Key::BACKSPACE, Action::FilterEdit(FilterEdit::Backspace)),
        Kb::plain(Key::Ctrl('u'), Action::FilterEdit(FilterEdit::Kill)),
        Kb::plain(Key::Ctrl('k'), Action::FilterEdit(FilterEdit::DeleteToEnd)),
        Kb::plain(Key::Delete, Action::FilterEdit(FilterEdit::DeleteChar)),
        Kb::plain(Key::Left, Action::FilterEdit(FilterEdit::Left)),
        Kb::plain(Key::Right, Action::FilterEdit(FilterEdit::Right)),
        Kb::plain(Key::Home, Action::FilterEdit(FilterEdit::Begin)),
        Kb::plain(Key::End, Action::FilterEdit(FilterEdit::End)),
    ],
    menu: false,
};

pub(crate) static PANEL: KeyTable<Action> = KeyTable {
    name: "panel",
    bindings: &[
        Kb::plain(Key::Up, Action::Pan(PanelMove::Up)),
        Kb::plain(Key::Down, Action::Pan(PanelMove::Down)),
        Kb::plain(Key::PageUp, Action::Pan(PanelMove::PageUp)),
        Kb::plain(Key::PageDown, Action::Pan(PanelMove::PageDown)),
        Kb::escaped(Key::Home, Action::Pan(PanelMove::Home)),
        Kb::escaped(Key::End, Action::Pan(PanelMove::End)),
    ],
    menu: false,
};

static EDIT_CMD: KeyTable<Action> = KeyTable {
    name: "editcmd",
    bindings: &[
        Kb::plain(Key::Ctrl('a'), Action::FullPath),
        Kb::plain(Key::Ctrl('e'), Action::PasteDir),
        Kb::plain(Key::TAB, Action::FilesTab),
        Kb::escaped(Key::TAB, Action::Enter(Mode::Paste)),
        Kb::plain(Key::ENTER, Action::FilesEnter),
        Kb::escaped(Key::ENTER, Action::FilesCd).with_cursor(),
        Kb::plain(Key::Ctrl('n'), Action::HistNext),
        Kb::plain(Key::Ctrl('p'), Action::HistPrev),
        Kb::plain(Key::Ctrl('o'), Action::PasteLink).with_cursor(),
        Kb::escaped(Key::Ctrl('r'), Action::RereadUserGroup),
        Kb::plain(Key::Ctrl('t'), Action::SelectToggle).with_cursor(),
        Kb::plain(Key::Insert, Action::SelectToggle).with_cursor(),
        Kb::plain(Key::Ctrl('x'), Action::Exchange),
        Kb::escaped(Key::Char('g'), Action::Enter(Mode::Group)),
        Kb::escaped(Key::Char('m'), Action::Enter(Mode::MainMenu)),
        Kb::escaped(Key::Char('p'), Action::Complete(ComplKind::Hist)),
        Kb::plain(Key::F(2), Action::FnKey(2)),
        Kb::plain(Key::F(3), Action::FnKey(3)),
        Kb::plain(Key::F(4), Action::FnKey(4)),
        Kb::plain(Key::F(5), Action::FnKey(5)),
        Kb::plain(Key::F(6), Action::FnKey(6)),
        Kb::plain(Key::F(7), Action::FnKey(7)),
        Kb::plain(Key::F(8), Action::FnKey(8)),
        Kb::plain(Key::F(9), Action::FnKey(9)),
        Kb::plain(Key::F(10), Action::FnKey(10)),
        Kb::plain(Key::F(11), Action::FnKey(11)),
        Kb::plain(Key::F(12), Action::FnKey(12)),
    ],
    menu: false,
};

/// Row `i` is line `i` of the main menu.
pub(crate) static MAIN_MENU: KeyTable<Action> = KeyTable {
    name: "mainmenu",
    bindings: &[
        Kb::menu_item(Action::Enter(Mode::Help)),
        Kb::escaped(Key::Char('w'), Action::Enter(Mode::Dir)),
        Kb::escaped(Key::Char('/'), Action::CdRoot),
        Kb::escaped(Key::Char('.'), Action::CdParent),
        Kb::escaped(Key::Char('~'), Action::CdHome),
        Kb::escaped(Key::Char('k'), Action::Enter(Mode::BmList)),
        Kb::escaped(Key::Char('h'), Action::Enter(Mode::Hist)),
        Kb::escaped(Key::Char('s'), Action::Enter(Mode::Sort)),
        Kb::plain(Key::Ctrl('r'), Action::Reread),
        Kb::escaped(Key::Char('='), Action::Enter(Mode::Compare)),
        Kb::menu_item(Action::FilterToggle),
        Kb::escaped(Key::Char('u'), Action::Enter(Mode::User)),
        Kb::menu_item(Action::SelectAll),
        Kb::menu_item(Action::SelectNone),
        Kb::escaped(Key::Char('+'), Action::Enter(Mode::Select)),
        Kb::escaped(Key::Char('-'), Action::Enter(Mode::Deselect)),
        Kb::escaped(Key::Char('*'), Action::SelectInvert),
        Kb::escaped(Key::Char('c'), Action::Enter(Mode::Cfg)),
        Kb::escaped(Key::Char('v'), Action::Version),
        Kb::menu_item(Action::Quit),
    ],
    menu: true,
};

/// Alternative keys for the main menu rows, only active inside the menu.
static MAIN_MENU_2: KeyTable<Action> = KeyTable {
    name: "mainmenu2",
    bindings: &[
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::plain(Key::Ctrl('f'), Action::FilterToggle),
        Kb::escaped(Key::Char('g'), Action::Enter(Mode::Group)),
        Kb::plain(Key::Char('+'), Action::SelectAll),
        Kb::plain(Key::Char('-'), Action::SelectNone),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::menu_item(Action::Noop),
        Kb::plain(Key::ENTER, Action::MenuPick),
    ],
    menu: true,
};

/// Row `i` is line `i` of the paste menu.
pub(crate) static PASTE_MENU: KeyTable<Action> = KeyTable {
    name: "pastemenu",
    bindings: &[
        Kb::menu_item(Action::Complete(ComplKind::Auto)),
        Kb::menu_item(Action::Complete(ComplKind::File)),
        Kb::menu_item(Action::Complete(ComplKind::Dir)),
        Kb::menu_item(Action::Complete(ComplKind::Cmd)),
        Kb::menu_item(Action::Complete(ComplKind::User)),
        Kb::menu_item(Action::Complete(ComplKind::Env)),
        Kb::escaped(Key::Char('p'), Action::Complete(ComplKind::Hist)),
        Kb::plain(Key::F(2), Action::InsertFilename),
        Kb::escaped(Key::F(2), Action::InsertFilenames),
        Kb::plain(Key::Ctrl('a'), Action::InsertFullPath),
        Kb::plain(Key::Ctrl('e'), Action::InsertDir2),
        Kb::escaped(Key::Ctrl('e'), Action::InsertDir1),
        Kb::plain(Key::Ctrl('o'), Action::InsertLink),
        Kb::plain(Key::ENTER, Action::PastePick),
    ],
    menu: true,
};

static COMPARE: KeyTable<Action> = KeyTable {
    name: "compare",
    bindings: &[
        Kb::plain(Key::Char('0'), Action::Compare),
        Kb::plain(Key::Char('1'), Action::Compare),
        Kb::plain(Key::Char('2'), Action::Compare),
        Kb::plain(Key::Char('3'), Action::Compare),
        Kb::plain(Key::Char('4'), Action::Compare),
        Kb::plain(Key::Char('5'), Action::Compare),
        Kb::plain(Key::ENTER, Action::Compare).with_cursor(),
    ],
    menu: true,
};

static COMPL: KeyTable<Action> = KeyTable {
    name: "compl",
    bindings: &[
        Kb::plain(Key::TAB, Action::ComplPick).with_cursor(),
        Kb::plain(Key::ENTER, Action::ComplPick).with_cursor(),
    ],
    menu: false,
};

static DIR: KeyTable<Action> = KeyTable {
    name: "dir",
    bindings: &[
        Kb::escaped(Key::Char('k'), Action::Goto(Mode::BmList)),
        Kb::plain(Key::TAB, Action::DirTab),
        Kb::plain(Key::ENTER, Action::DirEnter),
    ],
    menu: false,
};

static BM_LIST: KeyTable<Action> = KeyTable {
    name: "bm_lst",
    bindings: &[Kb::plain(Key::ENTER, Action::BmListEnter).with_cursor()],
    menu: false,
};

static BM_MANAGER: KeyTable<Action> = KeyTable {
    name: "bm_mng",
    bindings: &[
        Kb::plain(Key::CANCEL, Action::BmMngSave),
        Kb::plain(Key::ENTER, Action::BmMngEdit).with_cursor(),
        Kb::plain(Key::Char('d'), Action::BmMngDown).with_cursor(),
        Kb::plain(Key::Char('u'), Action::BmMngUp).with_cursor(),
        Kb::plain(Key::Char('i'), Action::BmMngNew),
        Kb::plain(Key::Insert, Action::BmMngNew),
        Kb::plain(Key::Char('r'), Action::BmMngDel).with_cursor(),
        Kb::plain(Key::Delete, Action::BmMngDel).with_cursor(),
        Kb::plain(Key::BACKSPACE, Action::BmMngDel).with_cursor(),
    ],
    menu: false,
};

static BM_EDIT: KeyTable<Action> = KeyTable {
    name: "bm_edit",
    bindings: &[
        Kb::plain(Key::TAB, Action::BmEditCompl),
        Kb::plain(Key::ENTER, Action::BmEditEnter),
    ],
    menu: false,
};

static CFG: KeyTable<Action> = KeyTable {
    name: "cfg",
    bindings: &[
        Kb::plain(Key::ENTER, Action::CfgEnter).with_cursor(),
        Kb::plain(Key::Char('s'), Action::CfgStandard).with_cursor(),
        Kb::plain(Key::Char('o'), Action::CfgOriginal).with_cursor(),
    ],
    menu: false,
};

static CFG_EDIT_NUM: KeyTable<Action> = KeyTable {
    name: "cfg_edit_num",
    bindings: &[Kb::plain(Key::ENTER, Action::CfgEditNumEnter)],
    menu: false,
};

static CFG_EDIT_TEXT: KeyTable<Action> = KeyTable {
    name: "cfg_edit_str",
    bindings: &[Kb::plain(Key::ENTER, Action::CfgEditTextEnter)],
    menu: false,
};

static HELP: KeyTable<Action> = KeyTable {
    name: "help",
    bindings: &[
        Kb::plain(Key::BACKSPACE, Action::HelpBack),
        Kb::plain(Key::Left, Action::HelpBack),
        Kb::plain(Key::ENTER, Action::HelpLink),
        Kb::plain(Key::Right, Action::HelpLink),
        Kb::plain(Key::F(1), Action::HelpContents),
    ],
    menu: false,
};

static HIST: KeyTable<Action> = KeyTable {
    name: "hist",
    bindings: &[
        Kb::escaped(Key::Delete, Action::HistDel).with_cursor(),
        Kb::escaped(Key::BACKSPACE, Action::HistDel).with_cursor(),
        Kb::plain(Key::TAB, Action::HistPaste).with_cursor(),
        Kb::plain(Key::ENTER, Action::HistEnter).with_cursor(),
        Kb::plain(Key::Ctrl('n'), Action::Pan(PanelMove::Up)),
        Kb::plain(Key::Ctrl('p'), Action::Pan(PanelMove::Down)),
    ],
    menu: false,
};

static SELECT: KeyTable<Action> = KeyTable {
    name: "select",
    bindings: &[Kb::plain(Key::ENTER, Action::SelectFiles)],
    menu: false,
};

static SORT: KeyTable<Action> = KeyTable {
    name: "sort",
    bindings: &[Kb::plain(Key::ENTER, Action::SortSet).with_cursor()],
    menu: false,
};

const fn mode(
    mode: Mode,
    tables: &'static [&'static KeyTable<Action>],
) -> ModeDef<Mode, Action> {
    ModeDef {
        mode,
        tables,
        menu_panel: false,
    }
}

const fn menu_mode(
    mode: Mode,
    tables: &'static [&'static KeyTable<Action>],
) -> ModeDef<Mode, Action> {
    ModeDef {
        mode,
        tables,
        menu_panel: true,
    }
}

pub static CLEX_REGISTRY: ModeRegistry<Mode, Action> = ModeRegistry {
    modes: &[
        mode(Mode::File, &[&EDIT_CMD, &MAIN_MENU, &PANEL]),
        mode(Mode::Dir, &[&DIR, &PANEL]),
        mode(Mode::DirSplit, &[&DIR, &PANEL]),
        mode(Mode::BmList, &[&BM_LIST, &PANEL]),
        mode(Mode::BmManager, &[&BM_MANAGER, &PANEL]),
        mode(Mode::BmEdit, &[&BM_EDIT]),
        mode(Mode::Cfg, &[&CFG, &PANEL]),
        mode(Mode::CfgEditNum, &[&CFG_EDIT_NUM]),
        mode(Mode::CfgEditTxt, &[&CFG_EDIT_TEXT]),
        menu_mode(Mode::Compare, &[&COMPARE, &PANEL]),
        mode(Mode::Compl, &[&COMPL, &PANEL]),
        mode(Mode::Select, &[&SELECT, &PANEL]),
        mode(Mode::Deselect, &[&SELECT, &PANEL]),
        mode(Mode::Group, &[&PANEL]),
        mode(Mode::User, &[&PANEL]),
        mode(Mode::Help, &[&HELP, &PANEL]),
        mode(Mode::Hist, &[&HIST, &PANEL]),
        menu_mode(Mode::MainMenu, &[&MAIN_MENU, &MAIN_MENU_2, &PANEL]),
        menu_mode(Mode::Paste, &[&PASTE_MENU, &PANEL]),
        mode(Mode::Sort, &[&SORT, &PANEL]),
    ],
    edit: &EDIT,
    filter_edit: &FILTER_EDIT,
    common: &COMMON,
};
