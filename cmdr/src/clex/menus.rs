// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The fixed panels: the menus, the sort and compare choices, and the extra lines
//! every panel starts with.

use clex_tui::Transition;

use super::{Action, Extra, Mode, Panel};

/// An extra line whose info is replaced by the working directory when shown.
pub const CWD_INFO_MARK: &str = "@";

/// Row `i` describes row `i` of the main menu key table.
pub const MAIN_MENU_ROWS: [&str; 20] = [
    "help                                     <F1>",
    "change working directory                 alt-W",
    "  change into root directory             alt-/",
    "  change into parent directory           alt-.",
    "  change into home directory             alt-~",
    "  bookmarks                              alt-K",
    "command history                          alt-H",
    "sort order for filenames                 alt-S",
    "re-read current directory                ctrl-R",
    "compare directories                      alt-=",
    "filter on/off                            ctrl-F",
    "user (group) information                 alt-U (alt-G)",
    "select files:  select all                (alt-M) +",
    "               deselect all              (alt-M) -",
    "               select using pattern      alt-+",
    "               deselect using pattern    alt--",
    "               invert selection          alt-*",
    "configure CLEX                           alt-C",
    "program version                          alt-V",
    "quit                                     alt-Q",
];

/// Row `i` describes row `i` of the paste menu key table.
pub const PASTE_MENU_ROWS: [&str; 13] = [
    "complete name (auto)",
    "complete filename - any type",
    "complete filename - directory",
    "complete filename - executable",
    "complete username",
    "complete environment variable name",
    "complete command from the command history         alt-P",
    "insert current filename                           <F2>",
    "insert all selected filenames               <esc> <F2>",
    "insert full pathname of current file              ctrl-A",
    "insert secondary working directory name           ctrl-E",
    "insert current working directory name       <esc> ctrl-E",
    "insert the target of a symbolic link              ctrl-O",
];

/// Row `i` is compare level `i`.
pub const COMPARE_ROWS: [&str; 6] = [
    "0: name, type       (symbolic links ok)",
    "1: name, type, size (symbolic links ok)",
    "2: name, type, size",
    "3: name, type, size, ownership+permissions",
    "4: name, type, size, contents",
    "5: name, type, size, ownership+permissions, contents",
];

/// The level preselected in the compare menu.
pub const DEFAULT_COMPARE_LEVEL: i32 = 2;

pub static LEAVE: [Extra; 1] = [Extra::leave()];

pub static BM_LIST_EXTRA: [Extra; 3] = [
    Extra::leave(),
    Extra {
        text: Some("Manage bookmarks"),
        info: None,
        transition: Some(Transition::Mode(Mode::BmManager)),
        action: None,
    },
    Extra {
        text: Some("Bookmark the current working directory"),
        info: Some(CWD_INFO_MARK),
        transition: None,
        action: Some(Action::BmListBookmark),
    },
];

pub static BM_MANAGER_EXTRA: [Extra; 2] = [
    Extra {
        text: None,
        info: Some("Bookmarks are saved automatically"),
        transition: Some(Transition::Mode(Mode::BmList)),
        action: Some(Action::BmMngSave),
    },
    Extra {
        text: Some("Revert the bookmarks to previous state"),
        info: Some("All changes will be lost"),
        transition: None,
        action: Some(Action::BmMngRevert),
    },
];

pub static CFG_EXTRA: [Extra; 3] = [
    Extra {
        text: Some("Cancel"),
        info: Some("No configuration change"),
        transition: Some(Transition::Return),
        action: None,
    },
    Extra {
        text: Some("Accept"),
        info: Some("Use the new configuration in this session"),
        transition: Some(Transition::Return),
        action: Some(Action::CfgAccept { save: false }),
    },
    Extra {
        text: Some("Accept+Save"),
        info: Some("Save the configuration to config.json"),
        transition: Some(Transition::Return),
        action: Some(Action::CfgAccept { save: true }),
    },
];

const DIR_LEAVE: Extra = Extra {
    text: None,
    info: None,
    transition: Some(Transition::Return),
    action: Some(Action::DirEnter),
};

pub static DIR_SPLIT_EXTRA: [Extra; 1] = [DIR_LEAVE];

pub static DIR_EXTRA: [Extra; 2] = [
    DIR_LEAVE,
    Extra {
        text: Some("Bookmarks"),
        info: None,
        transition: Some(Transition::Mode(Mode::BmList)),
        action: Some(Action::DirEnter),
    },
];

pub static GROUP_EXTRA: [Extra; 2] = [
    Extra::leave(),
    Extra {
        text: Some("Switch to user data"),
        info: None,
        transition: Some(Transition::Mode(Mode::User)),
        action: None,
    },
];

pub static USER_EXTRA: [Extra; 2] = [
    Extra::leave(),
    Extra {
        text: Some("Switch to group data"),
        info: None,
        transition: Some(Transition::Mode(Mode::Group)),
        action: None,
    },
];

pub static HELP_EXTRA: [Extra; 1] = [Extra {
    text: Some("HELP: Table of Contents"),
    info: None,
    transition: None,
    action: Some(Action::HelpContents),
}];

#[must_use]
pub fn main_menu_panel() -> Panel {
    let mut it = Panel::new().with_extra(&LEAVE);
    it.set_count(MAIN_MENU_ROWS.len());
    it
}

#[must_use]
pub fn paste_menu_panel() -> Panel {
    let mut it = Panel::new().with_extra(&LEAVE);
    it.set_count(PASTE_MENU_ROWS.len());
    it
}

#[must_use]
pub fn compare_panel() -> Panel {
    let mut it = Panel::new()
        .with_extra(&LEAVE)
        .with_cursor(DEFAULT_COMPARE_LEVEL);
    it.set_count(COMPARE_ROWS.len());
    it
}

#[must_use]
pub fn sort_panel(rows: usize) -> Panel {
    let mut it = Panel::new().with_extra(&LEAVE).with_cursor(0);
    it.set_count(rows);
    it.top = 0;
    it
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clex::key_tables::{MAIN_MENU, PASTE_MENU};

    #[test]
    fn test_menu_rows_match_key_tables() {
        assert_eq!(MAIN_MENU.bindings.len(), MAIN_MENU_ROWS.len());
        // The paste menu table ends with the <enter> binding.
        assert_eq!(PASTE_MENU.bindings.len(), PASTE_MENU_ROWS.len() + 1);
    }

    #[test]
    fn test_menu_panels() {
        let main = main_menu_panel();
        assert_eq!((main.cnt, main.min, main.curs), (20, -1, -1));
        assert_eq!(main.extra_at_cursor().unwrap().transition, Some(Transition::Return));
        let compare = compare_panel();
        assert_eq!((compare.cnt, compare.curs, compare.top), (6, 2, -1));
    }
}
