// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::{Display, EnumIter};

use super::ui_str;

/// The operation modes of the file manager. `File` is the root mode; everything else
/// runs in a frame nested inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Mode {
    File,
    Dir,
    DirSplit,
    BmList,
    BmManager,
    BmEdit,
    Cfg,
    CfgEditNum,
    CfgEditTxt,
    Compare,
    Compl,
    Select,
    Deselect,
    Group,
    User,
    Help,
    Hist,
    MainMenu,
    Paste,
    Sort,
}

impl Mode {
    /// Fixed part of the top screen line. The file mode shows both directories
    /// instead, help and completion append their own text.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Mode::File => ui_str::HEADING_DEFAULT,
            Mode::BmEdit => ui_str::HEADING_BM_EDIT,
            Mode::BmList => ui_str::HEADING_BM_LIST,
            Mode::BmManager => ui_str::HEADING_BM_MANAGER,
            Mode::Cfg => ui_str::HEADING_CFG,
            Mode::CfgEditNum | Mode::CfgEditTxt => ui_str::HEADING_CFG_EDIT,
            Mode::Compare => ui_str::HEADING_COMPARE,
            Mode::Compl => ui_str::HEADING_COMPL,
            Mode::Dir | Mode::DirSplit => ui_str::HEADING_DIR,
            Mode::Group => ui_str::HEADING_GROUP,
            Mode::Help => ui_str::HEADING_HELP,
            Mode::Hist => ui_str::HEADING_HIST,
            Mode::MainMenu => ui_str::HEADING_MAINMENU,
            Mode::Paste => ui_str::HEADING_PASTE,
            Mode::Select => ui_str::HEADING_SELECT,
            Mode::Deselect => ui_str::HEADING_DESELECT,
            Mode::Sort => ui_str::HEADING_SORT,
            Mode::User => ui_str::HEADING_USER,
        }
    }
}

/// Every list panel the app owns. `Files` is whichever file panel is primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum View {
    Files,
    Dir,
    DirSplit,
    BmList,
    BmManager,
    Cfg,
    Compare,
    Compl,
    Group,
    User,
    Help,
    Hist,
    MainMenu,
    Paste,
    Sort,
}

/// The editable lines: the shell command line, a scratch line shared by the small
/// input modes, and the change directory line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LineId {
    Cmd,
    Tmp,
    Dir,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_mode_has_a_heading() {
        assert_eq!(Mode::iter().count(), 20);
        for mode in Mode::iter() {
            assert!(!mode.heading().is_empty(), "{mode}");
        }
        assert_eq!(Mode::Select.heading(), "SELECT FILES");
        assert_eq!(Mode::Deselect.heading(), "DESELECT FILES");
    }
}
