// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clex_tui::{ExtraLine, FilterEdit, LineEdit, PanelDesc, PanelMove};

use super::{ComplKind, Mode};

/// The panel descriptor every view of the file manager uses.
pub type Panel = PanelDesc<Mode, Action>;
pub type Extra = ExtraLine<Mode, Action>;

/// Everything a key, a menu row or an extra line can ask the file manager to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Common to all modes.
    Return,
    Quit,
    Version,
    Filter,
    MenuNotAvailable,
    Noop,
    /// Run a mode in a nested frame and come back.
    Enter(Mode),
    /// Replace the current mode, keeping the frame.
    Goto(Mode),

    // Line and panel editing.
    Edit(LineEdit),
    /// A key that used to do `LineEdit` elsewhere; do it, then tell the user the
    /// preferred key.
    EditHint(LineEdit, &'static str),
    InsertLiteral,
    Undo,
    Redo,
    FilterEdit(FilterEdit),
    Pan(PanelMove),

    // File panel.
    FullPath,
    PasteDir,
    FilesTab,
    FilesEnter,
    FilesCd,
    HistNext,
    HistPrev,
    PasteLink,
    RereadUserGroup,
    SelectToggle,
    Exchange,
    /// `F2` to `F12`.
    FnKey(u8),
    CdRoot,
    CdParent,
    CdHome,
    Reread,
    FilterToggle,
    SelectAll,
    SelectNone,
    SelectInvert,
    MenuPick,

    // Paste menu.
    Complete(ComplKind),
    InsertFilename,
    InsertFilenames,
    InsertFullPath,
    InsertDir1,
    InsertDir2,
    InsertLink,
    PastePick,

    Compare,
    ComplPick,
    DirTab,
    DirEnter,

    // Bookmarks.
    BmListEnter,
    BmListBookmark,
    BmMngSave,
    BmMngRevert,
    BmMngEdit,
    BmMngUp,
    BmMngDown,
    BmMngNew,
    BmMngDel,
    BmEditCompl,
    BmEditEnter,

    // Configuration.
    CfgEnter,
    CfgStandard,
    CfgOriginal,
    CfgAccept { save: bool },
    CfgEditNumEnter,
    CfgEditTextEnter,

    HelpBack,
    HelpLink,
    HelpContents,

    HistPaste,
    HistEnter,
    HistDel,

    SelectFiles,
    SortSet,
}
