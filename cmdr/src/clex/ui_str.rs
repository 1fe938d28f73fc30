// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Every fixed string the user can see: headings, remarks and prompts.

pub const APP_NAME: &str = "CLEX";
pub const BAR_TEXT: &str = " CLEX file manager - alt-M for menu, F1 for help";

#[must_use]
pub fn version_remark() -> String {
    format!("Welcome to {APP_NAME} {} !", env!("CARGO_PKG_VERSION"))
}

// Headings.
pub const HEADING_DEFAULT: &str = "CLEX";
pub const HEADING_BM_EDIT: &str = "BOOKMARK MANAGER > EDIT";
pub const HEADING_BM_LIST: &str = "CHANGE WORKING DIRECTORY > BOOKMARKS";
pub const HEADING_BM_MANAGER: &str =
    "BOOKMARK MANAGER  |  U/D = up/down, <insert> or I, <del> or R, <enter> = edit";
pub const HEADING_CFG: &str = "CONFIGURATION  |  <enter> = change, O = original, S = standard";
pub const HEADING_CFG_EDIT: &str = "CONFIGURATION > EDIT";
pub const HEADING_COMPARE: &str = "DIRECTORY COMPARE";
pub const HEADING_COMPL: &str = " COMPLETION";
pub const HEADING_DIR: &str = "CHANGE WORKING DIRECTORY";
pub const HEADING_GROUP: &str = "GROUP INFORMATION";
pub const HEADING_HELP: &str = "HELP: ";
pub const HEADING_HIST: &str = "COMMAND HISTORY  |  <tab> = insert, <esc> <del> = delete";
pub const HEADING_MAINMENU: &str = "MAIN FUNCTION MENU";
pub const HEADING_PASTE: &str = "COMPLETE/INSERT NAME";
pub const HEADING_SELECT: &str = "SELECT FILES";
pub const HEADING_DESELECT: &str = "DESELECT FILES";
pub const HEADING_SORT: &str = "SORT ORDER";
pub const HEADING_USER: &str = "USER INFORMATION";

// Frame.
pub const POSITION_NO_DATA: &str = "< NO DATA >";
pub const FILTER_LABEL_PATTERN: &str = "< pattern: ";
pub const FILTER_LABEL_SUBSTRING: &str = "<  filter: ";
pub const WORKING_DIRECTORY_INFO: &str = "  working directory is ";
pub const NO_STATUS_INFO: &str = "no status information available";

// Common remarks.
pub const MENU_ONLY_IN_FILE_PANEL: &str = "the menu (alt-M) exists only in the file panel";
pub const NO_FILTER_SUPPORT: &str = "this panel does not support filtering";
pub const PATTERN_INCOMPLETE: &str = "pattern is incomplete";
pub const USE_ALT_B: &str = "please use the alt-B key for this function";
pub const USE_ALT_D: &str = "please use the alt-D key for this function";
pub const USE_ALT_F: &str = "please use the alt-F key for this function";
pub const USE_CTRL_K: &str = "please use the ctrl-K key for this function";

// Line editing.
pub const CTRL_V_DECIMAL_USAGE: &str =
    "usage: ctrl-V N N N, where NNN is decimal ASCII code (001 to 255)";
pub const CTRL_V_HEX_USAGE: &str = "usage: ctrl-V x H H, where HH is hex ASCII code (01 to FF)";
pub const CTRL_V_FUNCTION_KEY: &str = "function key codes cannot be inserted";
pub const NOT_A_SYMLINK: &str = "not a symbolic link";
pub const NO_SELECTED_FILES: &str = "no selected files";
pub const PRESS_ESC_FOR_SELECTED: &str =
    "press <ESC> before <Fn> if you want to work with selected files";

// File panel.
pub const CANNOT_LIST_DIRECTORY: &str = "LIST DIR: Cannot list the contents of the directory.";
pub const TYPE_FIRST_CHAR: &str = "COMPLETION: please type at least the first character";
pub const DIRECTORY_CHANGED: &str = "directory changed";
pub const SELECT_PROMPT: &str = "SELECT files: ";
pub const DESELECT_PROMPT: &str = "DESELECT files: ";
pub const WILDCARDS_HINT: &str = "wildcards: ? * and [..], see help";

// Directory panel.
pub const CHANGE_DIR_PROMPT: &str = "Change directory: ";
pub const CHECK_THE_SPACES: &str = "check the spaces around the directory name";

pub fn cannot_change_dir(reason: &str) -> String {
    format!("CHANGE DIR: {reason}")
}

// Bookmarks.
pub const BM_EDIT_PROMPT: &str = "bookmark: ";
pub const BM_ALREADY: &str = "already bookmarked";
pub const BM_LIST_FULL: &str = "Bookmark list is full.";
pub const BM_FILE_UPDATED: &str = "bookmark file updated";
pub const BM_NO_CHANGES: &str = "no changes were made";
pub const BM_REVERTED: &str = "bookmarks reverted to previous state";
pub const BM_RELOADED: &str = "Latest version of the bookmarks was loaded from the file.";
pub const BM_NEEDS_SLASH: &str = "Directory name must start with a slash / . ";

// History.
pub const HIST_TOP: &str = "top of the history list";
pub const HIST_BOTTOM: &str = "bottom of the history list";
pub const HIST_FAILED: &str = "this command failed last time";
pub const HIST_ORDER: &str = "commands are shown in order of their execution (recent first)";

// Configuration.
pub const CFG_NUMERIC_REQUIRED: &str = "numeric value required";
pub const CFG_OUT_OF_RANGE: &str = "value is out of range";
pub const CFG_TOO_LONG: &str = "string is too long";
pub const CFG_SAVED: &str = "configuration saved";

// Completion.
pub const NOTHING_TO_COMPLETE: &str = "there is nothing to complete";
pub const CANNOT_COMPLETE_AFTER_BACKTICK: &str = "cannot complete after `command`";

// Help.
pub const NO_PREVIOUS_HELP_PAGE: &str = "there is no previous help-page";

pub fn help_page_not_found(name: &str) -> String {
    format!("HELP: help-page '{name}' not found.")
}

// Execution.
pub const EXEC_SUCCESS: &str = "Command successful.";
pub const WARN_RM: &str = "WARNING: rm command deletes files, please confirm";
pub const WARN_LONG: &str = "WARNING: This long command did not fit to the command line";
pub const CONFIRM_EXEC: &str = "Execute the command ? (y = YES) ";
pub const PRESS_ENTER: &str = "Press <enter> to continue. ";
pub const WARNINGS_CAN_BE_OFF: &str = "warnings can be turned off in the config panel";
pub const NOT_A_DIRECTORY: &str = "not a directory";
pub const COMMAND_NOT_STARTED: &str = "EXEC: Cannot execute the command.";

pub fn exit_code_report(code: i32) -> String { format!("Exit code = {code}.") }

pub fn signal_report(signal: i32) -> String {
    format!("Abnormal termination, signal {signal}")
}

pub fn working_directory_line(dir: &str) -> String { format!("working directory: {dir}") }

// Reasons shown after "CHANGE DIR: ".
pub const CD_PERMISSION_DENIED: &str = "Permission denied.";
pub const CD_NOT_A_DIRECTORY: &str = "Not a directory.";
pub const CD_NO_SUCH_DIRECTORY: &str = "No such directory.";
pub const CD_LINK_LOOP: &str = "Symbolic link loop.";
pub const CD_FAILED: &str = "Cannot change directory.";

// Compare.
pub const COMPARE_NO_DIFFERENCE: &str = "the panels are equal";

// Sort.
pub const SORT_ORDER_CHANGED: &str = "sort order changed";
