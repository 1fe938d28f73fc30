// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;

/// Failures that end a session. None of these can be caused by what the user types:
/// they are wiring defects in the static tables or a terminal that went away. They
/// unwind every nested [`crate::Session::run_mode`] call up to `main`.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum SessionError {
    #[error("requested operation mode {mode} is invalid")]
    #[diagnostic(
        code(clex_tui::session::unknown_mode),
        help("every mode a handler can switch to must have a ModeDef in the registry")
    )]
    UnknownMode { mode: String },

    #[error("operation mode {mode} is defined more than once")]
    #[diagnostic(code(clex_tui::session::duplicate_mode))]
    DuplicateMode { mode: String },

    #[error("key table {table} has a binding without a key outside of a menu")]
    #[diagnostic(code(clex_tui::session::corrupt_table))]
    CorruptTable { table: String },

    #[error("no more keyboard input")]
    #[diagnostic(code(clex_tui::session::input_closed))]
    InputClosed,

    #[error("cannot read the terminal")]
    #[diagnostic(
        code(clex_tui::session::terminal_input),
        help("make sure stdin is a terminal")
    )]
    TerminalInput(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_messages() {
        let it = SessionError::UnknownMode { mode: "Sort".into() };
        assert_eq!(it.to_string(), "requested operation mode Sort is invalid");
        let report: miette::Report = SessionError::InputClosed.into();
        assert_eq!(report.to_string(), "no more keyboard input");
    }

    #[test]
    fn test_terminal_input_keeps_source() {
        let it = SessionError::TerminalInput(std::io::Error::other("tty gone"));
        let source = std::error::Error::source(&it).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("tty gone"));
    }
}
