// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # clex_tui
//!
//! The session kernel for keyboard driven, modal terminal file managers. An application
//! plugs in its own modes, actions, panels and lines through the [`SessionApp`] trait and
//! declares its key bindings as static [`KeyTable`]s. The kernel then:
//!
//! 1. Keeps a strict stack of mode frames. Entering a sub mode is a real recursive call
//!    to [`Session::run_mode`]; a frame inherits the active view and line of its parent
//!    and restores them when it unwinds.
//! 2. Reads one key at a time from a blocking [`KeySource`] (the only suspension point),
//!    brackets it with undo snapshots, and resolves it against the active tables with
//!    escape priority, menu mirroring and literal character insertion.
//! 3. Applies transitions requested by handlers once the current key is done:
//!    [`Transition::Mode`], [`Transition::Refresh`], [`Transition::Return`] and
//!    [`Transition::Quit`].
//!
//! The [`LineBuffer`] and its [`UndoHistory`] implement the editable lines, and
//! [`PanelDesc`] the scrolling list panels with negatively indexed extra lines and an
//! optional [`FilterLine`].
//!
//! Logging uses [`tracing`]; see [`try_initialize_logging_global`]. Errors are
//! [`miette`] reports, see [`CommonResult`].

// https://github.com/rust-lang/rust-clippy/blob/master/clippy_lints/src/unwrap_in_result.rs
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod core;
pub mod tui;

// Re-export.
pub use core::*;
pub use tui::*;
