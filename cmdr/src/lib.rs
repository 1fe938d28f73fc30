// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # clex
//!
//! A full screen file manager for the command line. The upper part of the screen is a
//! panel: the file list of the current directory, or one of the helper panels
//! (directory history, bookmarks, command history, completion, configuration, help).
//! The lower part is an ordinary command line with a prompt. Commands typed there are
//! run by the user's shell after the screen is suspended.
//!
//! Run it with:
//!
//! ```shell
//! cargo run --bin clex
//! ```
//!
//! Pass `-l` to write a debug log to `log.txt`.
//!
//! The configuration and the bookmarks live in the `clex` folder of the user's config
//! directory, see [`config_folder`].

// https://github.com/rust-lang/rust-clippy/blob/master/clippy_lints/src/unwrap_in_result.rs
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod clex;

// Re-export.
pub use clex::*;
