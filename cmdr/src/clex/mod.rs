// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The CLEX file manager: two file panels, a command line and the panels that help
//! fill it in. [`run_clex`] is the entry point.

// Attach sources.
pub mod action;
pub mod app_main;
pub mod bookmarks;
pub mod clap_config;
pub mod completion;
pub mod config;
pub mod config_folder;
pub mod directory;
pub mod edit_macro;
pub mod exec;
pub mod files;
pub mod help;
pub mod history;
pub mod launcher;
pub mod mode;
pub mod name_match;
pub mod render;
pub mod ui_str;
pub mod userdata;

mod app_handlers;
mod app_screen;
mod key_tables;
mod menus;

#[cfg(test)]
mod test_fixtures;

// Re-export.
pub use action::*;
pub use app_main::*;
pub use bookmarks::*;
pub use clap_config::*;
pub use completion::*;
pub use config::*;
pub use directory::*;
pub use edit_macro::*;
pub use exec::*;
pub use files::*;
pub use help::*;
pub use history::*;
pub use key_tables::*;
pub use launcher::*;
pub use menus::*;
pub use mode::*;
pub use name_match::*;
pub use render::*;
pub use userdata::*;
