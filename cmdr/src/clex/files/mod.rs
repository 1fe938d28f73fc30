// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod file_entry;
pub mod file_panel;
pub mod list_format;
pub mod select;
pub mod sort;

// Re-export.
pub use file_entry::*;
pub use file_panel::*;
pub use list_format::*;
pub use select::*;
pub use sort::*;
