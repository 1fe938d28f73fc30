// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod filter_line;
pub mod panel_desc;

// Re-export.
pub use filter_line::*;
pub use panel_desc::*;
