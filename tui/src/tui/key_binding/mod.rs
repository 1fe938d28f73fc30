// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod key_table;
pub mod mode_registry;

// Re-export.
pub use key_table::*;
pub use mode_registry::*;
