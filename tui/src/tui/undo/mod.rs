// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod edit_op;
pub mod undo_engine;
pub mod undo_history;

// Re-export.
pub use edit_op::*;
pub use undo_engine::*;
pub use undo_history::*;
