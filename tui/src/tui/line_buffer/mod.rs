// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod line_buffer_impl;
pub mod line_edit;
pub mod line_view;

// Re-export.
pub use line_buffer_impl::*;
pub use line_edit::*;
pub use line_view::*;
