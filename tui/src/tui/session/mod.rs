// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod session_app;
pub mod session_error;
pub mod session_impl;
pub mod status_line;
pub mod transition;

// Re-export.
pub use session_app::*;
pub use session_error::*;
pub use session_impl::*;
pub use status_line::*;
pub use transition::*;
