// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod dispatch;
pub mod key_binding;
pub mod keys;
pub mod line_buffer;
pub mod panel;
pub mod session;
pub mod undo;

// Re-export.
pub use dispatch::*;
pub use key_binding::*;
pub use keys::*;
pub use line_buffer::*;
pub use panel::*;
pub use session::*;
pub use undo::*;
