// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod scripted_keys;
pub mod temp_dir;
#[cfg(test)]
pub mod test_session_app;

// Re-export.
pub use scripted_keys::*;
pub use temp_dir::*;
