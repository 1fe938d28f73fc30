// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod dispatch_impl;

// Re-export.
pub use dispatch_impl::*;
