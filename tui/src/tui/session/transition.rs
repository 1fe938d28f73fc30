// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// What a handler asks the kernel to do once the current keystroke is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<M> {
    /// Leave the current mode for `M` within the same frame.
    Mode(M),
    /// Run the current mode's prepare step again.
    Refresh,
    /// Pop the current frame. Ignored (with a remark) in the root frame.
    Return,
    /// Unwind every frame and shut down.
    Quit,
}

/// How a call to [`crate::Session::run_mode`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeExit {
    Return,
    Quit,
}
