// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// How many past remarks are kept.
pub const REMARK_LOG_SIZE: usize = 32;

/// One informational message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remark {
    pub text: String,
    pub at: DateTime<Local>,
}

/// The one line message area. The current remark disappears when the next key is
/// read; older remarks stay in a small log.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    current: Option<String>,
    log: VecDeque<Remark>,
}

impl StatusLine {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn remark(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!(message = "remark", text = %text);
        if self.log.len() == REMARK_LOG_SIZE {
            self.log.pop_front();
        }
        self.log.push_back(Remark {
            text: text.clone(),
            at: Local::now(),
        });
        self.current = Some(text);
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> { self.current.as_deref() }

    pub fn clear(&mut self) { self.current = None; }

    /// Oldest first.
    pub fn log(&self) -> impl Iterator<Item = &Remark> { self.log.iter() }

    #[must_use]
    pub fn last_logged(&self) -> Option<&str> { self.log.back().map(|it| it.text.as_str()) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_clear_keeps_log() {
        let mut status = StatusLine::new();
        status.remark("nothing to undo");
        assert_eq!(status.current(), Some("nothing to undo"));
        status.clear();
        assert_eq!(status.current(), None);
        assert_eq!(status.last_logged(), Some("nothing to undo"));
    }

    #[test]
    fn test_log_is_bounded() {
        let mut status = StatusLine::new();
        for n in 0..REMARK_LOG_SIZE + 5 {
            status.remark(format!("remark {n}"));
        }
        assert_eq!(status.log().count(), REMARK_LOG_SIZE);
        assert_eq!(status.log().next().map(|it| it.text.as_str()), Some("remark 5"));
    }
}
