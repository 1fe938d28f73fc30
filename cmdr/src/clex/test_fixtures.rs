// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Stand-ins for the terminal and the shell. Both are cheap handles to shared state,
//! so a test keeps a clone after boxing the other one into the app.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use clex_tui::CommonResult;

use super::{CommandRunner, ExitReport, Frame, Terminal};

#[derive(Debug, Default)]
struct TerminalState {
    answers: VecDeque<char>,
    printed: String,
    frames: Vec<Frame>,
    suspends: usize,
    resumes: usize,
}

/// A [`Terminal`] that keeps everything it is given. `read_char` answers with the
/// chars passed to [`RecordingTerminal::new`], then reports closed input.
#[derive(Debug, Clone, Default)]
pub struct RecordingTerminal {
    state: Rc<RefCell<TerminalState>>,
}

impl RecordingTerminal {
    #[must_use]
    pub fn new(answers: &str) -> Self {
        let it = Self::default();
        it.state.borrow_mut().answers = answers.chars().collect();
        it
    }

    #[must_use]
    pub fn printed(&self) -> String { self.state.borrow().printed.clone() }

    #[must_use]
    pub fn suspends(&self) -> usize { self.state.borrow().suspends }

    #[must_use]
    pub fn resumes(&self) -> usize { self.state.borrow().resumes }

    #[must_use]
    pub fn frames(&self) -> usize { self.state.borrow().frames.len() }

    /// Text of the last painted frame, one string per row.
    #[must_use]
    pub fn last_screen(&self) -> Vec<String> {
        self.state
            .borrow()
            .frames
            .last()
            .map(|frame| frame.rows.iter().map(super::Row::text).collect())
            .unwrap_or_default()
    }
}

impl Terminal for RecordingTerminal {
    fn draw(&mut self, frame: &Frame) -> CommonResult<()> {
        self.state.borrow_mut().frames.push(frame.clone());
        Ok(())
    }

    fn suspend(&mut self) -> CommonResult<()> {
        self.state.borrow_mut().suspends += 1;
        Ok(())
    }

    fn resume(&mut self) -> CommonResult<()> {
        self.state.borrow_mut().resumes += 1;
        Ok(())
    }

    fn print(&mut self, text: &str) -> CommonResult<()> {
        self.state.borrow_mut().printed.push_str(text);
        Ok(())
    }

    fn read_char(&mut self) -> CommonResult<Option<char>> {
        Ok(self.state.borrow_mut().answers.pop_front())
    }
}

/// A [`CommandRunner`] that records each command and reports the same exit every time.
#[derive(Debug, Clone)]
pub struct FakeRunner {
    report: ExitReport,
    commands: Rc<RefCell<Vec<(Vec<String>, String)>>>,
}

impl FakeRunner {
    #[must_use]
    pub fn new(report: ExitReport) -> Self {
        Self {
            report,
            commands: Rc::default(),
        }
    }

    #[must_use]
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands
            .borrow()
            .iter()
            .map(|(argv, _)| argv.clone())
            .collect()
    }

    /// The directory each command ran in.
    #[must_use]
    pub fn dirs(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .map(|(_, dir)| dir.clone())
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&mut self, argv: &[String], dir: &str) -> std::io::Result<ExitReport> {
        self.commands
            .borrow_mut()
            .push((argv.to_vec(), dir.to_string()));
        Ok(self.report)
    }
}
