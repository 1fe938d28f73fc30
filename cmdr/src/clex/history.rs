// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clex_tui::{FilterFocus, LineBuffer, Quoting};

use super::{Panel, menus::LEAVE, name_match::substring, ui_str};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistEntry {
    pub cmd: String,
    /// The last execution of the command failed.
    pub failed: bool,
}

/// Executed commands, most recent first, without duplicates.
///
/// ctrl-P and ctrl-N walk the list; the command line typed before the walk started
/// is kept aside and comes back when the walk returns past the most recent entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistEntry>,
    capacity: usize,
    /// Entry shown by the last ctrl-P / ctrl-N, `None` before the walk.
    pn_index: Option<usize>,
    saved_line: String,
}

impl History {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            pn_index: None,
            saved_line: String::new(),
        }
    }

    /// A new size forgets the whole history.
    pub fn reconfig(&mut self, capacity: usize) { *self = Self::new(capacity); }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistEntry> { self.entries.get(index) }

    pub fn entries(&self) -> impl Iterator<Item = &HistEntry> { self.entries.iter() }

    #[must_use]
    pub fn walk_index(&self) -> Option<usize> { self.pn_index }

    pub fn reset_walk(&mut self) { self.pn_index = None; }

    /// Record an executed command at the top.
    pub fn save(&mut self, cmd: &str, failed: bool) {
        self.reset_walk();
        if let Some(index) = self.entries.iter().position(|it| it.cmd == cmd) {
            self.entries.remove(index);
        }
        self.entries.insert(0, HistEntry {
            cmd: cmd.to_string(),
            failed,
        });
        self.entries.truncate(self.capacity);
    }

    /// ctrl-N: the next more recent command. Returns the remark to show, if any.
    pub fn next(&mut self, line: &mut LineBuffer) -> Option<&'static str> {
        match self.pn_index {
            None => Some(ui_str::HIST_TOP),
            Some(0) => {
                self.pn_index = None;
                line.put_str(&self.saved_line);
                None
            }
            Some(index) => {
                self.pn_index = Some(index - 1);
                self.recall(index - 1, line)
            }
        }
    }

    /// ctrl-P: the next older command. Returns the remark to show, if any.
    pub fn prev(&mut self, line: &mut LineBuffer) -> Option<&'static str> {
        let index = self.pn_index.map_or(0, |it| it + 1);
        if index >= self.entries.len() {
            return Some(ui_str::HIST_BOTTOM);
        }
        if self.pn_index.is_none() {
            self.saved_line = line.text().to_string();
        }
        self.pn_index = Some(index);
        self.recall(index, line)
    }

    fn recall(&self, index: usize, line: &mut LineBuffer) -> Option<&'static str> {
        let entry = self.entries.get(index)?;
        line.put_str(&entry.cmd);
        entry.failed.then_some(ui_str::HIST_FAILED)
    }

    /// Forget the entry at `index`, keeping the ctrl-P / ctrl-N walk consistent.
    pub fn remove(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        self.entries.remove(index);
        match self.pn_index {
            Some(walk) if walk > index => self.pn_index = Some(walk - 1),
            Some(walk) if walk == index => self.reset_walk(),
            _ => {}
        }
    }
}

/// The history panel; rows are indexes into the [`History`].
#[derive(Debug, Clone)]
pub struct HistPanel {
    pub pd: Panel,
    pub rows: Vec<usize>,
}

impl Default for HistPanel {
    fn default() -> Self {
        Self {
            pd: Panel::new().with_extra(&LEAVE).with_filter(),
            rows: Vec::new(),
        }
    }
}

impl HistPanel {
    #[must_use]
    pub fn entry<'a>(&self, history: &'a History, row: usize) -> Option<&'a HistEntry> {
        self.rows.get(row).and_then(|index| history.get(*index))
    }

    #[must_use]
    pub fn current<'a>(&self, history: &'a History) -> Option<&'a HistEntry> {
        self.pd.selected().and_then(|row| self.entry(history, row))
    }

    /// Build the rows, filtered by substring; the cursor stays on the same command.
    pub fn rebuild(&mut self, history: &History) {
        let cursor_cmd = self.current(history).map(|it| it.cmd.clone());
        if cursor_cmd.is_none() {
            self.pd.curs = 0;
        }
        let filter = self.pd.filter_text().map(str::to_string);
        self.rows.clear();
        for (index, entry) in history.entries().enumerate() {
            if cursor_cmd.as_deref() == Some(entry.cmd.as_str()) {
                self.pd.select(self.rows.len());
            }
            if let Some(filter) = &filter {
                if !substring(&entry.cmd, filter, false) {
                    continue;
                }
            }
            self.rows.push(index);
        }
        self.pd.set_count(self.rows.len());
    }

    pub fn prepare(&mut self, history: &History) {
        self.pd.filtering = FilterFocus::Off;
        self.rebuild(history);
        self.pd.top = self.pd.min;
        self.pd.curs = history
            .walk_index()
            .and_then(|it| i32::try_from(it).ok())
            .unwrap_or(0);
    }

    /// Insert the command under the cursor into `line`, unquoted.
    pub fn paste(&self, history: &History, line: &mut LineBuffer) {
        if let Some(entry) = self.current(history) {
            line.insert_str(&entry.cmd, Quoting::Literal);
        }
    }

    pub fn delete(&mut self, history: &mut History, panel_lines: i32) {
        let Some(index) = self.pd.selected().and_then(|row| self.rows.get(row).copied()) else {
            return;
        };
        history.remove(index);
        // The cursor entry is gone; keep the row.
        let row = self.pd.curs;
        self.pd.curs = -1;
        self.rebuild(history);
        self.pd.curs = row.min(self.pd.cnt - 1);
        self.pd.adjust(panel_lines);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn history(cmds: &[&str]) -> History {
        let mut it = History::new(4);
        for cmd in cmds {
            it.save(cmd, *cmd == "false");
        }
        it
    }

    fn cmds(history: &History) -> Vec<&str> { history.entries().map(|it| it.cmd.as_str()).collect() }

    #[test]
    fn test_save_is_mru_without_duplicates() {
        let mut it = history(&["ls", "make", "ls"]);
        assert_eq!(cmds(&it), vec!["ls", "make"]);
        for cmd in ["a", "b", "c"] {
            it.save(cmd, false);
        }
        assert_eq!(cmds(&it), vec!["c", "b", "a", "ls"]);
    }

    #[test]
    fn test_walk_restores_typed_line() {
        let mut it = history(&["false", "make"]);
        let mut line = LineBuffer::new("$ ");
        line.put_str("typed");

        assert_eq!(it.next(&mut line), Some(ui_str::HIST_TOP));
        assert_eq!(it.prev(&mut line), None);
        assert_eq!(line.text(), "make");
        assert_eq!(it.prev(&mut line), Some(ui_str::HIST_FAILED));
        assert_eq!(line.text(), "false");
        assert_eq!(it.prev(&mut line), Some(ui_str::HIST_BOTTOM));

        assert_eq!(it.next(&mut line), None);
        assert_eq!(it.next(&mut line), None);
        assert_eq!(line.text(), "typed");
        assert_eq!(it.walk_index(), None);
    }

    #[test]
    fn test_remove_adjusts_walk() {
        let mut it = history(&["a", "b", "c"]);
        let mut line = LineBuffer::new("");
        it.prev(&mut line);
        it.prev(&mut line);
        assert_eq!(it.walk_index(), Some(1));
        it.remove(0);
        assert_eq!(it.walk_index(), Some(0));
        it.remove(0);
        assert_eq!(it.walk_index(), None);
    }

    #[test]
    fn test_panel_filter_and_delete() {
        let mut it = history(&["cc -o x", "ls", "cc -c y"]);
        let mut panel = HistPanel::default();
        panel.prepare(&it);
        assert_eq!(panel.pd.cnt, 3);

        panel.pd.filtering = FilterFocus::Filter;
        for ch in "cc".chars() {
            panel.pd.filter.as_mut().unwrap().insert_char(ch);
        }
        panel.rebuild(&it);
        assert_eq!(panel.pd.cnt, 2);

        panel.pd.select(1);
        panel.delete(&mut it, 10);
        assert_eq!(cmds(&it), vec!["cc -c y", "ls"]);
        assert_eq!(panel.pd.curs, 0);

        let mut line = LineBuffer::new("");
        panel.paste(&it, &mut line);
        assert_eq!(line.text(), "cc -c y");
    }
}
