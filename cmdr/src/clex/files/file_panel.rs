// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! One of the two file panels: the listing of a directory, its selection marks and
//! its filter.
//!
//! `entries` always holds the whole listing in sorted order. While a filter is
//! applied, `visible` holds the indexes of the matching entries and the panel shows
//! only those; otherwise it holds every index. Selected entries hidden by the filter
//! keep their mark and are back in the count when the filter goes away.

use std::{fs, os::unix::fs::MetadataExt, path::Path};

use super::{DotName, FileEntry, Grouping, NormalModes, SortOrder, compare_entries};
use crate::clex::{NameFilter, Panel, ui_str};

/// What listing a directory depends on besides the directory itself.
#[derive(Debug, Clone, Copy)]
pub struct ListContext {
    pub order: SortOrder,
    pub grouping: Grouping,
    pub hide_dotfiles: bool,
    pub normal: NormalModes,
}

/// How [`FilePanel::select_with`] treats each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOp {
    Select,
    Deselect,
    Toggle,
}

#[derive(Debug, Clone)]
pub struct FilePanel {
    pub pd: Panel,
    /// Absolute path of the listed directory.
    pub dir: String,
    pub entries: Vec<FileEntry>,
    pub visible: Vec<usize>,
    /// The listing must be read again before it is shown.
    pub expired: bool,
    /// The filter expression is a pattern (drawn with a different label).
    pub filter_is_pattern: bool,
}

impl FilePanel {
    #[must_use]
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            pd: Panel::new().with_filter(),
            dir: dir.into(),
            entries: Vec::new(),
            visible: Vec::new(),
            expired: true,
            filter_is_pattern: false,
        }
    }

    /// The visible entry at panel row `row`.
    #[must_use]
    pub fn at(&self, row: usize) -> Option<&FileEntry> {
        self.visible.get(row).and_then(|index| self.entries.get(*index))
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&FileEntry> { self.pd.selected().and_then(|row| self.at(row)) }

    /// Panel row of the visible entry called `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.visible
            .iter()
            .position(|index| self.entries[*index].name == name)
    }

    /// Visible entries, in panel order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.visible.iter().map(|index| &self.entries[*index])
    }

    /// Selected entries among the visible ones.
    #[must_use]
    pub fn selected_count(&self) -> usize { self.visible_entries().filter(|it| it.select).count() }

    /// Names of the visible selected entries, in panel order.
    #[must_use]
    pub fn selected_names(&self) -> Vec<&str> {
        self.visible_entries()
            .filter(|it| it.select)
            .map(|it| it.name.as_str())
            .collect()
    }

    // Reading.

    /// Read the directory again. Selection marks of entries that still exist are
    /// kept; an applied filter is applied to the new listing.
    pub fn read(&mut self, ctx: &ListContext) -> Result<(), std::io::Error> {
        let result = self.read_entries(ctx);
        if result.is_err() {
            self.entries.clear();
        }
        self.resort(ctx.order, ctx.grouping);
        self.expired = false;
        result
    }

    fn read_entries(&mut self, ctx: &ListContext) -> Result<(), std::io::Error> {
        let dir = Path::new(&self.dir);
        let dir_dev = fs::metadata(dir)?.dev();
        let reader = fs::read_dir(dir)?;

        let selected: Vec<String> = self
            .entries
            .iter()
            .filter(|it| it.select)
            .map(|it| it.name.clone())
            .collect();

        let names = [".".to_string(), "..".to_string()].into_iter().chain(
            reader
                .filter_map(Result::ok)
                .map(|it| it.file_name().to_string_lossy().into_owned()),
        );

        let mut entries = Vec::new();
        for name in names {
            if ctx.hide_dotfiles && DotName::of(&name) == DotName::Hidden {
                continue;
            }
            let Some(mut entry) = FileEntry::describe(dir, &name, dir_dev, ctx.normal) else {
                continue;
            };
            entry.select = !entry.dot.is_dotdir() && selected.contains(&entry.name);
            entries.push(entry);
        }
        tracing::debug!(message = "directory listed", dir = %self.dir, count = entries.len());
        self.entries = entries;
        Ok(())
    }

    /// Sort the whole listing and rebuild the visible part. The cursor stays on the
    /// same entry name when possible.
    pub fn resort(&mut self, order: SortOrder, grouping: Grouping) {
        let cursor_name = self.current().map(|it| it.name.clone());
        self.entries
            .sort_by(|a, b| compare_entries(a, b, order, grouping));
        self.refilter();
        if let Some(name) = cursor_name {
            if let Some(row) = self.find(&name) {
                self.pd.select(row);
            }
        }
    }

    // Filter.

    /// Start filtering with an empty expression.
    pub fn filter_on(&mut self) {
        if let Some(filter) = self.pd.filter.as_mut() {
            filter.clear();
        }
        self.pd.filtering = clex_tui::FilterFocus::Filter;
        self.filter_is_pattern = false;
    }

    pub fn filter_off(&mut self) {
        let cursor_name = self.current().map(|it| it.name.clone());
        self.pd.filtering = clex_tui::FilterFocus::Off;
        self.refilter();
        if let Some(name) = cursor_name {
            if let Some(row) = self.find(&name) {
                self.pd.select(row);
            }
        }
    }

    /// Apply the current filter expression. Returns a remark when the expression is
    /// an incomplete pattern; the panel then keeps its previous content.
    pub fn filter_update(&mut self) -> Option<&'static str> {
        let expr = self.pd.filter_text().unwrap_or_default();
        self.filter_is_pattern = crate::clex::is_pattern(expr);
        if NameFilter::new(expr).is_none() {
            return Some(ui_str::PATTERN_INCOMPLETE);
        }
        let cursor_name = self.current().map(|it| it.name.clone());
        self.refilter();
        if let Some(name) = cursor_name {
            if let Some(row) = self.find(&name) {
                self.pd.select(row);
            }
        }
        None
    }

    /// Rebuild `visible` from the filter expression (all entries when there is none).
    fn refilter(&mut self) {
        let filter = self.pd.filter_text().and_then(NameFilter::new);
        for entry in &mut self.entries {
            entry.fmatch = filter.as_ref().is_none_or(|it| it.matches(&entry.name));
        }
        self.visible = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, it)| it.fmatch)
            .map(|(index, _)| index)
            .collect();
        self.pd.set_count(self.visible.len());
    }

    // Selection.

    /// Change the mark of the visible entry at `row`. The `.` and `..` entries can't
    /// be selected. Returns true when the mark changed.
    pub fn select_row(&mut self, row: usize, op: SelectOp) -> bool {
        let Some(index) = self.visible.get(row).copied() else {
            return false;
        };
        let entry = &mut self.entries[index];
        if entry.dot.is_dotdir() {
            return false;
        }
        let select = match op {
            SelectOp::Select => true,
            SelectOp::Deselect => false,
            SelectOp::Toggle => !entry.select,
        };
        let changed = entry.select != select;
        entry.select = select;
        changed
    }

    /// ctrl-T: toggle the entry under the cursor and move down.
    pub fn toggle_at_cursor(&mut self, panlines: i32) {
        if let Some(row) = self.pd.selected() {
            self.select_row(row, SelectOp::Toggle);
            self.pd
                .move_cursor(clex_tui::PanelMove::Down, panlines);
        }
    }

    /// Apply `op` to every visible entry whose name satisfies `wanted`. Returns the
    /// number of changed marks.
    pub fn select_with(&mut self, op: SelectOp, wanted: impl Fn(&FileEntry) -> bool) -> usize {
        let mut changed = 0;
        for row in 0..self.visible.len() {
            if wanted(&self.entries[self.visible[row]]) && self.select_row(row, op) {
                changed += 1;
            }
        }
        changed
    }

    /// Position label shown in the frame, eg: `< [2] 5/17 >`.
    #[must_use]
    pub fn position_label(&self) -> String {
        if self.pd.cnt == 0 {
            return ui_str::POSITION_NO_DATA.to_string();
        }
        if self.pd.curs < 0 {
            return String::new();
        }
        match self.selected_count() {
            0 => format!("< {}/{} >", self.pd.curs + 1, self.pd.cnt),
            selected => format!("< [{selected}] {}/{} >", self.pd.curs + 1, self.pd.cnt),
        }
    }
}

#[cfg(test)]
mod tests {
    use clex_tui::{FilterFocus, try_create_temp_dir};
    use pretty_assertions::assert_eq;

    use super::*;

    fn ctx() -> ListContext {
        ListContext {
            order: SortOrder::Name,
            grouping: Grouping::ByKind,
            hide_dotfiles: false,
            normal: NormalModes::from_umask(0o022),
        }
    }

    fn names(panel: &FilePanel) -> Vec<&str> {
        panel.visible_entries().map(|it| it.name.as_str()).collect()
    }

    fn filled_panel() -> (clex_tui::TempDir, FilePanel) {
        let temp = try_create_temp_dir().unwrap();
        for name in ["b.txt", "a.rs", ".hidden", "c.rs"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }
        fs::create_dir(temp.path().join("sub")).unwrap();
        let mut panel = FilePanel::new(temp.path().to_string_lossy());
        panel.read(&ctx()).unwrap();
        (temp, panel)
    }

    fn type_filter(panel: &mut FilePanel, text: &str) {
        panel.filter_on();
        for ch in text.chars() {
            panel.pd.filter.as_mut().unwrap().insert_char(ch);
        }
    }

    #[test]
    fn test_read_lists_dot_dirs_first() {
        let (_temp, panel) = filled_panel();
        assert_eq!(names(&panel), vec![
            ".", "..", "sub", ".hidden", "a.rs", "b.txt", "c.rs"
        ]);
        assert!(!panel.expired);
        assert_eq!(panel.pd.cnt, 7);
    }

    #[test]
    fn test_hidden_files() {
        let (_temp, mut panel) = filled_panel();
        let hide = ListContext {
            hide_dotfiles: true,
            ..ctx()
        };
        panel.read(&hide).unwrap();
        assert!(panel.find(".hidden").is_none());
        assert!(panel.find("..").is_some());
    }

    #[test]
    fn test_selection_survives_reread() {
        let (temp, mut panel) = filled_panel();
        let row = panel.find("b.txt").unwrap();
        assert!(panel.select_row(row, SelectOp::Select));
        assert!(!panel.select_row(panel.find("..").unwrap(), SelectOp::Select));
        fs::write(temp.path().join("new"), b"").unwrap();
        panel.read(&ctx()).unwrap();
        assert_eq!(panel.selected_names(), vec!["b.txt"]);
    }

    #[test]
    fn test_unreadable_directory() {
        let mut panel = FilePanel::new("/nonexistent/clex/dir");
        assert!(panel.read(&ctx()).is_err());
        assert_eq!(panel.pd.cnt, 0);
        assert_eq!(panel.position_label(), ui_str::POSITION_NO_DATA);
    }

    #[test]
    fn test_filter_hides_selected_entries_temporarily() {
        let (_temp, mut panel) = filled_panel();
        panel.select_with(SelectOp::Select, |it| it.name.ends_with(".txt"));
        type_filter(&mut panel, ".rs");
        assert_eq!(panel.filter_update(), None);
        assert_eq!(names(&panel), vec!["a.rs", "c.rs"]);
        assert_eq!(panel.selected_count(), 0);

        panel.filter_off();
        assert_eq!(panel.pd.filtering, FilterFocus::Off);
        assert_eq!(panel.selected_count(), 1);
        assert_eq!(panel.pd.cnt, 7);
    }

    #[test]
    fn test_pattern_filter() {
        let (_temp, mut panel) = filled_panel();
        type_filter(&mut panel, "[ab]*");
        assert_eq!(panel.filter_update(), None);
        assert!(panel.filter_is_pattern);
        assert_eq!(names(&panel), vec!["a.rs", "b.txt"]);

        type_filter(&mut panel, "[ab");
        assert_eq!(panel.filter_update(), Some(ui_str::PATTERN_INCOMPLETE));
    }

    #[test]
    fn test_toggle_moves_down_and_label_counts() {
        let (_temp, mut panel) = filled_panel();
        panel.pd.select(panel.find("a.rs").unwrap());
        panel.toggle_at_cursor(10);
        assert_eq!(panel.current().unwrap().name, "b.txt");
        assert_eq!(panel.position_label(), "< [1] 6/7 >");
    }

    #[test]
    fn test_resort_keeps_cursor_entry() {
        let (_temp, mut panel) = filled_panel();
        panel.pd.select(panel.find("c.rs").unwrap());
        panel.resort(SortOrder::ReversedName, Grouping::None);
        assert_eq!(panel.current().unwrap().name, "c.rs");
    }
}
