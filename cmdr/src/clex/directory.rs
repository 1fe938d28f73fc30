// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Recently visited directories.
//!
//! [`DirList`] remembers every directory the file panels showed, most recent first,
//! together with the cursor position in it, so coming back to a directory puts the
//! cursor where it was. The directory panel is built from this list on demand.

use std::cmp::Ordering;

use super::{FilePanel, Panel,
            menus::{DIR_EXTRA, DIR_SPLIT_EXTRA},
            name_match::substring};

pub const DIR_LIST_MAX: usize = 384;
/// The most recent directories are never merged into their subdirectories.
const NO_COMPACT: usize = 5;
/// Row limit when the panel size follows the screen.
const AUTO_PANEL_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SavedDir {
    dir: String,
    /// File under the cursor.
    file: String,
    curs: i32,
    top: i32,
}

#[derive(Debug, Clone, Default)]
pub struct DirList {
    dirs: Vec<SavedDir>,
}

impl DirList {
    #[must_use]
    pub fn len(&self) -> usize { self.dirs.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.dirs.is_empty() }

    /// Most recent first.
    pub fn names(&self) -> impl Iterator<Item = &str> { self.dirs.iter().map(|it| it.dir.as_str()) }

    /// The directory visited before the current one (or the current one when there
    /// is no other).
    #[must_use]
    pub fn previous(&self) -> Option<&str> {
        self.dirs
            .get(usize::from(self.dirs.len() >= 2))
            .map(|it| it.dir.as_str())
    }

    /// Remember the panel's directory and cursor position, moving it to the front.
    pub fn save(&mut self, panel: &FilePanel) {
        let old = self
            .dirs
            .iter()
            .position(|it| it.dir == panel.dir)
            .map(|index| self.dirs.remove(index));
        let saved = match (panel.current(), old) {
            (Some(entry), _) => SavedDir {
                dir: panel.dir.clone(),
                file: entry.name.clone(),
                curs: panel.pd.curs,
                top: panel.pd.top,
            },
            (None, Some(old)) => old,
            (None, None) => SavedDir {
                dir: panel.dir.clone(),
                file: "..".to_string(),
                curs: 0,
                top: 0,
            },
        };
        self.dirs.insert(0, saved);
        self.dirs.truncate(DIR_LIST_MAX);
    }

    /// Put the panel's cursor where it was the last time its directory was shown, or
    /// on `..` in a new directory.
    pub fn restore(&self, panel: &mut FilePanel, panlines: i32) {
        if panel.pd.cnt > 0 {
            match self.dirs.iter().find(|it| it.dir == panel.dir) {
                Some(saved) => {
                    panel.pd.curs = panel
                        .find(&saved.file)
                        .and_then(|row| i32::try_from(row).ok())
                        .unwrap_or(saved.curs);
                    panel.pd.top = saved.top;
                }
                None => {
                    panel.pd.curs = panel
                        .find("..")
                        .and_then(|row| i32::try_from(row).ok())
                        .unwrap_or(0);
                    panel.pd.top = panel.pd.min;
                }
            }
        }
        panel.pd.adjust(panlines);
    }
}

/// Length of the common part of two absolute directory names, measured to the last
/// shared `/` unless one name is a whole prefix of the other.
fn common_part(dir1: &str, dir2: &str) -> usize {
    let (a, b) = (dir1.as_bytes(), dir2.as_bytes());
    let mut slash = 0;
    for i in 0.. {
        match (a.get(i), b.get(i)) {
            (None, other) => return if matches!(other, None | Some(b'/')) { i } else { slash },
            (Some(b'/'), None) => return i,
            (Some(_), None) => return slash,
            (Some(ch1), Some(ch2)) if ch1 != ch2 => return slash,
            (Some(ch1), _) => {
                if *ch1 == b'/' {
                    slash = i;
                }
            }
        }
    }
    slash
}

/// `Less` when `dir2` is below `dir1`, `Greater` when `dir1` is below `dir2`.
fn subdir_relation(dir1: &str, dir2: &str) -> Ordering {
    let slash = common_part(dir1, dir2);
    let end1 = slash >= dir1.len();
    let end2 = slash >= dir2.len();
    end2.cmp(&end1)
}

/// Directory order: a parent comes before its subdirectories, siblings are ordered
/// by name.
fn dir_cmp(dir1: &str, dir2: &str) -> Ordering {
    let slash = common_part(dir1, dir2);
    match (slash >= dir1.len(), slash >= dir2.len()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    let component = |dir: &str| {
        dir[slash + 1..]
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string()
    };
    component(dir1).cmp(&component(dir2))
}

/// A directory panel row. Only `name[shlen..]` differs from the row above, so the
/// first `shlen` bytes may be drawn as a placeholder. In the split panel, the row
/// stands for `name[..shlen]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirRow {
    pub name: String,
    pub shlen: usize,
}

/// The row limit for the `D_PANEL_SIZE` and `C_PANEL_SIZE` settings; zero means fit
/// the screen.
#[must_use]
pub fn panel_size_limit(configured: i32, panel_lines: i32, min: i32) -> usize {
    match usize::try_from(configured) {
        Ok(0) | Err(_) => usize::try_from(panel_lines + min - 1)
            .unwrap_or(1)
            .clamp(1, AUTO_PANEL_MAX),
        Ok(size) => size,
    }
}

#[derive(Debug, Clone)]
pub struct DirPanel {
    pub pd: Panel,
    pub rows: Vec<DirRow>,
}

impl Default for DirPanel {
    fn default() -> Self {
        Self {
            pd: Panel::new().with_extra(&DIR_EXTRA).with_sticky_filter(),
            rows: Vec::new(),
        }
    }
}

impl DirPanel {
    /// Build the rows from `list`: at most `max` directories, filtered, with old
    /// subdirectories merged into their parents, in directory order.
    pub fn rebuild(&mut self, list: &DirList, max: usize) {
        let filter = self.pd.filter_text().map(str::to_string);
        let mut names: Vec<&str> = Vec::new();
        for (i, dir) in list.names().enumerate() {
            if names.len() == max {
                break;
            }
            if let Some(filter) = &filter {
                if !substring(dir, filter, false) {
                    continue;
                }
            }
            let mut store = true;
            if i >= NO_COMPACT {
                for (j, shown) in names.iter_mut().enumerate() {
                    match subdir_relation(dir, shown) {
                        Ordering::Less => store = false,
                        Ordering::Greater if j >= NO_COMPACT => {
                            *shown = dir;
                            store = false;
                        }
                        _ => {}
                    }
                }
            }
            if store {
                names.push(dir);
            }
        }
        names.sort_by(|a, b| dir_cmp(a, b));
        names.dedup();

        self.rows = names
            .iter()
            .enumerate()
            .map(|(i, name)| DirRow {
                name: (*name).to_string(),
                shlen: if i == 0 { 0 } else { common_part(name, names[i - 1]) },
            })
            .collect();
        self.pd.set_count(self.rows.len());
    }

    /// Show the whole list with the cursor on the previously visited directory.
    pub fn prepare(&mut self, list: &DirList, max: usize) {
        self.pd.filtering = clex_tui::FilterFocus::Off;
        self.rebuild(list, max);
        self.pd.norev = false;
        self.pd.top = self.pd.min;
        self.pd.curs = 0;
        if let Some(prev) = list.previous() {
            if let Some(row) = self.rows.iter().position(|it| it.name == prev) {
                self.pd.select(row);
            }
        }
    }

    /// Apply a changed filter, keeping the cursor on the same directory or at the
    /// same relative position.
    pub fn filter_update(&mut self, list: &DirList, max: usize) {
        let saved = self
            .selected_dir()
            .map(|name| (name.to_string(), 100 * self.pd.curs / self.pd.cnt.max(1)));
        self.rebuild(list, max);
        let Some((name, percent)) = saved else {
            return;
        };
        match self.rows.iter().position(|it| it.name == name) {
            Some(row) => self.pd.select(row),
            None => self.pd.curs = percent * self.pd.cnt / 100,
        }
    }

    #[must_use]
    pub fn selected_dir(&self) -> Option<&str> {
        self.pd
            .selected()
            .and_then(|row| self.rows.get(row))
            .map(|it| it.name.as_str())
    }
}

/// A directory and each of its parents, deepest first.
#[derive(Debug, Clone)]
pub struct DirSplitPanel {
    pub pd: Panel,
    pub rows: Vec<DirRow>,
}

impl Default for DirSplitPanel {
    fn default() -> Self {
        Self {
            pd: Panel::new().with_extra(&DIR_SPLIT_EXTRA),
            rows: Vec::new(),
        }
    }
}

impl DirSplitPanel {
    pub fn prepare(&mut self, dir: &str) {
        self.rows.clear();
        self.rows.push(DirRow {
            name: dir.to_string(),
            shlen: dir.len(),
        });
        if dir.len() > 1 {
            for (i, _) in dir.match_indices('/').rev() {
                self.rows.push(DirRow {
                    name: dir.to_string(),
                    shlen: i.max(1),
                });
            }
        }
        self.pd.set_count(self.rows.len());
        self.pd.top = self.pd.min;
        self.pd.curs = 0;
        self.pd.norev = false;
    }

    #[must_use]
    pub fn selected_dir(&self) -> Option<&str> {
        self.pd
            .selected()
            .and_then(|row| self.rows.get(row))
            .map(|it| &it.name[..it.shlen])
    }
}

#[cfg(test)]
mod tests {
    use clex_tui::FilterFocus;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn list_of(dirs: &[&str]) -> DirList {
        let mut list = DirList::default();
        for dir in dirs.iter().rev() {
            list.save(&FilePanel::new(*dir));
        }
        list
    }

    #[test_case("/usr/lib", "/usr/local", 4)]
    #[test_case("/usr", "/usr/lib", 4)]
    #[test_case("/usr/lib", "/usr", 4)]
    #[test_case("/usr/li", "/usr/lib", 4)]
    #[test_case("/", "/usr", 0)]
    #[test_case("/tmp", "/tmp", 4)]
    fn test_common_part(a: &str, b: &str, expected: usize) {
        assert_eq!(common_part(a, b), expected);
    }

    #[test]
    fn test_dir_order() {
        let mut dirs = vec!["/usr/local", "/", "/usr", "/home/x", "/usr/lib"];
        dirs.sort_by(|a, b| dir_cmp(a, b));
        assert_eq!(dirs, vec!["/", "/home/x", "/usr", "/usr/lib", "/usr/local"]);
    }

    #[test]
    fn test_save_moves_to_front_without_duplicates() {
        let mut list = list_of(&["/a", "/b", "/c"]);
        list.save(&FilePanel::new("/c"));
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["/c", "/a", "/b"]);
        assert_eq!(list.previous(), Some("/a"));
    }

    #[test]
    fn test_panel_rows_share_prefix() {
        let list = list_of(&["/usr/lib", "/usr/local", "/"]);
        let mut panel = DirPanel::default();
        panel.prepare(&list, 20);
        let rows: Vec<(&str, usize)> = panel
            .rows
            .iter()
            .map(|it| (it.name.as_str(), it.shlen))
            .collect();
        assert_eq!(rows, vec![("/", 0), ("/usr/lib", 0), ("/usr/local", 4)]);
        // The cursor goes to the directory visited before the current one.
        assert_eq!(panel.selected_dir(), Some("/usr/local"));
    }

    #[test]
    fn test_old_subdirectories_are_merged() {
        let list = list_of(&["/1", "/2", "/3", "/4", "/5", "/x", "/x/y"]);
        let mut panel = DirPanel::default();
        panel.rebuild(&list, 20);
        let names: Vec<&str> = panel.rows.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, vec!["/1", "/2", "/3", "/4", "/5", "/x/y"]);
    }

    #[test]
    fn test_filter_keeps_cursor_dir() {
        let list = list_of(&["/srv/a", "/srv/b", "/opt"]);
        let mut panel = DirPanel::default();
        panel.prepare(&list, 20);
        panel.pd.select(2);
        assert_eq!(panel.selected_dir(), Some("/srv/b"));
        panel.pd.filtering = FilterFocus::Filter;
        for ch in "srv".chars() {
            panel.pd.filter.as_mut().unwrap().insert_char(ch);
        }
        panel.filter_update(&list, 20);
        assert_eq!(panel.rows.len(), 2);
        assert_eq!(panel.selected_dir(), Some("/srv/b"));
    }

    #[test]
    fn test_split_rows() {
        let mut panel = DirSplitPanel::default();
        panel.prepare("/usr/local/bin");
        let mut dirs = Vec::new();
        for row in 0..panel.rows.len() {
            panel.pd.select(row);
            dirs.push(panel.selected_dir().unwrap().to_string());
        }
        assert_eq!(dirs, vec!["/usr/local/bin", "/usr/local", "/usr", "/"]);
        panel.prepare("/");
        assert_eq!(panel.rows.len(), 1);
    }

    #[test]
    fn test_auto_panel_size() {
        assert_eq!(panel_size_limit(0, 18, -2), 15);
        assert_eq!(panel_size_limit(12, 18, -2), 12);
    }
}
