// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Selecting files by pattern and comparing the two file panels.

use std::{fs::File,
          io::{self, Read},
          os::unix::fs::MetadataExt,
          path::Path};

use super::{FileEntry, FilePanel, SelectOp};
use crate::clex::NamePattern;

/// Warnings about unreadable files are shown for this many files, then summed up.
pub const MAX_READ_WARNINGS: usize = 3;
const CHUNK_SIZE: usize = 16384;

/// Select or deselect the visible entries matching a shell pattern. `None` when the
/// pattern is incomplete.
pub fn select_matching(panel: &mut FilePanel, expr: &str, op: SelectOp) -> Option<usize> {
    let pattern = NamePattern::new(expr)?;
    Some(panel.select_with(op, |it| pattern.matches(&it.name)))
}

/// Level of detail of a panel compare. Every level includes the name and the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompareLevel(pub u8);

impl CompareLevel {
    /// Size of plain files and numbers of devices.
    fn size(self) -> bool { self.0 >= 1 }

    /// A symbolic link never matches a real file.
    fn exact(self) -> bool { self.0 >= 2 }

    fn ownership(self) -> bool { self.0 == 3 || self.0 >= 5 }

    fn contents(self) -> bool { self.0 >= 4 }
}

fn same_kind(a: &FileEntry, b: &FileEntry) -> bool {
    (a.file_type.is_plain() && b.file_type.is_plain())
        || (a.is_dir() && b.is_dir())
        || (a.file_type == b.file_type && a.file_type != super::FileType::Na)
}

/// True when both plain files have the same contents.
fn same_contents(a: &Path, b: &Path) -> io::Result<bool> {
    let (mut first, mut second) = (File::open(a)?, File::open(b)?);
    let (meta1, meta2) = (first.metadata()?, second.metadata()?);
    if !meta1.is_file() || !meta2.is_file() {
        return Err(io::Error::from(io::ErrorKind::InvalidInput));
    }
    if meta1.dev() == meta2.dev() && meta1.ino() == meta2.ino() {
        return Ok(true);
    }
    if meta1.len() != meta2.len() {
        return Ok(false);
    }
    let mut buf1 = vec![0; CHUNK_SIZE];
    let mut buf2 = vec![0; CHUNK_SIZE];
    let mut left = meta1.len();
    while left > 0 {
        let chunk = usize::try_from(left).map_or(CHUNK_SIZE, |it| it.min(CHUNK_SIZE));
        first.read_exact(&mut buf1[..chunk])?;
        second.read_exact(&mut buf2[..chunk])?;
        if buf1[..chunk] != buf2[..chunk] {
            return Ok(false);
        }
        left -= chunk as u64;
    }
    Ok(true)
}

/// What a compare found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareReport {
    /// Names of plain files that couldn't be read.
    pub unreadable: Vec<String>,
}

impl CompareReport {
    /// The warnings to show.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .unreadable
            .iter()
            .take(MAX_READ_WARNINGS)
            .map(|name| format!("COMPARE: Cannot read file '{name}'."))
            .collect();
        if self.unreadable.len() > MAX_READ_WARNINGS {
            out.push(format!(
                "COMPARE: {} files could not be read.",
                self.unreadable.len()
            ));
        }
        out
    }
}

/// Select every entry of both panels, then deselect each pair of entries with the
/// same name that match at `level`. What remains selected is the difference.
pub fn compare_panels(first: &mut FilePanel, second: &mut FilePanel, level: CompareLevel) -> CompareReport {
    let mut report = CompareReport::default();
    first.select_with(SelectOp::Select, |_| true);
    second.select_with(SelectOp::Select, |_| true);

    let mut pairs = Vec::new();
    for (row2, entry2) in second.visible_entries().enumerate() {
        let Some(row1) = first.find(&entry2.name) else {
            continue;
        };
        let Some(entry1) = first.at(row1) else {
            continue;
        };
        if !same_kind(entry1, entry2) {
            continue;
        }
        if level.size()
            && ((entry1.file_type.is_dev() && entry1.devnum != entry2.devnum)
                || (entry1.file_type.is_plain() && entry1.size != entry2.size))
        {
            continue;
        }
        if level.exact() && entry1.symlink != entry2.symlink {
            continue;
        }
        if level.ownership()
            && (entry1.uid != entry2.uid || entry1.gid != entry2.gid || entry1.mode != entry2.mode)
        {
            continue;
        }
        if level.contents() && entry1.file_type.is_plain() {
            let path1 = Path::new(&first.dir).join(&entry1.name);
            let path2 = Path::new(&second.dir).join(&entry2.name);
            match same_contents(&path1, &path2) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => {
                    report.unreadable.push(entry2.name.clone());
                    continue;
                }
            }
        }
        pairs.push((row1, row2));
    }

    for (row1, row2) in pairs {
        first.select_row(row1, SelectOp::Deselect);
        second.select_row(row2, SelectOp::Deselect);
    }
    tracing::debug!(
        message = "panels compared",
        level = level.0,
        different = first.selected_count() + second.selected_count()
    );
    report
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clex_tui::try_create_temp_dir;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clex::{Grouping, ListContext, NormalModes, SortOrder};

    fn ctx() -> ListContext {
        ListContext {
            order: SortOrder::Name,
            grouping: Grouping::ByKind,
            hide_dotfiles: false,
            normal: NormalModes::from_umask(0o022),
        }
    }

    fn panel_with(dir: &Path, files: &[(&str, &str)]) -> FilePanel {
        for (name, text) in files {
            fs::write(dir.join(name), text).unwrap();
        }
        let mut panel = FilePanel::new(dir.to_string_lossy());
        panel.read(&ctx()).unwrap();
        panel
    }

    #[test]
    fn test_select_matching() {
        let temp = try_create_temp_dir().unwrap();
        let mut panel = panel_with(temp.path(), &[("a.c", ""), ("b.c", ""), ("c.h", "")]);
        assert_eq!(select_matching(&mut panel, "*.c", SelectOp::Select), Some(2));
        assert_eq!(select_matching(&mut panel, "a*", SelectOp::Deselect), Some(1));
        assert_eq!(panel.selected_names(), vec!["b.c"]);
        assert_eq!(select_matching(&mut panel, "[a", SelectOp::Select), None);
        // `.` and `..` match `.*` but are never selected.
        assert_eq!(select_matching(&mut panel, ".*", SelectOp::Select), Some(0));
    }

    #[test]
    fn test_compare_levels() {
        let left = try_create_temp_dir().unwrap();
        let right = try_create_temp_dir().unwrap();
        let files1 = [("same", "abc"), ("size", "abc"), ("text", "abc"), ("only1", "")];
        let files2 = [("same", "abc"), ("size", "abcd"), ("text", "xyz"), ("only2", "")];

        let mut first = panel_with(left.path(), &files1);
        let mut second = panel_with(right.path(), &files2);
        compare_panels(&mut first, &mut second, CompareLevel(0));
        assert_eq!(first.selected_names(), vec!["only1"]);
        assert_eq!(second.selected_names(), vec!["only2"]);

        compare_panels(&mut first, &mut second, CompareLevel(1));
        assert_eq!(first.selected_names(), vec!["only1", "size"]);

        let report = compare_panels(&mut first, &mut second, CompareLevel(4));
        assert_eq!(first.selected_names(), vec!["only1", "size", "text"]);
        assert_eq!(second.selected_names(), vec!["only2", "size", "text"]);
        assert!(report.unreadable.is_empty());
    }

    #[test]
    fn test_many_unreadable_files_are_summed_up() {
        let report = CompareReport {
            unreadable: ["a", "b", "c", "d"].map(String::from).to_vec(),
        };
        let warnings = report.warnings();
        assert_eq!(warnings.len(), 4);
        assert_eq!(warnings[0], "COMPARE: Cannot read file 'a'.");
        assert_eq!(warnings[3], "COMPARE: 4 files could not be read.");
    }
}
