// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::cmp::Ordering;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use super::{DotName, FileEntry, FileType};

/// The sort orders offered by the sort panel, in panel order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter)]
pub enum SortOrder {
    #[default]
    Name,
    Extension,
    Size,
    SizeReverse,
    /// Most recently modified first.
    Time,
    TimeReverse,
    /// Compare names from their last character, useful in mail queue directories.
    ReversedName,
}

impl SortOrder {
    #[must_use]
    pub fn at(index: usize) -> Option<Self> { SortOrder::iter().nth(index) }

    #[must_use]
    pub fn index(self) -> usize { self as usize }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            SortOrder::Name => "name",
            SortOrder::Extension => ".extension",
            SortOrder::Size => "size [small -> large]",
            SortOrder::SizeReverse => "size [large -> small]",
            SortOrder::Time => "time of last modification [recent -> old]",
            SortOrder::TimeReverse => "time of last modification [old -> recent]",
            SortOrder::ReversedName => "reversed name (use in sendmail queue directory)",
        }
    }
}

/// The GROUP_FILES setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    None,
    /// Directories, special files, plain files.
    ByKind,
    /// Like `ByKind` with block and character devices in groups of their own, sorted
    /// by device number.
    WithDevices,
}

impl Grouping {
    #[must_use]
    pub fn from_config(value: i32) -> Self {
        match value {
            0 => Grouping::None,
            1 => Grouping::ByKind,
            _ => Grouping::WithDevices,
        }
    }
}

fn group_rank(entry: &FileEntry, grouping: Grouping) -> u8 {
    let file_type = entry.file_type;
    if file_type.is_plain() {
        return 7;
    }
    if file_type.is_dir() {
        return match entry.dot {
            DotName::Dot => 1,
            DotName::DotDot => 2,
            _ => 3,
        };
    }
    if grouping == Grouping::WithDevices {
        match file_type {
            FileType::BlockDev => return 4,
            FileType::CharDev => return 5,
            _ => {}
        }
    }
    6
}

/// Byte wise comparison from the end of both names.
fn reversed_cmp(a: &str, b: &str) -> Ordering { a.bytes().rev().cmp(b.bytes().rev()) }

#[must_use]
pub fn compare_entries(a: &FileEntry, b: &FileEntry, order: SortOrder, grouping: Grouping) -> Ordering {
    if grouping != Grouping::None {
        let (rank_a, rank_b) = (group_rank(a, grouping), group_rank(b, grouping));
        let by_group = rank_a.cmp(&rank_b);
        if by_group != Ordering::Equal {
            return by_group;
        }
        if grouping == Grouping::WithDevices && (rank_a == 4 || rank_a == 5) {
            let by_dev = rustix::fs::major(a.devnum)
                .cmp(&rustix::fs::major(b.devnum))
                .then(rustix::fs::minor(a.devnum).cmp(&rustix::fs::minor(b.devnum)));
            if by_dev != Ordering::Equal {
                return by_dev;
            }
        }
    }

    let by_order = match order {
        SortOrder::ReversedName => return reversed_cmp(&a.name, &b.name),
        SortOrder::Name => Ordering::Equal,
        SortOrder::Extension => a.extension().cmp(b.extension()),
        SortOrder::Size => a.size.cmp(&b.size),
        SortOrder::SizeReverse => b.size.cmp(&a.size),
        SortOrder::Time => b.mtime.cmp(&a.mtime),
        SortOrder::TimeReverse => a.mtime.cmp(&b.mtime),
    };
    by_order.then_with(|| a.name.cmp(&b.name))
}

pub fn sort_files(entries: &mut [FileEntry], order: SortOrder, grouping: Grouping) {
    entries.sort_by(|a, b| compare_entries(a, b, order, grouping));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(name: &str, file_type: FileType, size: u64, mtime: i64) -> FileEntry {
        let mut it = FileEntry::without_info(name);
        it.file_type = file_type;
        it.size = size;
        it.mtime = mtime;
        it
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> { entries.iter().map(|it| it.name.as_str()).collect() }

    fn sample() -> Vec<FileEntry> {
        vec![
            entry("b.txt", FileType::PlainFile, 30, 3),
            entry("..", FileType::Directory, 0, 0),
            entry("a.rs", FileType::PlainExec, 10, 1),
            entry("zdir", FileType::Directory, 0, 9),
            entry("pipe", FileType::Fifo, 0, 5),
            entry("c.md", FileType::PlainFile, 20, 2),
        ]
    }

    #[test]
    fn test_grouped_by_name() {
        let mut files = sample();
        sort_files(&mut files, SortOrder::Name, Grouping::ByKind);
        assert_eq!(names(&files), vec!["..", "zdir", "pipe", "a.rs", "b.txt", "c.md"]);
    }

    #[test]
    fn test_ungrouped_orders() {
        let mut files = sample();
        sort_files(&mut files, SortOrder::SizeReverse, Grouping::None);
        assert_eq!(&names(&files)[..3], &["b.txt", "c.md", "a.rs"]);

        sort_files(&mut files, SortOrder::Time, Grouping::None);
        assert_eq!(names(&files)[0], "zdir");

        sort_files(&mut files, SortOrder::Extension, Grouping::None);
        assert_eq!(&names(&files)[3..], &["c.md", "a.rs", "b.txt"]);
    }

    #[test]
    fn test_reversed_name() {
        let mut files = vec![
            entry("xa1", FileType::PlainFile, 0, 0),
            entry("yb0", FileType::PlainFile, 0, 0),
            entry("a1", FileType::PlainFile, 0, 0),
        ];
        sort_files(&mut files, SortOrder::ReversedName, Grouping::None);
        assert_eq!(names(&files), vec!["yb0", "a1", "xa1"]);
    }

    #[test]
    fn test_devices_sort_by_number() {
        let mut a = entry("sdb", FileType::BlockDev, 0, 0);
        a.devnum = rustix::fs::makedev(8, 16);
        let mut b = entry("sda", FileType::BlockDev, 0, 0);
        b.devnum = rustix::fs::makedev(8, 32);
        let tty = entry("tty", FileType::CharDev, 0, 0);
        let mut files = vec![tty, b, a];
        sort_files(&mut files, SortOrder::Name, Grouping::WithDevices);
        assert_eq!(names(&files), vec!["sdb", "sda", "tty"]);
    }

    #[test]
    fn test_panel_rows() {
        assert_eq!(SortOrder::at(4), Some(SortOrder::Time));
        assert_eq!(SortOrder::at(7), None);
        assert_eq!(SortOrder::ReversedName.index(), 6);
    }
}
