// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The bookmark list and its file in the config folder.
//!
//! The file holds one absolute directory per line; other lines (comments) are
//! ignored. It is written after every change made in the bookmark list and when the
//! bookmark manager is left, and read again when another process changed it.

use std::{fs::{self, OpenOptions},
          io::{self, Write},
          os::unix::fs::OpenOptionsExt,
          path::{Path, PathBuf},
          time::SystemTime};

use miette::Diagnostic;

use super::{Panel, ui_str};

pub const BM_FILE_SIZE_LIMIT: u64 = 10000;
pub const BM_ENTRIES_LIMIT: usize = 200;
const BM_FILE_HEADER: &str = "#\n# CLEX bookmark file\n#\n";
/// Text of a bookmark just inserted by the manager, before it is edited.
pub const NEW_BOOKMARK: &str = "/";

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum BookmarkError {
    #[error("BOOKMARKS: Cannot open the file {} ({source})", .path.display())]
    #[diagnostic(code(clex::bookmarks::open))]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("BOOKMARKS: File is too big, limit is {BM_FILE_SIZE_LIMIT} bytes")]
    #[diagnostic(
        code(clex::bookmarks::too_big),
        help("the bookmark file should only list directories, one per line")
    )]
    TooBig,

    #[error("BOOKMARKS: Too many lines, limit is {BM_ENTRIES_LIMIT}")]
    #[diagnostic(code(clex::bookmarks::too_many))]
    TooMany,

    #[error("BOOKMARKS: File write error occurred.")]
    #[diagnostic(code(clex::bookmarks::write))]
    Write(#[source] io::Error),

    #[error("BOOKMARKS: The config folder is not available.")]
    #[diagnostic(code(clex::bookmarks::no_folder))]
    NoFolder,
}

/// What happened when the working directory was bookmarked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkAdded {
    /// At this row.
    Added(usize),
    Already(usize),
    Full,
}

#[derive(Debug, Clone, Default)]
pub struct Bookmarks {
    path: Option<PathBuf>,
    pub list: Vec<String>,
    changed: bool,
    modified: Option<SystemTime>,
}

fn mtime(path: &Path) -> Option<SystemTime> { fs::metadata(path).and_then(|it| it.modified()).ok() }

impl Bookmarks {
    /// Bookmarks kept in `path`; without a path nothing is read or saved.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_changed(&self) -> bool { self.changed }

    /// Read the file. A missing file is an empty list. When the file has too many
    /// entries, the first ones are kept and [`BookmarkError::TooMany`] is returned.
    ///
    /// # Errors
    ///
    /// The file can't be read or is too big; the list is not changed then.
    pub fn load(&mut self) -> Result<(), BookmarkError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let modified = mtime(&path);
        let bytes = match fs::metadata(&path) {
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                self.list.clear();
                self.modified = modified;
                return Ok(());
            }
            Err(source) => return Err(BookmarkError::Open { path, source }),
            Ok(meta) if meta.len() > BM_FILE_SIZE_LIMIT => return Err(BookmarkError::TooBig),
            Ok(_) => fs::read(&path).map_err(|source| BookmarkError::Open {
                path: path.clone(),
                source,
            })?,
        };

        let text = String::from_utf8_lossy(&bytes);
        let mut list: Vec<String> = text
            .lines()
            .filter(|it| it.starts_with('/'))
            .map(str::to_string)
            .collect();
        let too_many = list.len() > BM_ENTRIES_LIMIT;
        list.truncate(BM_ENTRIES_LIMIT);
        self.list = list;
        self.modified = modified;
        tracing::debug!(message = "bookmarks loaded", count = self.list.len());
        if too_many {
            return Err(BookmarkError::TooMany);
        }
        Ok(())
    }

    /// Read the file again if another process modified it. Returns true when the
    /// list was replaced.
    ///
    /// # Errors
    ///
    /// See [`Bookmarks::load`].
    pub fn reload_if_changed(&mut self) -> Result<bool, BookmarkError> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        if mtime(path) == self.modified {
            return Ok(false);
        }
        self.load()?;
        Ok(true)
    }

    /// Write the list to the file; the config folder is created when needed.
    ///
    /// # Errors
    ///
    /// The file can't be written.
    pub fn save(&mut self) -> Result<(), BookmarkError> {
        let Some(path) = self.path.clone() else {
            return Err(BookmarkError::NoFolder);
        };
        if let Some(folder) = path.parent() {
            fs::create_dir_all(folder).map_err(|source| BookmarkError::Open {
                path: path.clone(),
                source,
            })?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(&path)
            .map_err(|source| BookmarkError::Open {
                path: path.clone(),
                source,
            })?;
        let mut text = String::from(BM_FILE_HEADER);
        for dir in &self.list {
            text.push_str(dir);
            text.push('\n');
        }
        let result = file.write_all(text.as_bytes()).and_then(|()| file.flush());
        self.modified = mtime(&path);
        result.map_err(BookmarkError::Write)?;
        self.changed = false;
        tracing::debug!(message = "bookmarks saved", count = self.list.len());
        Ok(())
    }

    /// Save only when there are unsaved changes.
    ///
    /// # Errors
    ///
    /// See [`Bookmarks::save`].
    pub fn save_if_changed(&mut self) -> Result<bool, BookmarkError> {
        if !self.changed {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Throw away the changes made in the manager.
    ///
    /// # Errors
    ///
    /// See [`Bookmarks::load`].
    pub fn revert(&mut self) -> Result<&'static str, BookmarkError> {
        if !self.changed {
            return Ok(ui_str::BM_NO_CHANGES);
        }
        self.list.clear();
        self.load()?;
        self.changed = false;
        Ok(ui_str::BM_REVERTED)
    }

    /// Append `dir` unless it is already there. The caller saves the list.
    pub fn add(&mut self, dir: &str) -> BookmarkAdded {
        if let Some(row) = self.list.iter().position(|it| it == dir) {
            return BookmarkAdded::Already(row);
        }
        if self.list.len() >= BM_ENTRIES_LIMIT {
            return BookmarkAdded::Full;
        }
        self.list.push(dir.to_string());
        self.changed = true;
        BookmarkAdded::Added(self.list.len() - 1)
    }

    /// Insert a new bookmark after `row` (or at the top). `None` when the list is full.
    pub fn insert_after(&mut self, row: Option<usize>) -> Option<usize> {
        if self.list.len() >= BM_ENTRIES_LIMIT {
            return None;
        }
        let at = row.map_or(0, |it| (it + 1).min(self.list.len()));
        self.list.insert(at, NEW_BOOKMARK.to_string());
        self.changed = true;
        Some(at)
    }

    pub fn remove(&mut self, row: usize) {
        if row < self.list.len() {
            self.list.remove(row);
            self.changed = true;
        }
    }

    /// Swap the bookmark at `row` with the one above. Returns the new row.
    pub fn move_up(&mut self, row: usize) -> usize {
        if row == 0 || row >= self.list.len() {
            return row;
        }
        self.list.swap(row, row - 1);
        self.changed = true;
        row - 1
    }

    /// Swap the bookmark at `row` with the one below. Returns the new row.
    pub fn move_down(&mut self, row: usize) -> usize {
        if row + 1 >= self.list.len() {
            return row;
        }
        self.list.swap(row, row + 1);
        self.changed = true;
        row + 1
    }

    /// Replace the bookmark at `row` with an edited one.
    ///
    /// # Errors
    ///
    /// The warning to show when `dir` is not an absolute path.
    pub fn replace(&mut self, row: usize, dir: &str) -> Result<(), &'static str> {
        if !dir.starts_with('/') {
            return Err(ui_str::BM_NEEDS_SLASH);
        }
        if let Some(it) = self.list.get_mut(row) {
            *it = dir.to_string();
            self.changed = true;
        }
        Ok(())
    }

    /// Put the list panel in sync; the cursor stays where it was unless it was on an
    /// extra line.
    pub fn list_prepare(&self, pd: &mut Panel) {
        pd.set_count(self.list.len());
        if pd.curs < 0 {
            pd.curs = pd.min;
            pd.top = pd.min;
        }
    }

    pub fn manager_prepare(&self, pd: &mut Panel) {
        pd.set_count(self.list.len());
        pd.curs = pd.min;
        pd.top = pd.min;
    }
}
