// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs::{self, Metadata},
          io::ErrorKind,
          os::unix::fs::{FileTypeExt, MetadataExt},
          path::Path};

use strum_macros::Display;

const S_IXUGO: u32 = 0o111;
const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;

/// What a directory entry is, as far as the panel cares. A symbolic link has the
/// type of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FileType {
    PlainFile,
    PlainExec,
    /// Set-user-id, owned by somebody else than root.
    PlainSuid,
    PlainSuidRoot,
    PlainSgid,
    Directory,
    /// A directory on another device than the listed directory.
    MountPoint,
    BlockDev,
    CharDev,
    Fifo,
    Socket,
    Other,
    /// The entry exists but can't be examined.
    Na,
}

impl FileType {
    fn from_metadata(meta: &Metadata) -> Self {
        let file_type = meta.file_type();
        let mode = meta.mode();
        if file_type.is_file() {
            if mode & S_IXUGO == 0 {
                FileType::PlainFile
            } else if mode & S_ISUID != 0 {
                if meta.uid() == 0 {
                    FileType::PlainSuidRoot
                } else {
                    FileType::PlainSuid
                }
            } else if mode & S_ISGID != 0 {
                FileType::PlainSgid
            } else {
                FileType::PlainExec
            }
        } else if file_type.is_dir() {
            FileType::Directory
        } else if file_type.is_block_device() {
            FileType::BlockDev
        } else if file_type.is_char_device() {
            FileType::CharDev
        } else if file_type.is_fifo() {
            FileType::Fifo
        } else if file_type.is_socket() {
            FileType::Socket
        } else {
            FileType::Other
        }
    }

    /// The 4 column `$t` field.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            FileType::PlainFile => "    ",
            FileType::PlainExec => "exec",
            FileType::PlainSuid => "suid",
            FileType::PlainSuidRoot => "Suid",
            FileType::PlainSgid => "sgid",
            FileType::Directory => "/DIR",
            FileType::MountPoint => "/MNT",
            FileType::BlockDev => "Bdev",
            FileType::CharDev => "Cdev",
            FileType::Fifo => "FIFO",
            FileType::Socket => "sock",
            FileType::Other => "spec",
            FileType::Na => "  ??",
        }
    }

    #[must_use]
    pub fn is_dir(self) -> bool { matches!(self, FileType::Directory | FileType::MountPoint) }

    #[must_use]
    pub fn is_plain(self) -> bool {
        matches!(
            self,
            FileType::PlainFile
                | FileType::PlainExec
                | FileType::PlainSuid
                | FileType::PlainSuidRoot
                | FileType::PlainSgid
        )
    }

    #[must_use]
    pub fn is_exec(self) -> bool { self.is_plain() && self != FileType::PlainFile }

    #[must_use]
    pub fn is_dev(self) -> bool { matches!(self, FileType::BlockDev | FileType::CharDev) }

    /// The type of `path` and whether it is a symbolic link. A dangling link is
    /// [`FileType::Na`]; `None` when nothing is there.
    #[must_use]
    pub fn of_path(path: &Path) -> Option<(Self, bool)> {
        let meta = fs::symlink_metadata(path).ok()?;
        if meta.file_type().is_symlink() {
            let target = fs::metadata(path).map_or(FileType::Na, |it| Self::from_metadata(&it));
            return Some((target, true));
        }
        Some((Self::from_metadata(&meta), false))
    }
}

/// The `.` and `..` entries get special treatment: they sort first and can't be
/// selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotName {
    None,
    Dot,
    DotDot,
    Hidden,
}

impl DotName {
    #[must_use]
    pub fn of(name: &str) -> Self {
        match name {
            "." => DotName::Dot,
            ".." => DotName::DotDot,
            _ if name.starts_with('.') => DotName::Hidden,
            _ => DotName::None,
        }
    }

    #[must_use]
    pub fn is_dotdir(self) -> bool { matches!(self, DotName::Dot | DotName::DotDot) }
}

/// Permission bits of a file and a directory nobody changed after creating them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalModes {
    pub file: u32,
    pub dir: u32,
}

impl NormalModes {
    #[must_use]
    pub fn from_umask(umask: u32) -> Self {
        Self {
            file: 0o666 & !umask,
            dir: 0o777 & !umask,
        }
    }

    /// Query the process umask. Setting it is the only way to read it, so it is put
    /// back right away.
    #[must_use]
    pub fn current() -> Self {
        use rustix::{fs::Mode, process::umask};
        let old = umask(Mode::empty());
        umask(old);
        Self::from_umask(old.bits())
    }
}

/// One line of a file panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub dot: DotName,
    pub file_type: FileType,
    pub symlink: bool,
    /// Target of a symbolic link as stored in the link.
    pub link: Option<String>,
    /// The permission bits are the usual ones for this kind of file.
    pub normal_mode: bool,
    /// The lower 12 bits of `st_mode`.
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    /// Device number of a device file.
    pub devnum: u64,
    pub dev: u64,
    pub ino: u64,
    pub mtime: i64,
    pub atime: i64,
    pub ctime: i64,
    pub select: bool,
    /// Matches the panel filter.
    pub fmatch: bool,
}

impl FileEntry {
    /// An entry that exists but couldn't be examined.
    #[must_use]
    pub fn without_info(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dot: DotName::of(name),
            file_type: FileType::Na,
            symlink: false,
            link: None,
            normal_mode: true,
            mode: 0,
            nlink: 0,
            uid: 0,
            gid: 0,
            size: 0,
            devnum: 0,
            dev: 0,
            ino: 0,
            mtime: 0,
            atime: 0,
            ctime: 0,
            select: false,
            fmatch: true,
        }
    }

    /// Examine `dir/name`. `None` when the file disappeared in the meantime.
    /// `dir_dev` is the device of the listed directory, used to spot mount points.
    #[must_use]
    pub fn describe(dir: &Path, name: &str, dir_dev: u64, normal: NormalModes) -> Option<Self> {
        let path = dir.join(name);
        let mut entry = FileEntry::without_info(name);

        let mut meta = match fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(error) if error.kind() == ErrorKind::NotFound => return None,
            Err(_) => return Some(entry),
        };

        if meta.file_type().is_symlink() {
            entry.symlink = true;
            entry.link = Some(
                fs::read_link(&path)
                    .map_or_else(|_| "??".to_string(), |it| it.to_string_lossy().into_owned()),
            );
            match fs::metadata(&path) {
                Ok(target) => meta = target,
                Err(_) => return Some(entry),
            }
        }

        entry.fill_in(&meta, dir_dev, normal);
        Some(entry)
    }

    fn fill_in(&mut self, meta: &Metadata, dir_dev: u64, normal: NormalModes) {
        self.file_type = FileType::from_metadata(meta);
        if self.file_type.is_dev() {
            self.devnum = meta.rdev();
        }
        if self.file_type == FileType::Directory
            && !self.symlink
            && !self.dot.is_dotdir()
            && meta.dev() != dir_dev
        {
            self.file_type = FileType::MountPoint;
        }

        self.mode = meta.mode() & 0o7777;
        self.normal_mode = if meta.file_type().is_file() {
            self.mode == normal.file || self.mode == normal.dir
        } else if meta.file_type().is_dir() {
            self.mode == normal.dir
        } else {
            self.mode == normal.file
        };
        self.nlink = meta.nlink();
        self.uid = meta.uid();
        self.gid = meta.gid();
        self.size = meta.size();
        self.dev = meta.dev();
        self.ino = meta.ino();
        self.mtime = meta.mtime();
        self.atime = meta.atime();
        self.ctime = meta.ctime();
    }

    /// `"ext"` of `"file.ext"`. A leading dot doesn't start an extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        let mut chars = self.name.char_indices();
        if chars.next().is_none() {
            return "";
        }
        chars
            .filter(|(_, ch)| *ch == '.')
            .last()
            .map_or("", |(index, _)| &self.name[index + 1..])
    }

    /// The `L` flag: a plain file with more than one hard link.
    #[must_use]
    pub fn hard_linked(&self) -> bool { self.nlink > 1 && !self.file_type.is_dir() }

    /// Change into this entry makes sense.
    #[must_use]
    pub fn is_dir(&self) -> bool { self.file_type.is_dir() }
}
