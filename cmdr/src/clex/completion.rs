// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Name completion in the edit lines.
//!
//! The word at the cursor is found with shell rules (separators, redirections,
//! `name=value`, backticks), its kind is decided from its position and first
//! character unless the user asked for a specific kind, and the candidates are
//! collected from the filesystem, `$PATH`, the user database, the environment or the
//! command history. One candidate is inserted right away; with more, their common
//! part is inserted and the rest are offered in the completion panel.

use std::{collections::BTreeSet,
          fs,
          io,
          os::unix::fs::MetadataExt,
          path::Path,
          time::SystemTime};

use clex_tui::{LineBuffer, Quoting};

use super::{FileType, History, Panel, UserData, menus::LEAVE, ui_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplKind {
    /// Decide from the word.
    Auto,
    File,
    Dir,
    /// A command given with a path.
    Cmd,
    /// A command searched in `$PATH`.
    PathCmd,
    User,
    /// `~user`, completed with a trailing slash.
    UserDir,
    Env,
    Hist,
    /// The whole line is a directory name.
    DirPanel,
}

impl ComplKind {
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ComplKind::File => "filename",
            ComplKind::Dir | ComplKind::DirPanel => "directory name",
            ComplKind::Cmd | ComplKind::PathCmd | ComplKind::Hist => "command",
            ComplKind::User | ComplKind::UserDir => "user name",
            ComplKind::Env => "environment variable",
            ComplKind::Auto => "",
        }
    }

    /// Panel heading, eg: `FILENAME COMPLETION`.
    #[must_use]
    pub fn heading(self) -> String {
        format!(
            "{}{}",
            self.description().to_uppercase(),
            ui_str::HEADING_COMPL
        )
    }
}

fn is_sep(ch: char) -> bool { matches!(ch, ' ' | ';' | '&' | '|') }

/// The `=` at `eq` makes the word before it a variable assignment.
fn is_assignment(chars: &[char], eq: usize) -> bool {
    if eq == 0 || chars[eq - 1] == ' ' {
        return false;
    }
    for p in (1..eq).rev() {
        let ch = chars[p];
        if ch == ' ' {
            break;
        }
        if ch != '_' && !ch.is_ascii_alphanumeric() {
            return false;
        }
    }
    true
}

/// The backtick at `bt` opens a command substitution.
fn is_opening_backtick(chars: &[char], bt: usize) -> bool {
    chars[..bt].iter().filter(|it| **it == '`').count() % 2 == 0
}

/// Where the word to complete is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordScan {
    /// No word at the cursor. `first` when a word there would be the command name.
    Empty { first: bool },
    AfterBacktick,
    /// Characters `start..end` of the line.
    Word { start: usize, end: usize, first: bool },
}

/// Find the word at `cursor` (a char index of `text`).
#[must_use]
pub fn scan_word(text: &str, cursor: usize, kind: ComplKind) -> WordScan {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    if matches!(kind, ComplKind::DirPanel | ComplKind::Hist) {
        return if chars.is_empty() {
            WordScan::Empty { first: true }
        } else {
            WordScan::Word {
                start: 0,
                end: chars.len(),
                first: true,
            }
        };
    }

    let mut start = cursor;
    let first = loop {
        if start == 0 {
            break true;
        }
        let ch = chars[start - 1];
        if ch == ' ' {
            let before = chars[..start].iter().rev().find(|it| **it != ' ');
            break before.is_none_or(|it| is_sep(*it));
        }
        if ch == '<' || ch == '>' || (ch == '=' && is_assignment(&chars, start - 1)) {
            break false;
        }
        if is_sep(ch) {
            break true;
        }
        if ch == '`' {
            if !is_opening_backtick(&chars, start - 1) {
                return WordScan::AfterBacktick;
            }
            break true;
        }
        start -= 1;
    };

    let end = chars[cursor..]
        .iter()
        .position(|ch| is_sep(*ch) || *ch == '<' || *ch == '>')
        .map_or(chars.len(), |it| cursor + it);

    if start == end {
        WordScan::Empty { first }
    } else {
        WordScan::Word { start, end, first }
    }
}

/// Remove the backslash quoting.
#[must_use]
pub fn dequote(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quoted = false;
    for ch in text.chars() {
        if quoted || ch != '\\' {
            out.push(ch);
            quoted = false;
        } else {
            quoted = true;
        }
    }
    out
}

/// What to complete and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplRequest {
    pub kind: ComplKind,
    /// The typed part of the name, dequoted.
    pub prefix: String,
    /// Directory to search for files, dequoted; `.` is the working directory.
    pub dir: String,
}

impl ComplRequest {
    /// Decide the kind and split `word` into directory and name. `tilde` performs
    /// `~` expansion of a directory.
    pub fn new(word: &str, kind: ComplKind, first: bool, tilde: impl Fn(&str) -> String) -> Self {
        let slash = word.rfind('/');
        let (mut name, dir) = match slash {
            Some(slash)
                if !matches!(
                    kind,
                    ComplKind::Env | ComplKind::User | ComplKind::UserDir | ComplKind::Hist
                ) =>
            {
                let dir = if word.starts_with('~') {
                    tilde(&word[..slash])
                } else if slash == 0 {
                    "/".to_string()
                } else {
                    word[..slash].to_string()
                };
                (&word[slash + 1..], dir)
            }
            _ => (word, ".".to_string()),
        };

        let resolved = match kind {
            ComplKind::Auto | ComplKind::DirPanel => {
                if slash.is_some() {
                    match kind {
                        ComplKind::DirPanel => ComplKind::Dir,
                        _ if first => ComplKind::Cmd,
                        _ => ComplKind::File,
                    }
                } else if let Some(rest) = word.strip_prefix('~') {
                    name = rest;
                    ComplKind::UserDir
                } else if kind == ComplKind::DirPanel {
                    ComplKind::Dir
                } else if let Some(rest) = word.strip_prefix('$') {
                    name = rest;
                    ComplKind::Env
                } else if first {
                    ComplKind::PathCmd
                } else {
                    ComplKind::File
                }
            }
            ComplKind::Cmd if slash.is_none() => ComplKind::PathCmd,
            ComplKind::User => {
                name = name.strip_prefix('~').unwrap_or(name);
                kind
            }
            ComplKind::Env => {
                name = name.strip_prefix('$').unwrap_or(name);
                kind
            }
            _ => kind,
        };

        Self {
            kind: resolved,
            prefix: dequote(name),
            dir: dequote(&dir),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub is_link: bool,
    pub file_type: Option<FileType>,
    /// Shown in the info line: the directory of a command, a full name, a value.
    pub aux: Option<String>,
}

impl Candidate {
    fn named(name: &str, aux: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            is_link: false,
            file_type: None,
            aux,
        }
    }

    fn is_dir(&self) -> bool { self.file_type.is_some_and(FileType::is_dir) }

    fn is_exec(&self) -> bool { self.file_type.is_some_and(FileType::is_exec) }
}

/// Commands in one `$PATH` directory, read again when the directory changes.
#[derive(Debug, Clone)]
struct PathDir {
    dir: String,
    scanned: Option<SystemTime>,
    dev: u64,
    ino: u64,
    names: Vec<String>,
}

impl PathDir {
    fn refresh(&mut self) {
        let meta = fs::metadata(&self.dir).ok();
        if let (Some(meta), Some(scanned)) = (&meta, self.scanned) {
            let unchanged = meta.modified().is_ok_and(|it| it < scanned)
                && meta.dev() == self.dev
                && meta.ino() == self.ino;
            if unchanged {
                return;
            }
        }
        self.names.clear();
        self.scanned = None;
        let Some(meta) = meta else {
            return;
        };
        let Ok(reader) = fs::read_dir(&self.dir) else {
            return;
        };
        self.scanned = Some(SystemTime::now());
        self.dev = meta.dev();
        self.ino = meta.ino();
        self.names = reader
            .filter_map(Result::ok)
            .map(|it| it.file_name().to_string_lossy().into_owned())
            .collect();
        tracing::debug!(message = "PATH directory scanned", dir = %self.dir, count = self.names.len());
    }
}

/// Where candidates come from besides the filesystem.
#[derive(Debug, Clone, Copy)]
pub struct ComplSources<'a> {
    pub users: &'a UserData,
    pub history: &'a History,
    pub home: &'a str,
    /// The directory relative names are relative to.
    pub cwd: &'a str,
    /// Extra characters to quote, `None` when names are inserted literally.
    pub quote: Option<&'a str>,
    /// Most candidates the panel may show.
    pub max: usize,
}

/// What a completion attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplOutcome {
    /// No word at the cursor. `first` as in [`WordScan::Empty`].
    Nothing { first: bool },
    /// The name is complete (or can't be completed); the remark explains.
    Done(Option<String>),
    /// Something was inserted but the name may continue, eg: a directory.
    Partial(Option<String>),
    /// Several candidates; run the completion panel.
    Choose(Option<&'static str>),
}

/// The completion panel and the state of the last completion.
#[derive(Debug, Clone)]
pub struct Completion {
    pub pd: Panel,
    pub candidates: Vec<Candidate>,
    pub kind: ComplKind,
    /// The candidates are file names (type column, quoting).
    pub filenames: bool,
    /// The name is finished, set by the last insertion.
    pub done: bool,
    /// Bytes of each candidate already on the line.
    typed: usize,
    quote: Option<String>,
    path_dirs: Vec<PathDir>,
}

impl Default for Completion {
    fn default() -> Self { Self::new(std::env::var("PATH").ok().as_deref()) }
}

impl Completion {
    /// `path` is the `$PATH` value; empty components mean the working directory.
    #[must_use]
    pub fn new(path: Option<&str>) -> Self {
        let path_dirs = path
            .map(|it| {
                it.split(':')
                    .map(|dir| PathDir {
                        dir: if dir.is_empty() { ".".into() } else { dir.into() },
                        scanned: None,
                        dev: 0,
                        ino: 0,
                        names: Vec::new(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            pd: Panel::new().with_extra(&LEAVE),
            candidates: Vec::new(),
            kind: ComplKind::Auto,
            filenames: false,
            done: false,
            typed: 0,
            quote: None,
            path_dirs,
        }
    }

    /// Complete the word at the cursor of `line`.
    pub fn complete(
        &mut self,
        line: &mut LineBuffer,
        kind: ComplKind,
        sources: &ComplSources<'_>,
    ) -> ComplOutcome {
        self.done = false;
        let (start, end, first) = match scan_word(line.text(), line.cursor(), kind) {
            WordScan::Empty { first } => {
                self.done = true;
                return ComplOutcome::Nothing { first };
            }
            WordScan::AfterBacktick => {
                self.done = true;
                return ComplOutcome::Done(Some(ui_str::CANNOT_COMPLETE_AFTER_BACKTICK.into()));
            }
            WordScan::Word { start, end, first } => (start, end, first),
        };
        line.set_cursor(end);
        let word: String = line.text().chars().skip(start).take(end - start).collect();
        let rq = ComplRequest::new(&word, kind, first, |dir| {
            sources.users.dir_tilde(dir, sources.home)
        });
        tracing::debug!(message = "completion", ?rq);

        self.kind = rq.kind;
        self.typed = rq.prefix.len();
        self.candidates.clear();
        self.filenames = !matches!(
            rq.kind,
            ComplKind::Env | ComplKind::User | ComplKind::UserDir | ComplKind::Hist
        );
        self.quote = sources
            .quote
            .filter(|_| self.filenames)
            .map(str::to_string);
        let error = self.collect(&rq, sources);
        self.show_results(line, sources.max, error)
    }

    fn collect(&mut self, rq: &ComplRequest, sources: &ComplSources<'_>) -> Option<io::ErrorKind> {
        let prefix = rq.prefix.as_str();
        match rq.kind {
            ComplKind::Env => {
                for (name, value) in std::env::vars_os() {
                    let name = name.to_string_lossy();
                    if name.starts_with(prefix) {
                        let aux = format!("{name}={}", value.to_string_lossy());
                        self.candidates.push(Candidate::named(&name, Some(aux)));
                    }
                }
                None
            }
            ComplKind::User | ComplKind::UserDir => {
                for user in sources.users.logins_starting_with(prefix) {
                    let aux = (!user.gecos.is_empty()).then(|| user.gecos.clone());
                    self.candidates.push(Candidate::named(&user.login, aux));
                }
                None
            }
            ComplKind::Hist => {
                for entry in sources.history.entries() {
                    if entry.cmd.starts_with(prefix) {
                        let aux = entry.failed.then(|| ui_str::HIST_FAILED.to_string());
                        self.candidates.push(Candidate::named(&entry.cmd, aux));
                    }
                }
                None
            }
            ComplKind::PathCmd => {
                // Subdirectories of the working directory may hold commands too.
                self.complete_file(sources.cwd, prefix, ComplKind::Dir, None);
                self.complete_path(sources.cwd, prefix);
                None
            }
            _ => {
                let dir = Path::new(sources.cwd).join(&rq.dir);
                self.complete_file(&dir.to_string_lossy(), prefix, rq.kind, None)
            }
        }
    }

    fn complete_file(
        &mut self,
        dir: &str,
        prefix: &str,
        kind: ComplKind,
        aux: Option<&str>,
    ) -> Option<io::ErrorKind> {
        let reader = match fs::read_dir(dir) {
            Ok(it) => it,
            Err(error) => return Some(error.kind()),
        };
        for entry in reader.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(prefix) {
                continue;
            }
            self.register_file(dir, &name, kind, aux);
        }
        None
    }

    fn register_file(&mut self, dir: &str, name: &str, kind: ComplKind, aux: Option<&str>) {
        let Some((file_type, is_link)) = FileType::of_path(&Path::new(dir).join(name)) else {
            return;
        };
        let wanted = match kind {
            ComplKind::Dir => file_type.is_dir(),
            ComplKind::Cmd => file_type.is_dir() || file_type.is_exec(),
            ComplKind::PathCmd => file_type.is_exec(),
            _ => true,
        };
        if !wanted {
            return;
        }
        // The same command in /bin and /usr/bin.
        if kind == ComplKind::PathCmd
            && self
                .candidates
                .iter()
                .any(|it| it.name == name && it.is_exec())
        {
            return;
        }
        self.candidates.push(Candidate {
            name: name.to_string(),
            is_link,
            file_type: Some(file_type),
            aux: aux.map(str::to_string),
        });
    }

    fn complete_path(&mut self, cwd: &str, prefix: &str) {
        let mut path_dirs = std::mem::take(&mut self.path_dirs);
        for path_dir in &mut path_dirs {
            if path_dir.dir.starts_with('/') {
                path_dir.refresh();
                for name in &path_dir.names {
                    if name.starts_with(prefix) {
                        self.register_file(&path_dir.dir, name, ComplKind::PathCmd, Some(&path_dir.dir));
                    }
                }
            } else {
                // Relative directories depend on the working directory; never cached.
                let dir = Path::new(cwd).join(&path_dir.dir);
                let dir = dir.to_string_lossy();
                self.complete_file(&dir, prefix, ComplKind::PathCmd, Some(&path_dir.dir));
            }
        }
        self.path_dirs = path_dirs;
    }

    /// Bytes after the typed part shared by every candidate, on a char boundary.
    fn common_len(&self) -> usize {
        let Some((head, rest)) = self.candidates.split_first() else {
            return 0;
        };
        let base = head.name.get(self.typed..).unwrap_or_default();
        let mut len = base.len();
        for candidate in rest {
            let other = candidate.name.get(self.typed..).unwrap_or_default();
            len = base
                .char_indices()
                .zip(other.chars())
                .take_while(|((index, a), b)| *index < len && a == b)
                .last()
                .map_or(0, |((index, a), _)| index + a.len_utf8());
        }
        len
    }

    /// The characters that may follow the typed part, `<none>` first when a
    /// candidate ends there.
    fn next_chars(&self) -> String {
        let mut none = false;
        let mut chars = BTreeSet::new();
        for candidate in &self.candidates {
            match candidate
                .name
                .get(self.typed..)
                .and_then(|it| it.chars().next())
            {
                Some(ch) => {
                    chars.insert(ch);
                }
                None => none = true,
            }
        }
        let mut out = if none { String::from("<none>") } else { String::new() };
        out.extend(chars);
        out
    }

    fn show_results(
        &mut self,
        line: &mut LineBuffer,
        max: usize,
        error: Option<io::ErrorKind>,
    ) -> ComplOutcome {
        match self.candidates.len() {
            0 => {
                self.done = true;
                let why = match error {
                    None => " (no match)",
                    Some(io::ErrorKind::PermissionDenied) => " (permission denied)",
                    Some(io::ErrorKind::NotFound) => " (no such directory)",
                    Some(_) => "",
                };
                ComplOutcome::Done(Some(format!(
                    "cannot complete that {}{why}",
                    self.kind.description()
                )))
            }
            1 => {
                self.insert_candidate(0, line);
                if self.done {
                    ComplOutcome::Done(None)
                } else {
                    ComplOutcome::Partial(None)
                }
            }
            count => {
                let common = self.common_len();
                if common > 0 {
                    let text = self.candidates[0].name[self.typed..self.typed + common].to_string();
                    self.insert(line, &text);
                    self.typed += common;
                }
                if count <= max {
                    self.prepare_panel();
                    let remark = (self.kind == ComplKind::Hist).then_some(ui_str::HIST_ORDER);
                    return ComplOutcome::Choose(remark);
                }
                let remark = if common > 0 {
                    format!("{count} completion possibilities, press <TAB> again for more info")
                } else {
                    format!("next char: {}", self.next_chars())
                };
                ComplOutcome::Partial(Some(remark))
            }
        }
    }

    fn insert(&self, line: &mut LineBuffer, text: &str) {
        match &self.quote {
            Some(extra) => line.insert_str(text, Quoting::Shell { extra }),
            None => line.insert_str(text, Quoting::Literal),
        }
    }

    fn prepare_panel(&mut self) {
        if self.kind != ComplKind::Hist {
            self.candidates.sort_by(|a, b| a.name.cmp(&b.name));
        }
        self.pd.set_count(self.candidates.len());
        self.pd.top = self.pd.min;
        self.pd.curs = if self.kind == ComplKind::Hist { 0 } else { self.pd.min };
    }

    /// Insert the rest of candidate `index`, followed by `/` for a directory or a
    /// space after a finished name.
    pub fn insert_candidate(&mut self, index: usize, line: &mut LineBuffer) {
        let Some(candidate) = self.candidates.get(index) else {
            return;
        };
        let rest = candidate.name.get(self.typed..).unwrap_or_default().to_string();
        let dir = (self.filenames && candidate.is_dir()) || self.kind == ComplKind::UserDir;
        self.insert(line, &rest);
        self.done = true;
        if dir {
            line.insert_char('/');
            self.done = false;
        } else if self.kind == ComplKind::Hist {
        } else if line.char_at(line.cursor()) == Some(' ') {
            line.set_cursor(line.cursor() + 1);
        } else {
            line.insert_char(' ');
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Candidate> {
        self.pd.selected().and_then(|row| self.candidates.get(row))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clex_tui::try_create_temp_dir;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("ls", 2, WordScan::Word { start: 0, end: 2, first: true })]
    #[test_case("ls fi", 5, WordScan::Word { start: 3, end: 5, first: false })]
    #[test_case("ls;  ma", 7, WordScan::Word { start: 5, end: 7, first: true })]
    #[test_case("cat <in", 7, WordScan::Word { start: 5, end: 7, first: false })]
    #[test_case("CC=gc", 5, WordScan::Word { start: 3, end: 5, first: false })]
    #[test_case("a b=gc", 6, WordScan::Word { start: 4, end: 6, first: false })]
    #[test_case("echo `ca", 8, WordScan::Word { start: 6, end: 8, first: true })]
    #[test_case("echo `ls`", 9, WordScan::AfterBacktick)]
    #[test_case("echo `ls` x`", 12, WordScan::Empty { first: true })]
    #[test_case("ls ", 3, WordScan::Empty { first: false })]
    #[test_case("ls fi|wc", 4, WordScan::Word { start: 3, end: 5, first: false })]
    fn test_scan_word(text: &str, cursor: usize, expected: WordScan) {
        assert_eq!(scan_word(text, cursor, ComplKind::Auto), expected);
    }

    #[test]
    fn test_request_kinds() {
        let home = |dir: &str| dir.replacen('~', "/home/me", 1);
        let rq = ComplRequest::new("~/sr", ComplKind::Auto, false, home);
        assert_eq!((rq.kind, rq.dir.as_str(), rq.prefix.as_str()), (ComplKind::File, "/home/me", "sr"));
        assert_eq!(ComplRequest::new("~ro", ComplKind::Auto, false, home).kind, ComplKind::UserDir);
        assert_eq!(ComplRequest::new("$HO", ComplKind::Auto, false, home).prefix, "HO");
        assert_eq!(ComplRequest::new("mak", ComplKind::Auto, true, home).kind, ComplKind::PathCmd);
        assert_eq!(ComplRequest::new("./ru", ComplKind::Auto, true, home).kind, ComplKind::Cmd);
        assert_eq!(ComplRequest::new("/us", ComplKind::Auto, false, home).dir, "/");
        assert_eq!(ComplRequest::new("us", ComplKind::DirPanel, true, home).kind, ComplKind::Dir);
        assert_eq!(ComplRequest::new("a\\ b", ComplKind::File, false, home).prefix, "a b");
    }

    fn sources<'a>(users: &'a UserData, history: &'a History, cwd: &'a str) -> ComplSources<'a> {
        ComplSources {
            users,
            history,
            home: "/nonexistent",
            cwd,
            quote: Some(""),
            max: 10,
        }
    }

    #[test]
    fn test_files() {
        let temp = try_create_temp_dir().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("my file.txt"), "").unwrap();
        fs::write(temp.path().join("my film.txt"), "").unwrap();
        let (users, history) = (UserData::with_files("/nonexistent", "/nonexistent"), History::new(5));
        let cwd = temp.path().to_string_lossy().into_owned();
        let sources = sources(&users, &history, &cwd);
        let mut compl = Completion::new(None);

        let mut line = LineBuffer::new("");
        line.put_str("cd sr");
        assert_eq!(compl.complete(&mut line, ComplKind::Auto, &sources), ComplOutcome::Partial(None));
        assert_eq!(line.text(), "cd src/");

        line.put_str("cat my");
        let outcome = compl.complete(&mut line, ComplKind::Auto, &sources);
        assert_eq!(outcome, ComplOutcome::Choose(None));
        assert_eq!(line.text(), "cat my\\ fil");
        assert_eq!(compl.pd.cnt, 2);
        compl.insert_candidate(1, &mut line);
        assert_eq!(line.text(), "cat my\\ film.txt ");
        assert!(compl.done);

        line.put_str("cat zz");
        assert_eq!(
            compl.complete(&mut line, ComplKind::Auto, &sources),
            ComplOutcome::Done(Some("cannot complete that filename (no match)".into()))
        );
        line.put_str("cat nodir/x");
        assert_eq!(
            compl.complete(&mut line, ComplKind::Auto, &sources),
            ComplOutcome::Done(Some("cannot complete that filename (no such directory)".into()))
        );
    }

    #[test]
    fn test_path_commands() {
        let temp = try_create_temp_dir().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir(&bin).unwrap();
        for name in ["frob", "frobnicate"] {
            let path = bin.join(name);
            fs::write(&path, "").unwrap();
            let mut perms = fs::metadata(&path).unwrap().permissions();
            std::os::unix::fs::PermissionsExt::set_mode(&mut perms, 0o755);
            fs::set_permissions(&path, perms).unwrap();
        }
        fs::write(bin.join("frobby"), "").unwrap();
        let (users, history) = (UserData::with_files("/nonexistent", "/nonexistent"), History::new(5));
        let cwd = temp.path().to_string_lossy().into_owned();
        let mut compl = Completion::new(Some(&bin.to_string_lossy()));

        let mut line = LineBuffer::new("");
        line.put_str("fr");
        let mut sources = sources(&users, &history, &cwd);
        sources.max = 1;
        let outcome = compl.complete(&mut line, ComplKind::Auto, &sources);
        assert_eq!(
            outcome,
            ComplOutcome::Partial(Some(
                "2 completion possibilities, press <TAB> again for more info".into()
            ))
        );
        assert_eq!(line.text(), "frob");
        let outcome = compl.complete(&mut line, ComplKind::Auto, &sources);
        assert_eq!(outcome, ComplOutcome::Partial(Some("next char: <none>n".into())));
    }

    #[test]
    fn test_history_keeps_order() {
        let mut history = History::new(5);
        history.save("make test", false);
        history.save("make", true);
        let users = UserData::with_files("/nonexistent", "/nonexistent");
        let sources = sources(&users, &history, "/");
        let mut compl = Completion::new(None);
        let mut line = LineBuffer::new("");
        line.put_str("ma");
        let outcome = compl.complete(&mut line, ComplKind::Hist, &sources);
        assert_eq!(outcome, ComplOutcome::Choose(Some(ui_str::HIST_ORDER)));
        assert_eq!(compl.candidates[0].name, "make");
        assert_eq!(compl.pd.curs, 0);
        compl.insert_candidate(1, &mut line);
        assert_eq!(line.text(), "make test");
    }

    #[test]
    fn test_nothing_to_complete() {
        let mut compl = Completion::new(None);
        let (users, history) = (UserData::with_files("/nonexistent", "/nonexistent"), History::new(5));
        let mut line = LineBuffer::new("");
        assert_eq!(
            compl.complete(&mut line, ComplKind::Auto, &sources(&users, &history, "/")),
            ComplOutcome::Nothing { first: true }
        );
    }
}
