// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! User and group names from `/etc/passwd` and `/etc/group`.
//!
//! Both files are read into memory and re-read when they change on disk, when the
//! data is older than [`EXPIRATION_SECS`] (to notice changes in network databases)
//! or when expired on request (alt-R in the file panel).

use std::{fs,
          os::unix::fs::MetadataExt,
          path::{Path, PathBuf}};

use super::{Panel,
            menus::{GROUP_EXTRA, USER_EXTRA},
            name_match::substring};

pub const PASSWD_FILE: &str = "/etc/passwd";
pub const GROUP_FILE: &str = "/etc/group";
pub const EXPIRATION_SECS: i64 = 300;

pub const NO_USER_DATA: &str = "USER ACCOUNTS: Cannot obtain user account data.";
pub const USER_DATA_BACK: &str = "USER ACCOUNTS: user account data is now available.";
pub const NO_GROUP_DATA: &str = "USER ACCOUNTS: Cannot obtain user group data.";
pub const GROUP_DATA_BACK: &str = "USER ACCOUNTS: user group data is now available.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub login: String,
    pub uid: u32,
    /// The GECOS field, usually the full name.
    pub gecos: String,
    pub homedir: String,
    pub shell: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub group: String,
    pub gid: u32,
}

/// `login:password:uid:gid:gecos:home:shell` lines; malformed ones are skipped.
#[must_use]
pub fn parse_passwd(text: &str) -> Vec<UserRecord> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() < 7 {
                return None;
            }
            Some(UserRecord {
                login: fields[0].to_string(),
                uid: fields[2].parse().ok()?,
                gecos: fields[4].to_string(),
                homedir: fields[5].to_string(),
                shell: fields[6].to_string(),
            })
        })
        .collect()
}

/// `group:password:gid:members` lines; malformed ones are skipped.
#[must_use]
pub fn parse_group(text: &str) -> Vec<GroupRecord> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split(':');
            let group = fields.next()?.to_string();
            let gid = fields.nth(1)?.parse().ok()?;
            Some(GroupRecord { group, gid })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Stamp {
    /// When the data was read, 0 when it must be read again.
    read_at: i64,
    dev: u64,
    ino: u64,
}

impl Stamp {
    fn is_stale(&self, path: &Path, now: i64) -> (bool, Stamp) {
        match fs::metadata(path) {
            Ok(meta) => {
                let current = Stamp {
                    read_at: now,
                    dev: meta.dev(),
                    ino: meta.ino(),
                };
                let stale = meta.mtime() >= self.read_at
                    || meta.dev() != self.dev
                    || meta.ino() != self.ino
                    || now > self.read_at + EXPIRATION_SECS;
                (stale, current)
            }
            Err(_) => (true, Stamp {
                read_at: now,
                dev: 0,
                ino: 0,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserData {
    passwd_file: PathBuf,
    group_file: PathBuf,
    /// Sorted by uid.
    users: Vec<UserRecord>,
    /// Indexes into `users`, sorted by login.
    by_name: Vec<usize>,
    /// Sorted by gid.
    groups: Vec<GroupRecord>,
    user_stamp: Stamp,
    group_stamp: Stamp,
    user_failed: bool,
    group_failed: bool,
    warnings: Vec<&'static str>,
}

impl Default for UserData {
    fn default() -> Self { Self::with_files(PASSWD_FILE, GROUP_FILE) }
}

impl UserData {
    /// Nothing is read before the first [`UserData::refresh`].
    #[must_use]
    pub fn with_files(passwd: impl Into<PathBuf>, group: impl Into<PathBuf>) -> Self {
        Self {
            passwd_file: passwd.into(),
            group_file: group.into(),
            users: Vec::new(),
            by_name: Vec::new(),
            groups: Vec::new(),
            user_stamp: Stamp::default(),
            group_stamp: Stamp::default(),
            user_failed: false,
            group_failed: false,
            warnings: Vec::new(),
        }
    }

    /// Force a re-read by the next refresh.
    pub fn expire(&mut self) {
        self.user_stamp.read_at = 0;
        self.group_stamp.read_at = 0;
    }

    /// Re-read whatever is out of date. Returns true when anything was re-read.
    pub fn refresh(&mut self, now: i64) -> bool {
        let mut reloaded = false;

        let (stale, stamp) = self.user_stamp.is_stale(&self.passwd_file, now);
        if stale {
            self.read_users();
            self.user_stamp = stamp;
            if self.users.is_empty() {
                self.user_stamp.read_at = 0;
            }
            reloaded = true;
        }

        let (stale, stamp) = self.group_stamp.is_stale(&self.group_file, now);
        if stale {
            self.read_groups();
            self.group_stamp = stamp;
            if self.groups.is_empty() {
                self.group_stamp.read_at = 0;
            }
            reloaded = true;
        }

        if reloaded {
            tracing::debug!(
                message = "user data read",
                users = self.users.len(),
                groups = self.groups.len()
            );
        }
        reloaded
    }

    fn read_users(&mut self) {
        self.users = fs::read_to_string(&self.passwd_file)
            .map(|text| parse_passwd(&text))
            .unwrap_or_default();
        self.users.sort_by_key(|it| it.uid);
        self.by_name = (0..self.users.len()).collect();
        let users = &self.users;
        self.by_name.sort_by(|a, b| users[*a].login.cmp(&users[*b].login));

        match (self.users.is_empty(), self.user_failed) {
            (true, false) => {
                self.user_failed = true;
                self.warnings.push(NO_USER_DATA);
            }
            (false, true) => {
                self.user_failed = false;
                self.warnings.push(USER_DATA_BACK);
            }
            _ => {}
        }
    }

    fn read_groups(&mut self) {
        self.groups = fs::read_to_string(&self.group_file)
            .map(|text| parse_group(&text))
            .unwrap_or_default();
        self.groups.sort_by_key(|it| it.gid);

        match (self.groups.is_empty(), self.group_failed) {
            (true, false) => {
                self.group_failed = true;
                self.warnings.push(NO_GROUP_DATA);
            }
            (false, true) => {
                self.group_failed = false;
                self.warnings.push(GROUP_DATA_BACK);
            }
            _ => {}
        }
    }

    /// Warnings collected by the refreshes so far.
    pub fn take_warnings(&mut self) -> Vec<&'static str> { std::mem::take(&mut self.warnings) }

    #[must_use]
    pub fn users(&self) -> &[UserRecord] { &self.users }

    #[must_use]
    pub fn groups(&self) -> &[GroupRecord] { &self.groups }

    #[must_use]
    pub fn user(&self, uid: u32) -> Option<&UserRecord> {
        self.users
            .binary_search_by_key(&uid, |it| it.uid)
            .ok()
            .map(|index| &self.users[index])
    }

    #[must_use]
    pub fn login(&self, uid: u32) -> Option<&str> { self.user(uid).map(|it| it.login.as_str()) }

    #[must_use]
    pub fn group(&self, gid: u32) -> Option<&str> {
        self.groups
            .binary_search_by_key(&gid, |it| it.gid)
            .ok()
            .map(|index| self.groups[index].group.as_str())
    }

    /// Users whose login starts with `prefix`, in alphabetical order.
    pub fn logins_starting_with<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a UserRecord> + 'a {
        self.by_name
            .iter()
            .map(|index| &self.users[*index])
            .filter(move |it| it.login.starts_with(prefix))
    }

    fn homedir_of(&self, login: &str) -> Option<&str> {
        self.by_name
            .binary_search_by(|index| self.users[*index].login.as_str().cmp(login))
            .ok()
            .map(|index| self.users[self.by_name[index]].homedir.as_str())
    }

    /// Tilde substitution: `~/dir` and `~user/dir`. Unknown users are left alone.
    #[must_use]
    pub fn dir_tilde(&self, dir: &str, home: &str) -> String {
        let Some(rest) = dir.strip_prefix('~') else {
            return dir.to_string();
        };
        let (user, tail) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
        let homedir = if user.is_empty() {
            Some(home)
        } else {
            self.homedir_of(user)
        };
        match homedir {
            Some(homedir) => format!("{homedir}{tail}"),
            None => dir.to_string(),
        }
    }
}

/// The identity of the person running the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// `login@host` for the top bar.
    pub login_at_host: String,
    pub shell: String,
    pub homedir: String,
    pub is_root: bool,
}

impl Account {
    /// Returns a warning when the account isn't in the user database.
    #[must_use]
    pub fn detect(users: &UserData) -> (Self, Option<String>) {
        let uid = rustix::process::getuid().as_raw();
        let is_root = rustix::process::geteuid().is_root();
        let host = short_host_name(&rustix::system::uname().nodename().to_string_lossy());

        let (mut account, warning) = match users.user(uid) {
            Some(user) => (
                Account {
                    login_at_host: format!("{}@{host}", user.login),
                    shell: if user.shell.is_empty() {
                        "/bin/sh".to_string()
                    } else {
                        user.shell.clone()
                    },
                    homedir: user.homedir.clone(),
                    is_root,
                },
                None,
            ),
            None => (
                Account {
                    login_at_host: format!("uid{uid}@{host}"),
                    shell: "/bin/sh".to_string(),
                    homedir: std::env::var("HOME").unwrap_or_default(),
                    is_root,
                },
                Some(format!(
                    "USER ACCOUNTS: Cannot find your account (UID={uid}) in /etc/passwd"
                )),
            ),
        };
        if account.homedir.is_empty() {
            account.homedir = "/".to_string();
        }
        (account, warning)
    }
}

/// Drop the domain part of a host name, but leave an IP address alone.
#[must_use]
pub fn short_host_name(host: &str) -> String {
    let is_address = host.chars().all(|ch| ch == '.' || ch.is_ascii_digit());
    if is_address {
        return host.to_string();
    }
    host.split('.').next().unwrap_or(host).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub uid: u32,
    pub login: String,
    pub gecos: String,
}

/// The user information panel: the user database sorted by uid, filtered by login
/// or (ignoring case) by full name.
#[derive(Debug, Clone)]
pub struct UserPanel {
    pub pd: Panel,
    pub rows: Vec<UserRow>,
}

impl Default for UserPanel {
    fn default() -> Self {
        Self {
            pd: Panel::new().with_extra(&USER_EXTRA).with_filter(),
            rows: Vec::new(),
        }
    }
}

impl UserPanel {
    /// Rebuild the rows, keeping the cursor on the same user.
    pub fn rebuild(&mut self, data: &UserData) {
        let curs_uid = self
            .pd
            .selected()
            .and_then(|index| self.rows.get(index))
            .map_or(0, |it| it.uid);
        let filter = self.pd.filter_text().map(str::to_string);
        self.rows.clear();
        for user in data.users() {
            if user.uid == curs_uid {
                self.pd.select(self.rows.len());
            }
            if let Some(filter) = &filter {
                if !substring(&user.login, filter, false) && !substring(&user.gecos, filter, true)
                {
                    continue;
                }
            }
            self.rows.push(UserRow {
                uid: user.uid,
                login: user.login.clone(),
                gecos: user.gecos.clone(),
            });
        }
        self.pd.set_count(self.rows.len());
    }
}

/// The group information panel, sorted by gid and filtered by name.
#[derive(Debug, Clone)]
pub struct GroupPanel {
    pub pd: Panel,
    pub rows: Vec<GroupRecord>,
}

impl Default for GroupPanel {
    fn default() -> Self {
        Self {
            pd: Panel::new().with_extra(&GROUP_EXTRA).with_filter(),
            rows: Vec::new(),
        }
    }
}

impl GroupPanel {
    pub fn rebuild(&mut self, data: &UserData) {
        let curs_gid = self
            .pd
            .selected()
            .and_then(|index| self.rows.get(index))
            .map_or(0, |it| it.gid);
        let filter = self.pd.filter_text().map(str::to_string);
        self.rows.clear();
        for group in data.groups() {
            if group.gid == curs_gid {
                self.pd.select(self.rows.len());
            }
            if let Some(filter) = &filter {
                if !substring(&group.group, filter, false) {
                    continue;
                }
            }
            self.rows.push(group.clone());
        }
        self.pd.set_count(self.rows.len());
    }
}

#[cfg(test)]
mod tests {
    use clex_tui::{FilterFocus, try_create_temp_dir};
    use pretty_assertions::assert_eq;

    use super::*;

    const PASSWD: &str = "root:x:0:0:root:/root:/bin/bash\n\
                          # comment\n\
                          alice:x:1000:1000:Alice Liddell:/home/alice:/bin/zsh\n\
                          bob:x:1001:1001::/home/bob:\n\
                          broken line\n";
    const GROUP: &str = "root:x:0:\nwheel:x:10:alice\nusers:x:100:\n";

    fn data() -> (clex_tui::TempDir, UserData) {
        let temp = try_create_temp_dir().unwrap();
        fs::write(temp.join("passwd"), PASSWD).unwrap();
        fs::write(temp.join("group"), GROUP).unwrap();
        let mut data = UserData::with_files(temp.join("passwd"), temp.join("group"));
        assert!(data.refresh(1));
        (temp, data)
    }

    #[test]
    fn test_parse() {
        let users = parse_passwd(PASSWD);
        assert_eq!(users.len(), 3);
        assert_eq!(users[1].gecos, "Alice Liddell");
        assert_eq!(parse_group(GROUP)[1], GroupRecord {
            group: "wheel".into(),
            gid: 10
        });
    }

    #[test]
    fn test_lookups() {
        let (_temp, data) = data();
        assert_eq!(data.login(1000), Some("alice"));
        assert_eq!(data.login(4242), None);
        assert_eq!(data.group(100), Some("users"));
        let names: Vec<&str> = data
            .logins_starting_with("b")
            .map(|it| it.login.as_str())
            .collect();
        assert_eq!(names, vec!["bob"]);
    }

    #[test]
    fn test_dir_tilde() {
        let (_temp, data) = data();
        assert_eq!(data.dir_tilde("~/src", "/home/me"), "/home/me/src");
        assert_eq!(data.dir_tilde("~alice/doc", "/home/me"), "/home/alice/doc");
        assert_eq!(data.dir_tilde("~nobody/doc", "/home/me"), "~nobody/doc");
        assert_eq!(data.dir_tilde("/tmp", "/home/me"), "/tmp");
    }

    #[test]
    fn test_refresh_only_when_stale() {
        let (_temp, mut data) = data();
        let now = fs::metadata(&data.passwd_file).unwrap().mtime() + 10;
        assert!(data.refresh(now));
        assert!(!data.refresh(now + 1));
        data.expire();
        assert!(data.refresh(now + 2));
        assert!(data.refresh(now + 2 + EXPIRATION_SECS + 1));
    }

    #[test]
    fn test_missing_files_warn_once() {
        let mut data = UserData::with_files("/nonexistent/passwd", "/nonexistent/group");
        data.refresh(10);
        data.refresh(20);
        assert_eq!(data.take_warnings(), vec![NO_USER_DATA, NO_GROUP_DATA]);
    }

    #[test]
    fn test_host_name() {
        assert_eq!(short_host_name("box.example.com"), "box");
        assert_eq!(short_host_name("10.0.0.1"), "10.0.0.1");
    }

    #[test]
    fn test_user_panel_filter_keeps_cursor() {
        let (_temp, data) = data();
        let mut panel = UserPanel::default();
        panel.rebuild(&data);
        assert_eq!(panel.rows.len(), 3);
        panel.pd.select(1);

        panel.pd.filtering = FilterFocus::Filter;
        for ch in "LIDD".chars() {
            panel.pd.filter.as_mut().unwrap().insert_char(ch);
        }
        panel.rebuild(&data);
        assert_eq!(panel.rows.len(), 1);
        assert_eq!(panel.rows[0].login, "alice");
    }
}
