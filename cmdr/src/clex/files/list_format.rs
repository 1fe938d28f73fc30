// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! How file panel entries are printed: the `$x` fields of the active layout, file
//! sizes with thousands separators, short dates and so on.

use chrono::{Datelike, Local, TimeZone, Timelike};
use clex_tui::fit_to_width;

use super::{FileEntry, FileType};
use crate::clex::{Config, ConfigVar, UserData};

/// Width of the size and device number fields.
pub const SIZE_FIELD_LEN: usize = 11;
/// Width of the owner field: `user:group`.
pub const OWNER_FIELD_LEN: usize = 19;
/// Columns reserved for the file name in a panel line.
pub const NAME_MIN_LEN: usize = 10;
/// Longest date, longer formats fall back to [`FALLBACK_DATE_FORMAT`].
pub const DATE_MAX_LEN: usize = 11;
pub const FALLBACK_DATE_FORMAT: &str = "dMy";
pub const DEFAULT_INFO_LAYOUT: &str = "$m $p $o";

pub const DATE_TOO_LONG: &str = "FMT_DATE: date string is too long, using \"dMy\" format";
pub const LAYOUT_WITHOUT_BAR: &str = "CONFIG: Incorrect LAYOUT syntax: missing bar '|'";

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const UNITS: &[u8] = b" KMGTPEZY";

/// Everything derived from the configuration that the listing format depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFormat {
    /// Half of a kilobyte: 512 for KiB, 500 for KB.
    pub k2: u64,
    pub separator: char,
    pub clock24: bool,
    pub date_format: String,
    time_pad: usize,
    date_pad: usize,
    /// Width of the date/time fields.
    pub date_len: usize,
    /// Fields shown in the panel.
    pub panel_fields: String,
    /// Fields shown in the info line under the panel.
    pub info_fields: String,
    pub show_link_target: bool,
    /// Problems found in the configuration.
    pub problems: Vec<&'static str>,
}

impl Default for ListFormat {
    fn default() -> Self { Self::new(&Config::new()) }
}

impl ListFormat {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let mut problems = Vec::new();

        let k2 = if config.num(ConfigVar::Kilobyte) == 0 { 512 } else { 500 };
        let separator = if config.num(ConfigVar::FmtNumber) == 1 { '.' } else { ',' };
        let clock24 = config.num(ConfigVar::FmtTime) != 1;

        let mut date_format = match config.text(ConfigVar::FmtDate) {
            "" => FALLBACK_DATE_FORMAT.to_string(),
            other => other.to_string(),
        };
        let mut date_width = date_format_width(&date_format);
        if date_width > DATE_MAX_LEN {
            problems.push(DATE_TOO_LONG);
            date_format = FALLBACK_DATE_FORMAT.to_string();
            date_width = date_format_width(&date_format);
        }
        let time_width = if clock24 { 5 } else { 7 };

        let (panel_fields, info_fields) = match split_layout(config.layout()) {
            Some((panel, info)) => (panel.to_string(), info.to_string()),
            None => {
                problems.push(LAYOUT_WITHOUT_BAR);
                (config.layout().to_string(), DEFAULT_INFO_LAYOUT.to_string())
            }
        };

        Self {
            k2,
            separator,
            clock24,
            date_format,
            time_pad: date_width.saturating_sub(time_width),
            date_pad: time_width.saturating_sub(date_width),
            date_len: date_width.max(time_width),
            panel_fields,
            info_fields,
            show_link_target: config.num(ConfigVar::ShowLinkTarget) == 0,
            problems,
        }
    }

    /// `12:34` for a time within the last 18 hours (5 minutes into the future are
    /// tolerated), the date otherwise. Both are padded to [`ListFormat::date_len`].
    #[must_use]
    pub fn time(&self, time: i64, now: i64) -> String {
        let Some(local) = Local.timestamp_opt(time, 0).single() else {
            return " ".repeat(self.date_len);
        };
        let mut out = String::new();
        if time <= now + 300 && now <= time + 64800 {
            out.push_str(&" ".repeat(self.time_pad));
            if self.clock24 {
                out.push_str(&format!("{:02}:{:02}", local.hour(), local.minute()));
            } else {
                let (pm, hour) = local.hour12();
                let ampm = if pm { "pm" } else { "am" };
                out.push_str(&format!("{hour:02}:{:02}{ampm}", local.minute()));
            }
        } else {
            out.push_str(&" ".repeat(self.date_pad));
            for ch in self.date_format.chars() {
                match ch {
                    'Y' => out.push_str(&format!("{:04}", local.year().rem_euclid(10000))),
                    'y' => out.push_str(&format!("{:02}", local.year().rem_euclid(100))),
                    'M' => out.push_str(MONTHS[local.month0() as usize]),
                    'm' => out.push_str(&format!("{:02}", local.month())),
                    'd' => out.push_str(&format!("{:02}", local.day())),
                    'D' => out.push_str(&format!("{:2}", local.day())),
                    other => out.push(other),
                }
            }
        }
        out
    }

    /// The 11 column size field: up to 9.999.999 exactly, then rounded in K, M, G...
    /// with IEC units marked by an `i`.
    #[must_use]
    pub fn size(&self, size: u64) -> String {
        let mut size = size;
        let mut exp = 0;
        let mut roundup = 0;
        while size > 9_999_999 {
            size /= self.k2;
            roundup = size % 2;
            size /= 2;
            exp += 1;
        }
        let unit = char::from(UNITS[exp.min(UNITS.len() - 1)]);
        let mut out: Vec<char> = format!("  {:7}{unit} ", size + roundup).chars().collect();
        if out[5] != ' ' {
            if out[2] != ' ' {
                out[0] = out[2];
                out[1] = self.separator;
            }
            out[2] = out[3];
            out[3] = out[4];
            out[4] = out[5];
            out[5] = self.separator;
        }
        if exp > 0 && self.k2 == 512 {
            out[10] = 'i';
        }
        out.into_iter().collect()
    }

    /// One panel line: the layout fields, then the name (and the link target).
    #[must_use]
    pub fn panel_line(&self, entry: &FileEntry, cols: usize, now: i64, users: &UserData) -> String {
        let reserved = NAME_MIN_LEN.min(cols);
        let (mut out, left) = self.fields(entry, cols - reserved, &self.panel_fields, now, users);
        let width = reserved + left;
        if entry.symlink && self.show_link_target {
            let link = entry.link.as_deref().unwrap_or_default();
            let text = format!("{} -> {link}", entry.name);
            out.push_str(&fit_to_width(&text, width));
        } else {
            out.push_str(&fit_to_width(&entry.name, width));
        }
        out
    }

    /// The info line text for the entry under the cursor.
    #[must_use]
    pub fn info_line(&self, entry: &FileEntry, cols: usize, now: i64, users: &UserData) -> String {
        if entry.file_type == FileType::Na {
            return crate::clex::ui_str::NO_STATUS_INFO.to_string();
        }
        self.fields(entry, cols, &self.info_fields, now, users).0
    }

    /// Print `layout` into at most `width` columns. Returns the text and the unused
    /// width. A field that doesn't fit ends the output.
    fn fields(
        &self,
        entry: &FileEntry,
        width: usize,
        layout: &str,
        now: i64,
        users: &UserData,
    ) -> (String, usize) {
        let mut out = String::new();
        let mut width = width;
        let mut left_align = false;
        let mut chars = layout.chars();

        while width > 0 {
            let Some(ch) = chars.next() else { break };
            if ch != '$' {
                out.push(ch);
                width -= 1;
                left_align = ch != ' ';
                continue;
            }
            let Some(code) = chars.next() else { break };

            let na = entry.file_type == FileType::Na;
            let (field_width, text): (usize, Option<String>) = match code {
                'a' => (self.date_len, (!na).then(|| self.time(entry.atime, now))),
                'd' => (self.date_len, (!na).then(|| self.time(entry.mtime, now))),
                'i' => (self.date_len, (!na).then(|| self.time(entry.ctime, now))),
                'l' => (3, (!na).then(|| links(entry.nlink))),
                'L' => (3, Some(if entry.hard_linked() { "LNK" } else { "   " }.into())),
                'm' => (4, (!na).then(|| format!("{:04o}", entry.mode))),
                'M' => (4, (!entry.normal_mode).then(|| format!("{:04o}", entry.mode))),
                'o' => (OWNER_FIELD_LEN, (!na).then(|| owner(entry.uid, entry.gid, users))),
                'p' => (9, (!na).then(|| permissions(entry.mode))),
                'P' => (9, (!na && !entry.normal_mode).then(|| permissions(entry.mode))),
                's' => (SIZE_FIELD_LEN, (!na).then(|| self.size_or_dev(entry))),
                'S' => (
                    SIZE_FIELD_LEN,
                    (!na && !entry.file_type.is_dir()).then(|| self.size_or_dev(entry)),
                ),
                't' => (4, Some(entry.file_type.symbol().into())),
                '>' => (2, Some(if entry.symlink { "->" } else { "  " }.into())),
                '*' => (1, Some(if entry.select { "*" } else { " " }.into())),
                '$' => (1, Some("$".into())),
                '|' => (1, Some("|".into())),
                other => (2, Some(format!("${other}"))),
            };

            if width < field_width {
                break;
            }
            match text {
                None => out.push_str(&" ".repeat(field_width)),
                Some(text) if left_align && text.starts_with(' ') => {
                    let trimmed = text.trim_start_matches(' ');
                    out.push_str(trimmed);
                    out.push_str(&" ".repeat(text.len() - trimmed.len()));
                }
                Some(text) => out.push_str(&text),
            }
            width -= field_width;
        }
        (out, width)
    }

    fn size_or_dev(&self, entry: &FileEntry) -> String {
        if entry.file_type.is_dev() {
            let dev = entry.devnum;
            device(rustix::fs::major(dev), rustix::fs::minor(dev))
        } else {
            self.size(entry.size)
        }
    }
}

/// Width of a date printed with `format`.
#[must_use]
pub fn date_format_width(format: &str) -> usize {
    format
        .chars()
        .map(|ch| match ch {
            'Y' => 4,
            'M' => 3,
            'y' | 'm' | 'd' | 'D' => 2,
            _ => 1,
        })
        .sum()
}

/// Split a layout at the first `|` that isn't part of a `$|` field.
#[must_use]
pub fn split_layout(layout: &str) -> Option<(&str, &str)> {
    let mut field = false;
    for (index, ch) in layout.char_indices() {
        if field {
            field = false;
        } else if ch == '$' {
            field = true;
        } else if ch == '|' {
            return Some((&layout[..index], &layout[index + 1..]));
        }
    }
    None
}

/// `"0644"` becomes `"rw-r--r--"`, with the setuid, setgid and sticky bits.
#[must_use]
pub fn permissions(mode: u32) -> String {
    const PLAIN: [&str; 8] = ["---", "--x", "-w-", "-wx", "r--", "r-x", "rw-", "rwx"];
    const SET_ID: [&str; 8] = ["--S", "--s", "-wS", "-ws", "r-S", "r-s", "rwS", "rws"];
    const STICKY: [&str; 8] = ["--T", "--t", "-wT", "-wt", "r-T", "r-t", "rwT", "rwt"];

    let special = (mode >> 9) & 7;
    let triple = |shift: u32| ((mode >> shift) & 7) as usize;
    let mut out = String::with_capacity(9);
    out.push_str(if special & 4 != 0 { SET_ID } else { PLAIN }[triple(6)]);
    out.push_str(if special & 2 != 0 { SET_ID } else { PLAIN }[triple(3)]);
    out.push_str(if special & 1 != 0 { STICKY } else { PLAIN }[triple(0)]);
    out
}

#[must_use]
pub fn links(nlink: u64) -> String {
    if nlink <= 999 {
        format!("{nlink:3}")
    } else {
        "max".to_string()
    }
}

/// A user or group name in 9 columns; longer names keep their first and last 4
/// characters.
#[must_use]
pub fn id_name(name: Option<&str>, id: u32, left_align: bool) -> String {
    let name = name.map_or_else(|| id.to_string(), str::to_string);
    let len = name.chars().count();
    if len <= 9 {
        if left_align {
            format!("{name:<9}")
        } else {
            format!("{name:>9}")
        }
    } else {
        let head: String = name.chars().take(4).collect();
        let tail: String = name.chars().skip(len - 4).collect();
        format!("{head}>{tail}")
    }
}

#[must_use]
pub fn owner(uid: u32, gid: u32, users: &UserData) -> String {
    format!(
        "{}:{}",
        id_name(users.login(uid), uid, false),
        id_name(users.group(gid), gid, true)
    )
}

/// Major number in decimal, minor in hex, 11 columns together. The minor part
/// takes 2 to 7 digits and the major part the rest.
#[must_use]
pub fn device(major: u32, minor: u32) -> String {
    const MIN_MINOR: usize = 2;
    const MAX_MINOR: usize = 7;
    let mut minor_len = MIN_MINOR;
    let minor_max = |len: usize| (1_u64 << (4 * len)) - 1;
    while u64::from(minor) > minor_max(minor_len) && minor_len < MAX_MINOR {
        minor_len += 1;
    }
    let major_len = SIZE_FIELD_LEN - 1 - minor_len;
    let major_max = 10_u64.pow(u32::try_from(major_len).unwrap_or(9)) - 1;

    let major_text = if u64::from(major) > major_max {
        format!("{:>major_len$}", "..")
    } else {
        format!("{major:>major_len$}")
    };
    let minor_text = if u64::from(minor) > minor_max(minor_len) {
        let digits = minor_len - 2;
        let masked = u64::from(minor) & minor_max(digits);
        format!(":..{masked:0digits$X}")
    } else {
        format!(":{minor:0minor_len$X}")
    };
    format!("{major_text}{minor_text}")
}

#[cfg(test)]
mod tests {
    use clex_tui::display_width;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::clex::{ConfigValue, files::DotName};

    fn format_with(var: ConfigVar, value: i32) -> ListFormat {
        let mut config = Config::new();
        config.set_current(var, ConfigValue::Num(value));
        ListFormat::new(&config)
    }

    #[test_case(0, "        0  ")]
    #[test_case(999, "      999  ")]
    #[test_case(1_234, "    1,234  ")]
    #[test_case(1_234_567, "1,234,567  ")]
    #[test_case(9_999_999, "9,999,999  ")]
    #[test_case(10_000_000, "    9,766Ki")]
    fn test_size_iec(size: u64, expected: &str) {
        let format = ListFormat::default();
        assert_eq!(format.size(size), expected);
    }

    #[test]
    fn test_size_si_and_dot_separator() {
        let mut config = Config::new();
        config.set_current(ConfigVar::Kilobyte, ConfigValue::Num(1));
        config.set_current(ConfigVar::FmtNumber, ConfigValue::Num(1));
        let format = ListFormat::new(&config);
        assert_eq!(format.size(10_000_000), "   10.000K ");
        assert_eq!(format.size(12_345), "   12.345  ");
    }

    #[test]
    fn test_permissions() {
        assert_eq!(permissions(0o644), "rw-r--r--");
        assert_eq!(permissions(0o4755), "rwsr-xr-x");
        assert_eq!(permissions(0o2644), "rw-r-Sr--");
        assert_eq!(permissions(0o1777), "rwxrwxrwt");
    }

    #[test]
    fn test_id_name() {
        assert_eq!(id_name(Some("root"), 0, false), "     root");
        assert_eq!(id_name(Some("root"), 0, true), "root     ");
        assert_eq!(id_name(Some("averylongname"), 0, true), "aver>name");
        assert_eq!(id_name(None, 1234, false), "     1234");
    }

    #[test]
    fn test_device() {
        assert_eq!(device(8, 1), "       8:01");
        assert_eq!(device(8, 0x123), "      8:123");
        assert_eq!(device(8, 1).len(), SIZE_FIELD_LEN);
    }

    #[test]
    fn test_layout_split() {
        assert_eq!(split_layout("$d $S|  $p"), Some(("$d $S", "  $p")));
        assert_eq!(split_layout("$| x|y"), Some(("$| x", "y")));
        assert_eq!(split_layout("$d $S"), None);
    }

    #[test]
    fn test_bad_layout_falls_back() {
        let mut config = Config::new();
        config.set_current(ConfigVar::Layout1, ConfigValue::Text("$d $S".into()));
        let format = ListFormat::new(&config);
        assert_eq!(format.info_fields, DEFAULT_INFO_LAYOUT);
        assert_eq!(format.problems, vec![LAYOUT_WITHOUT_BAR]);
    }

    #[test]
    fn test_date_widths() {
        assert_eq!(date_format_width("dMy"), 7);
        assert_eq!(date_format_width("Y-m-d"), 10);
        let format = ListFormat::default();
        assert_eq!(format.date_len, 7);
        let format = format_with(ConfigVar::FmtTime, 1);
        assert!(!format.clock24);
        assert_eq!(format.date_len, 7);
    }

    #[test]
    fn test_recent_time_vs_date() {
        let format = ListFormat::default();
        let now = Local::now().timestamp();
        let recent = format.time(now - 60, now);
        assert_eq!(recent.len(), 7);
        assert_eq!(&recent[4..5], ":");
        let old = format.time(now - 100 * 86400, now);
        assert_eq!(old.len(), 7);
        assert!(MONTHS.iter().any(|month| old.contains(month)));
    }

    #[test]
    fn test_fields() {
        let format = ListFormat::default();
        let users = UserData::with_files("/nonexistent", "/nonexistent");
        let mut entry = FileEntry::without_info("notes.txt");
        entry.file_type = FileType::PlainFile;
        entry.dot = DotName::None;
        entry.mode = 0o644;
        entry.size = 42;
        entry.select = true;
        let (text, left) = format.fields(&entry, 40, "$t $*|$$", 0, &users);
        assert_eq!(text, "     *|$");
        assert_eq!(left, 32);

        let line = format.panel_line(&entry, 30, 0, &users);
        assert_eq!(display_width(&line), 30);
        assert!(line.contains("notes.txt"));
    }
}
