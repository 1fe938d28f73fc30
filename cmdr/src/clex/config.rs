// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The configuration variables.
//!
//! Every variable has three values: `initial` (the built-in default), `current` (what
//! the running program uses) and `new` (what the configuration panel is editing). The
//! panel copies `current` into `new` when it opens; accepting copies the changed
//! values back. Only values that differ from the defaults are written to
//! `config.json`.

use std::collections::BTreeMap;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use super::ui_str;

/// Longest string value in characters.
pub const CFG_VALUE_LEN: usize = 60;
/// Width of the variable name column in the configuration panel.
pub const CFG_VAR_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum ConfigVar {
    Frame,
    CmdLines,
    GroupFiles,
    Prompt,
    Layout1,
    Layout2,
    Layout3,
    ActiveLayout,
    Kilobyte,
    FmtNumber,
    FmtTime,
    FmtDate,
    ShellProg,
    CmdF3,
    CmdF4,
    CmdF5,
    CmdF6,
    CmdF7,
    CmdF8,
    CmdF9,
    CmdF10,
    CmdF11,
    CmdF12,
    WarnRm,
    WarnLong,
    WarnSelect,
    Dir2,
    Quote,
    CPanelSize,
    DPanelSize,
    HPanelSize,
    ViewerCmd,
    NopromptCmds,
    ShowHidden,
    ShowLinkTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// `special` names the value 0 (eg: AUTO), `labels` turn the number into an
    /// enumeration shown as text.
    Num {
        min: i32,
        max: i32,
        default: i32,
        special: Option<&'static str>,
        labels: &'static [&'static str],
    },
    /// `special` names the empty string.
    Text {
        default: &'static str,
        special: Option<&'static str>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarDef {
    pub var: ConfigVar,
    pub name: &'static str,
    pub help: &'static str,
    pub kind: VarKind,
}

const NO_YES: &[&str] = &["No", "Yes"];

const fn enumerated(default: i32, labels: &'static [&'static str]) -> VarKind {
    VarKind::Num {
        min: 0,
        max: labels.len() as i32 - 1,
        default,
        special: None,
        labels,
    }
}

const fn text(default: &'static str) -> VarKind {
    VarKind::Text {
        default,
        special: None,
    }
}

const fn text_or(special: &'static str) -> VarKind {
    VarKind::Text {
        default: "",
        special: Some(special),
    }
}

const fn panel_size(default: i32, special: Option<&'static str>) -> VarKind {
    VarKind::Num {
        min: 10,
        max: 100,
        default,
        special,
        labels: &[],
    }
}

/// In [`ConfigVar`] order.
pub static VARS: [VarDef; 35] = [
    VarDef {
        var: ConfigVar::Frame,
        name: "FRAME",
        help: "Appearance: Panel frame: ----- or ===== or line graphics",
        kind: enumerated(0, &["-----", "=====", "line graphics (not supported on some terminals)"]),
    },
    VarDef {
        var: ConfigVar::CmdLines,
        name: "CMD_LINES",
        help: "Appearance: How many lines are occupied by the input line",
        kind: VarKind::Num {
            min: 2,
            max: 4,
            default: 2,
            special: None,
            labels: &["2 screen lines", "3 screen lines", "4 screen lines"],
        },
    },
    VarDef {
        var: ConfigVar::GroupFiles,
        name: "GROUP_FILES",
        help: "Appearance: Group files of the same type together",
        kind: enumerated(2, &[
            "Do not group",
            "Group: directories, special files, plain files",
            "Group: directories, devices, special files, plain files",
        ]),
    },
    VarDef {
        var: ConfigVar::Prompt,
        name: "PROMPT",
        help: "Appearance: Command line prompt (AUTO = according to shell)",
        kind: text_or("AUTO"),
    },
    VarDef {
        var: ConfigVar::Layout1,
        name: "LAYOUT1",
        help: "Appearance: File panel layout #1, see help",
        kind: text("$d $S $>$t $M $*|  $p $o $L"),
    },
    VarDef {
        var: ConfigVar::Layout2,
        name: "LAYOUT2",
        help: "Appearance: File panel layout #2",
        kind: text("$d $S $t $*|  $p $o"),
    },
    VarDef {
        var: ConfigVar::Layout3,
        name: "LAYOUT3",
        help: "Appearance: File panel layout #3",
        kind: text("$p $o $s $d $>$t $*|  mode=$m atime=$a ctime=$i links=$l"),
    },
    VarDef {
        var: ConfigVar::ActiveLayout,
        name: "ACTIVE_LAYOUT",
        help: "Appearance: Which file panel layout is active",
        kind: enumerated(0, &["Layout #1", "Layout #2", "Layout #3"]),
    },
    VarDef {
        var: ConfigVar::Kilobyte,
        name: "KILOBYTE",
        help: "Appearance: Filesize unit definition",
        kind: enumerated(0, &[
            "1 KiB is 1024 bytes (IEC standard)",
            "1 KB is 1000 bytes (SI standard)",
        ]),
    },
    VarDef {
        var: ConfigVar::FmtNumber,
        name: "FMT_NUMBER",
        help: "Appearance: Format: thousands separator",
        kind: enumerated(0, &[
            "AUTO (according to the current locale)",
            "1.000.000 (dot separated)",
            "1,000,000 (comma separated)",
        ]),
    },
    VarDef {
        var: ConfigVar::FmtTime,
        name: "FMT_TIME",
        help: "Appearance: Format: 12/24 hour clock",
        kind: enumerated(0, &[
            "AUTO (according to the current locale)",
            "12 hour clock",
            "24 hour clock",
        ]),
    },
    VarDef {
        var: ConfigVar::FmtDate,
        name: "FMT_DATE",
        help: "Appearance: Format: date (e.g. dMy, y/m/d), or AUTO",
        kind: text_or("AUTO"),
    },
    VarDef {
        var: ConfigVar::ShellProg,
        name: "SHELLPROG",
        help: "Shell program, see help (AUTO = your login shell)",
        kind: text_or("AUTO"),
    },
    VarDef {
        var: ConfigVar::CmdF3,
        name: "CMD_F3",
        help: "Command F3 = view file(s)",
        kind: text("more $f"),
    },
    VarDef {
        var: ConfigVar::CmdF4,
        name: "CMD_F4",
        help: "Command F4 = edit file(s)",
        kind: text("vi $f"),
    },
    VarDef {
        var: ConfigVar::CmdF5,
        name: "CMD_F5",
        help: "Command F5 = copy file(s)",
        kind: text("cp -ir $f $2"),
    },
    VarDef {
        var: ConfigVar::CmdF6,
        name: "CMD_F6",
        help: "Command F6 = move file(s)",
        kind: text("mv -i $f $2"),
    },
    VarDef {
        var: ConfigVar::CmdF7,
        name: "CMD_F7",
        help: "Command F7 = make directory",
        kind: text("mkdir "),
    },
    VarDef {
        var: ConfigVar::CmdF8,
        name: "CMD_F8",
        help: "Command F8 = remove file(s)",
        kind: text("rm $f"),
    },
    VarDef {
        var: ConfigVar::CmdF9,
        name: "CMD_F9",
        help: "Command F9 = print file(s)",
        kind: text("lpr $f"),
    },
    VarDef {
        var: ConfigVar::CmdF10,
        name: "CMD_F10",
        help: "Command F10 = user defined",
        kind: text(""),
    },
    VarDef {
        var: ConfigVar::CmdF11,
        name: "CMD_F11",
        help: "Command F11 = user defined",
        kind: text(""),
    },
    VarDef {
        var: ConfigVar::CmdF12,
        name: "CMD_F12",
        help: "Command F12 = user defined",
        kind: text(""),
    },
    VarDef {
        var: ConfigVar::WarnRm,
        name: "WARN_RM",
        help: "Warn before executing 'rm' (remove) command",
        kind: enumerated(1, NO_YES),
    },
    VarDef {
        var: ConfigVar::WarnLong,
        name: "WARN_LONG",
        help: "Warn that the command line is too long to be displayed",
        kind: enumerated(1, NO_YES),
    },
    VarDef {
        var: ConfigVar::WarnSelect,
        name: "WARN_SELECT",
        help: "Remind that you have selected some files",
        kind: enumerated(1, NO_YES),
    },
    VarDef {
        var: ConfigVar::Dir2,
        name: "DIR2",
        help: "Secondary file panel's initial directory (HOME = home dir)",
        kind: text_or("HOME"),
    },
    VarDef {
        var: ConfigVar::Quote,
        name: "QUOTE",
        help: "Additional filename chars to be quoted, see help",
        kind: text(""),
    },
    VarDef {
        var: ConfigVar::CPanelSize,
        name: "C_PANEL_SIZE",
        help: "Completion panel size (AUTO = screen size)",
        kind: panel_size(0, Some("AUTO")),
    },
    VarDef {
        var: ConfigVar::DPanelSize,
        name: "D_PANEL_SIZE",
        help: "Directory panel size (AUTO = screen size)",
        kind: panel_size(0, Some("AUTO")),
    },
    VarDef {
        var: ConfigVar::HPanelSize,
        name: "H_PANEL_SIZE",
        help: "History panel size",
        kind: panel_size(40, None),
    },
    VarDef {
        var: ConfigVar::ViewerCmd,
        name: "VIEWER_CMD",
        help: "File viewer command",
        kind: text("less $f"),
    },
    VarDef {
        var: ConfigVar::NopromptCmds,
        name: "NOPROMPT_CMDS",
        help: "List of interactive commands, see help",
        kind: text("less man vi vim"),
    },
    VarDef {
        var: ConfigVar::ShowHidden,
        name: "SHOW_HIDDEN",
        help: "Appearance: Whether to show hidden .files",
        kind: enumerated(0, &[
            "Show hidden .files",
            "Show hidden .files, except in home directory",
            "Do not show hidden .files",
        ]),
    },
    VarDef {
        var: ConfigVar::ShowLinkTarget,
        name: "SHOW_LINKTRGT",
        help: "Appearance: Whether to show link targets",
        kind: enumerated(0, &["Show link target", "Do not show link target"]),
    },
];

impl ConfigVar {
    #[must_use]
    pub fn def(self) -> &'static VarDef { &VARS[self as usize] }

    #[must_use]
    pub fn name(self) -> &'static str { self.def().name }

    #[must_use]
    pub fn from_name(name: &str) -> Option<ConfigVar> {
        ConfigVar::iter().find(|var| var.name() == name)
    }

    /// The variable at row `index` of the configuration panel.
    #[must_use]
    pub fn at(index: usize) -> Option<ConfigVar> { ConfigVar::iter().nth(index) }

    /// The macro bound to function key `n` (3 to 12).
    #[must_use]
    pub fn function_key(n: u8) -> Option<ConfigVar> {
        let index = usize::from(n.checked_sub(3)?);
        [
            ConfigVar::CmdF3,
            ConfigVar::CmdF4,
            ConfigVar::CmdF5,
            ConfigVar::CmdF6,
            ConfigVar::CmdF7,
            ConfigVar::CmdF8,
            ConfigVar::CmdF9,
            ConfigVar::CmdF10,
            ConfigVar::CmdF11,
            ConfigVar::CmdF12,
        ]
        .get(index)
        .copied()
    }

    #[must_use]
    pub fn is_num(self) -> bool { matches!(self.def().kind, VarKind::Num { .. }) }

    #[must_use]
    pub fn is_enumerated(self) -> bool {
        matches!(self.def().kind, VarKind::Num { labels, .. } if !labels.is_empty())
    }

    fn default_value(self) -> ConfigValue {
        match self.def().kind {
            VarKind::Num { default, .. } => ConfigValue::Num(default),
            VarKind::Text { default, .. } => ConfigValue::Text(default.to_string()),
        }
    }
}

/// One value as stored in `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Num(i32),
    Text(String),
}

/// Problems with the configuration file. None of them are fatal: the offending entry
/// is skipped and the default stays in effect.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot parse the configuration file")]
    #[diagnostic(
        code(clex::config::parse),
        help("the file must be a JSON object of VARIABLE: value pairs")
    )]
    Parse(#[source] serde_json::Error),

    #[error("unknown variable {name}")]
    #[diagnostic(code(clex::config::unknown_variable))]
    UnknownVariable { name: String },

    #[error("{name}: invalid number")]
    #[diagnostic(code(clex::config::not_numeric))]
    NotNumeric { name: String },

    #[error("{name}: numeric value out of range")]
    #[diagnostic(code(clex::config::out_of_range))]
    OutOfRange { name: String },

    #[error("{name}: string value required")]
    #[diagnostic(code(clex::config::not_text))]
    NotText { name: String },

    #[error("{name}: string value is too long")]
    #[diagnostic(code(clex::config::too_long))]
    TooLong { name: String },

    #[error("cannot write the configuration file")]
    #[diagnostic(code(clex::config::write))]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    initial: Vec<ConfigValue>,
    current: Vec<ConfigValue>,
    new: Vec<ConfigValue>,
}

impl Default for Config {
    fn default() -> Self { Self::new() }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        let initial: Vec<ConfigValue> = ConfigVar::iter().map(ConfigVar::default_value).collect();
        Self {
            current: initial.clone(),
            new: initial.clone(),
            initial,
        }
    }

    // Values in effect.

    #[must_use]
    pub fn num(&self, var: ConfigVar) -> i32 {
        match &self.current[var as usize] {
            ConfigValue::Num(n) => *n,
            ConfigValue::Text(_) => 0,
        }
    }

    #[must_use]
    pub fn text(&self, var: ConfigVar) -> &str {
        match &self.current[var as usize] {
            ConfigValue::Text(it) => it,
            ConfigValue::Num(_) => "",
        }
    }

    #[must_use]
    pub fn flag(&self, var: ConfigVar) -> bool { self.num(var) != 0 }

    /// The active file panel layout.
    #[must_use]
    pub fn layout(&self) -> &str {
        match self.num(ConfigVar::ActiveLayout) {
            1 => self.text(ConfigVar::Layout2),
            2 => self.text(ConfigVar::Layout3),
            _ => self.text(ConfigVar::Layout1),
        }
    }

    /// Set a value outside of the panel, eg: the sort order chosen elsewhere. Returns
    /// true when it changed.
    pub fn set_current(&mut self, var: ConfigVar, value: ConfigValue) -> bool {
        let slot = &mut self.current[var as usize];
        let changed = *slot != value;
        *slot = value;
        changed
    }

    // Loading and saving.

    /// Apply the contents of `config.json` on top of the defaults. Bad entries are
    /// skipped and returned.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] when the file is not a JSON object of values.
    pub fn load_json(&mut self, json: &str) -> Result<Vec<ConfigError>, ConfigError> {
        let entries: BTreeMap<String, ConfigValue> =
            serde_json::from_str(json).map_err(ConfigError::Parse)?;
        let mut problems = Vec::new();
        for (name, value) in entries {
            match check_value(&name, value) {
                Ok((var, value)) => self.current[var as usize] = value,
                Err(problem) => problems.push(problem),
            }
        }
        self.new.clone_from(&self.current);
        Ok(problems)
    }

    /// The variables that differ from their defaults, as written to `config.json`.
    ///
    /// # Errors
    ///
    /// Serialization failures (never expected for these value types).
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let entries: BTreeMap<&str, &ConfigValue> = ConfigVar::iter()
            .filter(|var| self.current[*var as usize] != self.initial[*var as usize])
            .map(|var| (var.name(), &self.current[var as usize]))
            .collect();
        serde_json::to_string_pretty(&entries).map_err(ConfigError::Parse)
    }

    // The configuration panel.

    /// Start editing: the panel shows the values in effect.
    pub fn begin_edit(&mut self) { self.new.clone_from(&self.current); }

    /// The edited value in readable form.
    #[must_use]
    pub fn print_value(&self, var: ConfigVar) -> String {
        match (var.def().kind, &self.new[var as usize]) {
            (VarKind::Num { special: Some(name), .. }, ConfigValue::Num(0))
            | (VarKind::Text { special: Some(name), .. }, ConfigValue::Text(_))
                if self.is_special(var) =>
            {
                name.to_string()
            }
            (VarKind::Num { min, labels, .. }, ConfigValue::Num(n)) if !labels.is_empty() => {
                let index = usize::try_from(n - min).unwrap_or(0);
                labels.get(index).copied().unwrap_or_default().to_string()
            }
            (_, ConfigValue::Num(n)) => n.to_string(),
            (_, ConfigValue::Text(it)) => it.clone(),
        }
    }

    fn is_special(&self, var: ConfigVar) -> bool {
        match &self.new[var as usize] {
            ConfigValue::Num(n) => *n == 0,
            ConfigValue::Text(it) => it.is_empty(),
        }
    }

    /// `<enter>` on an enumerated variable steps to the next label.
    pub fn cycle(&mut self, var: ConfigVar) {
        if let VarKind::Num { min, max, .. } = var.def().kind {
            if let ConfigValue::Num(n) = &mut self.new[var as usize] {
                *n = if *n >= max { min } else { *n + 1 };
            }
        }
    }

    pub fn set_standard(&mut self, var: ConfigVar) {
        self.new[var as usize] = self.initial[var as usize].clone();
    }

    pub fn set_original(&mut self, var: ConfigVar) {
        self.new[var as usize] = self.current[var as usize].clone();
    }

    /// Prompt for the numeric and text edit modes.
    #[must_use]
    pub fn edit_prompt(var: ConfigVar) -> String {
        match var.def().kind {
            VarKind::Num {
                min, max, special, ..
            } => match special {
                Some(special) => format!("{} (range: {min} - {max} or {special}): ", var.name()),
                None => format!("{} (range: {min} - {max}): ", var.name()),
            },
            VarKind::Text { special, .. } => match special {
                Some(special) => {
                    format!("{} ({CFG_VALUE_LEN} chars max or {special}): ", var.name())
                }
                None => format!("{} ({CFG_VALUE_LEN} chars max): ", var.name()),
            },
        }
    }

    /// Accept a typed numeric value. The error is a remark for the user.
    ///
    /// # Errors
    ///
    /// Not a number, or out of range.
    pub fn edit_num(&mut self, var: ConfigVar, input: &str) -> Result<(), &'static str> {
        let VarKind::Num {
            min, max, special, ..
        } = var.def().kind
        else {
            return Err(ui_str::CFG_NUMERIC_REQUIRED);
        };
        if special == Some(input) {
            self.new[var as usize] = ConfigValue::Num(0);
            return Ok(());
        }
        let value: i32 = input.trim().parse().map_err(|_| ui_str::CFG_NUMERIC_REQUIRED)?;
        if value < min || value > max {
            return Err(ui_str::CFG_OUT_OF_RANGE);
        }
        self.new[var as usize] = ConfigValue::Num(value);
        Ok(())
    }

    /// Accept a typed string value. The error is a remark for the user.
    ///
    /// # Errors
    ///
    /// The value is too long.
    pub fn edit_text(&mut self, var: ConfigVar, input: &str) -> Result<(), &'static str> {
        let VarKind::Text { special, .. } = var.def().kind else {
            return Err(ui_str::CFG_TOO_LONG);
        };
        if special == Some(input) {
            self.new[var as usize] = ConfigValue::Text(String::new());
            return Ok(());
        }
        if input.chars().count() > CFG_VALUE_LEN {
            return Err(ui_str::CFG_TOO_LONG);
        }
        self.new[var as usize] = ConfigValue::Text(input.to_string());
        Ok(())
    }

    /// Put the edited values into effect. Returns the variables that changed.
    pub fn accept(&mut self) -> Vec<ConfigVar> {
        let changed: Vec<ConfigVar> = ConfigVar::iter()
            .filter(|var| self.new[*var as usize] != self.current[*var as usize])
            .collect();
        for var in &changed {
            self.current[*var as usize] = self.new[*var as usize].clone();
        }
        changed
    }
}

fn check_value(name: &str, value: ConfigValue) -> Result<(ConfigVar, ConfigValue), ConfigError> {
    let Some(var) = ConfigVar::from_name(name) else {
        return Err(ConfigError::UnknownVariable { name: name.into() });
    };
    match (var.def().kind, value) {
        (
            VarKind::Num {
                min, max, special, ..
            },
            ConfigValue::Num(n),
        ) => {
            if (n < min || n > max) && !(n == 0 && special.is_some()) {
                return Err(ConfigError::OutOfRange { name: name.into() });
            }
            Ok((var, ConfigValue::Num(n)))
        }
        (VarKind::Num { .. }, ConfigValue::Text(_)) => {
            Err(ConfigError::NotNumeric { name: name.into() })
        }
        (VarKind::Text { .. }, ConfigValue::Text(it)) => {
            if it.chars().count() > CFG_VALUE_LEN {
                return Err(ConfigError::TooLong { name: name.into() });
            }
            Ok((var, ConfigValue::Text(it)))
        }
        (VarKind::Text { .. }, ConfigValue::Num(_)) => {
            Err(ConfigError::NotText { name: name.into() })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for (index, var) in ConfigVar::iter().enumerate() {
            assert_eq!(VARS[index].var, var);
            assert!(VARS[index].name.len() <= CFG_VAR_LEN);
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.num(ConfigVar::HPanelSize), 40);
        assert_eq!(config.num(ConfigVar::GroupFiles), 2);
        assert_eq!(config.text(ConfigVar::CmdF5), "cp -ir $f $2");
        assert_eq!(config.layout(), "$d $S $>$t $M $*|  $p $o $L");
        assert!(config.flag(ConfigVar::WarnRm));
    }

    #[test]
    fn test_print_value() {
        let config = Config::new();
        assert_eq!(config.print_value(ConfigVar::CPanelSize), "AUTO");
        assert_eq!(config.print_value(ConfigVar::HPanelSize), "40");
        assert_eq!(config.print_value(ConfigVar::WarnRm), "Yes");
        assert_eq!(config.print_value(ConfigVar::Dir2), "HOME");
        assert_eq!(config.print_value(ConfigVar::CmdF4), "vi $f");
    }

    #[test]
    fn test_cycle_wraps() {
        let mut config = Config::new();
        config.cycle(ConfigVar::WarnRm);
        assert_eq!(config.print_value(ConfigVar::WarnRm), "No");
        config.cycle(ConfigVar::WarnRm);
        assert_eq!(config.print_value(ConfigVar::WarnRm), "Yes");
        config.cycle(ConfigVar::CmdLines);
        config.cycle(ConfigVar::CmdLines);
        assert_eq!(config.print_value(ConfigVar::CmdLines), "4 screen lines");
        config.cycle(ConfigVar::CmdLines);
        assert_eq!(config.print_value(ConfigVar::CmdLines), "2 screen lines");
    }

    #[test_case("50", Ok(()) ; "in range")]
    #[test_case(" 12 ", Ok(()) ; "spaces allowed")]
    #[test_case("5", Err(ui_str::CFG_OUT_OF_RANGE) ; "too small")]
    #[test_case("x1", Err(ui_str::CFG_NUMERIC_REQUIRED) ; "not a number")]
    #[test_case("AUTO", Ok(()) ; "special value")]
    fn test_edit_num(input: &str, expected: Result<(), &'static str>) {
        let mut config = Config::new();
        assert_eq!(config.edit_num(ConfigVar::CPanelSize, input), expected);
    }

    #[test]
    fn test_edit_text_limits() {
        let mut config = Config::new();
        let long = "x".repeat(CFG_VALUE_LEN + 1);
        assert_eq!(config.edit_text(ConfigVar::CmdF3, &long), Err(ui_str::CFG_TOO_LONG));
        assert_eq!(config.edit_text(ConfigVar::ShellProg, "AUTO"), Ok(()));
        assert_eq!(config.print_value(ConfigVar::ShellProg), "AUTO");
    }

    #[test]
    fn test_accept_reports_changes_and_original_restores() {
        let mut config = Config::new();
        config.begin_edit();
        config.edit_num(ConfigVar::HPanelSize, "60").unwrap();
        config.set_original(ConfigVar::HPanelSize);
        config.edit_text(ConfigVar::CmdF7, "mkdir -p ").unwrap();
        assert_eq!(config.accept(), vec![ConfigVar::CmdF7]);
        assert_eq!(config.text(ConfigVar::CmdF7), "mkdir -p ");

        config.begin_edit();
        config.set_standard(ConfigVar::CmdF7);
        assert_eq!(config.accept(), vec![ConfigVar::CmdF7]);
        assert_eq!(config.text(ConfigVar::CmdF7), "mkdir ");
    }

    #[test]
    fn test_json_keeps_only_changed_values() {
        let mut config = Config::new();
        config.begin_edit();
        config.edit_num(ConfigVar::HPanelSize, "99").unwrap();
        config.accept();
        let json = config.to_json().unwrap();

        let mut other = Config::new();
        let problems = other.load_json(&json).unwrap();
        assert!(problems.is_empty());
        assert_eq!(other.num(ConfigVar::HPanelSize), 99);
        assert!(!json.contains("CMD_F3"));
    }

    #[test]
    fn test_load_skips_bad_entries() {
        let mut config = Config::new();
        let json = r#"{"WARN_RM": 0, "NO_SUCH": 1, "H_PANEL_SIZE": 5, "CMD_F3": 7, "C_PANEL_SIZE": 0}"#;
        let problems = config.load_json(json).unwrap();
        assert_eq!(problems.len(), 3);
        assert!(matches!(problems[0], ConfigError::NotText { .. }));
        assert!(matches!(problems[1], ConfigError::OutOfRange { .. }));
        assert!(matches!(problems[2], ConfigError::UnknownVariable { .. }));
        assert!(!config.flag(ConfigVar::WarnRm));
        assert!(config.load_json("[1, 2]").is_err());
    }
}
