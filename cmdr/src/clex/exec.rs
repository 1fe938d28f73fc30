// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Running the command line.
//!
//! A plain `cd` is intercepted by the caller with [`check_cd`]; everything else is
//! handed to the shell named by the `SHELLPROG` variable (the login shell by
//! default). The full screen is suspended while the command runs, so the command
//! owns the terminal.

use std::{os::unix::process::ExitStatusExt, path::Path, process::Command};

use clex_tui::{CommonResult, SHELL_SPECIAL_CHARS};
use miette::Diagnostic;

use super::{Terminal, ui_str};

pub const MAX_SHELL_ARGS: usize = 8;
pub const MAX_NOPROMPT_CMDS: usize = 128;
pub const COMMAND_PLACEHOLDER: &str = "<COMMAND>";
/// The C shell needs these quoted too.
pub const CSH_SPECIAL_CHARS: &str = "!:";

const CWD_NOT_ACCESSIBLE: &str = "WARNING: current working directory is not accessible";

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ExecError {
    #[error("CONFIG: Incorrect SHELLPROG: too many arguments, limit is {}", MAX_SHELL_ARGS)]
    #[diagnostic(code(clex::exec::too_many_args))]
    TooManyArgs,

    #[error("CONFIG: Incorrect SHELLPROG: no program name")]
    #[diagnostic(code(clex::exec::no_program))]
    NoProgram,
}

/// Shell families differ in the prompt char and in what has to be quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bourne,
    CShell,
    Other,
}

impl ShellType {
    /// From the shell's file name: `*sh` is Bourne like, `*csh` is a C shell.
    #[must_use]
    pub fn of(program: &str) -> Self {
        let name = base_name(program);
        if name.ends_with("csh") {
            ShellType::CShell
        } else if name.ends_with("sh") {
            ShellType::Bourne
        } else {
            ShellType::Other
        }
    }

    /// Prompt char for a normal user and for root.
    #[must_use]
    pub fn prompt_chars(self) -> [char; 2] {
        match self {
            ShellType::Bourne => ['$', '#'],
            ShellType::CShell => ['%', '#'],
            ShellType::Other => ['>', '>'],
        }
    }
}

fn base_name(path: &str) -> &str { path.rsplit('/').next().unwrap_or(path) }

/// How to start the shell: `argv` with the command placed at `cmd_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    argv: Vec<String>,
    cmd_index: usize,
    pub shell_type: ShellType,
}

impl ShellConfig {
    /// `prog arg ... <COMMAND> ...`, or `prog arg ...` to which `-c <command>` is
    /// appended.
    ///
    /// # Errors
    ///
    /// An empty program or more than [`MAX_SHELL_ARGS`] words.
    pub fn parse(shellprog: &str) -> Result<Self, ExecError> {
        let mut argv: Vec<String> = shellprog.split(' ').filter(|it| !it.is_empty()).map(str::to_string).collect();
        if argv.is_empty() {
            return Err(ExecError::NoProgram);
        }
        if argv.len() > MAX_SHELL_ARGS {
            return Err(ExecError::TooManyArgs);
        }
        let cmd_index = match argv.iter().skip(1).position(|it| it == COMMAND_PLACEHOLDER) {
            Some(index) => index + 1,
            None => {
                argv.push("-c".to_string());
                argv.push(COMMAND_PLACEHOLDER.to_string());
                argv.len() - 1
            }
        };
        let shell_type = ShellType::of(&argv[0]);
        Ok(Self {
            argv,
            cmd_index,
            shell_type,
        })
    }

    /// The configured program, falling back to the login shell. Returns a warning
    /// when the configured program was rejected.
    #[must_use]
    pub fn configure(shellprog: &str, login_shell: &str) -> (Self, Option<String>) {
        let login = || {
            Self::parse(login_shell).unwrap_or_else(|_| Self {
                argv: vec!["/bin/sh".into(), "-c".into(), COMMAND_PLACEHOLDER.into()],
                cmd_index: 2,
                shell_type: ShellType::Bourne,
            })
        };
        if shellprog.is_empty() {
            return (login(), None);
        }
        match Self::parse(shellprog) {
            Ok(it) => (it, None),
            Err(error) => {
                tracing::warn!(message = "rejected SHELLPROG", %error);
                (
                    login(),
                    Some(format!("{error}; EXEC: Will use your login shell: {login_shell}")),
                )
            }
        }
    }

    #[must_use]
    pub fn program(&self) -> &str { &self.argv[0] }

    /// The argument vector that runs `cmd`.
    #[must_use]
    pub fn argv_for(&self, cmd: &str) -> Vec<String> {
        let mut argv = self.argv.clone();
        argv[self.cmd_index] = cmd.to_string();
        argv
    }

    /// The command line prompt: the configured text, or the shell name followed by
    /// the shell's prompt char.
    #[must_use]
    pub fn prompt(&self, configured: &str, is_root: bool) -> String {
        let root = if is_root { "ROOT " } else { "" };
        if configured.is_empty() {
            let ch = self.shell_type.prompt_chars()[usize::from(is_root)];
            format!("{root}{} {ch} ", base_name(self.program()))
        } else {
            format!("{root}{configured} ")
        }
    }

    /// Characters to backslash besides [`SHELL_SPECIAL_CHARS`].
    #[must_use]
    pub fn quote_chars(&self, configured: &str) -> String {
        let mut chars = configured.to_string();
        if self.shell_type == ShellType::CShell {
            chars.push_str(CSH_SPECIAL_CHARS);
        }
        chars
    }
}

/// Words of the `NOPROMPT_CMDS` variable.
#[must_use]
pub fn noprompt_list(configured: &str) -> Vec<String> {
    configured
        .split(' ')
        .filter(|it| !it.is_empty())
        .take(MAX_NOPROMPT_CMDS)
        .map(str::to_string)
        .collect()
}

/// `cmd` starts with one of the `commands` as a whole word.
#[must_use]
pub fn is_noprompt(commands: &[String], cmd: &str) -> bool {
    commands.iter().any(|it| {
        cmd.strip_prefix(it.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
    })
}

/// `line` starts with `word` after leading spaces.
#[must_use]
pub fn test_word(line: &str, word: &str) -> bool { line.trim_start_matches(' ').starts_with(word) }

/// The target directory when `cmd` is a simple `cd` the file manager can do itself;
/// `None` for anything the shell has to run. `cd` alone means `home`. A leading
/// `~` is expanded by `tilde`.
#[must_use]
pub fn check_cd(cmd: &str, quote: &str, home: &str, tilde: impl Fn(&str) -> String) -> Option<String> {
    let rest = cmd.trim_start_matches(' ').strip_prefix("cd")?;
    if rest.is_empty() {
        return Some(home.to_string());
    }
    let arg = rest.strip_prefix(' ')?.trim_start_matches(' ');
    if arg.is_empty() {
        return Some(home.to_string());
    }

    let special = |ch: char| SHELL_SPECIAL_CHARS.contains(ch) || quote.contains(ch);
    let has_tilde = arg.starts_with('~');
    let mut dir = String::new();
    if has_tilde {
        dir.push('~');
    }
    let mut escaped = false;
    let mut ended = false;
    for ch in arg.chars().skip(usize::from(has_tilde)) {
        if escaped {
            escaped = false;
            dir.push(ch);
        } else if ch == '\\' {
            if ended {
                return None;
            }
            escaped = true;
        } else if ch == ' ' {
            ended = true;
        } else if ended || special(ch) {
            return None;
        } else {
            dir.push(ch);
        }
    }

    Some(if has_tilde { tilde(&dir) } else { dir })
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReport {
    Success,
    Code(i32),
    Signal(i32),
}

impl ExitReport {
    #[must_use]
    pub fn failed(self) -> bool { self != ExitReport::Success }

    /// What the user reads below the command output.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            ExitReport::Success => format!("\n{} ", ui_str::EXEC_SUCCESS),
            ExitReport::Code(code) => format!("\n{} ", ui_str::exit_code_report(code)),
            ExitReport::Signal(signal) => format!("\n{}\n", ui_str::signal_report(signal)),
        }
    }
}

/// Starts the shell and waits for it.
pub trait CommandRunner: std::fmt::Debug {
    /// # Errors
    ///
    /// The program could not be started.
    fn run(&mut self, argv: &[String], dir: &str) -> std::io::Result<ExitReport>;
}

/// Runs commands with [`std::process::Command`] in the panel's directory.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, argv: &[String], dir: &str) -> std::io::Result<ExitReport> {
        let Some((program, args)) = argv.split_first() else {
            return Err(std::io::Error::other("empty command"));
        };
        let status = Command::new(program).args(args).current_dir(dir).status()?;
        Ok(match (status.code(), status.signal()) {
            (Some(0), _) => ExitReport::Success,
            (Some(code), _) => ExitReport::Code(code),
            (None, Some(signal)) => ExitReport::Signal(signal),
            (None, None) => ExitReport::Code(-1),
        })
    }
}

/// Everything [`Executor::execute`] needs to know about the command line.
#[derive(Debug, Clone, Copy)]
pub struct ExecContext<'a> {
    pub cmd: &'a str,
    pub dir: &'a str,
    pub prompt_user: bool,
    pub warn_rm: bool,
    /// The command didn't fit on the screen and the long command warning is on.
    pub warn_long: bool,
}

/// What happened to a command handed to [`Executor::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The user said no to a warning.
    Declined,
    Finished { failed: bool },
}

#[derive(Debug)]
pub struct Executor {
    pub shell: ShellConfig,
    pub noprompt: Vec<String>,
    runner: Box<dyn CommandRunner>,
    /// The hint about turning warnings off is shown once.
    hint_pending: bool,
}

impl Executor {
    #[must_use]
    pub fn new(shell: ShellConfig, noprompt: Vec<String>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            shell,
            noprompt,
            runner,
            hint_pending: true,
        }
    }

    /// Run `ctx.cmd` with the screen suspended. Returns the outcome and a remark
    /// for the resumed screen.
    ///
    /// # Errors
    ///
    /// Terminal failures.
    pub fn execute(
        &mut self,
        term: &mut dyn Terminal,
        ctx: &ExecContext<'_>,
    ) -> CommonResult<(ExecOutcome, Option<&'static str>)> {
        let prompt_user = ctx.prompt_user && !is_noprompt(&self.noprompt, ctx.cmd);

        term.suspend()?;
        if prompt_user {
            term.print(&format!("\n{}\n\n", ctx.cmd))?;
        }

        let mut warn_level = 0;
        if !Path::new(ctx.dir).is_dir() {
            term.print(&format!("{CWD_NOT_ACCESSIBLE}\n"))?;
            warn_level = 1;
        }
        if ctx.warn_rm && test_word(ctx.cmd, "rm ") {
            term.print(&format!(
                "{}\n{}\n",
                ui_str::working_directory_line(ctx.dir),
                ui_str::WARN_RM
            ))?;
            warn_level = 2;
        }
        if ctx.warn_long {
            term.print(&format!("{}\n", ui_str::WARN_LONG))?;
            warn_level = 2;
        }

        let confirmed = warn_level == 0 || confirm(term)?;
        let outcome = if confirmed {
            let argv = self.shell.argv_for(ctx.cmd);
            tracing::info!(message = "execute", cmd = ctx.cmd, dir = ctx.dir);
            let failed = match self.runner.run(&argv, ctx.dir) {
                Ok(report) => {
                    tracing::debug!(message = "command finished", ?report);
                    term.print(&report.message())?;
                    report.failed()
                }
                Err(error) => {
                    tracing::warn!(message = "command not started", %error);
                    term.print(&format!("\n{} ({error})\n", ui_str::COMMAND_NOT_STARTED))?;
                    true
                }
            };
            if prompt_user || failed {
                press_enter(term)?;
            }
            ExecOutcome::Finished { failed }
        } else {
            ExecOutcome::Declined
        };
        term.resume()?;

        let mut remark = None;
        if warn_level >= 2 && self.hint_pending {
            self.hint_pending = false;
            remark = Some(ui_str::WARNINGS_CAN_BE_OFF);
        }
        Ok((outcome, remark))
    }
}

fn confirm(term: &mut dyn Terminal) -> CommonResult<bool> {
    term.print(&format!("\n{}", ui_str::CONFIRM_EXEC))?;
    let confirmed = matches!(term.read_char()?, Some('y' | 'Y'));
    term.print(if confirmed { "yes\n\n" } else { "no\n\n" })?;
    Ok(confirmed)
}

fn press_enter(term: &mut dyn Terminal) -> CommonResult<()> {
    term.print(ui_str::PRESS_ENTER)?;
    loop {
        match term.read_char()? {
            Some('\r' | '\n') | None => break,
            Some(_) => {}
        }
    }
    term.print("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::clex::test_fixtures::{FakeRunner, RecordingTerminal};

    fn tilde(dir: &str) -> String { dir.replacen('~', "/home/me", 1) }

    #[test_case("cd", Some("/home/me") ; "alone")]
    #[test_case("  cd   ", Some("/home/me") ; "only spaces")]
    #[test_case("cd /tmp", Some("/tmp") ; "absolute")]
    #[test_case("cd /tmp ", Some("/tmp") ; "trailing space")]
    #[test_case("cd my\\ dir", Some("my dir") ; "dequoted")]
    #[test_case("cd ~/src", Some("/home/me/src") ; "tilde")]
    #[test_case("cd /tmp; ls", None ; "special char")]
    #[test_case("cd a b", None ; "second word")]
    #[test_case("cdrom", None ; "other command")]
    #[test_case("ls", None ; "not cd")]
    fn test_check_cd(cmd: &str, expected: Option<&str>) {
        assert_eq!(check_cd(cmd, "", "/home/me", tilde).as_deref(), expected);
    }

    #[test]
    fn test_check_cd_extra_quote_chars() {
        assert_eq!(check_cd("cd a!b", "!", "/", tilde), None);
        assert_eq!(check_cd("cd a!b", "", "/", tilde).as_deref(), Some("a!b"));
    }

    #[test]
    fn test_shell_config() {
        let it = ShellConfig::parse("/bin/bash").unwrap();
        assert_eq!(it.argv_for("ls -l"), vec!["/bin/bash", "-c", "ls -l"]);
        assert_eq!(it.prompt("", false), "bash $ ");
        assert_eq!(it.prompt("", true), "ROOT bash # ");
        assert_eq!(it.prompt("clex", false), "clex ");

        let placed = ShellConfig::parse("/usr/bin/env  sh -c <COMMAND> x").unwrap();
        assert_eq!(placed.argv_for("pwd"), vec!["/usr/bin/env", "sh", "-c", "pwd", "x"]);

        let csh = ShellConfig::parse("/bin/tcsh").unwrap();
        assert_eq!(csh.shell_type, ShellType::CShell);
        assert_eq!(csh.prompt("", false), "tcsh % ");
        assert_eq!(csh.quote_chars("^"), "^!:");

        assert_eq!(ShellType::of("/usr/bin/nu"), ShellType::Other);
        assert!(matches!(
            ShellConfig::parse("a 1 2 3 4 5 6 7 8"),
            Err(ExecError::TooManyArgs)
        ));
    }

    #[test]
    fn test_configure_falls_back_to_login_shell() {
        let (it, warning) = ShellConfig::configure("a 1 2 3 4 5 6 7 8", "/bin/zsh");
        assert_eq!(it.program(), "/bin/zsh");
        assert!(warning.unwrap().contains("/bin/zsh"));
    }

    #[test]
    fn test_noprompt() {
        let list = noprompt_list("vi  less");
        assert!(is_noprompt(&list, "vi file"));
        assert!(is_noprompt(&list, "less"));
        assert!(!is_noprompt(&list, "view file"));
    }

    fn executor(runner: FakeRunner) -> Executor {
        Executor::new(
            ShellConfig::parse("/bin/sh").unwrap(),
            noprompt_list("true"),
            Box::new(runner),
        )
    }

    fn ctx<'a>(cmd: &'a str, dir: &'a str) -> ExecContext<'a> {
        ExecContext {
            cmd,
            dir,
            prompt_user: true,
            warn_rm: true,
            warn_long: false,
        }
    }

    #[test]
    fn test_execute_success() {
        let runner = FakeRunner::new(ExitReport::Success);
        let mut exec = executor(runner.clone());
        let mut term = RecordingTerminal::new("\r");
        let (outcome, remark) = exec.execute(&mut term, &ctx("ls", "/")).unwrap();
        assert_eq!(outcome, ExecOutcome::Finished { failed: false });
        assert_eq!(remark, None);
        assert_eq!(runner.commands(), vec![vec!["/bin/sh", "-c", "ls"]]);
        let printed = term.printed();
        assert!(printed.contains("\nls\n"));
        assert!(printed.contains(ui_str::EXEC_SUCCESS));
        assert!(printed.contains(ui_str::PRESS_ENTER));
        assert_eq!(term.suspends(), 1);
    }

    #[test]
    fn test_execute_rm_needs_confirmation() {
        let runner = FakeRunner::new(ExitReport::Success);
        let mut exec = executor(runner.clone());
        let mut term = RecordingTerminal::new("n");
        let (outcome, remark) = exec.execute(&mut term, &ctx("rm x", "/")).unwrap();
        assert_eq!(outcome, ExecOutcome::Declined);
        assert_eq!(remark, Some(ui_str::WARNINGS_CAN_BE_OFF));
        assert!(runner.commands().is_empty());
        assert!(term.printed().contains(ui_str::WARN_RM));

        // Confirmed this time, and the hint is not repeated.
        let mut term = RecordingTerminal::new("y\r");
        let (outcome, remark) = exec.execute(&mut term, &ctx("rm x", "/")).unwrap();
        assert_eq!(outcome, ExecOutcome::Finished { failed: false });
        assert_eq!(remark, None);
    }

    #[test]
    fn test_execute_failure_waits_for_enter() {
        let runner = FakeRunner::new(ExitReport::Code(2));
        let mut exec = executor(runner);
        let mut term = RecordingTerminal::new("\r");
        let ctx = ExecContext {
            prompt_user: false,
            ..ctx("false", "/")
        };
        let (outcome, _) = exec.execute(&mut term, &ctx).unwrap();
        assert_eq!(outcome, ExecOutcome::Finished { failed: true });
        assert!(term.printed().contains("Exit code = 2."));
        assert!(term.printed().contains(ui_str::PRESS_ENTER));
    }

    #[test]
    fn test_noprompt_command_does_not_wait() {
        let runner = FakeRunner::new(ExitReport::Success);
        let mut exec = executor(runner);
        let mut term = RecordingTerminal::new("");
        exec.execute(&mut term, &ctx("true", "/")).unwrap();
        assert!(!term.printed().contains(ui_str::PRESS_ENTER));
    }
}
