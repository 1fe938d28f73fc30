// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Start up and shut down: configuration files, the terminal and the root mode.

use std::{fs, io, path::{Path, PathBuf}};

use clex_tui::{CommonError, CommonResult, CrosstermKeySource, ModeExit, Session, SessionApp};

use super::{AppInit, Bookmarks, CLEX_REGISTRY, ClexApp, Config, CrosstermTerminal, Mode,
            ShellRunner, UserData, View,
            config_folder::{self, get_bookmarks_file_path, get_config_file_path}};

/// Everything read from disk before the terminal is taken over.
#[derive(Debug)]
struct Startup {
    config: Config,
    config_path: Option<PathBuf>,
    bookmarks: Bookmarks,
    warnings: Vec<String>,
}

/// Check the key tables, then load the configuration and the bookmarks from
/// `folder`. Problems with the files become start-up warnings.
///
/// # Errors
///
/// The key tables are inconsistent.
fn prepare(folder: Option<&Path>) -> CommonResult<Startup> {
    CLEX_REGISTRY.validate()?;

    let mut warnings = Vec::new();
    let config_path = folder.map(get_config_file_path);
    let mut config = Config::new();
    if let Some(path) = config_path.as_deref() {
        warnings.extend(load_config(&mut config, path));
    }

    let mut bookmarks = Bookmarks::new(folder.map(get_bookmarks_file_path));
    if let Err(error) = bookmarks.load() {
        tracing::warn!(message = "bookmarks not loaded", %error);
        warnings.push(error.to_string());
    }

    Ok(Startup {
        config,
        config_path,
        bookmarks,
        warnings,
    })
}

/// Run the file manager until the user quits.
///
/// # Errors
///
/// The key tables are inconsistent, the terminal can't be used or the key input
/// failed.
pub fn run_clex() -> CommonResult<()> {
    let folder = config_folder::create().ok();
    let startup = prepare(folder.as_deref())?;

    let cwd = std::env::current_dir()
        .map_err(|error| CommonError::from_io(&error, "working directory"))?
        .to_string_lossy()
        .into_owned();
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));

    let term = CrosstermTerminal::start()?;
    let mut app = ClexApp::new(AppInit {
        config: startup.config,
        config_path: startup.config_path,
        bookmarks: startup.bookmarks,
        users: UserData::default(),
        cwd,
        warnings: startup.warnings,
        term: Box::new(term),
        runner: Box::new(ShellRunner),
    })?;
    let geometry = app.on_resize(cols, rows);
    let mut session = Session::new(
        &CLEX_REGISTRY,
        Box::new(CrosstermKeySource::new()),
        View::Files,
        geometry,
    );

    tracing::info!(message = "clex started", cols, rows);
    let result = session.run_mode(&mut app, Mode::File);
    app.stop_terminal()?;
    match result? {
        ModeExit::Quit => tracing::info!(message = "clex quit"),
        ModeExit::Return => tracing::warn!(message = "root mode returned"),
    }
    Ok(())
}

/// Apply `config.json` when it exists. Returns the warnings to show on start.
fn load_config(config: &mut Config, path: &Path) -> Vec<String> {
    let json = match fs::read_to_string(path) {
        Ok(it) => it,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(error) => {
            tracing::warn!(message = "configuration not read", path = %path.display(), %error);
            return vec![format!("CONFIG: Cannot read {} ({error})", path.display())];
        }
    };
    match config.load_json(&json) {
        Ok(problems) => problems
            .iter()
            .map(|problem| {
                tracing::warn!(message = "configuration entry skipped", %problem);
                problem.to_string()
            })
            .collect(),
        Err(error) => {
            tracing::warn!(message = "configuration not parsed", %error);
            vec![error.to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use clex_tui::try_create_temp_dir;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clex::ConfigVar;

    #[test]
    fn test_missing_config_file_is_fine() {
        let tmp = try_create_temp_dir().unwrap();
        let mut config = Config::new();
        let warnings = load_config(&mut config, &tmp.path().join("config.json"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_config_file_applied_with_warnings() {
        let tmp = try_create_temp_dir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{ "CMD_LINES": 3, "NO_SUCH_VAR": 1 }"#).unwrap();
        let mut config = Config::new();
        let warnings = load_config(&mut config, &path);
        assert_eq!(config.num(ConfigVar::CmdLines), 3);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_broken_config_file_is_reported() {
        let tmp = try_create_temp_dir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        let mut config = Config::new();
        assert_eq!(load_config(&mut config, &path).len(), 1);
        assert_eq!(config.num(ConfigVar::CmdLines), Config::new().num(ConfigVar::CmdLines));
    }

    #[test]
    fn test_prepare_reads_the_config_folder() {
        let tmp = try_create_temp_dir().unwrap();
        let folder = tmp.path().to_path_buf();
        fs::write(get_config_file_path(&folder), r#"{ "CMD_LINES": 4 }"#).unwrap();
        let startup = prepare(Some(&folder)).unwrap();
        assert_eq!(startup.config.num(ConfigVar::CmdLines), 4);
        assert_eq!(startup.config_path, Some(get_config_file_path(&folder)));
        assert!(startup.warnings.is_empty(), "{:?}", startup.warnings);
    }

    #[test]
    fn test_prepare_without_a_config_folder() {
        let startup = prepare(None).unwrap();
        assert_eq!(startup.config_path, None);
        assert!(startup.warnings.is_empty());
    }
}
