// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Display, Formatter, Result},
          fs::{self},
          path::{Path, PathBuf}};

use clex_tui::{CommonError, CommonErrorType, CommonResult};
use dirs::config_dir;

pub enum ConfigPaths {
    TopLevelFolderName,
    ConfigFile,
    BookmarksFile,
}

impl Display for ConfigPaths {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let path = match self {
            ConfigPaths::TopLevelFolderName => "clex",
            ConfigPaths::ConfigFile => "config.json",
            ConfigPaths::BookmarksFile => "bookmarks",
        };
        write!(f, "{path}")
    }
}

#[must_use]
pub fn get_config_file_path(folder: &Path) -> PathBuf {
    folder.join(ConfigPaths::ConfigFile.to_string())
}

#[must_use]
pub fn get_bookmarks_file_path(folder: &Path) -> PathBuf {
    folder.join(ConfigPaths::BookmarksFile.to_string())
}

/// This is where the config folder is.
#[must_use]
pub fn try_get_config_folder_path() -> Option<PathBuf> {
    let home_config_folder_path = config_dir()?;
    Some(home_config_folder_path.join(ConfigPaths::TopLevelFolderName.to_string()))
}

/// Create the config folder if needed. Done once at startup.
///
/// # Errors
///
/// The folder path can't be determined or created.
pub fn create() -> CommonResult<PathBuf> {
    match try_get_config_folder_path() {
        Some(config_folder_path) => match fs::create_dir_all(&config_folder_path) {
            Ok(()) => {
                // % is Display, ? is Debug.
                tracing::debug!(
                    message = "Config folder ready.",
                    config_folder = ?config_folder_path
                );
                Ok(config_folder_path)
            }
            Err(error) => {
                tracing::error!(
                    message = "Could not create config folder.",
                    error = ?error
                );
                CommonError::new_error_result_with_only_type(
                    CommonErrorType::ConfigFolderCountNotBeCreated,
                )
            }
        },
        None => {
            tracing::error!(message = "Could not access config folder.", error = "None");
            CommonError::new_error_result_with_only_type(
                CommonErrorType::ConfigFolderPathCouldNotBeGenerated,
            )
        }
    }
}
