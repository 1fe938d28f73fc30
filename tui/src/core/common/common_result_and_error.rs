// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Errors fall in two classes here:
//!
//! 1. Wiring defects (an unknown mode, a corrupt table) and failures of the terminal
//!    itself. These are [`miette::Report`]s that propagate with `?` all the way out of
//!    the outermost [`crate::Session::run_mode`] call.
//! 2. Conditions the user can cause (unbound key, nothing to undo). These never become
//!    errors; they are remarks on the [`crate::StatusLine`].

use std::{error::Error,
          fmt::{Debug, Display, Formatter, Result}};

/// Type alias to make it easy to work with [`miette::Result`] and [`miette::Report`].
///
/// # Example
///
/// ```
/// use clex_tui::{CommonError, CommonErrorType, CommonResult};
/// pub fn parse_level(arg: &str) -> CommonResult<u8> {
///     match arg.parse::<u8>() {
///         Ok(level) if level <= 5 => Ok(level),
///         _ => CommonError::new_error_result(
///             CommonErrorType::InvalidArguments,
///             &format!("invalid compare level: {arg}"),
///         ),
///     }
/// }
/// ```
pub type CommonResult<T> = miette::Result<T>;

/// Common error struct, wrapped in a [`miette::Report`] by the constructors below.
#[derive(Debug, Clone)]
pub struct CommonError {
    pub error_type: CommonErrorType,
    pub error_message: Option<String>,
}

/// Some common errors that can occur.
#[non_exhaustive]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonErrorType {
    #[default]
    General,
    InvalidArguments,
    NotFound,
    IOError,
    ConfigFolderCountNotBeCreated,
    ConfigFolderPathCouldNotBeGenerated,
}

impl Error for CommonError {}

/// Same as the derived [`Debug`] implementation.
impl Display for CommonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { Debug::fmt(self, f) }
}

impl CommonError {
    /// Both [`CommonError::error_type`] and [`CommonError::error_message`] available.
    ///
    /// # Errors
    ///
    /// Always returns the error it was asked to build.
    pub fn new_error_result<T>(err_type: CommonErrorType, msg: &str) -> CommonResult<T> {
        Err(miette::miette!(CommonError {
            error_type: err_type,
            error_message: Some(msg.to_string()),
        }))
    }

    /// Only [`CommonError::error_type`] available, and no message.
    ///
    /// # Errors
    ///
    /// Always returns the error it was asked to build.
    pub fn new_error_result_with_only_type<T>(err_type: CommonErrorType) -> CommonResult<T> {
        Err(miette::miette!(CommonError {
            error_type: err_type,
            error_message: None,
        }))
    }

    /// Wrap an [`std::io::Error`] with some context, eg: the path that was involved.
    #[must_use]
    pub fn from_io(err: &std::io::Error, context: &str) -> miette::Report {
        miette::miette!(CommonError {
            error_type: CommonErrorType::IOError,
            error_message: Some(format!("{context}: {err}")),
        })
    }

    /// Recover the [`CommonErrorType`] from a report built by one of the constructors.
    #[must_use]
    pub fn error_type_of(report: &miette::Report) -> Option<CommonErrorType> {
        report
            .downcast_ref::<CommonError>()
            .map(|it| it.error_type)
    }
}
