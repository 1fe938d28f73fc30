// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::Parser;
use clex_cmdr::{CLIArg, run_clex};
use clex_tui::{CommonResult, try_initialize_logging_global};

fn main() -> CommonResult<()> {
    let cli_arg = CLIArg::parse();

    let enable_logging = cli_arg.global_options.enable_logging;
    enable_logging.then(|| {
        try_initialize_logging_global(tracing_core::LevelFilter::DEBUG).ok();
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    });

    let result = run_clex();
    if let Err(error) = &result {
        // % is Display, ? is Debug.
        tracing::error!(message = "clex stopped on an error", error = ?error);
    }

    enable_logging.then(|| {
        tracing::debug!(message = "Stop logging...");
    });
    result
}
