// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::{Args, Parser};

/// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
#[derive(Debug, Parser)]
#[command(bin_name = "clex")]
#[command(about = "CLEX: a full screen command line file manager")]
#[command(version)]
#[command(next_line_help = true)]
#[command(arg_required_else_help(false))]
/// More info: <https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template>
#[command(
      help_template = "{about}\nVersion: {bin} {version}\n\nStart in the current directory; the secondary panel opens DIR2 from the configuration.\nUSAGE:\n  clex [options]\n\n[options]\n{options}"
  )]
pub struct CLIArg {
    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to a file named `log.txt` for debugging."
    )]
    pub enable_logging: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_logging_flag() {
        let arg = CLIArg::parse_from(["clex", "-l"]);
        assert!(arg.global_options.enable_logging);
        let arg = CLIArg::parse_from(["clex"]);
        assert!(!arg.global_options.enable_logging);
    }

    #[test]
    fn test_command_is_well_formed() { CLIArg::command().debug_assert(); }
}
