//! Command-line interface for safetyboard.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ListCommand, SeverityArg, SortArg};

/// safetyboard - Record and review AI-safety incidents
///
/// An in-memory dashboard of incident reports with severity filtering,
/// date sorting, and a submission form. Nothing is saved between runs.
#[derive(Debug, Parser)]
#[command(name = "safetyboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive dashboard
    Run,

    /// Print the incident list once and exit
    List(ListCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: None,
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "safetyboard");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli(0, true).verbosity(), crate::logging::Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), crate::logging::Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), crate::logging::Verbosity::Verbose);
        assert_eq!(cli(3, false).verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["safetyboard"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["safetyboard", "run"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Run)));
    }

    #[test]
    fn test_parse_list_options() {
        let cli = Cli::try_parse_from([
            "safetyboard",
            "list",
            "--severity",
            "high",
            "--sort",
            "oldest",
            "--expand-all",
        ])
        .unwrap();
        let Some(Command::List(list)) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(list.severity, Some(SeverityArg::High));
        assert_eq!(list.sort, Some(SortArg::Oldest));
        assert!(list.expand_all);
        assert!(!list.json);
    }

    #[test]
    fn test_parse_list_rejects_unknown_severity() {
        assert!(Cli::try_parse_from(["safetyboard", "list", "-s", "critical"]).is_err());
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["safetyboard", "config", "validate", "-f", "/tmp/x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigCommand::Validate { file: Some(_) }))
        ));
    }

    #[test]
    fn test_parse_with_config_and_verbose() {
        let cli =
            Cli::try_parse_from(["safetyboard", "-c", "/custom/config.toml", "-vv", "list"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);
    }
}
