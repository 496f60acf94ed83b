//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::view::{SeverityFilter, SortOrder};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show incidents of this severity
    #[arg(short, long, value_enum)]
    pub severity: Option<SeverityArg>,

    /// Order by report date
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Show every incident's description
    #[arg(short, long)]
    pub expand_all: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Severity filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    /// Every incident
    All,
    /// Low severity only
    Low,
    /// Medium severity only
    Medium,
    /// High severity only
    High,
}

impl From<SeverityArg> for SeverityFilter {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::All => Self::All,
            SeverityArg::Low => Self::Low,
            SeverityArg::Medium => Self::Medium,
            SeverityArg::High => Self::High,
        }
    }
}

/// Sort order argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Most recent first
    Newest,
    /// Earliest first
    Oldest,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => Self::Newest,
            SortArg::Oldest => Self::Oldest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_arg_conversion() {
        assert_eq!(SeverityFilter::from(SeverityArg::All), SeverityFilter::All);
        assert_eq!(SeverityFilter::from(SeverityArg::Low), SeverityFilter::Low);
        assert_eq!(SeverityFilter::from(SeverityArg::Medium), SeverityFilter::Medium);
        assert_eq!(SeverityFilter::from(SeverityArg::High), SeverityFilter::High);
    }

    #[test]
    fn test_sort_arg_conversion() {
        assert_eq!(SortOrder::from(SortArg::Newest), SortOrder::Newest);
        assert_eq!(SortOrder::from(SortArg::Oldest), SortOrder::Oldest);
    }

    #[test]
    fn test_list_command_debug() {
        let cmd = ListCommand {
            severity: Some(SeverityArg::High),
            sort: None,
            expand_all: false,
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("High"));
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
