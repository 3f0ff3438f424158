//! CLI argument definitions using clap
//!
//! Commands:
//! - lakegate promote [--entity <name|all>] [--force]
//! - lakegate validate [--entity <name|all>]
//! - lakegate schema

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::LogFormat;

/// lakegate - quality gate between the staged and promoted data layers
#[derive(Parser, Debug)]
#[command(name = "lakegate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides the configured data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Debug-level logging when RUST_LOG is unset
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate, clean and promote staged snapshots
    Promote {
        /// Entity name, or "all" for every entity in dependency order
        #[arg(long, default_value = "all")]
        entity: String,

        /// Promote without running any quality check
        #[arg(long)]
        force: bool,
    },

    /// Validate staged snapshots without writing anything
    Validate {
        /// Entity name, or "all"
        #[arg(long, default_value = "all")]
        entity: String,
    },

    /// Print the schema registry and dependency order
    Schema,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_defaults_to_all() {
        let cli = Cli::try_parse_from(["lakegate", "promote"]).unwrap();
        match cli.command {
            Command::Promote { entity, force } => {
                assert_eq!(entity, "all");
                assert!(!force);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lakegate",
            "validate",
            "--entity",
            "quotes",
            "--data-dir",
            "/srv/lake",
            "--log-format",
            "json",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Validate { ref entity } if entity == "quotes"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/lake")));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.verbose);
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        assert!(Cli::try_parse_from(["lakegate", "--log-format", "xml", "schema"]).is_err());
    }
}
