//! CLI module for lakegate
//!
//! Provides command-line interface for:
//! - promote: validate, clean and publish staged snapshots
//! - validate: dry run, report only
//! - schema: registry and dependency order
//!
//! Output is one JSON document on stdout; logs go to stderr.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{load_config, promote, validate, with_schema_listing, SchemaListing};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_json};

use crate::observability::init_logging;

/// Parses arguments, runs the command and prints its output.
///
/// Returns whether the run succeeded. On error, an error document is
/// printed before the error is returned.
pub fn run() -> CliResult<bool> {
    let cli = Cli::parse_args();
    init_logging(cli.log_format, cli.verbose)
        .map_err(|e| CliError::logging_error(e.to_string()))?;

    match execute(&cli) {
        Ok(success) => Ok(success),
        Err(err) => {
            write_error(err.code_str(), err.message())?;
            Err(err)
        }
    }
}

fn execute(cli: &Cli) -> CliResult<bool> {
    let config = load_config(cli)?;
    match &cli.command {
        Command::Promote { entity, force } => {
            let report = promote(&config, entity, *force)?;
            write_json(&report)?;
            Ok(report.success())
        }
        Command::Validate { entity } => {
            let report = validate(&config, entity)?;
            write_json(&report)?;
            Ok(report.success())
        }
        Command::Schema => with_schema_listing(&config, |listing| {
            write_json(listing)?;
            Ok(true)
        }),
    }
}
