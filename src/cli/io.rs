//! JSON output for CLI
//!
//! Every command writes exactly one JSON document to stdout. Logs go to
//! stderr, so stdout can be piped straight into another tool.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write a pretty-printed JSON document to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json_to(&mut out, value)
}

pub(crate) fn write_json_to<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write an error document to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}
