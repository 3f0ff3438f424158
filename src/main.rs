//! lakegate CLI entry point
//!
//! Parses nothing and loads nothing itself: everything is delegated to the
//! CLI module. Exits non-zero on error or on an unsuccessful run.

use lakegate::cli;

fn main() {
    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
