//! User interface module - banner, result summary and error reporting.

pub mod formatter;

pub use formatter::{display_error, display_results, display_status, format_result};

use console::style;

use crate::TOOL_NAME;

pub fn display_banner() {
    println!("{}", style(TOOL_NAME).bold());
    println!("(Version: {})\n", style(env!("CARGO_PKG_VERSION")).yellow());
}

/// Report a failed run: the error chain on one line, or in full under `--debug`
pub fn display_failure(error: &anyhow::Error, debug: bool) {
    if debug {
        display_error(&format!("{:?}", error));
    } else {
        display_error(&format!("{:#}", error));
    }
}
