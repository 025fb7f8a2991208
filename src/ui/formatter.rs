//! Pure formatting functions for UI output.
//!
//! Formatting is kept apart from printing so the result lines can be tested.

use console::style;

use crate::domain::{PublishResult, PublishState};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Length of the longest project name, used to align result lines
pub fn longest_project_name(results: &[PublishResult]) -> usize {
    results
        .iter()
        .map(|r| r.project_name.chars().count())
        .max()
        .unwrap_or(0)
}

/// One result line: the padded project name followed by what happened
pub fn format_result(result: &PublishResult, name_width: usize) -> String {
    let name = format!("{:<width$}: ", result.project_name, width = name_width);

    let outcome = match result.publish_state {
        PublishState::Disabled => style("publish disabled".to_string()).dim().to_string(),
        PublishState::UpToDate => "No changes found, not published".to_string(),
        PublishState::PublishedFresh => format!(
            "Published with version: {}",
            style(format!("v{}", result.version)).green()
        ),
        PublishState::PublishedBumped => format!(
            "Published with version bumped: {}",
            style(format!(
                "v{} -> v{}",
                result.version,
                result.new_version.as_deref().unwrap_or("?")
            ))
            .green()
        ),
    };

    format!("{}{}", style(name).blue(), outcome)
}

/// Print all result lines aligned on the project name
pub fn display_results(results: &[PublishResult]) {
    let width = longest_project_name(results);

    println!();
    for result in results {
        println!("{}", format_result(result, width));
    }
    println!();
}
