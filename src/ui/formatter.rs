//! Pure formatting functions for UI output.
//!
//! Every user-facing line goes through here so that styling stays in one
//! place. `console` drops the colors when the stream is not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::release::BumpOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Line reported once a bump has finished
pub fn outcome_message(outcome: &BumpOutcome) -> String {
    match outcome {
        BumpOutcome::AlreadyRelease(version) => BoundaryWarning::AlreadyRelease {
            version: version.to_string(),
        }
        .to_string(),
        BumpOutcome::Released { version, .. } => format!("Released {}", version),
    }
}

/// Display the result of a bump.
///
/// A completed release also shows which snapshot image it was promoted from.
pub fn display_outcome(outcome: &BumpOutcome) {
    match outcome {
        BumpOutcome::AlreadyRelease(_) => println!("{}", outcome_message(outcome)),
        BumpOutcome::Released {
            snapshot, image, ..
        } => {
            display_status(&format!(
                "{} -> {}",
                style(snapshot).dim(),
                style(image).cyan()
            ));
            display_success(&outcome_message(outcome));
        }
    }
}
