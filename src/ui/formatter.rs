//! Formatting functions for terminal output.
//!
//! Everything user-facing goes through here; diagnostics go through `tracing`.

use console::style;

use crate::cli::{ModuleRelease, StatusReport, VersionOutcome};
use crate::warning::VersioningWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("error").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal warning.
pub fn display_warning(warning: &VersioningWarning) {
    eprintln!("{} {}", style("⚠ warn").yellow(), warning);
}

/// Explain how to initialize the tool.
pub fn display_not_initialized() {
    display_error("The changeset tool is not initialized in this repository.");
    eprintln!(
        "\nPlease run {} first in the root of the repository to configure the tool.",
        style("changeset init").yellow()
    );
}

/// One line describing a module's version change, e.g. `Core 1.0.0 → 1.1.0 (Minor)`.
pub fn format_release(release: &ModuleRelease) -> String {
    format!(
        "{} {} → {} ({})",
        release.name, release.from, release.to, release.level
    )
}

/// Summary line for a number of changesets.
pub fn format_changeset_count(count: usize) -> String {
    match count {
        0 => "There were no changesets found.".to_string(),
        1 => "There was 1 changeset found.".to_string(),
        n => format!("There were {} changesets found.", n),
    }
}

/// Display pending changesets and the direct bump per module.
pub fn display_status_report(report: &StatusReport) {
    println!("{}", format_changeset_count(report.changesets.len()));
    for (module, level) in &report.pending {
        println!("  - {}: {}", style(module).bold(), level);
    }
}

/// Display the modules affected by a versioning run.
pub fn display_version_outcome(outcome: &VersionOutcome) {
    for warning in &outcome.warnings {
        display_warning(warning);
    }

    if outcome.releases.is_empty() {
        display_status("No module in the source tree matched the pending changesets.");
    } else {
        println!("\n{}", style("Affected modules:").bold());
        for release in &outcome.releases {
            println!("  {}", format_release(release));
        }
    }

    if outcome.dry_run {
        display_status("Dry run: no files were changed.");
    } else {
        display_success("All files have been updated. Review them and commit at your leisure.");
    }
}
