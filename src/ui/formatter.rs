//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::check::CheckReport;
use crate::git::CommitInfo;
use crate::split::{SplitPlan, SplitReport};

/// Longest subject shown in listings before truncation.
const SUBJECT_WIDTH: usize = 60;

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

/// Shortens a subject to [SUBJECT_WIDTH] characters.
pub fn truncate_subject(subject: &str) -> String {
    if subject.chars().count() > SUBJECT_WIDTH {
        let short: String = subject.chars().take(SUBJECT_WIDTH).collect();
        format!("{}…", short)
    } else {
        subject.to_string()
    }
}

/// Formats one `[k/n] hash subject` progress line.
pub fn format_progress(position: usize, total: usize, commit: &CommitInfo) -> String {
    format!(
        "[{}/{}] {} {}",
        position,
        total,
        commit.short_hash,
        truncate_subject(&commit.subject)
    )
}

/// Prints which branch each commit will get, newest first.
pub fn display_split_plan(plan: &SplitPlan) {
    println!(
        "\n{}",
        style(format!("Branches for {} commits:", plan.branches.len())).bold()
    );
    for planned in &plan.branches {
        println!(
            "  {} {} {}",
            style(&planned.commit.short_hash).dim(),
            style(&planned.name).cyan(),
            truncate_subject(&planned.commit.subject)
        );
    }
}

pub fn display_split_summary(report: &SplitReport, remote: &str) {
    let location = if report.pushed {
        format!("created and pushed to '{}'", remote)
    } else {
        "created locally".to_string()
    };
    println!(
        "\n{} {} branch(es) and {} marker(s) {}\n",
        style("✓").green(),
        report.branches.len(),
        report.markers.len(),
        location
    );
}

/// Prints the progress line shown before each commit is checked.
pub fn display_check_progress(position: usize, total: usize, commit: &CommitInfo) {
    println!(
        "\n{} {}",
        style("→").yellow(),
        style(format_progress(position, total, commit)).bold()
    );
}

pub fn display_check_summary(report: &CheckReport) {
    println!(
        "\n{} {} of {} commit(s) checked successfully\n",
        style("✓").green(),
        report.visited.len(),
        report.total_commits
    );
}
