//! Output formatting and styling module.
//!
//! Centralizes all CLI output: tagged per-file lines, pass and cycle
//! summaries, and progress bars, so formatting can change in one place.

use crate::organizer::PassReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Formats the line for a file moved to its category bucket.
    pub fn moved_line(from: &Path, to: &Path) -> String {
        format!(
            "{} {} -> {}",
            "[MOVED]".green(),
            from.display(),
            to.display()
        )
    }

    /// Formats the line for a file routed to the duplicates bucket.
    pub fn duplicate_line(from: &Path, to: &Path) -> String {
        format!(
            "{} {} -> {}",
            "[DUPLICATE]".yellow(),
            from.display(),
            to.display()
        )
    }

    /// Formats the line for a file that failed to process.
    pub fn error_line(path: &Path, reason: &str) -> String {
        format!("{} {} ({})", "[ERROR]".red(), path.display(), reason)
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints the end-of-pass summary.
    pub fn pass_summary(report: &PassReport) {
        println!(
            "Done. moved={}, duplicates={}, errors={}, dry_run={}",
            report.moved,
            report.duplicates,
            report.failed.len(),
            report.dry_run
        );
    }

    /// Prints the summary of a watch cycle with activity.
    pub fn cycle_summary(report: &PassReport) {
        println!(
            "Cycle complete: moved={}, duplicates={}",
            report.moved, report.duplicates
        );
    }

    /// Prints the banner shown when watch mode starts.
    pub fn watch_banner(source: &Path, interval_secs: u64) {
        Self::info(&format!(
            "Watching '{}' every {}s. Press Ctrl+C to stop.",
            source.display(),
            interval_secs
        ));
    }

    /// Creates a progress bar for a pass over `total` candidates.
    ///
    /// Per-file lines should be routed through [`ProgressBar::println`] so
    /// they do not tear the bar.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }
}
