//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status lines,
//! the spinner shown while a pass runs, and the summary tables for organize,
//! analyze and undo results. Reports go to stdout; errors go to stderr.

use crate::analyze::Preview;
use crate::categories::{CategoryTable, FALLBACK_CATEGORY};
use crate::organizer::OrganizeResult;
use crate::undo::{UndoReport, UndoStatus};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Spinners for long-running passes
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::success("Directory organized");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::error("Failed to organize directory");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a spinner for a pass whose length is not known up front.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// let spinner = OutputFormatter::create_spinner("Organizing...");
    /// spinner.finish_and_clear();
    /// ```
    pub fn create_spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Arguments
    ///
    /// * `category_counts` - Category names to file counts
    /// * `total_files` - Total shown in the footer row
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = category_counts
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                files_word(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            files_word(total_files),
            width = width
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Renders the outcome of an organize run.
    pub fn organize_result(result: &OrganizeResult) {
        if !result.success {
            Self::error(&format!(
                "Could not organize {}: {}",
                result.directory_path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            ));
            return;
        }

        if result.files_moved == 0 {
            Self::info(&format!(
                "Nothing to organize in {}",
                result.directory_path.display()
            ));
        } else {
            Self::success(&format!(
                "Organized {} {} in {}",
                result.files_moved,
                files_word(result.files_moved),
                result.directory_path.display()
            ));
            Self::summary_table(&result.stats, result.files_moved);
        }

        if !result.removed_folders.is_empty() {
            Self::header("Removed empty folders");
            for folder in &result.removed_folders {
                Self::plain(&format!("  - {folder}/"));
            }
        }
        if !result.preserved_folders.is_empty() {
            Self::info(&format!(
                "Preserved: {}",
                result.preserved_folders.join(", ")
            ));
        }
        if !result.skipped_files.is_empty() {
            Self::header("Skipped");
            for skipped in &result.skipped_files {
                Self::warning(&format!("{}: {}", skipped.file_name, skipped.reason));
            }
        }
        if !result.failed_files.is_empty() {
            Self::header("Failed");
            for failed in &result.failed_files {
                Self::error(&format!("{}: {}", failed.file_name, failed.error));
            }
        }
    }

    /// Renders a dry-run preview.
    pub fn preview(preview: &Preview) {
        if !preview.success {
            Self::error(&format!(
                "Could not analyze {}: {}",
                preview.directory_path.display(),
                preview.error.as_deref().unwrap_or("unknown error")
            ));
            return;
        }

        Self::dry_run_notice(&format!(
            "Analyzing {} ({} loose {})",
            preview.directory_path.display(),
            preview.total_files,
            files_word(preview.total_files)
        ));

        for (category, moves) in &preview.files_by_category {
            Self::header(&format!("{category}/"));
            for planned in moves {
                Self::plain(&format!("  → {}", planned.file_name));
            }
        }

        if !preview.legacy_moves.is_empty() {
            Self::header("Relocations from existing folders");
            for planned in &preview.legacy_moves {
                Self::plain(&format!(
                    "  {}/{} → {}/",
                    planned.from_folder.as_deref().unwrap_or(""),
                    planned.file_name,
                    planned.category
                ));
            }
        }
        if !preview.folders_to_remove.is_empty() {
            Self::header("Folders that would be removed");
            for folder in &preview.folders_to_remove {
                Self::plain(&format!("  - {folder}/"));
            }
        }
        if !preview.skipped_files.is_empty() {
            Self::header("Would skip");
            for skipped in &preview.skipped_files {
                Self::warning(&format!("{}: {}", skipped.file_name, skipped.reason));
            }
        }

        let mut counts: BTreeMap<String, usize> = preview
            .files_by_category
            .iter()
            .map(|(category, moves)| (category.clone(), moves.len()))
            .collect();
        for planned in &preview.legacy_moves {
            *counts.entry(planned.category.clone()).or_insert(0) += 1;
        }
        if !counts.is_empty() {
            Self::summary_table(&counts, preview.planned_moves());
        }
        Self::dry_run_notice("No files were modified.");
    }

    pub fn undo_report(report: &UndoReport) {
        if report.restored_count > 0 {
            Self::success(&format!(
                "Restored {} {} in {}",
                report.restored_count,
                files_word(report.restored_count),
                report.folder_path.display()
            ));
        }
        if !report.failed_files.is_empty() {
            Self::header("Could not restore");
            for failed in &report.failed_files {
                Self::error(&format!("{}: {}", failed.file_name, failed.reason));
            }
            Self::warning("The undo history has been cleared.");
        }
        if let Some(error) = &report.history_error {
            Self::error(&format!(
                "Undo history could not be deleted and must be removed by hand: {error}"
            ));
        }
    }

    pub fn undo_status(status: &UndoStatus) {
        if !status.available {
            Self::info("Nothing to undo.");
            return;
        }
        let count = status.file_count.unwrap_or(0);
        Self::plain(&format!(
            "Last operation: {} {} moved in {}",
            count,
            files_word(count),
            status
                .folder_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        ));
        if let Some(timestamp) = status.timestamp {
            Self::plain(&format!(
                "Recorded at: {}",
                timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        for (key, value) in &status.metadata {
            Self::plain(&format!("  {key}: {value}"));
        }
    }

    /// Lists folder names, one per line.
    pub fn folder_list(folders: &[String]) {
        if folders.is_empty() {
            Self::info("No non-standard folders.");
            return;
        }
        for folder in folders {
            Self::plain(&format!("  {folder}/"));
        }
    }

    /// Prints every category with its extensions, in table order.
    pub fn category_rules(table: &CategoryTable) {
        for name in table.category_names() {
            let extensions: Vec<&str> = table
                .extensions(name)
                .map(|exts| exts.collect())
                .unwrap_or_default();
            println!("{} {}", format!("{name}:").bold(), extensions.join(" "));
        }
        println!(
            "{} {}",
            format!("{FALLBACK_CATEGORY}:").bold(),
            "(everything else)".dimmed()
        );
        for conflict in table.conflicts() {
            Self::warning(&format!(
                "{} is listed in {} and {}; {} wins",
                conflict.extension,
                conflict.winner,
                conflict.shadowed.join(", "),
                conflict.winner
            ));
        }
    }
}

fn files_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
