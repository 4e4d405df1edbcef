//! CLI output formatting utilities.

use crate::orchestrator::BatchTally;
use crate::store::SourceStatus;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print one line of a detailed status listing.
    pub fn source_status(entry: &SourceStatus) {
        let flag = |present: bool, label: &str| {
            if present {
                style(label.to_string()).green()
            } else {
                style(label.to_string()).dim()
            }
        };

        let title = entry.title.as_deref().unwrap_or(&entry.name);
        let kind = entry.kind.map(|k| k.to_string()).unwrap_or_else(|| "?".to_string());
        let added = entry
            .date_added
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        println!(
            "  {} {} ({}, {}) [{} {}]",
            style("*").cyan(),
            style(title).bold(),
            kind,
            style(added).dim(),
            flag(entry.has_content, "content"),
            flag(entry.has_summary, "summary"),
        );
        if let Some(error) = &entry.error {
            println!("    {} {}", style("!").yellow(), style(error).dim());
        }
    }

    /// Print the final counts of a batch operation.
    pub fn tally(action: &str, tally: &BatchTally) {
        let msg = if tally.skipped > 0 {
            format!(
                "{}: {} succeeded, {} failed, {} skipped ({} total)",
                action,
                tally.succeeded,
                tally.failed,
                tally.skipped,
                tally.total()
            )
        } else {
            format!(
                "{}: {} succeeded, {} failed ({} total)",
                action,
                tally.succeeded,
                tally.failed,
                tally.total()
            )
        };

        if tally.failed > 0 {
            Self::warning(&msg);
        } else {
            Self::success(&msg);
        }
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        if let Ok(template) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(template.progress_chars("#>-"));
        }
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(template);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate text to at most `max_chars` characters, adding an ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("line one\nline two", 8), "line one...");
        assert_eq!(preview("ééééé", 2), "éé...");
    }
}
