//! Run report rendering for the terminal and for machine consumers.

use colored::Colorize;

use crate::extract::{BatchReport, RunOutcome};

/// How a run report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("unknown output format: {value}")),
        }
    }

    pub fn create_formatter(&self, quiet: bool, verbose: bool) -> Box<dyn ReportFormatter> {
        match self {
            ReportFormat::Text => Box::new(TextFormatter { quiet, verbose }),
            ReportFormat::Json => Box::new(JsonFormatter),
        }
    }
}

/// Renders a finished [`BatchReport`] as one printable string.
pub trait ReportFormatter {
    fn format_report(&self, report: &BatchReport) -> String;
}

/// Human-readable progress lines plus a one-line summary.
pub struct TextFormatter {
    pub quiet: bool,
    pub verbose: bool,
}

impl TextFormatter {
    fn summary_line(&self, report: &BatchReport) -> String {
        let artifact = report
            .artifact
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        if report.saved.is_empty() {
            format!(
                "{} no files could be written to '{artifact}'",
                "Failed:".red().bold()
            )
        } else if report.archived {
            format!(
                "{} {} into '{artifact}'",
                "Packed".green().bold(),
                count_files(report.saved.len())
            )
        } else {
            format!(
                "{} {} to '{artifact}'",
                "Extracted".green().bold(),
                count_files(report.saved.len())
            )
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format_report(&self, report: &BatchReport) -> String {
        match report.outcome {
            RunOutcome::NoBlocks => {
                return format!(
                    "{} no code blocks found in '{}'",
                    "Nothing to extract:".yellow().bold(),
                    report.input.display()
                );
            }
            RunOutcome::AllEmpty => {
                return format!(
                    "{} found {} but every one was empty",
                    "Nothing to extract:".yellow().bold(),
                    count_blocks(report.total_blocks)
                );
            }
            RunOutcome::Completed => {}
        }

        let mut lines = Vec::new();
        if !self.quiet {
            lines.push(format!(
                "Processing '{}' ({} found)",
                report.input.display(),
                count_blocks(report.total_blocks)
            ));
            // Skipped and saved lines come out in document order.
            let mut skipped = report.skipped_empty.iter().peekable();
            for saved in &report.saved {
                while let Some(&&position) = skipped.peek() {
                    if position > saved.block {
                        break;
                    }
                    lines.push(format!("  Skipped empty block {position}"));
                    skipped.next();
                }
                if self.verbose {
                    let origin = match &saved.hint {
                        Some(hint) => format!("hinted '{hint}'"),
                        None => "from content".to_string(),
                    };
                    lines.push(format!(
                        "  {} {} ({}, {origin}, {} bytes)",
                        "Saved:".green().bold(),
                        saved.name,
                        saved.extension,
                        saved.bytes
                    ));
                } else {
                    lines.push(format!("  {} {}", "Saved:".green().bold(), saved.name));
                }
            }
            for position in skipped {
                lines.push(format!("  Skipped empty block {position}"));
            }
        }
        for failure in &report.failed {
            lines.push(format!(
                "  {} could not write '{}': {}",
                "Error:".red().bold(),
                failure.name,
                failure.error
            ));
        }
        if let Some(archive_error) = &report.archive_error {
            lines.push(format!(
                "  {} archiving failed, files kept unpacked: {archive_error}",
                "Error:".red().bold()
            ));
        }
        lines.push(self.summary_line(report));
        lines.join("\n")
    }
}

/// The full report as pretty-printed JSON.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &BatchReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_default()
    }
}

fn count_files(n: usize) -> String {
    format!("{n} file{}", if n == 1 { "" } else { "s" })
}

fn count_blocks(n: usize) -> String {
    format!("{n} code block{}", if n == 1 { "" } else { "s" })
}
