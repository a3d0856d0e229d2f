//! Handler for the default extract invocation.

use std::fs;
use std::path::Path;

use colored::*;

use unfence_lib::archive;
use unfence_lib::exit_codes::TOOL_ERROR;
use unfence_lib::extract::{self, BatchReport};
use unfence_lib::output::ReportFormat;

use crate::Cli;

/// Run the extraction pipeline for the arguments in `cli` and return the
/// process exit code.
pub fn handle_extract(cli: &Cli) -> i32 {
    let Some(input) = cli.input.as_deref() else {
        eprintln!("{}: no input file given", "Error".red().bold());
        eprintln!();
        eprintln!("Usage: unfence <INPUT> [-o DIR] [--zip]");
        eprintln!("Try 'unfence --help' for all options.");
        return TOOL_ERROR;
    };
    let input = Path::new(input);
    let base_dir = Path::new(&cli.output_dir);

    // Already validated by clap, so the fallback never triggers.
    let format = ReportFormat::from_str(&cli.output_format).unwrap_or_default();

    let mut report = match extract::run_batch(input, base_dir) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{}: {err}", "Error".red().bold());
            return TOOL_ERROR;
        }
    };

    if cli.zip && !report.saved.is_empty() {
        apply_packaging(&mut report, base_dir);
    }

    let formatter = format.create_formatter(cli.quiet, cli.verbose);
    println!("{}", formatter.format_report(&report));

    report.exit_code()
}

/// Replace the extraction directory with a zip archive next to it.
///
/// On failure the directory is kept and the report carries the error, so the
/// extracted files are never lost to a packaging problem.
fn apply_packaging(report: &mut BatchReport, base_dir: &Path) {
    let Some(dir) = report.artifact.clone() else {
        return;
    };
    let dir_name = extract::output_dir_name(&report.input);
    let zip_path = base_dir.join(format!("{dir_name}.zip"));
    match archive::pack_directory(&dir, &zip_path, &dir_name) {
        Ok(()) => {
            if let Err(err) = fs::remove_dir_all(&dir) {
                log::warn!("could not remove '{}' after packing: {err}", dir.display());
            }
            report.artifact = Some(zip_path);
            report.archived = true;
        }
        Err(err) => {
            log::warn!("packing '{}' failed: {err}", dir.display());
            report.archive_error = Some(err.to_string());
        }
    }
}
