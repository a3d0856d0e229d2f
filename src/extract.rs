//! The extraction pipeline: scan a document, classify each block, allocate
//! names, and write the results into a per-input directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::classify::{ExtensionToken, classify};
use crate::exit_codes;
use crate::naming::{BatchState, DirectoryProbe, allocate};
use crate::scanner::{normalize_newlines, scan};

/// Fatal conditions that abort a run before any per-block work happens.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The input document could not be read.
    #[error("cannot read input '{}': {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The extraction directory could not be created.
    #[error("cannot create output directory '{}': {source}", .path.display())]
    OutputDirUncreatable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type ExtractResult = Result<BatchReport, ExtractError>;

/// Terminal state of a run that got past reading the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Blocks were processed; see `saved` and `failed` for how it went.
    Completed,
    /// The document contained no fenced blocks at all.
    NoBlocks,
    /// Every block trimmed to nothing.
    AllEmpty,
}

/// A file written during the run.
#[derive(Debug, Clone, Serialize)]
pub struct SavedFile {
    pub name: String,
    pub extension: ExtensionToken,
    /// Language hint from the block's opening fence, if one was present.
    pub hint: Option<String>,
    /// 1-based position of the source block in the document.
    pub block: usize,
    pub bytes: u64,
}

/// A block whose file could not be written.
#[derive(Debug, Clone, Serialize)]
pub struct WriteFailure {
    pub name: String,
    pub error: String,
}

/// Everything a run produced, ready for rendering in any output format.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub input: PathBuf,
    pub outcome: RunOutcome,
    /// Number of fenced blocks the scanner found.
    pub total_blocks: usize,
    /// 1-based positions of blocks skipped because they trimmed to nothing.
    pub skipped_empty: Vec<usize>,
    pub saved: Vec<SavedFile>,
    pub failed: Vec<WriteFailure>,
    /// Where the results live: the extraction directory, or the archive once
    /// packaging replaces it. `None` when nothing was extracted.
    pub artifact: Option<PathBuf>,
    pub archived: bool,
    pub archive_error: Option<String>,
}

impl BatchReport {
    fn empty(input: &Path, outcome: RunOutcome) -> Self {
        Self {
            input: input.to_path_buf(),
            outcome,
            total_blocks: 0,
            skipped_empty: Vec::new(),
            saved: Vec::new(),
            failed: Vec::new(),
            artifact: None,
            archived: false,
            archive_error: None,
        }
    }

    /// Process exit code for this report, following the Ruff convention the
    /// whole binary uses: 1 when there was nothing to extract, 2 when blocks
    /// existed but not a single file could be written.
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            RunOutcome::NoBlocks | RunOutcome::AllEmpty => exit_codes::NOTHING_EXTRACTED,
            RunOutcome::Completed if self.saved.is_empty() => exit_codes::TOOL_ERROR,
            RunOutcome::Completed => exit_codes::SUCCESS,
        }
    }
}

/// Directory name the extracted files of `input` land in.
pub fn output_dir_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string());
    format!("{stem}_extracted_code")
}

/// Run the whole pipeline over `input`, writing files into
/// `{input-stem}_extracted_code` under `base_dir`.
///
/// Blocks are processed strictly in document order with one shared batch
/// state, so filenames are deterministic for a given input and directory
/// contents. A block whose write fails releases its name and never aborts
/// the rest of the run. When the document has no usable blocks, no files are
/// left behind: the no-blocks case never creates the directory and the
/// all-empty case removes it again if this run created it.
pub fn run_batch(input: &Path, base_dir: &Path) -> ExtractResult {
    let text = fs::read_to_string(input).map_err(|source| ExtractError::InputUnreadable {
        path: input.to_path_buf(),
        source,
    })?;
    // CRLF documents must scan like LF ones, and extracted files are LF-only.
    let text = normalize_newlines(&text);

    let blocks = scan(&text);
    log::debug!("{} fenced blocks in '{}'", blocks.len(), input.display());
    if blocks.is_empty() {
        return Ok(BatchReport::empty(input, RunOutcome::NoBlocks));
    }

    let output_dir = base_dir.join(output_dir_name(input));
    let dir_preexisted = output_dir.is_dir();
    fs::create_dir_all(&output_dir).map_err(|source| ExtractError::OutputDirUncreatable {
        path: output_dir.clone(),
        source,
    })?;

    let mut report = BatchReport::empty(input, RunOutcome::Completed);
    report.total_blocks = blocks.len();

    let mut state = BatchState::new();
    let probe = DirectoryProbe::new(&output_dir);

    for block in &blocks {
        let code = block.content.trim();
        if code.is_empty() {
            log::debug!("block {} is empty, skipping", state.counter());
            report.skipped_empty.push(state.counter());
            state.advance();
            continue;
        }

        let token = classify(code, block.hint);
        let name = allocate(token, code, &mut state, &probe);
        match fs::write(output_dir.join(&name), code) {
            Ok(()) => report.saved.push(SavedFile {
                name,
                extension: token,
                hint: block.hint.map(str::to_string),
                block: state.counter(),
                bytes: code.len() as u64,
            }),
            Err(source) => {
                log::warn!("failed to write '{name}': {source}");
                state.release(&name);
                report.failed.push(WriteFailure {
                    name,
                    error: source.to_string(),
                });
            }
        }
        state.advance();
    }

    if report.saved.is_empty() && report.failed.is_empty() {
        report.outcome = RunOutcome::AllEmpty;
        if !dir_preexisted
            && let Err(err) = fs::remove_dir(&output_dir)
        {
            log::warn!("could not remove empty '{}': {err}", output_dir.display());
        }
        return Ok(report);
    }

    report.artifact = Some(output_dir);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn output_dir_name_appends_the_suffix() {
        assert_eq!(output_dir_name(Path::new("notes.md")), "notes_extracted_code");
        assert_eq!(
            output_dir_name(Path::new("/tmp/deep/chat.txt")),
            "chat_extracted_code"
        );
        assert_eq!(output_dir_name(Path::new("no_ext")), "no_ext_extracted_code");
        assert_eq!(output_dir_name(Path::new(".bashrc")), ".bashrc_extracted_code");
    }

    #[test]
    fn exit_codes_track_the_outcome() {
        let input = Path::new("x.md");
        let mut report = BatchReport::empty(input, RunOutcome::NoBlocks);
        assert_eq!(report.exit_code(), exit_codes::NOTHING_EXTRACTED);

        report.outcome = RunOutcome::AllEmpty;
        assert_eq!(report.exit_code(), exit_codes::NOTHING_EXTRACTED);

        report.outcome = RunOutcome::Completed;
        assert_eq!(report.exit_code(), exit_codes::TOOL_ERROR);

        report.saved.push(SavedFile {
            name: "extracted_code_1.py".to_string(),
            extension: ExtensionToken::Py,
            hint: None,
            block: 1,
            bytes: 10,
        });
        assert_eq!(report.exit_code(), exit_codes::SUCCESS);

        // Partial failure still counts as success.
        report.failed.push(WriteFailure {
            name: "extracted_code_2.py".to_string(),
            error: "denied".to_string(),
        });
        assert_eq!(report.exit_code(), exit_codes::SUCCESS);
    }

    #[test]
    fn missing_input_aborts_without_touching_anything() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("absent.md");
        let err = run_batch(&input, tmp.path()).unwrap_err();
        assert!(matches!(err, ExtractError::InputUnreadable { .. }));
        assert!(!tmp.path().join("absent_extracted_code").exists());
    }

    #[test]
    fn report_serializes_with_stable_outcome_names() {
        let report = BatchReport::empty(Path::new("x.md"), RunOutcome::AllEmpty);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "all_empty");
        assert_eq!(json["archived"], false);
        assert!(json["artifact"].is_null());
    }
}
