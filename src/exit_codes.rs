/// Exit codes for unfence, following Ruff's convention
///
/// These exit codes allow users and CI/CD systems to distinguish between
/// different types of failures.
/// Success - At least one code block was extracted
pub const SUCCESS: i32 = 0;

/// Nothing extracted - The document had no fenced blocks, or all of them were empty
pub const NOTHING_EXTRACTED: i32 = 1;

/// Tool error - Bad arguments, unreadable input, or no file could be written
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
///
/// `NOTHING_EXTRACTED` has no helper; extraction runs exit through
/// `BatchReport::exit_code`.
pub mod exit {
    use super::{SUCCESS, TOOL_ERROR};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
