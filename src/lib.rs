pub mod archive;
pub mod classify;
pub mod exit_codes;
pub mod extract;
pub mod naming;
pub mod output;
pub mod scanner;

pub use classify::{ExtensionToken, classify, extract_type_name};
pub use extract::{BatchReport, ExtractError, RunOutcome, run_batch};
pub use scanner::{CodeBlock, scan};
