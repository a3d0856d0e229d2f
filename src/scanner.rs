//! Fenced block scanning.
//!
//! Finds triple-backtick regions in a document with a single non-greedy
//! pass: an opening fence, an optional single-token language hint, a
//! newline, then the shortest run of text up to the next closing fence.
//! This is deliberately not a full CommonMark parser. Fences inside
//! indented code or block quotes still count, a tilde fence does not, and
//! an opening line whose info string is not one `\w+` token (such as
//! ```` ```rust,no_run ````) never starts a block.
//!
//! `scan` expects LF line endings; run documents through
//! [`normalize_newlines`] first so CRLF-authored input matches too.

use std::sync::LazyLock;

use regex::Regex;

/// One fenced region, borrowing from the scanned document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    /// Language hint from the opening fence, if one was present.
    pub hint: Option<&'a str>,
    /// Raw text between the fences, untrimmed. May be empty.
    pub content: &'a str,
}

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)```").unwrap());

/// Normalize CRLF and lone CR line endings to LF.
///
/// The fence pattern wants a bare `\n` after the opening line, so scanning
/// runs on normalized text the way a text-mode read would see it. This also
/// keeps extracted file contents LF-only regardless of how the document was
/// authored.
pub fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Scan `text` and return every fenced block in document order.
///
/// An unterminated opening fence yields nothing; a shorter backtick run
/// inside a block stays part of its content because only a full ```` ``` ````
/// closes the region.
pub fn scan(text: &str) -> Vec<CodeBlock<'_>> {
    FENCED_BLOCK
        .captures_iter(text)
        .map(|caps| CodeBlock {
            hint: caps.get(1).map(|hint| hint.as_str()),
            content: caps.get(2).map(|body| body.as_str()).unwrap_or(""),
        })
        .collect()
}
