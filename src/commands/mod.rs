//! Command handlers for the unfence CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to.

pub mod completions;
pub mod extract;
pub mod languages;
