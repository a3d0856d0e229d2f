//! Handler for the `languages` command.

use unfence_lib::classify::{ALL_TOKENS, aliases_for};
use unfence_lib::exit_codes::exit;

/// Token metadata for JSON export
#[derive(serde::Serialize)]
struct TokenInfo {
    /// Canonical extension token (e.g., "py")
    token: String,
    /// Fence hints that resolve to this token
    aliases: Vec<String>,
    /// Whether the token names the whole file instead of a suffix
    bare_filename: bool,
}

/// Handle the languages command: list every supported token with its hint
/// aliases.
pub fn handle_languages(output_format: &str) {
    let infos: Vec<TokenInfo> = ALL_TOKENS
        .iter()
        .map(|token| TokenInfo {
            token: token.as_str().to_string(),
            aliases: aliases_for(*token).iter().map(|a| a.to_string()).collect(),
            bare_filename: token.is_bare_filename(),
        })
        .collect();

    match output_format.to_lowercase().as_str() {
        "json" => match serde_json::to_string_pretty(&infos) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error serializing to JSON: {e}");
                exit::tool_error();
            }
        },
        _ => {
            println!("Supported language tokens:");
            for info in &infos {
                let note = if info.bare_filename { " (bare filename)" } else { "" };
                println!("  {:<12} {}{note}", info.token, info.aliases.join(", "));
            }
            println!();
            println!("Total: {} tokens", infos.len());
        }
    }
}
