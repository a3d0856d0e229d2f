use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::process;

use unfence_lib::exit_codes::exit;

mod commands;

#[derive(Parser)]
#[command(name = "unfence", version, about, long_about = None)]
struct Cli {
    /// Document to scan for fenced code blocks
    #[arg(required = false, value_name = "INPUT")]
    input: Option<String>,

    /// Directory the per-input extraction directory is created in
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    output_dir: String,

    /// Pack the extracted files into a zip archive
    #[arg(long, default_value = "false")]
    zip: bool,

    /// Output format for the run report
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    output_format: String,

    /// Only report the final result
    #[arg(short, long)]
    quiet: bool,

    /// Show classification detail for every saved file
    #[arg(short, long)]
    verbose: bool,

    /// Command to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported language tokens and their fence hint aliases
    Languages {
        /// Output format: text or json
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        output_format: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (auto-detected from $SHELL if omitted)
        shell: Option<Shell>,

        /// List available shells
        #[arg(long)]
        list: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Languages { output_format }) => {
            commands::languages::handle_languages(output_format);
            exit::success();
        }
        Some(Commands::Completions { shell, list }) => {
            commands::completions::handle_completions(*shell, *list);
            exit::success();
        }
        None => {
            let code = commands::extract::handle_extract(&cli);
            process::exit(code);
        }
    }
}
