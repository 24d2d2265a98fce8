// Copyright 2026 bizscout Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod cli;
mod config;
mod events;
mod export;
mod extract;
mod harvest;
mod renderer;
mod session;
mod stealth;

#[derive(Parser)]
#[command(
    name = "bizscout",
    about = "bizscout — harvest business records from map-based directory listings",
    version,
    after_help = "Run 'bizscout <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a business directory and harvest structured records
    Harvest {
        /// Business type to search for (e.g. "Car Wraps")
        query: String,
        /// Location to search in (e.g. "Virginia")
        #[arg(long)]
        location: Option<String>,
        /// Maximum number of records to harvest
        #[arg(long, default_value = "20")]
        max_results: usize,
        /// Output file path (defaults to a name derived from the search)
        #[arg(long, short)]
        output: Option<String>,
        /// Output format (csv, json)
        #[arg(long, default_value = "csv")]
        format: String,
        /// Run the browser with a visible window instead of headless
        #[arg(long)]
        headed: bool,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("BIZSCOUT_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("BIZSCOUT_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("BIZSCOUT_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("BIZSCOUT_NO_COLOR", "1");
    }

    let result = match cli.command {
        Commands::Harvest {
            query,
            location,
            max_results,
            output,
            format,
            headed,
        } => {
            cli::harvest_cmd::run(
                &query,
                location.as_deref(),
                max_results,
                output.as_deref(),
                &format,
                headed,
            )
            .await
        }
        Commands::Doctor => cli::doctor::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "bizscout", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
