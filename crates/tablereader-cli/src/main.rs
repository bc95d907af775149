//! Tablereader CLI - typed table extraction from CSV files and spreadsheets.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            file,
            table,
            sheet,
            output,
            sample_size,
        } => commands::extract::run(file, table, sheet, output, sample_size, cli.verbose),

        Commands::Preview { file, sheet } => commands::preview::run(file, sheet, cli.verbose),

        Commands::Sheets { file, json } => commands::sheets::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,tablereader=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
