//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tablereader: typed extraction of tables from CSV files and spreadsheets
#[derive(Parser)]
#[command(name = "tablereader")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a table as JSON Lines, one object per row
    Extract {
        /// Path to the data file (CSV/TSV/TXT or a workbook)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Table definition: a JSON file path or an inline JSON object
        #[arg(short, long, value_name = "JSON")]
        table: String,

        /// Sheet to read (required for workbooks)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Write rows to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leading rows sampled to infer date and time formats
        #[arg(long, default_value = "100")]
        sample_size: usize,
    },

    /// Print a plain-text preview of a whole file or sheet
    Preview {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Sheet to preview (required for workbooks)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Path to the workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
