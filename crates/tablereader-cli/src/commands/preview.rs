//! Preview command - print the content preview of a file or sheet.

use std::path::PathBuf;

use colored::Colorize;
use tablereader::TableReader;

pub fn run(
    file: PathBuf,
    sheet: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = TableReader::new();
    let mut source = reader.open(&file, sheet.as_deref())?;
    let preview = reader.preview(&mut source)?;

    println!("{}", preview);

    if verbose && preview.truncated {
        eprintln!(
            "{} {} of {} rows shown",
            "Note:".yellow().bold(),
            preview.lines.len() - 1,
            preview.total_rows
        );
    }

    Ok(())
}
