//! Sheets command - list the sheets of a workbook.

use std::path::PathBuf;

use colored::Colorize;
use tablereader::WorkbookSource;

pub fn run(file: PathBuf, json_output: bool, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let names = WorkbookSource::sheet_names(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    println!("{} {}", "Sheets in".cyan().bold(), file.display());
    for (i, name) in names.iter().enumerate() {
        println!("  {} {}", format!("{:>2}.", i + 1).dimmed(), name);
    }

    Ok(())
}
