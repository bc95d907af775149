//! Extract command - stream a table out as JSON Lines.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use colored::Colorize;
use tablereader::{TableDefinition, TableReader, TableReaderConfig};
use tracing::info;

pub fn run(
    file: PathBuf,
    table: String,
    sheet: Option<String>,
    output: Option<PathBuf>,
    sample_size: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let definition = load_definition(&table)?;

    let reader =
        TableReader::with_config(TableReaderConfig::default().with_sample_size(sample_size));
    let mut source = reader.open(&file, sheet.as_deref())?;
    let rows = reader.extract_definition(&mut source, &definition)?;

    if verbose {
        for (position, column) in definition.header.columns().iter().enumerate() {
            if let Some(format) = rows.formats().get(position) {
                eprintln!(
                    "{} {} {}",
                    "Format".cyan().bold(),
                    column.name.white(),
                    format
                );
            }
        }
    }

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut count = 0;
    for row in rows {
        serde_json::to_writer(&mut writer, &row?)?;
        writeln!(writer)?;
        count += 1;
    }
    writer.flush()?;
    info!(rows = count, file = %file.display(), "extraction finished");

    if let Some(path) = output {
        eprintln!(
            "{} {} rows to {}",
            "Wrote".green().bold(),
            count,
            path.display()
        );
    }

    Ok(())
}

/// Inline JSON when the argument looks like an object, otherwise a file path.
fn load_definition(table: &str) -> tablereader::Result<TableDefinition> {
    if table.trim_start().starts_with('{') {
        TableDefinition::from_json(table)
    } else {
        TableDefinition::from_path(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DEFINITION: &str = r#"{
        "header_columns": [{"name": "Date", "type": "date"}, {"name": "Amount", "type": "number"}],
        "data_start_row": 1, "data_end_row": 2, "start_col": 0, "end_col": 1
    }"#;

    #[test]
    fn test_inline_definition() {
        let definition = load_definition(DEFINITION).unwrap();
        assert_eq!(definition.header.column_names(), vec!["Date", "Amount"]);
    }

    #[test]
    fn test_definition_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEFINITION.as_bytes()).unwrap();
        let definition = load_definition(file.path().to_str().unwrap()).unwrap();
        assert_eq!(definition.spec.data_end_row, 2);
    }

    #[test]
    fn test_run_writes_json_lines() {
        let mut data = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        data.write_all(b"Date,Amount\n2024-01-01,$5\n2024-01-02,\n").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();

        run(
            data.path().to_path_buf(),
            DEFINITION.to_string(),
            None,
            Some(out.path().to_path_buf()),
            100,
            false,
        )
        .unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(
            written,
            "{\"Date\":\"2024-01-01\",\"Amount\":5.0}\n{\"Date\":\"2024-01-02\",\"Amount\":null}\n"
        );
    }
}
