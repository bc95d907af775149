//! Example: Extract a table from a CSV file or workbook sheet.
//!
//! Usage:
//!   cargo run --example extract -- <file_path> <table.json> [sheet]
//!
//! `table.json` holds a table definition:
//!
//! ```json
//! {
//!   "header_columns": [
//!     {"name": "Date", "type": "date"},
//!     {"name": "Amount", "type": "number", "decimal_separator": "."}
//!   ],
//!   "data_start_row": 1, "data_end_row": 10,
//!   "start_col": 0, "end_col": 1, "skip_rows": []
//! }
//! ```

use std::env;

use tablereader::{TableDefinition, TableReader};

fn main() -> tablereader::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cargo run --example extract -- <file_path> <table.json> [sheet]");
        std::process::exit(1);
    }

    let definition = TableDefinition::from_path(&args[2])?;
    let reader = TableReader::new();
    let mut source = reader.open(&args[1], args.get(3).map(String::as_str))?;

    println!("{}", reader.preview(&mut source)?);
    println!();

    let separator = "=".repeat(60);
    println!("{}", separator);
    if let Some(name) = &definition.table_name {
        println!("Table: {}", name);
    }
    println!("Columns: {}", definition.header.column_names().join(", "));
    println!("{}", separator);

    let rows = reader.extract_definition(&mut source, &definition)?;
    for (position, (column, format)) in definition
        .header
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(i, c)| rows.formats().get(i).map(|f| (i, (c, f))))
    {
        println!("  column {} ({}): {}", position, column.name, format);
    }

    for row in rows {
        println!("{}", serde_json::to_string(&row?)?);
    }

    Ok(())
}
