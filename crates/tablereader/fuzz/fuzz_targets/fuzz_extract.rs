//! Fuzz target for delimited text extraction.
//!
//! This fuzzer tests that dialect detection and the row pipeline:
//! 1. Never panic on any file content
//! 2. Never emit more rows than the table bounds allow

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use tablereader::{ColumnType, Header, HeaderColumn, TableReader, TableSpec};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let Ok(mut temp_file) = tempfile::NamedTempFile::with_suffix(".csv") else {
        return;
    };
    if temp_file.write_all(data).is_err() {
        return;
    }

    let reader = TableReader::new();
    let Ok(mut source) = reader.open_csv(temp_file.path()) else {
        return;
    };

    let header = Header::new(vec![
        HeaderColumn::new("a", ColumnType::Str),
        HeaderColumn::new("b", ColumnType::Number),
        HeaderColumn::new("c", ColumnType::Date),
    ])
    .expect("static header is valid");
    let spec = TableSpec::new((1, 20), (0, 2)).with_skip_rows([5]);

    if let Ok(rows) = reader.extract(&mut source, &spec, &header) {
        let count = rows.take_while(Result::is_ok).count();
        assert!(count <= spec.expected_row_count());
    }

    let _ = reader.preview(&mut source);
});
