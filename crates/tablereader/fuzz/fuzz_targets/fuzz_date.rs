//! Fuzz target for temporal format inference and parsing.
//!
//! Every candidate format is tried against arbitrary values; inference must
//! only return a format that parses each value.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tablereader::inference::{candidates, infer_format};
use tablereader::parse::{clean_nulls, parse_date, parse_datetime, parse_time};
use tablereader::ColumnType;

#[derive(Debug, Arbitrary)]
struct Input {
    kind: u8,
    values: Vec<String>,
}

fuzz_target!(|input: Input| {
    if input.values.len() > 100 || input.values.iter().any(|v| v.len() > 200) {
        return;
    }

    let column_type = match input.kind % 3 {
        0 => ColumnType::Date,
        1 => ColumnType::DateTime,
        _ => ColumnType::Time,
    };

    if let Some(format) = infer_format(column_type, &input.values, candidates(column_type)) {
        for value in input.values.iter().filter_map(|v| clean_nulls(v)) {
            let ok = match column_type {
                ColumnType::Date => parse_date(&value, &format).is_ok(),
                ColumnType::DateTime => parse_datetime(&value, &format).is_ok(),
                _ => parse_time(&value, &format).is_ok(),
            };
            assert!(ok, "{:?} does not parse under {}", value, format);
        }
    }
});
