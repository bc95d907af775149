//! Fuzz target for null classification and number parsing.
//!
//! Neither step may panic, and a string the normalizer cleans must come
//! back unchanged from a second pass.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tablereader::parse::{clean_nulls, parse_number};
use tablereader::DecimalSeparator;

fuzz_target!(|data: &str| {
    if data.len() > 1_000 {
        return;
    }

    if let Some(cleaned) = clean_nulls(data) {
        assert_eq!(clean_nulls(&cleaned).as_deref(), Some(cleaned.as_str()));

        let _ = parse_number(&cleaned, DecimalSeparator::Dot);
        let _ = parse_number(&cleaned, DecimalSeparator::Comma);
    }
});
