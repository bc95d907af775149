//! Cell value parsing.
//!
//! Every typed column goes through the same two steps: [`clean_nulls`]
//! classifies placeholders and canonicalizes the text, then a type parser
//! runs on whatever survived. [`cleaned`] composes the two.

mod null;
mod number;
mod temporal;

pub use null::{clean_nulls, is_null, NULL_VALUES};
pub use number::parse_number;
pub use temporal::{parse_date, parse_datetime, parse_time, TemporalFormat};

use thiserror::Error;

/// A single value that does not fit its column's parser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("'{value}' does not match format {format}")]
    FormatMismatch { value: String, format: String },
}

/// Run `parse` on the cleaned value, short-circuiting nulls to `Ok(None)`.
pub fn cleaned<T, E>(raw: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> Result<Option<T>, E> {
    match clean_nulls(raw) {
        Some(value) => parse(&value).map(Some),
        None => Ok(None),
    }
}
