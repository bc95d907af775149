//! Column-global format inference for temporal columns.
//!
//! A format is chosen once per column from a bounded sample and then applied
//! to every row, so a single ambiguous value can never pick the format on
//! its own: every sampled value has to agree.

mod formats;

pub use formats::{candidates, DATETIME_FORMATS, DATE_FORMATS, TIME_FORMATS};

use tracing::debug;

use crate::error::{Result, TableReaderError};
use crate::input::{RawCell, RawRow};
use crate::parse::{self, TemporalFormat};
use crate::schema::{ColumnType, Header};

/// Default number of leading rows sampled per extraction.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Resolved formats, one slot per header position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatMap {
    formats: Vec<Option<TemporalFormat>>,
}

impl FormatMap {
    /// Format for the column at `position`; `None` for non-temporal columns.
    pub fn get(&self, position: usize) -> Option<&TemporalFormat> {
        self.formats.get(position).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.formats.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check whether one cleaned value parses under `format`.
fn matches(column_type: ColumnType, value: &str, format: &TemporalFormat) -> bool {
    match column_type {
        ColumnType::Date => parse::parse_date(value, format).is_ok(),
        ColumnType::DateTime => parse::parse_datetime(value, format).is_ok(),
        ColumnType::Time => parse::parse_time(value, format).is_ok(),
        ColumnType::Number | ColumnType::Str => false,
    }
}

/// First candidate under which every sampled value parses.
///
/// Values are raw text; null-classified values are compatible with every
/// candidate, so an all-null sample resolves to the first one.
pub fn infer_format<S: AsRef<str>>(
    column_type: ColumnType,
    values: &[S],
    candidates: &[TemporalFormat],
) -> Option<TemporalFormat> {
    let cleaned: Vec<String> = values
        .iter()
        .filter_map(|v| parse::clean_nulls(v.as_ref()))
        .collect();

    candidates
        .iter()
        .find(|format| cleaned.iter().all(|v| matches(column_type, v, format)))
        .copied()
}

/// Text the inferencer has to agree on; natively typed cells that already
/// fit the column are skipped.
fn sample_text(cell: &RawCell, column_type: ColumnType) -> Option<&str> {
    match cell.native {
        Some(native) if native.fits(column_type) => None,
        _ => Some(cell.text.as_str()),
    }
}

/// Resolve a format for every temporal column of `header` from `sample`.
pub fn infer_formats(header: &Header, sample: &[RawRow]) -> Result<FormatMap> {
    let mut formats = Vec::with_capacity(header.len());

    for (position, column) in header.columns().iter().enumerate() {
        if !column.column_type.is_temporal() {
            formats.push(None);
            continue;
        }

        let values: Vec<&str> = sample
            .iter()
            .filter_map(|row| sample_text(row.cell(position), column.column_type))
            .collect();

        let format = infer_format(column.column_type, &values, candidates(column.column_type))
            .ok_or_else(|| TableReaderError::NoFormatFound {
                column: column.name.clone(),
                column_type: column.column_type,
            })?;

        debug!(
            column = %column.name,
            format = format.label,
            sampled = values.len(),
            "Resolved column format"
        );
        formats.push(Some(format));
    }

    Ok(FormatMap { formats })
}
