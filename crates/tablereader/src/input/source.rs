//! Row source abstraction shared by delimited-text and workbook inputs.

use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::error::Result;
use crate::schema::{ColumnType, TableSpec};

/// A typed value a workbook stored natively, kept next to its text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeValue {
    Number(f64),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl NativeValue {
    /// Whether the value can stand in for a parsed cell of `column_type`.
    pub fn fits(&self, column_type: ColumnType) -> bool {
        match self {
            NativeValue::Number(_) => column_type == ColumnType::Number,
            NativeValue::DateTime(_) => column_type.is_temporal(),
            NativeValue::Time(_) => column_type == ColumnType::Time,
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Number(n) => write!(f, "{}", n),
            NativeValue::DateTime(dt) if dt.time().num_seconds_from_midnight() == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            NativeValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            NativeValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
        }
    }
}

/// One cell of a raw row. `text` is always trimmed; a blank or missing cell
/// is the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCell {
    pub text: String,
    pub native: Option<NativeValue>,
}

static EMPTY_CELL: RawCell = RawCell {
    text: String::new(),
    native: None,
};

impl RawCell {
    pub fn text(value: impl AsRef<str>) -> Self {
        Self {
            text: value.as_ref().trim().to_string(),
            native: None,
        }
    }

    pub fn native(value: NativeValue) -> Self {
        Self {
            text: value.to_string(),
            native: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::text(value)
    }
}

/// One extracted row, tagged with its absolute row index in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub index: usize,
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(index: usize, cells: Vec<RawCell>) -> Self {
        Self { index, cells }
    }

    pub fn from_texts<I, S>(index: usize, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(index, texts.into_iter().map(RawCell::text).collect())
    }

    /// Cell at a position; cells past the end of a short row are empty.
    pub fn cell(&self, position: usize) -> &RawCell {
        self.cells.get(position).unwrap_or(&EMPTY_CELL)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// True if no cell holds any text.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(RawCell::is_empty)
    }
}

/// Forward-only stream of raw rows.
pub type RowStream<'a> = Box<dyn Iterator<Item = Result<RawRow>> + 'a>;

/// What a source is, for the content preview header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescription {
    Delimited { path: PathBuf },
    Workbook { path: PathBuf, sheet: String },
}

/// Bounded row access over a tabular source.
///
/// Streams borrow the source mutably, so the underlying handle lives exactly
/// as long as the source value and one stream runs at a time.
pub trait RowSource {
    fn description(&self) -> SourceDescription;

    /// Rows `data_start_row..=data_end_row` minus `skip_rows`, restricted to
    /// `start_col..=end_col`, in ascending order. Stops early when the
    /// source runs out of rows.
    fn rows(&mut self, spec: &TableSpec) -> Result<RowStream<'_>>;

    /// Every row of the source, each as wide as its data.
    fn all_rows(&mut self) -> Result<RowStream<'_>>;

    /// Highest row index holding a non-empty cell anywhere in the source.
    fn full_extent(&mut self) -> Result<Option<usize>> {
        let mut extent = None;
        for row in self.all_rows()? {
            let row = row?;
            if !row.is_blank() {
                extent = Some(row.index);
            }
        }
        Ok(extent)
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn description(&self) -> SourceDescription {
        (**self).description()
    }

    fn rows(&mut self, spec: &TableSpec) -> Result<RowStream<'_>> {
        (**self).rows(spec)
    }

    fn all_rows(&mut self) -> Result<RowStream<'_>> {
        (**self).all_rows()
    }

    fn full_extent(&mut self) -> Result<Option<usize>> {
        (**self).full_extent()
    }
}
