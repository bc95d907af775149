//! Typed row assembly.
//!
//! [`TypedRows::new`] buffers a bounded sample from the row stream and
//! resolves every temporal column's format from it. The iterator then
//! replays the sample and continues with the rest of the stream, converting
//! each raw row on demand. The first error ends the sequence and releases
//! the underlying stream.

use std::iter::FusedIterator;
use std::vec;

use tracing::{debug, trace};

use super::value::{TypedRow, Value};
use crate::error::{Result, TableReaderError};
use crate::inference::{infer_formats, FormatMap};
use crate::input::{RawCell, RawRow, RowStream};
use crate::parse::{self, TemporalFormat, ValueError};
use crate::schema::{ColumnType, DecimalSeparator, Header, HeaderColumn};

/// How one column turns cleaned text into a value.
#[derive(Debug, Clone, Copy)]
enum CellParser {
    Text,
    Number(DecimalSeparator),
    Date(TemporalFormat),
    DateTime(TemporalFormat),
    Time(TemporalFormat),
}

impl CellParser {
    fn resolve(column: &HeaderColumn, format: Option<&TemporalFormat>) -> Result<Self> {
        let temporal = |build: fn(TemporalFormat) -> CellParser| {
            format
                .copied()
                .map(build)
                .ok_or_else(|| TableReaderError::NoFormatFound {
                    column: column.name.clone(),
                    column_type: column.column_type,
                })
        };

        match column.column_type {
            ColumnType::Str => Ok(CellParser::Text),
            ColumnType::Number => Ok(CellParser::Number(column.decimal_separator)),
            ColumnType::Date => temporal(CellParser::Date),
            ColumnType::DateTime => temporal(CellParser::DateTime),
            ColumnType::Time => temporal(CellParser::Time),
        }
    }

    fn parse(&self, cell: &RawCell, column_type: ColumnType) -> std::result::Result<Value, ValueError> {
        if let Some(value) = cell.native.and_then(|n| Value::from_native(n, column_type)) {
            return Ok(value);
        }

        let text = cell.text.as_str();
        let value = match self {
            // Casing is only folded for null detection
            CellParser::Text => {
                if parse::is_null(text) {
                    Value::Null
                } else {
                    Value::Text(text.to_string())
                }
            }
            CellParser::Number(sep) => parse::cleaned(text, |v| parse::parse_number(v, *sep))?
                .map_or(Value::Null, Value::Number),
            CellParser::Date(format) => parse::cleaned(text, |v| parse::parse_date(v, format))?
                .map_or(Value::Null, Value::Date),
            CellParser::DateTime(format) => {
                parse::cleaned(text, |v| parse::parse_datetime(v, format))?
                    .map_or(Value::Null, Value::DateTime)
            }
            CellParser::Time(format) => parse::cleaned(text, |v| parse::parse_time(v, format))?
                .map_or(Value::Null, Value::Time),
        };
        Ok(value)
    }
}

enum State<'a> {
    Streaming {
        sample: vec::IntoIter<RawRow>,
        rest: RowStream<'a>,
    },
    Done,
}

/// Lazy, single-pass sequence of typed rows.
pub struct TypedRows<'a> {
    header: Header,
    formats: FormatMap,
    parsers: Vec<CellParser>,
    state: State<'a>,
    emitted: usize,
}

impl<'a> TypedRows<'a> {
    /// Buffer up to `sample_size` rows and resolve column formats.
    ///
    /// Fails with `NoFormatFound` before any row is produced when a temporal
    /// column has no candidate format that fits its whole sample.
    pub fn new(mut stream: RowStream<'a>, header: &Header, sample_size: usize) -> Result<Self> {
        let mut sample = Vec::new();
        while sample.len() < sample_size {
            match stream.next() {
                Some(row) => sample.push(row?),
                None => break,
            }
        }
        debug!(rows = sample.len(), "Buffered inference sample");

        let formats = infer_formats(header, &sample)?;
        let parsers = header
            .columns()
            .iter()
            .enumerate()
            .map(|(position, column)| CellParser::resolve(column, formats.get(position)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            header: header.clone(),
            formats,
            parsers,
            state: State::Streaming {
                sample: sample.into_iter(),
                rest: stream,
            },
            emitted: 0,
        })
    }

    /// Formats resolved for this extraction.
    pub fn formats(&self) -> &FormatMap {
        &self.formats
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Rows produced so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// True once the stream is exhausted or has failed.
    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Done)
    }

    fn convert(&self, row: &RawRow) -> Result<TypedRow> {
        let mut typed = TypedRow::with_capacity(self.parsers.len());
        for (position, (column, parser)) in
            self.header.columns().iter().zip(&self.parsers).enumerate()
        {
            let cell = row.cell(position);
            let value = parser.parse(cell, column.column_type).map_err(|e| {
                TableReaderError::ParseFailure {
                    row: row.index,
                    column: column.name.clone(),
                    value: cell.text.clone(),
                    message: e.to_string(),
                }
            })?;
            typed.insert(column.name.clone(), value);
        }
        Ok(typed)
    }

    fn next_raw(&mut self) -> Option<Result<RawRow>> {
        match &mut self.state {
            State::Streaming { sample, rest } => match sample.next() {
                Some(row) => Some(Ok(row)),
                None => rest.next(),
            },
            State::Done => None,
        }
    }

    fn finish(&mut self) {
        if !self.is_done() {
            trace!(emitted = self.emitted, "Typed row stream finished");
        }
        self.state = State::Done;
    }
}

impl Iterator for TypedRows<'_> {
    type Item = Result<TypedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let converted = match self.next_raw() {
            Some(Ok(row)) => self.convert(&row),
            Some(Err(e)) => Err(e),
            None => {
                self.finish();
                return None;
            }
        };

        match converted {
            Ok(row) => {
                self.emitted += 1;
                Some(Ok(row))
            }
            Err(e) => {
                self.finish();
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for TypedRows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::NativeValue;
    use chrono::{NaiveDate, NaiveTime};

    fn stream(rows: Vec<RawRow>) -> RowStream<'static> {
        Box::new(rows.into_iter().map(Ok))
    }

    fn sales_header() -> Header {
        Header::new(vec![
            HeaderColumn::new("Date", ColumnType::Date),
            HeaderColumn::new("Product", ColumnType::Str),
            HeaderColumn::new("Amount", ColumnType::Number),
        ])
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_sales_rows() {
        let rows = vec![
            RawRow::from_texts(1, ["2023-12-10", "iPhone 4", "100.12"]),
            RawRow::from_texts(2, ["2023-12-23", "MacBook Pro", "1000.13"]),
        ];
        let typed: Vec<TypedRow> = TypedRows::new(stream(rows), &sales_header(), 100)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(typed.len(), 2);
        assert_eq!(typed[0]["Date"], date(2023, 12, 10));
        assert_eq!(typed[0]["Product"], Value::Text("iPhone 4".to_string()));
        assert_eq!(typed[0]["Amount"], Value::Number(100.12));
        assert_eq!(typed[1]["Product"], Value::Text("MacBook Pro".to_string()));
        assert_eq!(
            typed[0].keys().collect::<Vec<_>>(),
            vec!["Date", "Product", "Amount"]
        );
    }

    #[test]
    fn test_format_applies_beyond_sample() {
        let rows: Vec<RawRow> = (1..=5)
            .map(|i| RawRow::from_texts(i, [format!("0{}/02/2024", i), "x".into(), "1".into()]))
            .collect();
        let mut typed = TypedRows::new(stream(rows), &sales_header(), 2).unwrap();

        assert_eq!(typed.formats().get(0).unwrap().label, "MM/DD/YYYY");
        let values: Vec<Value> = typed
            .by_ref()
            .map(|r| r.unwrap()["Date"].clone())
            .collect();
        assert_eq!(values[4], date(2024, 5, 2));
        assert_eq!(typed.emitted(), 5);
        assert!(typed.is_done());
    }

    #[test]
    fn test_null_and_short_rows() {
        let rows = vec![
            RawRow::from_texts(4, ["", "N/A", ""]),
            RawRow::from_texts(5, ["2023-01-01"]),
        ];
        let typed: Vec<TypedRow> = TypedRows::new(stream(rows), &sales_header(), 100)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert!(typed[0].values().all(Value::is_null));
        assert_eq!(typed[1]["Product"], Value::Null);
        assert_eq!(typed[1]["Amount"], Value::Null);
    }

    #[test]
    fn test_parse_failure_ends_sequence() {
        let rows = vec![
            RawRow::from_texts(1, ["2023-12-10", "a", "1"]),
            RawRow::from_texts(2, ["2023-12-11", "b", "twelve"]),
            RawRow::from_texts(3, ["2023-12-12", "c", "3"]),
        ];
        let mut typed = TypedRows::new(stream(rows), &sales_header(), 100).unwrap();

        assert!(typed.next().unwrap().is_ok());
        match typed.next() {
            Some(Err(TableReaderError::ParseFailure { row, column, value, .. })) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Amount");
                assert_eq!(value, "twelve");
            }
            other => panic!("expected parse failure, got {:?}", other),
        }
        assert!(typed.next().is_none());
        assert!(typed.is_done());
    }

    #[test]
    fn test_no_format_fails_before_rows() {
        let rows = vec![RawRow::from_texts(1, ["someday", "a", "1"])];
        let result = TypedRows::new(stream(rows), &sales_header(), 100);
        assert!(matches!(result, Err(TableReaderError::NoFormatFound { .. })));
    }

    #[test]
    fn test_source_error_during_streaming() {
        let rows: RowStream<'static> = Box::new(
            vec![
                Ok(RawRow::from_texts(1, ["2023-12-10", "a", "1"])),
                Err(TableReaderError::SourceNotFound("gone".into())),
                Ok(RawRow::from_texts(3, ["2023-12-12", "c", "3"])),
            ]
            .into_iter(),
        );
        let mut typed = TypedRows::new(rows, &sales_header(), 1).unwrap();

        assert!(typed.next().unwrap().is_ok());
        assert!(typed.next().unwrap().is_err());
        assert!(typed.next().is_none());
    }

    #[test]
    fn test_native_values_used_directly() {
        let when = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let header = Header::new(vec![
            HeaderColumn::new("Day", ColumnType::Date),
            HeaderColumn::new("At", ColumnType::Time),
            HeaderColumn::new("Qty", ColumnType::Number),
            HeaderColumn::new("Label", ColumnType::Str),
        ])
        .unwrap();
        let rows = vec![RawRow::new(
            0,
            vec![
                RawCell::native(NativeValue::DateTime(when)),
                RawCell::native(NativeValue::DateTime(when)),
                RawCell::native(NativeValue::Number(7.0)),
                RawCell::native(NativeValue::Number(42.0)),
            ],
        )];

        let typed: Vec<TypedRow> = TypedRows::new(stream(rows), &header, 100)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(typed[0]["Day"], date(2024, 3, 1));
        assert_eq!(
            typed[0]["At"],
            Value::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
        assert_eq!(typed[0]["Qty"], Value::Number(7.0));
        assert_eq!(typed[0]["Label"], Value::Text("42".to_string()));
    }

    #[test]
    fn test_comma_decimal_column() {
        let header = Header::new(vec![HeaderColumn::new("Preis", ColumnType::Number)
            .with_decimal_separator(DecimalSeparator::Comma)])
        .unwrap();
        let rows = vec![RawRow::from_texts(0, ["1.234,56 \u{20ac}"])];
        let typed: Vec<TypedRow> = TypedRows::new(stream(rows), &header, 100)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(typed[0]["Preis"], Value::Number(1234.56));
    }
}
