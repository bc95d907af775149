//! Core type definitions for declared column schemas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TableReaderError;

/// Declared data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Numbers, including currency amounts and percentages.
    Number,
    /// Date only (no time component).
    Date,
    /// Date and time of day.
    DateTime,
    /// Time only (no date component).
    Time,
    /// Text passed through unchanged.
    Str,
}

impl ColumnType {
    /// Returns true if this type is resolved through format inference.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            ColumnType::DateTime | ColumnType::Date | ColumnType::Time
        )
    }

    /// The name used in table definitions.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Time => "time",
            ColumnType::Str => "str",
        }
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Str
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = TableReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            "datetime" => Ok(ColumnType::DateTime),
            "time" => Ok(ColumnType::Time),
            "str" => Ok(ColumnType::Str),
            other => Err(TableReaderError::SchemaMismatch(format!(
                "unrecognized column type '{}'",
                other
            ))),
        }
    }
}

/// Decimal separator of a number column; the other character is treated as
/// the thousands separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecimalSeparator {
    #[serde(rename = ".")]
    Dot,
    #[serde(rename = ",")]
    Comma,
}

impl Default for DecimalSeparator {
    fn default() -> Self {
        DecimalSeparator::Dot
    }
}

impl FromStr for DecimalSeparator {
    type Err = TableReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "." => Ok(DecimalSeparator::Dot),
            "," => Ok(DecimalSeparator::Comma),
            other => Err(TableReaderError::SchemaMismatch(format!(
                "unrecognized decimal separator '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column_type() {
        assert_eq!("number".parse::<ColumnType>().unwrap(), ColumnType::Number);
        assert_eq!(" DateTime ".parse::<ColumnType>().unwrap(), ColumnType::DateTime);
        assert_eq!("str".parse::<ColumnType>().unwrap(), ColumnType::Str);
        assert!(matches!(
            "integer".parse::<ColumnType>(),
            Err(TableReaderError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_temporal_types() {
        assert!(ColumnType::Date.is_temporal());
        assert!(ColumnType::Time.is_temporal());
        assert!(!ColumnType::Number.is_temporal());
        assert!(!ColumnType::Str.is_temporal());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ColumnType::DateTime).unwrap();
        assert_eq!(json, "\"datetime\"");
        let sep: DecimalSeparator = serde_json::from_str("\",\"").unwrap();
        assert_eq!(sep, DecimalSeparator::Comma);
    }
}
