//! Declared table header: ordered column names, types and number locales.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{ColumnType, DecimalSeparator};
use crate::error::{Result, TableReaderError};

/// A header column as written by the boundary-decision step, before
/// validation. Types are kept as strings so unknown names surface as
/// [`TableReaderError::SchemaMismatch`] instead of a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderColumnSpec {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_separator: Option<String>,
}

impl HeaderColumnSpec {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            decimal_separator: None,
        }
    }

    pub fn with_decimal_separator(mut self, separator: impl Into<String>) -> Self {
        self.decimal_separator = Some(separator.into());
        self
    }
}

/// A validated header column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderColumn {
    /// Normalized column name, never empty.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Decimal separator, only meaningful for number columns.
    pub decimal_separator: DecimalSeparator,
}

impl HeaderColumn {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            decimal_separator: DecimalSeparator::default(),
        }
    }

    pub fn with_decimal_separator(mut self, separator: DecimalSeparator) -> Self {
        self.decimal_separator = separator;
        self
    }
}

/// Ordered header; column `i` of the extracted rectangle maps to `columns[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Header {
    columns: Vec<HeaderColumn>,
}

impl Header {
    /// Build a header, normalizing names and rejecting duplicates.
    pub fn new(columns: Vec<HeaderColumn>) -> Result<Self> {
        let columns: Vec<HeaderColumn> = columns
            .into_iter()
            .enumerate()
            .map(|(i, mut col)| {
                col.name = normalize_name(&col.name, i);
                col
            })
            .collect();

        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(TableReaderError::SchemaMismatch(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Build a header from unvalidated column specs.
    pub fn from_specs(specs: Vec<HeaderColumnSpec>) -> Result<Self> {
        let columns = specs
            .into_iter()
            .map(|spec| {
                let column_type = spec.column_type.parse::<ColumnType>()?;
                let decimal_separator = match spec.decimal_separator.as_deref() {
                    Some(sep) if column_type == ColumnType::Number => sep.parse()?,
                    _ => DecimalSeparator::default(),
                };
                Ok(HeaderColumn {
                    name: spec.name,
                    column_type,
                    decimal_separator,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns)
    }

    pub fn columns(&self) -> &[HeaderColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Fail unless the header has exactly one column per extracted column.
    pub fn check_width(&self, width: usize) -> Result<()> {
        if self.columns.len() != width {
            return Err(TableReaderError::SchemaMismatch(format!(
                "header has {} columns but the table is {} columns wide",
                self.columns.len(),
                width
            )));
        }
        Ok(())
    }
}

/// Trim a column name, join its words with underscores and fall back to
/// `column_<position>` (1-indexed) when nothing is left.
pub fn normalize_name(raw: &str, index: usize) -> String {
    let name = raw.split_whitespace().collect::<Vec<_>>().join("_");
    if name.is_empty() {
        format!("column_{}", index + 1)
    } else {
        name
    }
}
