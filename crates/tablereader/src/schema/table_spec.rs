//! Table bounds and the table definition document.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::header::{Header, HeaderColumnSpec};
use crate::error::{Result, TableReaderError};

/// Rectangle of a table within its source: an inclusive, 0-indexed row and
/// column range plus absolute row indices to leave out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub data_start_row: usize,
    pub data_end_row: usize,
    pub start_col: usize,
    pub end_col: usize,
    /// Rows outside the range are ignored.
    #[serde(default)]
    pub skip_rows: BTreeSet<usize>,
}

impl TableSpec {
    pub fn new(rows: (usize, usize), cols: (usize, usize)) -> Self {
        Self {
            data_start_row: rows.0,
            data_end_row: rows.1,
            start_col: cols.0,
            end_col: cols.1,
            skip_rows: BTreeSet::new(),
        }
    }

    pub fn with_skip_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.skip_rows.extend(rows);
        self
    }

    /// Check the range invariants.
    pub fn validate(&self) -> Result<()> {
        if self.data_start_row > self.data_end_row {
            return Err(TableReaderError::InvalidTableSpec(format!(
                "data_start_row {} is after data_end_row {}",
                self.data_start_row, self.data_end_row
            )));
        }
        if self.start_col > self.end_col {
            return Err(TableReaderError::InvalidTableSpec(format!(
                "start_col {} is after end_col {}",
                self.start_col, self.end_col
            )));
        }
        if span(self.start_col, self.end_col).is_none() {
            return Err(TableReaderError::InvalidTableSpec(format!(
                "column range {}..={} is too wide",
                self.start_col, self.end_col
            )));
        }
        Ok(())
    }

    /// Number of columns in the rectangle; zero when the range does not
    /// validate.
    pub fn width(&self) -> usize {
        span(self.start_col, self.end_col).unwrap_or(0)
    }

    /// Whether a row index belongs to the extracted table.
    pub fn includes_row(&self, row: usize) -> bool {
        (self.data_start_row..=self.data_end_row).contains(&row) && !self.skip_rows.contains(&row)
    }

    /// Rows the table yields when the source is at least `data_end_row + 1`
    /// rows long.
    pub fn expected_row_count(&self) -> usize {
        if self.data_start_row > self.data_end_row {
            return 0;
        }
        let skipped = self
            .skip_rows
            .range(self.data_start_row..=self.data_end_row)
            .count();
        span(self.data_start_row, self.data_end_row)
            .unwrap_or(usize::MAX)
            .saturating_sub(skipped)
    }
}

/// Length of the inclusive range `start..=end`, if it fits in a `usize`.
fn span(start: usize, end: usize) -> Option<usize> {
    end.checked_sub(start)?.checked_add(1)
}

#[derive(Debug, Deserialize)]
struct TableDefinitionSpec {
    header_columns: Vec<HeaderColumnSpec>,
    data_start_row: usize,
    data_end_row: usize,
    start_col: usize,
    end_col: usize,
    #[serde(default)]
    skip_rows: Vec<usize>,
    #[serde(default)]
    table_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// A located table: where it is and what its columns hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub spec: TableSpec,
    pub header: Header,
}

impl TableDefinition {
    /// Build a definition, checking the header against the rectangle.
    pub fn new(spec: TableSpec, header: Header) -> Result<Self> {
        spec.validate()?;
        header.check_width(spec.width())?;
        Ok(Self {
            table_name: None,
            description: None,
            spec,
            header,
        })
    }

    /// Parse the JSON emitted by the boundary-decision step.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: TableDefinitionSpec = serde_json::from_str(json)?;
        let spec = TableSpec {
            data_start_row: raw.data_start_row,
            data_end_row: raw.data_end_row,
            start_col: raw.start_col,
            end_col: raw.end_col,
            skip_rows: raw.skip_rows.into_iter().collect(),
        };
        let header = Header::from_specs(raw.header_columns)?;

        let mut definition = Self::new(spec, header)?;
        definition.table_name = raw.table_name;
        definition.description = raw.description;
        Ok(definition)
    }

    /// Read a definition from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| TableReaderError::io(path, e))?;
        Self::from_json(&json)
    }
}
