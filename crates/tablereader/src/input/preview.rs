//! Plain-text content preview of a whole source.
//!
//! The preview feeds the step that decides where a table sits in a sheet, so
//! it numbers rows exactly as [`TableSpec`](crate::schema::TableSpec) does.

use std::fmt;

use serde::Serialize;

use super::source::{RawRow, RowSource, SourceDescription};
use crate::error::Result;

/// Limits for the content preview.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Sources with at most this many rows are dumped in full.
    pub full_threshold: usize,
    /// Leading rows kept for larger sources.
    pub head_rows: usize,
    /// Trailing rows kept for larger sources.
    pub tail_rows: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            full_threshold: 200,
            head_rows: 20,
            tail_rows: 20,
        }
    }
}

/// A rendered preview; `Display` produces the text handed to the
/// boundary-decision step.
#[derive(Debug, Clone, Serialize)]
pub struct ContentPreview {
    pub title: Vec<String>,
    pub total_rows: usize,
    pub heading: String,
    pub lines: Vec<String>,
    pub truncated: bool,
}

impl ContentPreview {
    /// Scan a source twice: once for its extent, once for the rows.
    pub fn build<S: RowSource + ?Sized>(source: &mut S, config: &PreviewConfig) -> Result<Self> {
        let (title, noun) = match source.description() {
            SourceDescription::Delimited { path } => {
                (vec![format!("CSV file: {}", path.display())], "CSV file")
            }
            SourceDescription::Workbook { path, sheet } => (
                vec![
                    format!("Excel file: {}", path.display()),
                    format!("Sheet: {}", sheet),
                ],
                "Sheet",
            ),
        };

        let total_rows = source.full_extent()?.map_or(0, |last| last + 1);
        let truncated = total_rows > config.full_threshold;
        let heading = if truncated {
            format!(
                "{} preview (only first {} and last {} rows):",
                noun, config.head_rows, config.tail_rows
            )
        } else {
            format!("{} full content:", noun)
        };

        let mut lines = Vec::new();
        let mut elided = false;
        for row in source.all_rows()? {
            let row = row?;
            if row.index >= total_rows {
                break;
            }
            let in_head = row.index < config.head_rows;
            let in_tail = row.index + config.tail_rows >= total_rows;
            if !truncated || in_head || in_tail {
                lines.push(row_line(&row));
            } else if !elided {
                lines.push("...".to_string());
                elided = true;
            }
        }

        Ok(Self {
            title,
            total_rows,
            heading,
            lines,
            truncated,
        })
    }
}

impl fmt::Display for ContentPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.title {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "Total rows: {}", self.total_rows)?;
        writeln!(f, "{}", self.heading)?;
        write!(f, "--------------------------------")?;
        for line in &self.lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

/// `Row <index>: a | b | c`
pub fn row_line(row: &RawRow) -> String {
    format!("Row {}: {}", row.index, row.texts().join(" | "))
}
