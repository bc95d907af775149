//! Delimited text (CSV/TSV/...) row source with dialect detection.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::dialect::{detect_dialect, Dialect};
use super::source::{RawCell, RawRow, RowSource, RowStream, SourceDescription};
use crate::error::{Result, TableReaderError};
use crate::schema::TableSpec;

/// Options for reading delimited text.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character (None = auto-detect, `"` when the delimiter is given).
    pub quote: Option<u8>,
    /// Size of the leading sample used for detection.
    pub sniff_bytes: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: None,
            sniff_bytes: 1024,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_sniff_bytes(mut self, bytes: usize) -> Self {
        self.sniff_bytes = bytes;
        self
    }
}

/// A delimited text file. The dialect is fixed when the source is opened;
/// every stream re-reads the file from the start.
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    path: PathBuf,
    dialect: Dialect,
}

impl DelimitedSource {
    /// Open a file, detecting its dialect unless the options pin it.
    pub fn open(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path).map_err(|e| TableReaderError::io(&path, e))?;

        let dialect = match options.delimiter {
            Some(delimiter) => Dialect::new(delimiter, options.quote.unwrap_or(b'"')),
            None => {
                let (sample, truncated) = read_sample(&mut file, options.sniff_bytes)
                    .map_err(|e| TableReaderError::io(&path, e))?;
                let detected = detect_dialect(&sample, truncated)?;
                Dialect::new(detected.delimiter, options.quote.unwrap_or(detected.quote))
            }
        };

        debug!(path = %path.display(), format = dialect.format_name(), "opened delimited source");
        Ok(Self { path, dialect })
    }

    /// Use a known dialect without sniffing.
    pub fn with_dialect(path: impl AsRef<Path>, dialect: Dialect) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        File::open(&path).map_err(|e| TableReaderError::io(&path, e))?;
        Ok(Self { path, dialect })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn records(&self) -> Result<SourceLines> {
        let mut file = File::open(&self.path).map_err(|e| TableReaderError::io(&self.path, e))?;
        let (len, open_tail) =
            inspect_tail(&mut file).map_err(|e| TableReaderError::io(&self.path, e))?;

        // Records end at LF only so that a CRLF blank line still arrives as a
        // (whitespace) record; the CR is trimmed with the cell text.
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.dialect.delimiter)
            .quote(self.dialect.quote)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        Ok(SourceLines {
            records: reader.into_records(),
            blank: 0,
            pending: None,
            len,
            open_tail,
        })
    }
}

impl RowSource for DelimitedSource {
    fn description(&self) -> SourceDescription {
        SourceDescription::Delimited {
            path: self.path.clone(),
        }
    }

    fn rows(&mut self, spec: &TableSpec) -> Result<RowStream<'_>> {
        spec.validate()?;
        Ok(Box::new(DelimitedRows {
            records: self.records()?,
            next_index: 0,
            bounds: Some(spec.clone()),
            failed: false,
        }))
    }

    fn all_rows(&mut self) -> Result<RowStream<'_>> {
        Ok(Box::new(DelimitedRows {
            records: self.records()?,
            next_index: 0,
            bounds: None,
            failed: false,
        }))
    }
}

/// Read up to `limit` bytes; the flag is true when the file has more.
fn read_sample(file: &mut File, limit: usize) -> std::io::Result<(Vec<u8>, bool)> {
    let mut sample = Vec::with_capacity(limit + 1);
    file.by_ref().take(limit as u64 + 1).read_to_end(&mut sample)?;
    let truncated = sample.len() > limit;
    sample.truncate(limit);
    Ok((sample, truncated))
}

/// File length and whether the last byte is something other than a line
/// feed. Leaves the file positioned at the start.
fn inspect_tail(file: &mut File) -> std::io::Result<(u64, bool)> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok((0, false));
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    file.rewind()?;
    Ok((len, last[0] != b'\n'))
}

fn count_newlines(record: &csv::StringRecord) -> u64 {
    record
        .iter()
        .map(|field| field.bytes().filter(|&b| b == b'\n').count() as u64)
        .sum()
}

/// Records in file order, one per physical row.
///
/// The csv reader passes over empty lines without yielding anything. Each
/// one is still a row of the source, so the line counter is compared across
/// reads and an empty record is produced for every line that was passed
/// over. Line breaks inside quoted fields belong to their record.
struct SourceLines {
    records: csv::StringRecordsIntoIter<File>,
    /// Empty lines still to emit before `pending`.
    blank: u64,
    pending: Option<csv::StringRecord>,
    len: u64,
    /// The file does not end with a line feed, so its last record is
    /// unterminated.
    open_tail: bool,
}

impl Iterator for SourceLines {
    type Item = csv::Result<csv::StringRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.blank > 0 {
            self.blank -= 1;
            return Some(Ok(csv::StringRecord::new()));
        }
        if let Some(record) = self.pending.take() {
            return Some(Ok(record));
        }

        let before = self.records.reader().position().line();
        let next = self.records.next();
        let after = self.records.reader().position().clone();
        let consumed = after.line().saturating_sub(before);

        let record = match next {
            Some(Ok(record)) => record,
            Some(Err(e)) => return Some(Err(e)),
            None if consumed == 0 => return None,
            None => {
                // Empty lines after the last record.
                self.blank = consumed - 1;
                return Some(Ok(csv::StringRecord::new()));
            }
        };

        let terminated = !(self.open_tail && after.byte() >= self.len);
        let own_lines = count_newlines(&record) + u64::from(terminated);
        let blank = consumed.saturating_sub(own_lines);
        if blank == 0 {
            return Some(Ok(record));
        }
        self.blank = blank - 1;
        self.pending = Some(record);
        Some(Ok(csv::StringRecord::new()))
    }
}

/// Record iterator applying row bounds, skips and the column window.
struct DelimitedRows {
    records: SourceLines,
    next_index: usize,
    bounds: Option<TableSpec>,
    failed: bool,
}

impl Iterator for DelimitedRows {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(ref spec) = self.bounds {
                if self.next_index > spec.data_end_row {
                    return None;
                }
            }

            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            };
            let index = self.next_index;
            self.next_index += 1;

            let Some(ref spec) = self.bounds else {
                return Some(Ok(RawRow::new(index, record.iter().map(RawCell::text).collect())));
            };

            if index < spec.data_start_row {
                continue;
            }
            if spec.skip_rows.contains(&index) {
                trace!(row = index, "skipping row");
                continue;
            }

            let cells = (spec.start_col..=spec.end_col)
                .map_while(|col| record.get(col))
                .map(RawCell::text)
                .collect();
            return Some(Ok(RawRow::new(index, cells)));
        }
    }
}
