//! Main `TableReader` struct and public API.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, TableReaderError};
use crate::extract::TypedRows;
use crate::inference::DEFAULT_SAMPLE_SIZE;
use crate::input::{
    ContentPreview, CsvOptions, DelimitedSource, PreviewConfig, RowSource, WorkbookSource,
};
use crate::schema::{Header, TableDefinition, TableSpec};

/// Extensions read as delimited text; anything else is opened as a workbook.
const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Configuration for table extraction.
#[derive(Debug, Clone)]
pub struct TableReaderConfig {
    /// Dialect handling for delimited text.
    pub csv: CsvOptions,
    /// Leading rows sampled for format inference.
    pub sample_size: usize,
    /// Limits for the content preview.
    pub preview: PreviewConfig,
}

impl Default for TableReaderConfig {
    fn default() -> Self {
        Self {
            csv: CsvOptions::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            preview: PreviewConfig::default(),
        }
    }
}

impl TableReaderConfig {
    pub fn with_csv(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_preview(mut self, preview: PreviewConfig) -> Self {
        self.preview = preview;
        self
    }
}

/// Opens row sources and extracts typed tables from them.
#[derive(Debug, Clone, Default)]
pub struct TableReader {
    config: TableReaderConfig,
}

impl TableReader {
    /// Create a reader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: TableReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TableReaderConfig {
        &self.config
    }

    /// Open a delimited text file, detecting its dialect.
    pub fn open_csv(&self, path: impl AsRef<Path>) -> Result<DelimitedSource> {
        DelimitedSource::open(path, &self.config.csv)
    }

    /// Open one sheet of a workbook.
    pub fn open_workbook(&self, path: impl AsRef<Path>, sheet: &str) -> Result<WorkbookSource> {
        WorkbookSource::open(path, sheet)
    }

    /// Open a file by extension: `csv`, `tsv` and `txt` are delimited text,
    /// everything else is a workbook and needs a sheet name.
    pub fn open(&self, path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Box<dyn RowSource>> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
            if let Some(sheet) = sheet {
                debug!(sheet, "ignoring sheet name for delimited source");
            }
            return Ok(Box::new(self.open_csv(path)?));
        }

        match sheet {
            Some(sheet) => Ok(Box::new(self.open_workbook(path, sheet)?)),
            None => Err(TableReaderError::SourceNotFound(format!(
                "no sheet given for workbook {}",
                path.display()
            ))),
        }
    }

    /// Extract a table as a lazy sequence of typed rows.
    ///
    /// The bounds and header are checked before any row is read. Format
    /// inference runs here, so a temporal column without a consistent format
    /// fails now rather than mid-stream.
    pub fn extract<'a, S: RowSource + ?Sized>(
        &self,
        source: &'a mut S,
        spec: &TableSpec,
        header: &Header,
    ) -> Result<TypedRows<'a>> {
        spec.validate()?;
        header.check_width(spec.width())?;

        debug!(
            rows = ?(spec.data_start_row, spec.data_end_row),
            cols = ?(spec.start_col, spec.end_col),
            skipped = spec.skip_rows.len(),
            "extracting table"
        );
        let stream = source.rows(spec)?;
        TypedRows::new(stream, header, self.config.sample_size)
    }

    /// Extract the table a definition document describes.
    pub fn extract_definition<'a, S: RowSource + ?Sized>(
        &self,
        source: &'a mut S,
        definition: &TableDefinition,
    ) -> Result<TypedRows<'a>> {
        self.extract(source, &definition.spec, &definition.header)
    }

    /// Build the plain-text content preview of a whole source.
    pub fn preview<S: RowSource + ?Sized>(&self, source: &mut S) -> Result<ContentPreview> {
        ContentPreview::build(source, &self.config.preview)
    }
}
