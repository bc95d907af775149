//! Workbook row source (xlsx, xlsm, xlam, xlsb, xls, xla, ods).
//!
//! Excel 2007+ and binary workbooks are streamed cell by cell. Legacy `.xls`
//! and OpenDocument sheets can only be loaded as a whole range by the
//! workbook reader, so those are read range-at-once.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, DataRef, Ods, Range, Reader, Xls, Xlsb, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, trace, warn};

use super::source::{NativeValue, RawCell, RawRow, RowSource, RowStream, SourceDescription};
use crate::error::{Result, TableReaderError};
use crate::schema::TableSpec;

/// Type alias for buffered file reader
type FileReader = BufReader<File>;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Wrapper over the per-format workbook readers.
enum Workbook {
    Xlsx(Xlsx<FileReader>),
    Xlsb(Xlsb<FileReader>),
    Xls(Xls<FileReader>),
    Ods(Ods<FileReader>),
}

impl Workbook {
    fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TableReaderError::SourceNotFound(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(
                open_workbook(path).map_err(calamine::Error::from)?,
            )),
            Some("xlsb") => Ok(Self::Xlsb(
                open_workbook(path).map_err(calamine::Error::from)?,
            )),
            Some("xls") | Some("xla") => Ok(Self::Xls(
                open_workbook(path).map_err(calamine::Error::from)?,
            )),
            Some("ods") => Ok(Self::Ods(
                open_workbook(path).map_err(calamine::Error::from)?,
            )),
            _ => Err(TableReaderError::UnsupportedFormat(format!(
                "cannot detect workbook format for '{}'",
                path.display()
            ))),
        }
    }

    fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Stream the rows of a sheet that fall inside `window`.
    fn stream<'a>(&'a mut self, sheet: &str, window: Window) -> Result<RowStream<'a>> {
        match self {
            Self::Xlsx(xlsx) => {
                let mut reader = xlsx
                    .worksheet_cells_reader(sheet)
                    .map_err(calamine::Error::from)?;
                let feed: CellFeed<'a> = Box::new(move || {
                    let cell = reader.next_cell().map_err(calamine::Error::from)?;
                    Ok(cell.map(|cell| {
                        let (row, column) = cell.get_position();
                        (row as usize, column as usize, convert_data_ref(cell.get_value()))
                    }))
                });
                Ok(Box::new(CellRows::new(feed, window)))
            }
            Self::Xlsb(xlsb) => {
                let mut reader = xlsb
                    .worksheet_cells_reader(sheet)
                    .map_err(calamine::Error::from)?;
                let feed: CellFeed<'a> = Box::new(move || {
                    let cell = reader.next_cell().map_err(calamine::Error::from)?;
                    Ok(cell.map(|cell| {
                        let (row, column) = cell.get_position();
                        (row as usize, column as usize, convert_data_ref(cell.get_value()))
                    }))
                });
                Ok(Box::new(CellRows::new(feed, window)))
            }
            Self::Xls(xls) => {
                let range = xls.worksheet_range(sheet).map_err(calamine::Error::from)?;
                Ok(Box::new(RangeRows::new(range, window)))
            }
            Self::Ods(ods) => {
                let range = ods.worksheet_range(sheet).map_err(calamine::Error::from)?;
                Ok(Box::new(RangeRows::new(range, window)))
            }
        }
    }
}

/// One sheet of a workbook file.
pub struct WorkbookSource {
    path: PathBuf,
    sheet: String,
    workbook: Workbook,
}

impl WorkbookSource {
    /// Open a workbook and select a sheet by name.
    pub fn open(path: impl AsRef<Path>, sheet: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let workbook = Workbook::open(&path)?;

        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(TableReaderError::SourceNotFound(format!(
                "sheet '{}' in {}",
                sheet,
                path.display()
            )));
        }

        debug!(path = %path.display(), sheet, "opened workbook source");
        Ok(Self {
            path,
            sheet: sheet.to_string(),
            workbook,
        })
    }

    /// List the sheets of a workbook file.
    pub fn sheet_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
        Ok(Workbook::open(path.as_ref())?.sheet_names())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }
}

impl RowSource for WorkbookSource {
    fn description(&self) -> SourceDescription {
        SourceDescription::Workbook {
            path: self.path.clone(),
            sheet: self.sheet.clone(),
        }
    }

    fn rows(&mut self, spec: &TableSpec) -> Result<RowStream<'_>> {
        spec.validate()?;
        self.workbook.stream(&self.sheet, Window::from_spec(spec))
    }

    fn all_rows(&mut self) -> Result<RowStream<'_>> {
        self.workbook.stream(&self.sheet, Window::full())
    }
}

/// Rows and columns a stream keeps.
#[derive(Debug, Clone)]
struct Window {
    first_row: usize,
    last_row: usize,
    /// Inclusive column range; `None` keeps every column.
    columns: Option<(usize, usize)>,
    skip_rows: BTreeSet<usize>,
}

impl Window {
    fn from_spec(spec: &TableSpec) -> Self {
        Self {
            first_row: spec.data_start_row,
            last_row: spec.data_end_row,
            columns: Some((spec.start_col, spec.end_col)),
            skip_rows: spec.skip_rows.clone(),
        }
    }

    fn full() -> Self {
        Self {
            first_row: 0,
            last_row: usize::MAX,
            columns: None,
            skip_rows: BTreeSet::new(),
        }
    }

    /// Position of a sheet column within the row, if kept.
    fn slot(&self, column: usize) -> Option<usize> {
        match self.columns {
            Some((start, end)) if (start..=end).contains(&column) => Some(column - start),
            Some(_) => None,
            None => Some(column),
        }
    }

    fn width(&self) -> Option<usize> {
        self.columns
            .map(|(start, end)| end.saturating_sub(start).saturating_add(1))
    }
}

type PositionedCell = (usize, usize, RawCell);

/// Pulls the next cell of a sheet in row-major order.
type CellFeed<'a> = Box<dyn FnMut() -> Result<Option<PositionedCell>> + 'a>;

/// Groups a row-major cell stream into rows.
struct CellRows<'a> {
    feed: CellFeed<'a>,
    pending: Option<PositionedCell>,
    exhausted: bool,
    next_row: usize,
    window: Window,
}

impl<'a> CellRows<'a> {
    fn new(feed: CellFeed<'a>, window: Window) -> Self {
        Self {
            feed,
            pending: None,
            exhausted: false,
            next_row: window.first_row,
            window,
        }
    }

    fn next_cell(&mut self) -> Result<Option<PositionedCell>> {
        if let Some(cell) = self.pending.take() {
            return Ok(Some(cell));
        }
        if self.exhausted {
            return Ok(None);
        }
        match (self.feed)() {
            Ok(Some(cell)) => Ok(Some(cell)),
            Ok(None) => {
                self.exhausted = true;
                Ok(None)
            }
            Err(e) => {
                self.exhausted = true;
                Err(e)
            }
        }
    }
}

impl Iterator for CellRows<'_> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.next_row > self.window.last_row {
                return None;
            }
            let row = self.next_row;
            let mut cells: Vec<RawCell> = Vec::new();
            let mut row_present = false;

            loop {
                let cell = match self.next_cell() {
                    Ok(Some(cell)) => cell,
                    Ok(None) => break,
                    Err(e) => return Some(Err(e)),
                };
                if cell.0 < row {
                    // Rows above the window are skipped silently
                    if cell.0 >= self.window.first_row {
                        warn!(row = cell.0, column = cell.1, "out-of-order cell ignored");
                    }
                    continue;
                }
                if cell.0 > row {
                    self.pending = Some(cell);
                    break;
                }

                row_present = true;
                let (_, column, value) = cell;
                if let Some(slot) = self.window.slot(column) {
                    if cells.len() <= slot {
                        cells.resize_with(slot + 1, RawCell::default);
                    }
                    cells[slot] = value;
                }
            }

            // Nothing at or after this row: the sheet has ended.
            if !row_present && self.pending.is_none() {
                return None;
            }

            self.next_row += 1;
            if self.window.skip_rows.contains(&row) {
                trace!(row, "skipping row");
                continue;
            }
            if let Some(width) = self.window.width() {
                cells.resize_with(width, RawCell::default);
            }
            return Some(Ok(RawRow::new(row, cells)));
        }
    }
}

/// Rows of an in-memory sheet range.
struct RangeRows {
    range: Range<Data>,
    next_row: usize,
    window: Window,
}

impl RangeRows {
    fn new(range: Range<Data>, window: Window) -> Self {
        Self {
            range,
            next_row: window.first_row,
            window,
        }
    }
}

impl Iterator for RangeRows {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let (end_row, end_col) = self.range.end()?;
        loop {
            let row = self.next_row;
            if row > self.window.last_row || row > end_row as usize {
                return None;
            }
            self.next_row += 1;
            if self.window.skip_rows.contains(&row) {
                trace!(row, "skipping row");
                continue;
            }

            let (first, last) = self.window.columns.unwrap_or((0, end_col as usize));
            let cells = (first..=last)
                .map(|column| {
                    self.range
                        .get_value((row as u32, column as u32))
                        .map(convert_data)
                        .unwrap_or_default()
                })
                .collect();
            return Some(Ok(RawRow::new(row, cells)));
        }
    }
}

fn convert_data(value: &Data) -> RawCell {
    match value {
        Data::Int(v) => RawCell::native(NativeValue::Number(*v as f64)),
        Data::Float(v) => RawCell::native(NativeValue::Number(*v)),
        Data::String(s) => RawCell::text(s),
        Data::Bool(b) => RawCell::text(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() => RawCell::text(dt.as_f64().to_string()),
        Data::DateTime(dt) => serial_cell(dt.as_f64()),
        Data::DateTimeIso(s) => iso_cell(s),
        Data::DurationIso(s) => RawCell::text(s),
        Data::Error(e) => RawCell::text(e.to_string()),
        Data::Empty => RawCell::default(),
    }
}

fn convert_data_ref(value: &DataRef<'_>) -> RawCell {
    match value {
        DataRef::Int(v) => RawCell::native(NativeValue::Number(*v as f64)),
        DataRef::Float(v) => RawCell::native(NativeValue::Number(*v)),
        DataRef::String(s) => RawCell::text(s),
        DataRef::SharedString(s) => RawCell::text(s),
        DataRef::Bool(b) => RawCell::text(b.to_string()),
        DataRef::DateTime(dt) if dt.is_duration() => RawCell::text(dt.as_f64().to_string()),
        DataRef::DateTime(dt) => serial_cell(dt.as_f64()),
        DataRef::DateTimeIso(s) => iso_cell(s),
        DataRef::DurationIso(s) => RawCell::text(s),
        DataRef::Error(e) => RawCell::text(e.to_string()),
        DataRef::Empty => RawCell::default(),
    }
}

/// Cell for an Excel serial date (days since 1899-12-30, 1900 date system).
/// Serials below one day are times of day.
fn serial_cell(serial: f64) -> RawCell {
    excel_serial_to_native(serial)
        .map(RawCell::native)
        .unwrap_or_else(|| RawCell::text(serial.to_string()))
}

pub(crate) fn excel_serial_to_native(serial: f64) -> Option<NativeValue> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let seconds = (serial * SECONDS_PER_DAY).round() as i64;
    if serial < 1.0 {
        let time = NaiveTime::from_num_seconds_from_midnight_opt((seconds % 86_400) as u32, 0)?;
        return Some(NativeValue::Time(time));
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch
        .checked_add_signed(Duration::try_seconds(seconds)?)
        .map(NativeValue::DateTime)
}

fn iso_cell(value: &str) -> RawCell {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return RawCell::native(NativeValue::DateTime(dt));
    }
    if let Some(dt) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return RawCell::native(NativeValue::DateTime(dt));
    }
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S%.f") {
        return RawCell::native(NativeValue::Time(time));
    }
    RawCell::text(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_from(cells: Vec<(usize, usize, &str)>) -> CellFeed<'static> {
        let mut cells = cells
            .into_iter()
            .map(|(r, c, v)| (r, c, RawCell::text(v)))
            .collect::<Vec<_>>()
            .into_iter();
        Box::new(move || Ok(cells.next()))
    }

    fn sample_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (4, 3));
        range.set_value((0, 0), Data::String("Sales".to_string()));
        range.set_value((1, 1), Data::String("Product".to_string()));
        range.set_value((1, 2), Data::String("Amount".to_string()));
        range.set_value((2, 1), Data::String(" iPhone 4 ".to_string()));
        range.set_value((2, 2), Data::Float(100.12));
        range.set_value((4, 1), Data::String("MacBook Pro".to_string()));
        range.set_value((4, 2), Data::Int(1000));
        range
    }

    #[test]
    fn test_cell_rows_fill_blank_rows_and_window() {
        let feed = feed_from(vec![
            (0, 0, "title"),
            (2, 1, "a"),
            (2, 3, "outside"),
            (4, 2, "b"),
            (5, 1, "c"),
        ]);
        let window = Window::from_spec(&TableSpec::new((2, 4), (1, 2)));
        let rows: Vec<RawRow> = CellRows::new(feed, window)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].texts(), vec!["a", ""]);
        assert_eq!(rows[1].index, 3);
        assert_eq!(rows[1].texts(), vec!["", ""]);
        assert_eq!(rows[2].texts(), vec!["", "b"]);
    }

    #[test]
    fn test_cell_rows_stop_at_sheet_end() {
        let feed = feed_from(vec![(1, 0, "x"), (2, 0, "y")]);
        let window = Window::from_spec(&TableSpec::new((1, 100), (0, 0)).with_skip_rows([2]));
        let rows: Vec<RawRow> = CellRows::new(feed, window)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].texts(), vec!["x"]);
    }

    #[test]
    fn test_range_rows_bounded() {
        let window = Window::from_spec(&TableSpec::new((2, 4), (1, 2)).with_skip_rows([3]));
        let rows: Vec<RawRow> = RangeRows::new(sample_range(), window)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].texts(), vec!["iPhone 4", "100.12"]);
        assert_eq!(rows[0].cell(1).native, Some(NativeValue::Number(100.12)));
        assert_eq!(rows[1].index, 4);
        assert_eq!(rows[1].texts(), vec!["MacBook Pro", "1000"]);
    }

    #[test]
    fn test_range_rows_full_width() {
        let rows: Vec<RawRow> = RangeRows::new(sample_range(), Window::full())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].width(), 4);
        assert_eq!(rows[0].cell(0).text, "Sales");
        assert!(rows[3].is_blank());
    }

    #[test]
    fn test_window_width_saturates() {
        assert_eq!(Window::from_spec(&TableSpec::new((0, 1), (2, 5))).width(), Some(4));
        assert_eq!(
            Window::from_spec(&TableSpec::new((0, 1), (0, usize::MAX))).width(),
            Some(usize::MAX)
        );
        assert_eq!(Window::full().width(), None);
    }

    #[test]
    fn test_excel_serial_conversion() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 10).unwrap();
        assert_eq!(
            excel_serial_to_native(45270.0),
            Some(NativeValue::DateTime(date.and_hms_opt(0, 0, 0).unwrap()))
        );
        assert_eq!(
            excel_serial_to_native(45270.5),
            Some(NativeValue::DateTime(date.and_hms_opt(12, 0, 0).unwrap()))
        );
        assert_eq!(
            excel_serial_to_native(0.75),
            Some(NativeValue::Time(NaiveTime::from_hms_opt(18, 0, 0).unwrap()))
        );
        assert_eq!(excel_serial_to_native(-1.0), None);
    }

    #[test]
    fn test_iso_cells() {
        assert_eq!(iso_cell("2024-01-15T08:30:00").text, "2024-01-15 08:30:00");
        assert_eq!(iso_cell("2024-01-15").text, "2024-01-15");
        assert_eq!(iso_cell("08:30:00").text, "08:30:00");
        assert_eq!(iso_cell("P1D").native, None);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let result = WorkbookSource::open(file.path(), "Sheet1");
        assert!(matches!(result, Err(TableReaderError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_workbook() {
        let result = WorkbookSource::open("/no/such/book.xlsx", "Sheet1");
        assert!(matches!(result, Err(TableReaderError::SourceNotFound(_))));
    }
}
