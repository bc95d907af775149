//! Row sources: delimited text and workbooks behind one streaming interface.

mod delimited;
mod dialect;
mod preview;
mod source;
mod workbook;

pub use delimited::{CsvOptions, DelimitedSource};
pub use dialect::{detect_dialect, Dialect};
pub use preview::{row_line, ContentPreview, PreviewConfig};
pub use source::{NativeValue, RawCell, RawRow, RowSource, RowStream, SourceDescription};
pub use workbook::WorkbookSource;
