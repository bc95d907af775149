//! Tablereader: typed extraction of tables embedded in CSV files and
//! spreadsheets.
//!
//! A table is located by a [`TableSpec`] (row range, column range and rows to
//! skip) and described by a [`Header`] (column names and declared types).
//! Extraction streams the rectangle out of a [`RowSource`], classifies
//! placeholder nulls, infers one format per temporal column from a bounded
//! sample and yields each row as a name to [`Value`] map.
//!
//! # Example
//!
//! ```no_run
//! use tablereader::{ColumnType, Header, HeaderColumn, TableReader, TableSpec};
//!
//! let reader = TableReader::new();
//! let mut source = reader.open_csv("sales.csv").unwrap();
//!
//! let spec = TableSpec::new((1, 2), (0, 2));
//! let header = Header::new(vec![
//!     HeaderColumn::new("Date", ColumnType::Date),
//!     HeaderColumn::new("Product", ColumnType::Str),
//!     HeaderColumn::new("Amount", ColumnType::Number),
//! ])
//! .unwrap();
//!
//! for row in reader.extract(&mut source, &spec, &header).unwrap() {
//!     println!("{:?}", row.unwrap());
//! }
//! ```

pub mod error;
pub mod extract;
pub mod inference;
pub mod input;
pub mod parse;
pub mod schema;

mod reader;

pub use error::{Result, TableReaderError};
pub use extract::{TypedRow, TypedRows, Value};
pub use inference::FormatMap;
pub use input::{
    ContentPreview, CsvOptions, DelimitedSource, PreviewConfig, RawCell, RawRow, RowSource,
    WorkbookSource,
};
pub use reader::{TableReader, TableReaderConfig};
pub use schema::{
    ColumnType, DecimalSeparator, Header, HeaderColumn, HeaderColumnSpec, TableDefinition,
    TableSpec,
};
