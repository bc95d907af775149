//! Declared table structure: bounds, header and column types.

mod header;
mod table_spec;
mod types;

pub use header::{normalize_name, Header, HeaderColumn, HeaderColumnSpec};
pub use table_spec::{TableDefinition, TableSpec};
pub use types::{ColumnType, DecimalSeparator};
