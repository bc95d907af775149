//! Typed row extraction: values and the assembler that produces them.

mod rows;
mod value;

pub use rows::TypedRows;
pub use value::{TypedRow, Value};
