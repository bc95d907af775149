//! CLI command implementations.

pub mod extract;
pub mod preview;
pub mod sheets;
