//! Repository layer: table-scoped database operations.
//!
//! Both tables are append-only: rows are inserted and read, never
//! updated or deleted.

mod draft;
mod report;

pub use draft::*;
pub use report::*;
