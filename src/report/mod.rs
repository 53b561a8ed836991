//! Report catalog and execution.
//!
//! The catalog holds the three fixed report queries; the executor runs one
//! of them and prints the result.

pub mod catalog;
pub mod executor;

pub use catalog::{ReportDefinition, ReportKind};
pub use executor::{format_row, format_rows, ReportExecutor, COLUMN_SEPARATOR};
