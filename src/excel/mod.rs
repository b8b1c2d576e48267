//! Excel module
//!
//! - Export: record sets → Excel (.xlsx) buffers
//! - Import: Excel (.xlsx) → JSON rows (inspection and round-trips)

mod exporter;
mod importer;

pub use exporter::{ConverterOptions, SpreadsheetConverter};
pub use importer::{SheetData, WorkbookReader};
