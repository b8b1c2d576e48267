//! Excel Converter - JSON arrays to .xlsx for workflow hosts
//!
//! This library turns an array of JSON objects into a single-worksheet
//! spreadsheet, and wraps that conversion as a workflow node that reads
//! items, resolves its parameters per item and emits base64 attachments.
//!
//! # Features
//!
//! - Columns inferred from the first row's keys, in order
//! - Missing keys become blank cells, extra keys are dropped
//! - JSON-string and native-array input modes
//! - Continue-on-fail capture of per-item errors
//! - Workbook reader for inspection and round-trips
//!
//! # Example
//!
//! ```no_run
//! use excel_converter::excel::SpreadsheetConverter;
//! use excel_converter::types::RecordSet;
//!
//! let records = RecordSet::parse(r#"[{"a":1,"b":2},{"a":3}]"#)?;
//! let bytes = SpreadsheetConverter::default().convert(&records, "Sheet1")?;
//!
//! println!("{} bytes", bytes.len());
//! # Ok::<(), excel_converter::error::ConverterError>(())
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod logging;
pub mod node;
pub mod types;

// Re-export commonly used types
pub use error::{ConverterError, ConverterResult};
pub use types::{ConversionRequest, ConversionResult, RecordSet, Schema};
