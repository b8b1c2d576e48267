//! Spreadsheet converter implementation - record sets → Excel (.xlsx)

use crate::error::{ConverterError, ConverterResult};
use crate::types::{RecordSet, Row, Schema, DEFAULT_COLUMN_WIDTH};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Conversion knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterOptions {
    /// Display width applied to every column
    pub column_width: f64,
    /// Accept an empty record set (zero rows, zero columns) instead of failing
    pub allow_empty: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            column_width: DEFAULT_COLUMN_WIDTH,
            allow_empty: false,
        }
    }
}

/// Materializes a record set as a single-worksheet workbook
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetConverter {
    options: ConverterOptions,
}

impl SpreadsheetConverter {
    /// Create a new converter
    pub fn new(options: ConverterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Infer the column list, applying the empty-input policy
    pub fn infer_schema(&self, records: &RecordSet) -> ConverterResult<Schema> {
        if records.is_empty() && !self.options.allow_empty {
            return Err(ConverterError::Shape(
                "Input data must contain at least one object".to_string(),
            ));
        }

        let schema = Schema::infer(records, self.options.column_width);
        debug!(
            columns = schema.len(),
            rows = records.len(),
            "inferred schema from first row"
        );
        Ok(schema)
    }

    /// Convert a record set into the bytes of an .xlsx document
    pub fn convert(&self, records: &RecordSet, worksheet_name: &str) -> ConverterResult<Vec<u8>> {
        let schema = self.infer_schema(records)?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(worksheet_name).map_err(|e| {
            ConverterError::InvalidParameter(format!(
                "Invalid worksheet name '{}': {}",
                worksheet_name, e
            ))
        })?;

        // Header row (row 0), skipped entirely when there are no columns
        Self::write_header(worksheet, &schema)?;

        // Data rows start at row 1
        for (row_idx, row) in records.rows().iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1).map_err(|_| {
                ConverterError::Serialization(format!("Row {} exceeds worksheet limits", row_idx))
            })?;
            Self::write_row(worksheet, excel_row, &schema, row)?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| ConverterError::Serialization(format!("Failed to encode workbook: {}", e)))?;

        debug!(
            worksheet = worksheet_name,
            rows = records.len(),
            bytes = buffer.len(),
            "serialized workbook"
        );
        Ok(buffer)
    }

    /// Convert and write the workbook to disk
    pub fn convert_to_file(
        &self,
        records: &RecordSet,
        worksheet_name: &str,
        output_path: &Path,
    ) -> ConverterResult<usize> {
        let buffer = self.convert(records, worksheet_name)?;
        std::fs::write(output_path, &buffer)?;
        Ok(buffer.len())
    }

    fn write_header(worksheet: &mut Worksheet, schema: &Schema) -> ConverterResult<()> {
        for (col_idx, column) in schema.columns().iter().enumerate() {
            let col = Self::column_index(col_idx)?;
            worksheet
                .write_string(0, col, &column.name)
                .map_err(|e| Self::cell_error(0, col, e))?;
            worksheet
                .set_column_width(col, column.width)
                .map_err(|e| Self::cell_error(0, col, e))?;
        }
        Ok(())
    }

    /// Write one record, matching values to columns by key.
    /// Keys missing from the schema are dropped; absent keys stay blank.
    fn write_row(
        worksheet: &mut Worksheet,
        row: u32,
        schema: &Schema,
        record: &Row,
    ) -> ConverterResult<()> {
        for (col_idx, name) in schema.names().enumerate() {
            if let Some(value) = record.get(name) {
                Self::write_cell_value(worksheet, row, Self::column_index(col_idx)?, value)?;
            }
        }
        Ok(())
    }

    /// Write a single cell based on the JSON value's type
    fn write_cell_value(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &Value,
    ) -> ConverterResult<()> {
        let written = match value {
            Value::Null => return Ok(()),
            Value::Bool(b) => worksheet.write_boolean(row, col, *b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => worksheet.write_number(row, col, f),
                None => worksheet.write_string(row, col, n.to_string()),
            },
            Value::String(s) => worksheet.write_string(row, col, s),
            // Nested structures are kept as their compact JSON text
            nested => worksheet.write_string(row, col, nested.to_string()),
        };
        written.map_err(|e| Self::cell_error(row, col, e))?;
        Ok(())
    }

    fn column_index(idx: usize) -> ConverterResult<u16> {
        u16::try_from(idx).map_err(|_| {
            ConverterError::Serialization(format!("Column {} exceeds worksheet limits", idx))
        })
    }

    fn cell_error(row: u32, col: u16, e: XlsxError) -> ConverterError {
        ConverterError::Serialization(format!("Failed to write cell ({}, {}): {}", row, col, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::WorkbookReader;
    use serde_json::json;

    fn records(value: Value) -> RecordSet {
        RecordSet::from_value(value).unwrap()
    }

    #[test]
    fn test_convert_produces_zip_container() {
        let converter = SpreadsheetConverter::default();
        let bytes = converter
            .convert(&records(json!([{"a": 1}])), "Sheet1")
            .unwrap();
        // .xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_convert_rejects_empty_by_default() {
        let converter = SpreadsheetConverter::default();
        let err = converter.convert(&RecordSet::default(), "Sheet1").unwrap_err();
        assert!(matches!(err, ConverterError::Shape(_)));
    }

    #[test]
    fn test_convert_allows_empty_when_configured() {
        let converter = SpreadsheetConverter::new(ConverterOptions {
            allow_empty: true,
            ..ConverterOptions::default()
        });
        let bytes = converter.convert(&RecordSet::default(), "Empty").unwrap();

        let sheets = WorkbookReader::from_bytes(bytes).read_all().unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "Empty");
        assert!(sheets[0].columns.is_empty());
        assert!(sheets[0].rows.is_empty());
    }

    #[test]
    fn test_invalid_worksheet_name() {
        let converter = SpreadsheetConverter::default();
        let err = converter
            .convert(&records(json!([{"a": 1}])), "bad/name")
            .unwrap_err();
        assert!(matches!(err, ConverterError::InvalidParameter(_)));
    }

    #[test]
    fn test_nested_values_written_as_json_text() {
        let converter = SpreadsheetConverter::default();
        let bytes = converter
            .convert(&records(json!([{"tags": ["x", "y"], "meta": {"k": 1}}])), "Sheet1")
            .unwrap();

        let sheet = WorkbookReader::from_bytes(bytes).read_first().unwrap();
        assert_eq!(sheet.rows[0].get("tags"), Some(&json!("[\"x\",\"y\"]")));
        assert_eq!(sheet.rows[0].get("meta"), Some(&json!("{\"k\":1}")));
    }

    #[test]
    fn test_null_is_blank() {
        let converter = SpreadsheetConverter::default();
        let bytes = converter
            .convert(&records(json!([{"a": null, "b": "x"}])), "Sheet1")
            .unwrap();

        let sheet = WorkbookReader::from_bytes(bytes).read_first().unwrap();
        assert_eq!(sheet.columns, vec!["a", "b"]);
        assert!(sheet.rows[0].get("a").is_none());
    }

    #[test]
    fn test_oversized_string_is_serialization_error() {
        let converter = SpreadsheetConverter::default();
        let long = "x".repeat(40_000);
        let err = converter
            .convert(&records(json!([{"text": long}])), "Sheet1")
            .unwrap_err();
        assert!(matches!(err, ConverterError::Serialization(_)));
    }
}
