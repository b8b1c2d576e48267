//! Workbook reader implementation - Excel (.xlsx) → JSON rows

use crate::error::{ConverterError, ConverterResult};
use crate::types::Row;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use serde_json::{Number, Value};
use std::io::Cursor;
use std::path::Path;

/// Largest integer an f64 can hold exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// One worksheet re-extracted as row objects
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    /// Header row, in column order
    pub columns: Vec<String>,
    /// Data rows keyed by header; blank cells are omitted
    pub rows: Vec<Row>,
}

/// Reads workbooks produced by the converter back into JSON rows
pub struct WorkbookReader {
    bytes: Vec<u8>,
}

impl WorkbookReader {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Load a workbook from disk
    pub fn open<P: AsRef<Path>>(path: P) -> ConverterResult<Self> {
        Ok(Self {
            bytes: std::fs::read(path)?,
        })
    }

    /// Read every worksheet, in workbook order
    pub fn read_all(&self) -> ConverterResult<Vec<SheetData>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(self.bytes.as_slice()))
            .map_err(|e| ConverterError::Import(format!("Failed to open workbook: {}", e)))?;

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                ConverterError::Import(format!("Failed to read worksheet '{}': {}", sheet_name, e))
            })?;
            sheets.push(Self::process_sheet(sheet_name, &range));
        }

        Ok(sheets)
    }

    /// Read the first worksheet only
    pub fn read_first(&self) -> ConverterResult<SheetData> {
        self.read_all()?
            .into_iter()
            .next()
            .ok_or_else(|| ConverterError::Import("Workbook has no worksheets".to_string()))
    }

    fn process_sheet(name: String, range: &Range<Data>) -> SheetData {
        let mut rows_iter = range.rows();

        // A sheet with no cells may still report a single blank cell
        let columns: Vec<String> = match rows_iter.next() {
            Some(header) if header.iter().any(|cell| !matches!(cell, Data::Empty)) => header
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Data::String(s) => s.clone(),
                    Data::Int(i) => i.to_string(),
                    Data::Float(f) => f.to_string(),
                    _ => format!("col_{}", col),
                })
                .collect(),
            _ => Vec::new(),
        };

        let rows = rows_iter
            .map(|cells| {
                let mut row = Row::new();
                for (col_name, cell) in columns.iter().zip(cells.iter()) {
                    if let Some(value) = Self::cell_to_value(cell) {
                        row.insert(col_name.clone(), value);
                    }
                }
                row
            })
            .collect();

        SheetData {
            name,
            columns,
            rows,
        }
    }

    /// Convert a cell to JSON; blank cells yield None
    fn cell_to_value(cell: &Data) -> Option<Value> {
        match cell {
            Data::Empty => None,
            Data::Int(i) => Some(Value::from(*i)),
            Data::Float(f) => Some(Self::float_to_value(*f)),
            Data::String(s) => Some(Value::String(s.clone())),
            Data::Bool(b) => Some(Value::Bool(*b)),
            Data::DateTime(dt) => Some(Self::float_to_value(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
            Data::Error(e) => Some(Value::String(e.to_string())),
        }
    }

    /// Spreadsheets store every number as a float; integral values come back as integers
    fn float_to_value(f: f64) -> Value {
        if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
            Value::from(f as i64)
        } else {
            Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_to_value_integral() {
        assert_eq!(WorkbookReader::float_to_value(3.0), json!(3));
        assert_eq!(WorkbookReader::float_to_value(-12.0), json!(-12));
    }

    #[test]
    fn test_float_to_value_fractional() {
        assert_eq!(WorkbookReader::float_to_value(2.5), json!(2.5));
    }

    #[test]
    fn test_cell_to_value_empty() {
        assert_eq!(WorkbookReader::cell_to_value(&Data::Empty), None);
    }

    #[test]
    fn test_cell_to_value_bool_and_string() {
        assert_eq!(
            WorkbookReader::cell_to_value(&Data::Bool(true)),
            Some(json!(true))
        );
        assert_eq!(
            WorkbookReader::cell_to_value(&Data::String("hi".to_string())),
            Some(json!("hi"))
        );
    }

    #[test]
    fn test_open_garbage_bytes_fails() {
        let reader = WorkbookReader::from_bytes(b"not a workbook".to_vec());
        let err = reader.read_all().unwrap_err();
        assert!(matches!(err, ConverterError::Import(_)));
    }
}
