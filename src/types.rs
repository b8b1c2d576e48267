use crate::error::{ConverterError, ConverterResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// MIME type of an Office Open XML workbook
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File extension reported alongside generated workbooks
pub const XLSX_EXTENSION: &str = "xlsx";

/// Display width (in characters) given to every generated column
pub const DEFAULT_COLUMN_WIDTH: f64 = 20.0;

/// A single row object: column name -> scalar value
pub type Row = Map<String, Value>;

/// Name of a JSON value's type, for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//==============================================================================
// Record Sets
//==============================================================================

/// Ordered sequence of row objects to be tabulated.
///
/// Construction validates the shape (an array whose elements are all
/// objects). Emptiness is accepted here and decided by the converter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    rows: Vec<Row>,
}

impl RecordSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Parse JSON text into a record set.
    ///
    /// Syntax errors are reported as `MalformedInput`, shape problems as `Shape`.
    pub fn parse(text: &str) -> ConverterResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ConverterError::MalformedInput(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validate an already-decoded JSON value as an array of objects
    pub fn from_value(value: Value) -> ConverterResult<Self> {
        let elements = match value {
            Value::Array(elements) => elements,
            other => {
                return Err(ConverterError::Shape(format!(
                    "Input data is not an array (got {})",
                    json_type_name(&other)
                )))
            }
        };

        let mut rows = Vec::with_capacity(elements.len());
        for (idx, element) in elements.into_iter().enumerate() {
            match element {
                Value::Object(row) => rows.push(row),
                other if idx == 0 => {
                    return Err(ConverterError::Shape(format!(
                        "Input data must contain at least one object (first element is {})",
                        json_type_name(&other)
                    )))
                }
                other => {
                    return Err(ConverterError::Shape(format!(
                        "Input data must contain only objects (element {} is {})",
                        idx,
                        json_type_name(&other)
                    )))
                }
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append another record set's rows after this one's
    pub fn append(&mut self, other: RecordSet) {
        self.rows.extend(other.rows);
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

//==============================================================================
// Schema
//==============================================================================

/// One output column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub width: f64,
}

/// Ordered column list, inferred once per conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    /// Derive columns from the keys of the first row, in their order.
    ///
    /// An empty record set yields an empty schema.
    pub fn infer(records: &RecordSet, width: f64) -> Self {
        let columns = records
            .rows()
            .first()
            .map(|first| {
                first
                    .keys()
                    .map(|name| ColumnSpec {
                        name: name.clone(),
                        width,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

//==============================================================================
// Conversion Request / Result
//==============================================================================

/// Everything needed to turn one input item into one output item
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub worksheet_name: String,
    pub file_name: String,
    pub output_property_name: String,
    pub records: RecordSet,
}

/// Outcome of one conversion, as reported back to the host
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Success {
        row_count: usize,
        data: Vec<u8>,
        mime_type: String,
        file_name: String,
    },
    Failure {
        error: String,
    },
}

impl ConversionResult {
    pub fn success(row_count: usize, data: Vec<u8>, file_name: impl Into<String>) -> Self {
        ConversionResult::Success {
            row_count,
            data,
            mime_type: XLSX_MIME_TYPE.to_string(),
            file_name: file_name.into(),
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        ConversionResult::Failure {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_array_of_objects() {
        let records = RecordSet::parse(r#"[{"a":1,"b":2},{"a":3}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.rows()[1].get("a"), Some(&json!(3)));
    }

    #[test]
    fn test_parse_malformed() {
        let err = RecordSet::parse("[{\"a\":1,").unwrap_err();
        assert!(matches!(err, ConverterError::MalformedInput(_)));
    }

    #[test]
    fn test_not_an_array() {
        let err = RecordSet::from_value(json!({"a": 1})).unwrap_err();
        assert!(matches!(err, ConverterError::Shape(_)));
        assert!(err.to_string().contains("not an array"));
    }

    #[test]
    fn test_first_element_not_object() {
        let err = RecordSet::from_value(json!([1, {"a": 1}])).unwrap_err();
        assert!(err.to_string().contains("at least one object"));
    }

    #[test]
    fn test_later_element_not_object() {
        let err = RecordSet::from_value(json!([{"a": 1}, null])).unwrap_err();
        assert!(err.to_string().contains("element 1 is null"));
    }

    #[test]
    fn test_empty_array_is_a_valid_record_set() {
        let records = RecordSet::from_value(json!([])).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_schema_follows_first_row_key_order() {
        let records = RecordSet::parse(r#"[{"zeta":1,"alpha":2,"mid":3},{"alpha":4}]"#).unwrap();
        let schema = Schema::infer(&records, DEFAULT_COLUMN_WIDTH);
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(schema.columns().iter().all(|c| c.width == 20.0));
    }

    #[test]
    fn test_schema_of_empty_record_set() {
        let schema = Schema::infer(&RecordSet::default(), DEFAULT_COLUMN_WIDTH);
        assert!(schema.is_empty());
    }

    #[test]
    fn test_conversion_result_helpers() {
        let ok = ConversionResult::success(2, vec![1, 2, 3], "out.xlsx");
        assert!(ok.is_success());
        match ok {
            ConversionResult::Success { mime_type, .. } => assert_eq!(mime_type, XLSX_MIME_TYPE),
            ConversionResult::Failure { .. } => unreachable!(),
        }

        let err = ConversionResult::failure("boom");
        assert_eq!(
            err,
            ConversionResult::Failure {
                error: "boom".to_string()
            }
        );
    }
}
