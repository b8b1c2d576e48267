//! Host item types

use crate::error::{ConverterError, ConverterResult};
use crate::types::{ConversionResult, XLSX_EXTENSION};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// One unit of data flowing between workflow nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub json: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BTreeMap<String, BinaryData>>,
}

/// A binary attachment, base64-encoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    pub data: String,
    pub mime_type: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<usize>,
}

impl BinaryData {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.into(),
            file_name: file_name.into(),
            file_extension: Some(XLSX_EXTENSION.to_string()),
            file_size: Some(bytes.len()),
        }
    }

    /// Decode the base64 payload
    pub fn decode(&self) -> ConverterResult<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| {
                ConverterError::Import(format!("Invalid base64 in '{}': {}", self.file_name, e))
            })
    }
}

impl Item {
    pub fn new(json: Map<String, Value>) -> Self {
        Self { json, binary: None }
    }

    /// Build an item from a JSON value; non-objects land under `data`
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(json) => Self::new(json),
            other => {
                let mut json = Map::new();
                json.insert("data".to_string(), other);
                Self::new(json)
            }
        }
    }

    /// Turn a conversion outcome into the item handed back to the host
    pub fn from_result(result: ConversionResult, binary_property: &str) -> Self {
        match result {
            ConversionResult::Success {
                row_count,
                data,
                mime_type,
                file_name,
            } => {
                let mut binary = BTreeMap::new();
                binary.insert(
                    binary_property.to_string(),
                    BinaryData::from_bytes(&data, mime_type, file_name),
                );
                Self {
                    json: object(json!({ "success": true, "rowCount": row_count })),
                    binary: Some(binary),
                }
            }
            ConversionResult::Failure { error } => {
                Self::new(object(json!({ "success": false, "error": error })))
            }
        }
    }

    /// Look up a field by dot path. A leading `json.` is accepted and ignored.
    pub fn field(&self, path: &str) -> Option<&Value> {
        let path = path.strip_prefix("json.").unwrap_or(path);
        let mut segments = path.split('.');
        let mut current = self.json.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn is_success(&self) -> bool {
        self.json.get("success").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn row_count(&self) -> Option<u64> {
        self.json.get("rowCount").and_then(Value::as_u64)
    }

    pub fn error(&self) -> Option<&str> {
        self.json.get("error").and_then(Value::as_str)
    }

    pub fn attachment(&self, property: &str) -> Option<&BinaryData> {
        self.binary.as_ref()?.get(property)
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::XLSX_MIME_TYPE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_with_json_prefix() {
        let item = Item::from_value(json!({"data": [{"a": 1}]}));
        assert_eq!(item.field("json.data"), Some(&json!([{"a": 1}])));
        assert_eq!(item.field("data"), Some(&json!([{"a": 1}])));
    }

    #[test]
    fn test_field_nested_path() {
        let item = Item::from_value(json!({"payload": {"rows": [1, 2]}}));
        assert_eq!(item.field("payload.rows"), Some(&json!([1, 2])));
        assert_eq!(item.field("payload.missing"), None);
        assert_eq!(item.field("nope"), None);
    }

    #[test]
    fn test_from_value_wraps_non_objects() {
        let item = Item::from_value(json!([1, 2]));
        assert_eq!(item.field("data"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_from_success_result() {
        let result = ConversionResult::success(2, vec![1, 2, 3], "report.xlsx");
        let item = Item::from_result(result, "data");

        assert!(item.is_success());
        assert_eq!(item.row_count(), Some(2));
        let attachment = item.attachment("data").unwrap();
        assert_eq!(attachment.mime_type, XLSX_MIME_TYPE);
        assert_eq!(attachment.file_name, "report.xlsx");
        assert_eq!(attachment.file_size, Some(3));
        assert_eq!(attachment.decode().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_from_failure_result() {
        let item = Item::from_result(ConversionResult::failure("bad input"), "data");
        assert!(!item.is_success());
        assert_eq!(item.error(), Some("bad input"));
        assert!(item.binary.is_none());
    }

    #[test]
    fn test_binary_data_serializes_camel_case() {
        let data = BinaryData::from_bytes(b"abc", XLSX_MIME_TYPE, "data.xlsx");
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["mimeType"], json!(XLSX_MIME_TYPE));
        assert_eq!(json["fileName"], json!("data.xlsx"));
        assert_eq!(json["data"], json!("YWJj"));
    }
}
