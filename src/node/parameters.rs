//! Node parameters, resolved per item with their defaults

use super::context::ExecutionContext;
use crate::error::{ConverterError, ConverterResult};
use crate::excel::ConverterOptions;
use crate::types::{ConversionRequest, RecordSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const PARAM_INPUT_MODE: &str = "inputMode";
pub const PARAM_INPUT_FIELD: &str = "inputField";
pub const PARAM_WORKSHEET_NAME: &str = "worksheetName";
pub const PARAM_BINARY_PROPERTY: &str = "binaryPropertyName";
pub const PARAM_FILE_NAME: &str = "fileName";
pub const PARAM_ALLOW_EMPTY: &str = "allowEmpty";
pub const PARAM_OUTPUT_LAYOUT: &str = "outputLayout";

pub const DEFAULT_INPUT_FIELD: &str = "json.data";
pub const DEFAULT_WORKSHEET_NAME: &str = "Sheet1";
pub const DEFAULT_BINARY_PROPERTY: &str = "data";
pub const DEFAULT_FILE_NAME: &str = "data.xlsx";

/// Where the table comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    /// `inputField` holds JSON text; one conversion per execution
    #[default]
    JsonString,
    /// `inputField` names a field holding an array; one conversion per item
    NativeArray,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::JsonString => "jsonString",
            InputMode::NativeArray => "nativeArray",
        }
    }
}

impl FromStr for InputMode {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jsonString" => Ok(InputMode::JsonString),
            "nativeArray" => Ok(InputMode::NativeArray),
            other => Err(ConverterError::InvalidParameter(format!(
                "Unknown {} '{}' (expected jsonString or nativeArray)",
                PARAM_INPUT_MODE, other
            ))),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How conversions map to output workbooks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputLayout {
    /// One workbook per input item
    #[default]
    PerItem,
    /// All items' rows in one shared worksheet
    Combined,
}

impl OutputLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputLayout::PerItem => "perItem",
            OutputLayout::Combined => "combined",
        }
    }
}

impl FromStr for OutputLayout {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perItem" => Ok(OutputLayout::PerItem),
            "combined" => Ok(OutputLayout::Combined),
            other => Err(ConverterError::InvalidParameter(format!(
                "Unknown {} '{}' (expected perItem or combined)",
                PARAM_OUTPUT_LAYOUT, other
            ))),
        }
    }
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters that select the execution path.
///
/// These apply to the whole execution. They are read through item 0 and every
/// item must agree, since one run cannot mix modes or layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeSettings {
    pub input_mode: InputMode,
    pub output_layout: OutputLayout,
}

impl NodeSettings {
    pub fn resolve(ctx: &dyn ExecutionContext) -> ConverterResult<Self> {
        let settings = Self::resolve_at(ctx, 0)?;
        for index in 1..ctx.items().len() {
            let item_settings = Self::resolve_at(ctx, index)?;
            if item_settings.input_mode != settings.input_mode {
                return Err(node_level_conflict(PARAM_INPUT_MODE, index));
            }
            if item_settings.output_layout != settings.output_layout {
                return Err(node_level_conflict(PARAM_OUTPUT_LAYOUT, index));
            }
        }
        Ok(settings)
    }

    fn resolve_at(ctx: &dyn ExecutionContext, item_index: usize) -> ConverterResult<Self> {
        let input_mode = match string_param(ctx, PARAM_INPUT_MODE, item_index)? {
            Some(s) => s.parse()?,
            None => InputMode::default(),
        };
        let output_layout = match string_param(ctx, PARAM_OUTPUT_LAYOUT, item_index)? {
            Some(s) => s.parse()?,
            None => OutputLayout::default(),
        };
        Ok(Self {
            input_mode,
            output_layout,
        })
    }
}

/// Parameter values for one item
#[derive(Debug, Clone, PartialEq)]
pub struct NodeParameters {
    pub input_field: String,
    pub worksheet_name: String,
    pub binary_property_name: String,
    pub file_name: String,
    pub allow_empty: bool,
}

impl Default for NodeParameters {
    fn default() -> Self {
        Self {
            input_field: DEFAULT_INPUT_FIELD.to_string(),
            worksheet_name: DEFAULT_WORKSHEET_NAME.to_string(),
            binary_property_name: DEFAULT_BINARY_PROPERTY.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            allow_empty: false,
        }
    }
}

impl NodeParameters {
    /// Resolve the per-item parameters for `item_index`, falling back to defaults
    pub fn resolve(ctx: &dyn ExecutionContext, item_index: usize) -> ConverterResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            input_field: string_param(ctx, PARAM_INPUT_FIELD, item_index)?
                .unwrap_or(defaults.input_field),
            worksheet_name: string_param(ctx, PARAM_WORKSHEET_NAME, item_index)?
                .unwrap_or(defaults.worksheet_name),
            binary_property_name: non_empty(
                PARAM_BINARY_PROPERTY,
                string_param(ctx, PARAM_BINARY_PROPERTY, item_index)?
                    .unwrap_or(defaults.binary_property_name),
            )?,
            file_name: non_empty(
                PARAM_FILE_NAME,
                string_param(ctx, PARAM_FILE_NAME, item_index)?.unwrap_or(defaults.file_name),
            )?,
            allow_empty: bool_param(ctx, PARAM_ALLOW_EMPTY, item_index)?
                .unwrap_or(defaults.allow_empty),
        })
    }

    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            allow_empty: self.allow_empty,
            ..ConverterOptions::default()
        }
    }

    pub fn request(&self, records: RecordSet) -> ConversionRequest {
        ConversionRequest {
            worksheet_name: self.worksheet_name.clone(),
            file_name: self.file_name.clone(),
            output_property_name: self.binary_property_name.clone(),
            records,
        }
    }
}

fn string_param(
    ctx: &dyn ExecutionContext,
    name: &str,
    item_index: usize,
) -> ConverterResult<Option<String>> {
    match ctx.parameter(name, item_index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ConverterError::InvalidParameter(format!(
            "'{}' must be a string, got {}",
            name,
            crate::types::json_type_name(&other)
        ))),
    }
}

fn bool_param(
    ctx: &dyn ExecutionContext,
    name: &str,
    item_index: usize,
) -> ConverterResult<Option<bool>> {
    match ctx.parameter(name, item_index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(other) => Err(ConverterError::InvalidParameter(format!(
            "'{}' must be a boolean, got {}",
            name,
            crate::types::json_type_name(&other)
        ))),
    }
}

fn node_level_conflict(name: &str, item_index: usize) -> ConverterError {
    ConverterError::InvalidParameter(format!(
        "'{}' applies to the whole execution; item {} overrides it",
        name, item_index
    ))
}

fn non_empty(name: &str, value: String) -> ConverterResult<String> {
    if value.trim().is_empty() {
        return Err(ConverterError::InvalidParameter(format!(
            "'{}' must not be empty",
            name
        )));
    }
    Ok(value)
}
