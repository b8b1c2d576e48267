//! Static node description presented to the host

use super::parameters::{
    DEFAULT_BINARY_PROPERTY, DEFAULT_FILE_NAME, DEFAULT_INPUT_FIELD, DEFAULT_WORKSHEET_NAME,
    PARAM_ALLOW_EMPTY, PARAM_BINARY_PROPERTY, PARAM_FILE_NAME, PARAM_INPUT_FIELD,
    PARAM_INPUT_MODE, PARAM_OUTPUT_LAYOUT, PARAM_WORKSHEET_NAME,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub group: &'static [&'static str],
    pub version: u32,
    pub description: &'static str,
    pub defaults: NodeDefaults,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
    pub properties: &'static [NodeProperty],
}

#[derive(Debug, Serialize)]
pub struct NodeDefaults {
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    String,
    Boolean,
    Options,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyDefault {
    Text(&'static str),
    Flag(bool),
}

#[derive(Debug, Serialize)]
pub struct PropertyOption {
    pub name: &'static str,
    pub value: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub default: PropertyDefault,
    pub description: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [PropertyOption],
}

fn is_false(b: &bool) -> bool {
    !b
}

fn no_options(options: &&[PropertyOption]) -> bool {
    options.is_empty()
}

pub static DESCRIPTION: NodeDescription = NodeDescription {
    display_name: "Excel Converter",
    name: "excelConverter",
    icon: "file:icons/excel.svg",
    group: &["transform"],
    version: 1,
    description: "Converts JSON data to an Excel file",
    defaults: NodeDefaults {
        name: "Excel Converter",
    },
    inputs: &["main"],
    outputs: &["main"],
    properties: &[
        NodeProperty {
            display_name: "Input Mode",
            name: PARAM_INPUT_MODE,
            kind: PropertyType::Options,
            default: PropertyDefault::Text("jsonString"),
            description: "How the table is supplied",
            required: false,
            options: &[
                PropertyOption {
                    name: "JSON String",
                    value: "jsonString",
                    description: "Input Field holds JSON text; produces a single file",
                },
                PropertyOption {
                    name: "Native Array",
                    value: "nativeArray",
                    description: "Input Field names an array field on each item; one file per item",
                },
            ],
        },
        NodeProperty {
            display_name: "Input Field",
            name: PARAM_INPUT_FIELD,
            kind: PropertyType::String,
            default: PropertyDefault::Text(DEFAULT_INPUT_FIELD),
            description: "JSON string data, or the name of the field that contains the array. Example: json.data",
            required: true,
            options: &[],
        },
        NodeProperty {
            display_name: "Worksheet Name",
            name: PARAM_WORKSHEET_NAME,
            kind: PropertyType::String,
            default: PropertyDefault::Text(DEFAULT_WORKSHEET_NAME),
            description: "Name of the worksheet",
            required: false,
            options: &[],
        },
        NodeProperty {
            display_name: "Binary Property",
            name: PARAM_BINARY_PROPERTY,
            kind: PropertyType::String,
            default: PropertyDefault::Text(DEFAULT_BINARY_PROPERTY),
            description: "Name of the binary property to which to write the data",
            required: false,
            options: &[],
        },
        NodeProperty {
            display_name: "File Name",
            name: PARAM_FILE_NAME,
            kind: PropertyType::String,
            default: PropertyDefault::Text(DEFAULT_FILE_NAME),
            description: "Name of the output file",
            required: false,
            options: &[],
        },
        NodeProperty {
            display_name: "Allow Empty Input",
            name: PARAM_ALLOW_EMPTY,
            kind: PropertyType::Boolean,
            default: PropertyDefault::Flag(false),
            description: "Write an empty worksheet instead of failing when the array is empty",
            required: false,
            options: &[],
        },
        NodeProperty {
            display_name: "Output Layout",
            name: PARAM_OUTPUT_LAYOUT,
            kind: PropertyType::Options,
            default: PropertyDefault::Text("perItem"),
            description: "Native Array mode only: one file per item, or every item's rows in one worksheet",
            required: false,
            options: &[
                PropertyOption {
                    name: "One File per Item",
                    value: "perItem",
                    description: "Each item produces its own workbook",
                },
                PropertyOption {
                    name: "Combined",
                    value: "combined",
                    description: "All items share one worksheet in a single workbook",
                },
            ],
        },
    ],
};

/// The node's static description
pub fn description() -> &'static NodeDescription {
    &DESCRIPTION
}
