//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ConverterError;
use crate::excel::{ConverterOptions, SpreadsheetConverter};
use crate::node::parameters::{DEFAULT_FILE_NAME, DEFAULT_WORKSHEET_NAME};
use crate::node::{description, BinaryData, ExcelConverterNode, Item, NodeDescription, StaticContext};
use crate::types::{RecordSet, XLSX_MIME_TYPE};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a conversion error to an HTTP status
fn error_status(error: &ConverterError) -> StatusCode {
    match error {
        ConverterError::MalformedInput(_)
        | ConverterError::Shape(_)
        | ConverterError::InvalidParameter(_)
        | ConverterError::Json(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ConverterError::Serialization(_) | ConverterError::Io(_) | ConverterError::Import(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn failure<T: Serialize>(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>) {
    (status, Json(ApiResponse::err(message)))
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Excel Converter API Server".to_string(),
        version: state.version.clone(),
        description: "Converts arrays of JSON objects to .xlsx workbooks".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new("/api/v1/describe", "GET", "Node description and parameters"),
            EndpointInfo::new("/api/v1/execute", "POST", "Run the node over a batch of items"),
            EndpointInfo::new("/api/v1/convert", "POST", "Convert one record array to .xlsx"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "describe".to_string(),
            "execute".to_string(),
            "convert".to_string(),
        ],
    }))
}

/// GET /api/v1/describe - Static node description
pub async fn describe() -> Json<ApiResponse<&'static NodeDescription>> {
    Json(ApiResponse::ok(description()))
}

/// Execute response
#[derive(Serialize, Deserialize, Default)]
pub struct ExecuteResponse {
    pub items: Vec<Item>,
}

/// POST /api/v1/execute - Run the node over a batch of items
pub async fn execute(Json(ctx): Json<StaticContext>) -> (StatusCode, Json<ApiResponse<ExecuteResponse>>) {
    let input_items = ctx.items.len();
    let outcome = tokio::task::spawn_blocking(move || ExcelConverterNode::new().execute(&ctx)).await;

    match outcome {
        Ok(Ok(items)) => {
            tracing::debug!(input_items, output_items = items.len(), "execute request served");
            (StatusCode::OK, Json(ApiResponse::ok(ExecuteResponse { items })))
        }
        Ok(Err(e)) => failure(error_status(&e), e.to_string()),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, format!("Execution task failed: {}", e)),
    }
}

/// Convert request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub records: Value,
    #[serde(default)]
    pub worksheet_name: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub allow_empty: bool,
}

/// Convert response
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub row_count: usize,
    pub file: Option<BinaryData>,
}

/// POST /api/v1/convert - Convert one record array to .xlsx
pub async fn convert(Json(req): Json<ConvertRequest>) -> (StatusCode, Json<ApiResponse<ConvertResponse>>) {
    let outcome = tokio::task::spawn_blocking(move || {
        let records = RecordSet::from_value(req.records)?;
        let converter = SpreadsheetConverter::new(ConverterOptions {
            allow_empty: req.allow_empty,
            ..ConverterOptions::default()
        });
        let worksheet_name = req
            .worksheet_name
            .unwrap_or_else(|| DEFAULT_WORKSHEET_NAME.to_string());
        let file_name = req.file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let bytes = converter.convert(&records, &worksheet_name)?;
        Ok::<_, ConverterError>(ConvertResponse {
            row_count: records.len(),
            file: Some(BinaryData::from_bytes(&bytes, XLSX_MIME_TYPE, file_name)),
        })
    })
    .await;

    match outcome {
        Ok(Ok(response)) => (StatusCode::OK, Json(ApiResponse::ok(response))),
        Ok(Err(e)) => failure(error_status(&e), e.to_string()),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, format!("Conversion task failed: {}", e)),
    }
}
