//! Excel Converter API Server binary
//!
//! HTTP REST API for the Excel Converter node.

use clap::Parser;
use excel_converter::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "excel-converter-server")]
#[command(version)]
#[command(about = "Excel Converter API Server - JSON arrays to .xlsx over HTTP")]
#[command(long_about = r#"
Excel Converter API Server

Endpoints:
  - GET  /api/v1/describe  - Node description and parameters
  - POST /api/v1/execute   - Run the node over a batch of items
  - POST /api/v1/convert   - Convert one record array to .xlsx

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  excel-converter-server                           # Start on localhost:8080
  excel-converter-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/convert \
    -H "Content-Type: application/json" \
    -d '{"records": [{"a": 1, "b": 2}, {"a": 3}]}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "EXCEL_CONVERTER_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "EXCEL_CONVERTER_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config).await
}
