//! Excel Converter API Server module
//!
//! Provides the node over HTTP.
//! Run with `excel-converter-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server};
