//! CLI command handlers

pub mod commands;

pub use commands::{convert, describe, inspect, run};
