//! Fetch analytics query results over JSON-RPC, rebuild a labeled table, and save it as a
//! spreadsheet.
#![warn(missing_docs)]

/// Run configuration loaded from JSON.
pub mod config;
/// Report files: naming, spreadsheet writing, and console preview.
pub mod output;
/// Query text inspection: output column inference.
pub mod parser;
/// End-to-end report run and its failure taxonomy.
pub mod pipeline;
/// Labeled tables built from untyped result payloads.
pub mod table;
/// Detection and timezone conversion of date/time columns.
pub mod temporal;
/// JSON-RPC request envelope and transports.
pub mod transport;
