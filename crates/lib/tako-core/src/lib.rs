//! Core types and services for tako-mcp.
//!
//! This crate owns the data-service client seam and its HTTP implementation,
//! the Tako Data Format model used to validate datasets locally, upload
//! staging through temporary files, and the control plane that backs every
//! MCP tool.

pub mod client;
pub mod control;
pub mod dataset;
pub mod upload;
