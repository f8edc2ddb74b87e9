//! MCP tool modules.
//!
//! Tools are grouped by flow: knowledge search, and the upload/visualize
//! family that renders caller-supplied data.

pub mod search;
pub mod visualize;
