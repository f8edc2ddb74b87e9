use std::borrow::Cow;

use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, ErrorCode};
use tako_core::control::{ErrorKind, HandlerError};
use tracing::error;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Converts a handler failure into a tool response.
///
/// Bad input and staging failures are protocol errors; remote and validation
/// failures come back as error-flagged text so the caller can read and retry.
pub fn tool_failure(tool: &'static str, err: &HandlerError) -> Result<CallToolResult, ErrorData> {
    error!(tool, kind = ?err.kind(), error = %err, "tool call failed");
    match err.kind() {
        ErrorKind::UnsupportedInput => Err(mcp_err(ErrorCode::INVALID_PARAMS, err.to_string())),
        ErrorKind::Staging => Err(mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string())),
        ErrorKind::RemoteUnavailable | ErrorKind::ValidationFailed => {
            Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
        }
    }
}
