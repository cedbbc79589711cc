//! Conversion of [`SpiderError`] into MCP error responses

use rmcp::ErrorData as McpError;
use serde_json::json;

use super::validation::ErrorContext;
use crate::error::{ErrorKind, SpiderError};

/// Render `error` for an MCP client.
///
/// The message is an [`ErrorContext`] block naming the remediation; `data`
/// carries the machine-readable `kind` and `remediation`.
#[must_use]
pub fn to_mcp_error(operation: &str, error: &SpiderError) -> McpError {
    let message = ErrorContext::from_error(operation, error).build();
    let data = Some(json!({
        "kind": error.kind().as_str(),
        "remediation": error.remediation(),
    }));

    match error.kind() {
        ErrorKind::InvalidArgument | ErrorKind::ColumnNotFound => {
            McpError::invalid_params(message, data)
        }
        ErrorKind::NotFound => McpError::resource_not_found(message, data),
        ErrorKind::GuiLocked
        | ErrorKind::CliNotFound
        | ErrorKind::SubprocessFailed
        | ErrorKind::Timeout
        | ErrorKind::Unknown => McpError::internal_error(message, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gui_lock_carries_kind_and_remediation() {
        let err = to_mcp_error(
            "Export crawl",
            &SpiderError::GuiLocked {
                detail: "pid 42".to_string(),
            },
        );
        assert!(err.message.contains("Operation failed: Export crawl"));
        assert!(err.message.contains("Quit Screaming Frog and try again"));
        let data = err.data.unwrap();
        assert_eq!(data["kind"], "GuiLocked");
    }

    #[test]
    fn unknown_export_name_is_invalid_params() {
        let err = to_mcp_error(
            "Export crawl",
            &SpiderError::UnknownExportName {
                category: "export tab",
                name: "Bogus:All".to_string(),
            },
        );
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("Bogus:All"));
        assert_eq!(err.data.unwrap()["kind"], "InvalidArgument");
    }
}
