//! Static MCP resources

use rmcp::ErrorData as McpError;
use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};
use serde_json::json;

use crate::export::{EXPORT_REFERENCE_URI, render_reference};

/// Every resource this server exposes
#[must_use]
pub fn list() -> Vec<Resource> {
    let mut reference = RawResource::new(EXPORT_REFERENCE_URI, "Screaming Frog export reference");
    reference.description = Some(
        "Every tab:filter, bulk export and report name accepted by export_crawl".to_string(),
    );
    reference.mime_type = Some("text/markdown".to_string());
    vec![reference.no_annotation()]
}

/// Read one resource by URI
///
/// # Errors
///
/// Returns `resource_not_found` for unknown URIs.
pub fn read(uri: &str) -> Result<ReadResourceResult, McpError> {
    if uri == EXPORT_REFERENCE_URI {
        return Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(render_reference(), uri)],
        });
    }
    Err(McpError::resource_not_found(
        format!("Unknown resource: {uri}"),
        Some(json!({ "uri": uri, "available": [EXPORT_REFERENCE_URI] })),
    ))
}
