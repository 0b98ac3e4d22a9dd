use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Wraps a serializable payload as a successful tool result.
pub fn json_result(value: impl Serialize) -> Result<CallToolResult, ErrorData> {
    Ok(CallToolResult::success(vec![Content::json(value)?]))
}

/// Treats empty or whitespace-only tool arguments as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
