use crate::security::sanitize;
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use std::fmt::Display;

/// Success envelope: the sanitized payload as pretty-printed JSON text.
pub fn format_response(value: &Value) -> CallToolResult {
    let text = format!("{:#}", sanitize(value));
    CallToolResult {
        meta: None,
        content: vec![Content::text(text)],
        structured_content: None,
        is_error: None,
    }
}

/// Error envelope. Only the error's display message is surfaced.
pub fn format_error<E: Display + ?Sized>(error: &E) -> CallToolResult {
    CallToolResult {
        meta: None,
        content: vec![Content::text(format!("Error: {}", error))],
        structured_content: None,
        is_error: Some(true),
    }
}

#[cfg(test)]
pub(crate) fn text_of(result: &CallToolResult) -> &str {
    use rmcp::model::RawContent;

    match result.content.first().map(|c| &c.raw) {
        Some(RawContent::Text(text)) => &text.text,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XError;
    use serde_json::json;

    #[test]
    fn test_format_error_boom() {
        let result = format_error("boom");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);
        assert_eq!(text_of(&result), "Error: boom");
    }

    #[test]
    fn test_format_error_uses_message_only() {
        let err = XError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(text_of(&format_error(&err)), "Error: X API error 401: Unauthorized");
    }

    #[test]
    fn test_format_response_sanitizes_and_pretty_prints() {
        let result = format_response(&json!({
            "data": { "id": "1", "_realData": {} },
            "requestData": { "headers": { "authorization": "OAuth ..." } }
        }));

        assert_ne!(result.is_error, Some(true));
        let text = text_of(&result);
        assert_eq!(text, "{\n  \"data\": {\n    \"id\": \"1\"\n  }\n}");
        assert!(!text.contains("authorization"));
    }
}
