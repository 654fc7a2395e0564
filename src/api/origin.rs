//! Browser origin policy for the HTTP transport.
//!
//! The MCP endpoint acts with the user's X credentials and has no auth of its
//! own, so cross-origin access is opt-in: only origins listed in
//! `server.allowed_origins` get CORS headers, and any request to `/mcp`
//! carrying another `Origin` is refused. Requests without an `Origin` header
//! (desktop MCP clients, curl) pass through.

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

const MCP_SESSION_ID: HeaderName = HeaderName::from_static("mcp-session-id");
const MCP_PROTOCOL_VERSION: HeaderName = HeaderName::from_static("mcp-protocol-version");
const LAST_EVENT_ID: HeaderName = HeaderName::from_static("last-event-id");

/// Origins allowed to call the server from a browser. Empty by default.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Arc<Vec<HeaderValue>>);

impl AllowedOrigins {
    /// Entries that are not valid header values are skipped with a warning;
    /// config validation normally rejects them first.
    pub fn new(origins: &[String]) -> Self {
        let values = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim_end_matches('/')) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid allowed origin");
                    None
                }
            })
            .collect();
        Self(Arc::new(values))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    /// CORS layer answering only for the listed origins.
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.0.iter().cloned()))
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                MCP_SESSION_ID,
                MCP_PROTOCOL_VERSION,
                LAST_EVENT_ID,
            ])
            .expose_headers([MCP_SESSION_ID])
    }
}

/// Refuse requests whose `Origin` is not on the allow-list.
pub(crate) async fn reject_foreign_origin(
    State(allowed): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !allowed.allows(origin) {
            warn!(origin = ?origin, "Refused request from foreign origin");
            return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_nothing() {
        let allowed = AllowedOrigins::default();
        assert!(allowed.is_empty());
        assert!(!allowed.allows(&HeaderValue::from_static("http://localhost:5173")));
    }

    #[test]
    fn test_listed_origin_matches_exactly() {
        let allowed = AllowedOrigins::new(&["https://app.example.com/".to_string()]);
        assert!(allowed.allows(&HeaderValue::from_static("https://app.example.com")));
        assert!(!allowed.allows(&HeaderValue::from_static("https://evil.example")));
        assert!(!allowed.allows(&HeaderValue::from_static("http://app.example.com")));
    }

    #[test]
    fn test_invalid_entries_skipped() {
        let allowed = AllowedOrigins::new(&["bad\norigin".to_string()]);
        assert!(allowed.is_empty());
    }
}
