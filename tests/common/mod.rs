use axum::{body::Body, http::Request, Router};
use httpmock::MockServer;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use x_mcp_server::{
    api::origin::AllowedOrigins,
    client::{MediaFetcher, XClient},
    config::{ApiConfig, Credentials, ToolsConfig},
    mcp::{ToolRegistry, XServer},
    tools::{build_registry, ToolContext},
};

/// Dummy credentials; the mock server never checks the signature.
pub fn test_credentials() -> Credentials {
    Credentials {
        api_key: "test-key".to_string(),
        api_secret: "test-secret".to_string(),
        access_token: "test-token".to_string(),
        access_token_secret: "test-token-secret".to_string(),
    }
}

/// Tool context whose API and upload hosts both point at `server`.
pub fn test_context(server: &MockServer) -> ToolContext {
    let api = ApiConfig {
        api_url: server.base_url(),
        upload_url: server.base_url(),
        timeout_secs: 5,
    };
    let client = XClient::new(&api, &test_credentials()).unwrap();
    let fetcher = MediaFetcher::new(Duration::from_secs(5)).unwrap();
    ToolContext::new(client, fetcher)
}

/// Registry built from the given policy strings.
pub fn build_test_registry(
    server: &MockServer,
    enabled_groups: Option<&str>,
    disabled_tools: Option<&str>,
) -> Arc<ToolRegistry> {
    let tools = ToolsConfig {
        enabled_groups: enabled_groups.map(str::to_string),
        disabled_tools: disabled_tools.map(str::to_string),
    };
    Arc::new(build_registry(&test_context(server), &tools).unwrap())
}

/// Build a test Router over the full catalogue (no listener, uses tower::oneshot).
pub fn build_test_app(server: &MockServer) -> Router {
    build_test_app_with_origins(server, &[])
}

/// Same as [`build_test_app`] with browser origins allowed.
pub fn build_test_app_with_origins(server: &MockServer, origins: &[&str]) -> Router {
    let registry = build_test_registry(server, None, None);
    let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
    x_mcp_server::api::build_router(
        XServer::new(registry),
        AllowedOrigins::new(&origins),
        CancellationToken::new(),
    )
}

/// JSON-RPC `initialize` request as a streamable HTTP client sends it.
pub fn initialize_request(origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream");
    if let Some(origin) = origin {
        builder = builder.header("origin", origin);
    }

    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": { "name": "integration-test", "version": "0.0.0" }
        }
    });
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Helper to extract JSON from a response body.
pub async fn response_json(response: axum::http::Response<axum::body::Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Text of the first content item of a tool result.
pub fn result_text(result: &rmcp::model::CallToolResult) -> String {
    use rmcp::model::RawContent;

    match result.content.first().map(|c| &c.raw) {
        Some(RawContent::Text(text)) => text.text.clone(),
        _ => String::new(),
    }
}
