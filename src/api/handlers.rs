use crate::mcp::{ToolRegistry, SERVER_NAME};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<ToolRegistry>,
}

pub(crate) async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(crate) async fn server_info(State(state): State<ApiState>) -> impl IntoResponse {
    let tools: Vec<Value> = state
        .registry
        .tools()
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.descriptor.description,
            })
        })
        .collect();

    Json(json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "mcp_endpoint": "/mcp",
        "tool_count": tools.len(),
        "tools": tools,
    }))
}
