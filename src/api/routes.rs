use crate::api::handlers::{self, ApiState};
use axum::{routing::get, Router};

pub fn health_routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/info", get(handlers::server_info))
}
