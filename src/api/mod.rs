pub mod handlers;
pub(crate) mod mcp_service;
pub mod origin;
pub mod routes;

use crate::config::{AppConfig, Transport};
use crate::mcp::{ToolRegistry, XServer};
use anyhow::{Context, Result};
use axum::{middleware, Router};
use handlers::ApiState;
use origin::AllowedOrigins;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Serve the tool registry over the configured transport until the client
/// disconnects (stdio) or the process is signalled (http).
pub async fn start_server(config: &AppConfig, registry: Arc<ToolRegistry>) -> Result<()> {
    let server = XServer::new(registry);

    match config.server.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => serve_http(config, server).await,
    }
}

async fn serve_stdio(server: XServer) -> Result<()> {
    info!("Serving MCP over stdio");

    let service = server
        .serve(stdio())
        .await
        .context("Failed to start stdio transport")?;
    let reason = service.waiting().await?;

    info!(?reason, "stdio session closed");
    Ok(())
}

async fn serve_http(config: &AppConfig, server: XServer) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let ct = CancellationToken::new();

    let origins = AllowedOrigins::new(&config.server.allowed_origins);
    let app = build_router(server, origins, ct.child_token());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    info!("Health check: http://{}/health", addr);
    info!("Server info: http://{}/info", addr);
    info!("MCP endpoint: http://{}/mcp", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(ct))
        .await?;

    Ok(())
}

/// Router with the health routes and the MCP service nested at `/mcp`.
///
/// `/mcp` refuses any request whose `Origin` is not in `origins`; CORS
/// headers are only emitted for those origins.
pub fn build_router(
    server: XServer,
    origins: AllowedOrigins,
    cancellation_token: CancellationToken,
) -> Router {
    let state = ApiState {
        registry: server.registry_handle(),
    };

    let mcp = Router::new()
        .nest_service(
            "/mcp",
            mcp_service::create_mcp_service(server, cancellation_token),
        )
        .layer(middleware::from_fn_with_state(
            origins.clone(),
            origin::reject_foreign_origin,
        ));

    Router::new()
        .merge(routes::health_routes())
        .merge(mcp)
        .layer(origins.cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal(ct: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down...");
        },
    }

    // Close open MCP sessions
    ct.cancel();
}
