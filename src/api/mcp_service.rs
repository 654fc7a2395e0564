use crate::mcp::XServer;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Streamable HTTP transport for the tool server. Each session gets a clone
/// of `server`; clones share one registry.
pub fn create_mcp_service(
    server: XServer,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<XServer, LocalSessionManager> {
    let service_factory = move || Ok(server.clone());

    StreamableHttpService::new(
        service_factory,
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
            sse_retry: Some(Duration::from_secs(3)),
            cancellation_token,
        },
    )
}
