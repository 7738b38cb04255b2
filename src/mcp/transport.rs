//! MCP transports: stdio and streamable HTTP.

use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use rmcp::ServiceExt;

use super::server::HubServer;
use crate::error::{HubError, Result};

/// Path the streamable HTTP endpoint is mounted at.
pub const MCP_PATH: &str = "/mcp";

/// Serve over stdin/stdout until the client disconnects or a shutdown
/// signal arrives.
pub async fn serve_stdio(server: HubServer) -> Result<()> {
    tracing::info!(tools = server.registry().len(), "serving MCP over stdio");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| HubError::Server(format!("stdio initialization failed: {e}")))?;

    tokio::select! {
        result = service.waiting() => {
            result.map_err(|e| HubError::Server(format!("stdio session ended abnormally: {e}")))?;
        }
        _ = shutdown_signal() => {}
    }
    Ok(())
}

/// Serve streamable HTTP at `http://{host}:{port}/mcp` with graceful
/// shutdown.
pub async fn serve_http(server: HubServer, host: &str, port: u16) -> Result<()> {
    let tools = server.registry().len();
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );
    let router = axum::Router::new().nest_service(MCP_PATH, service);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        path = MCP_PATH,
        tools,
        "serving MCP over streamable HTTP"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
