//! csghub-mcp binary entry point.

use csghub_mcp::cli::{Cli, Transport};
use csghub_mcp::client::HubClient;
use csghub_mcp::config::HubConfig;
use csghub_mcp::mcp::{serve_http, serve_stdio, HubServer};
use csghub_mcp::tools::ToolRegistry;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "server stopped with an error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> csghub_mcp::error::Result<()> {
    let config = HubConfig::from_env();
    tracing::info!(
        api_endpoint = config.api_endpoint(),
        web_endpoint = config.web_endpoint(),
        clusters = ?config.cluster_ids(),
        "loaded hub configuration"
    );

    let services = cli.services();
    let registry = ToolRegistry::for_services(&services);
    tracing::info!(services = ?services, tools = registry.len(), "registered tools");

    let server = HubServer::new(registry, HubClient::new(config)?);
    match cli.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::StreamableHttp => serve_http(server, &cli.host, cli.port).await,
    }
}
