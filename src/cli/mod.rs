//! CLI arguments for the server binary.

use clap::{Parser, ValueEnum};

use crate::tools::Service;

/// How the MCP server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    StreamableHttp,
}

/// CSGHub MCP server
#[derive(Parser, Debug)]
#[command(
    name = "csghub-mcp",
    version,
    about = "Expose the CSGHub platform API as MCP tools"
)]
pub struct Cli {
    /// Transport to serve on
    #[arg(long, value_enum, default_value_t = Transport::StreamableHttp)]
    pub transport: Transport,

    /// Bind address for streamable HTTP
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port for streamable HTTP
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Log level or filter directive; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Services to expose, comma separated (model, dataset, code, space,
    /// inference, finetune, evaluation, dataflow). All when omitted.
    #[arg(long, value_delimiter = ',')]
    pub services: Vec<Service>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Requested services, defaulting to all of them.
    pub fn services(&self) -> Vec<Service> {
        if self.services.is_empty() {
            Service::all()
        } else {
            self.services.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["csghub-mcp"]).unwrap();
        assert_eq!(cli.transport, Transport::StreamableHttp);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.port, 8000);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.services(), Service::all());
    }

    #[test]
    fn parse_stdio_with_services() {
        let cli = Cli::try_parse_from([
            "csghub-mcp",
            "--transport",
            "stdio",
            "--services",
            "model,Dataflow",
        ])
        .unwrap();
        assert_eq!(cli.transport, Transport::Stdio);
        assert_eq!(cli.services(), vec![Service::Model, Service::Dataflow]);
    }

    #[test]
    fn rejects_unknown_service() {
        assert!(Cli::try_parse_from(["csghub-mcp", "--services", "notebook"]).is_err());
    }

    #[test]
    fn rejects_unknown_transport() {
        assert!(Cli::try_parse_from(["csghub-mcp", "--transport", "sse"]).is_err());
    }
}
