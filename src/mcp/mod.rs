//! Model Context Protocol (MCP) server and tool bridge.

pub mod bridge;
pub mod server;
pub mod transport;

pub use server::HubServer;
pub use transport::{serve_http, serve_stdio, shutdown_signal, MCP_PATH};
