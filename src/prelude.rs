//! Convenience re-exports for common use.

pub use crate::client::{HubClient, Reply};
pub use crate::config::HubConfig;
pub use crate::error::{ErrorResult, HubError, Result};
pub use crate::mcp::HubServer;
pub use crate::projection::{Envelope, Projection, Record};
pub use crate::tools::{Service, Tool, ToolArguments, ToolContext, ToolOutcome, ToolRegistry};
