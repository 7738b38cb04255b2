//! csghub-mcp: the CSGHub hub platform API as Model Context Protocol tools.
//!
//! Each tool builds one or more requests to the hub REST API, projects the
//! raw `{"data": ...}` envelope into a small fixed record, and returns it as
//! a JSON document. Failures of any kind come back as
//! `{"error_code", "error_message"}`.
//!
//! # Quick Start
//!
//! ```no_run
//! use csghub_mcp::prelude::*;
//!
//! # async fn example() -> csghub_mcp::error::Result<()> {
//! let client = HubClient::new(HubConfig::from_env())?;
//! let registry = ToolRegistry::for_services(&Service::all());
//! let ctx = ToolContext::new(client);
//! let args = ToolArguments::new(serde_json::json!({"num": 3}));
//! let outcome = registry.invoke("get_top_download_models", args, &ctx).await?;
//! println!("{}", outcome.text);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod prelude;
pub mod projection;
pub mod tools;
