//! MCP tools over the hub API.
//!
//! Tools are grouped by [`Service`]; a server exposes the union of the
//! services it was started with.

pub mod arguments;
pub mod common;
pub mod dataflow;
pub mod deploy;
pub mod evaluation;
pub mod finetune_job;
pub mod registry;
pub mod repo;
pub mod space;
pub mod tool;
pub mod types;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::api::user;
use crate::client::Reply;
use crate::error::Result;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use tool::{HubTool, Tool, ToolContext};
pub use types::{ParameterBuilder, ToolOutcome, ToolParameters};

/// A group of tools, one per hub product area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Service {
    Model,
    Dataset,
    Code,
    Space,
    Inference,
    Finetune,
    Evaluation,
    Dataflow,
}

impl Service {
    pub fn all() -> Vec<Service> {
        Service::iter().collect()
    }

    pub fn tools(self) -> Vec<Arc<dyn Tool>> {
        match self {
            Self::Model => repo::model_tools(),
            Self::Dataset => repo::dataset_tools(),
            Self::Code => repo::code_tools(),
            Self::Space => space::tools(),
            Self::Inference => deploy::inference_tools(),
            Self::Finetune => {
                let mut tools = deploy::finetune_tools();
                tools.extend(finetune_job::tools());
                tools
            }
            Self::Evaluation => evaluation::tools(),
            Self::Dataflow => dataflow::tools(),
        }
    }
}

impl ToolRegistry {
    /// Registry holding the tools of every given service, in order.
    pub fn for_services(services: &[Service]) -> Self {
        let mut registry = Self::new();
        for service in services {
            registry.register_all(service.tools());
        }
        registry
    }
}

/// Serialize a projected reply for the tool boundary.
pub(crate) fn output<T: Serialize>(reply: Reply<T>) -> Result<Reply<Value>> {
    match reply {
        Reply::Ok(value) => Ok(Reply::Ok(serde_json::to_value(value)?)),
        Reply::Failed(error) => Ok(Reply::Failed(error)),
    }
}

/// Username of the token owner.
pub(crate) async fn username(ctx: &ToolContext, token: &str) -> Result<Reply<String>> {
    user::username(&ctx.client, token).await
}

/// The `namespace` argument, or the token owner when it is absent or blank.
pub(crate) async fn namespace_or_username(
    args: &ToolArguments,
    ctx: &ToolContext,
    token: &str,
) -> Result<Reply<String>> {
    match args.get_str_opt("namespace") {
        Some(namespace) => Ok(Reply::Ok(namespace.trim().to_string())),
        None => username(ctx, token).await,
    }
}
