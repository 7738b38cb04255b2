//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::arguments::ToolArguments;
use super::types::ToolParameters;
use crate::client::{HubClient, Reply};
use crate::error::Result;

/// Context available during tool execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Shared client for the configured hub.
    pub client: HubClient,
}

impl ToolContext {
    pub fn new(client: HubClient) -> Self {
        Self { client }
    }
}

/// Core tool trait.
///
/// `execute` returns `Ok(Reply::Failed(..))` when the hub answered with a
/// non-success status and `Err` for everything that never reached it.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the agent calls).
    fn name(&self) -> &str;

    /// Short display title.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Execute the tool with parsed arguments.
    async fn execute(&self, args: &ToolArguments, ctx: &ToolContext) -> Result<Reply<Value>>;
}

/// Type alias for the tool handler function.
type ToolHandler = dyn Fn(ToolArguments, ToolContext) -> Pin<Box<dyn Future<Output = Result<Reply<Value>>> + Send>>
    + Send
    + Sync;

/// Closure-based tool.
pub struct HubTool {
    name: String,
    title: Option<String>,
    description: String,
    parameters: ToolParameters,
    handler: Arc<ToolHandler>,
}

impl HubTool {
    /// Create a tool from a closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply<Value>>> + Send + 'static,
    {
        Self {
            name: name.into(),
            title: None,
            description: description.into(),
            parameters,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[async_trait]
impl Tool for HubTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments, ctx: &ToolContext) -> Result<Reply<Value>> {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for HubTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubTool")
            .field("name", &self.name)
            .field("title", &self.title)
            .finish()
    }
}
