//! Name-indexed tool catalogue and the invocation boundary.

use std::collections::HashMap;
use std::sync::Arc;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolContext};
use super::types::ToolOutcome;
use crate::client::Reply;
use crate::error::{HubError, Result};

/// Ordered set of tools keyed by name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A tool whose name is already registered is skipped; shared
    /// tools like `check_model_by_model_id` belong to several services.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            tracing::debug!(tool = %name, "tool already registered, skipping");
            return;
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
    }

    pub fn register_all(&mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) {
        for tool in tools {
            self.register(tool);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Tools in registration order.
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool and render its result as JSON text.
    ///
    /// Every failure, upstream or local, becomes an
    /// `{error_code, error_message}` document with `is_error` set. Only an
    /// unknown tool name is returned as `Err`.
    pub async fn invoke(
        &self,
        name: &str,
        args: ToolArguments,
        ctx: &ToolContext,
    ) -> Result<ToolOutcome> {
        let tool = self
            .get(name)
            .ok_or_else(|| HubError::UnknownTool(name.to_string()))?;

        tracing::debug!(tool = name, "invoking tool");
        let (value, is_error) = match tool.execute(&args, ctx).await {
            Ok(Reply::Ok(value)) => (value, false),
            Ok(Reply::Failed(error)) => (serde_json::to_value(error)?, true),
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool failed");
                (serde_json::to_value(e.to_error_result())?, true)
            }
        };
        Ok(ToolOutcome {
            text: serde_json::to_string(&value)?,
            is_error,
        })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HubClient;
    use crate::config::HubConfig;
    use crate::error::ErrorResult;
    use crate::tools::{HubTool, ToolParameters};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> ToolContext {
        ToolContext::new(HubClient::new(HubConfig::default()).unwrap())
    }

    fn fixed(name: &str, reply: Reply<serde_json::Value>) -> Arc<dyn Tool> {
        Arc::new(HubTool::new(name, "", ToolParameters::empty(), move |_, _| {
            let reply = reply.clone();
            async move { Ok(reply) }
        }))
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(fixed("a", Reply::Ok(json!(1))));
        registry.register(fixed("b", Reply::Ok(json!(2))));
        registry.register(fixed("a", Reply::Ok(json!(3))));
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn failures_render_as_error_documents() {
        let mut registry = ToolRegistry::new();
        registry.register(fixed("ok", Reply::Ok(json!([{"model_id": "u/m"}]))));
        registry.register(fixed("failed", ErrorResult::new(429, "quota exceeded").into()));
        registry.register(Arc::new(HubTool::new(
            "local",
            "",
            ToolParameters::empty(),
            |args, _| async move {
                args.token()?;
                Ok(Reply::Ok(json!(null)))
            },
        )));

        let ctx = ctx();
        let ok = registry
            .invoke("ok", ToolArguments::new(json!({})), &ctx)
            .await
            .unwrap();
        assert!(!ok.is_error);
        assert_eq!(ok.text, r#"[{"model_id":"u/m"}]"#);

        let failed = registry
            .invoke("failed", ToolArguments::new(json!({})), &ctx)
            .await
            .unwrap();
        assert!(failed.is_error);
        assert_eq!(
            failed.json(),
            json!({"error_code": 429, "error_message": "quota exceeded"})
        );

        let local = registry
            .invoke("local", ToolArguments::new(json!({})), &ctx)
            .await
            .unwrap();
        assert!(local.is_error);
        assert_eq!(
            local.json(),
            json!({"error_code": 0, "error_message": "Error: must input CSGHUB_ACCESS_TOKEN."})
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let registry = ToolRegistry::new();
        let err = registry
            .invoke("nope", ToolArguments::new(json!({})), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, HubError::UnknownTool(name) if name == "nope"));
    }
}
