//! Tools shared by several services.

use std::sync::Arc;

use crate::api::repo::{self, RepoKind};
use crate::api::{resources, user};
use crate::tools::tool::{HubTool, Tool, ToolContext};
use crate::tools::types::ToolParameters;
use crate::tools::{output, ToolArguments};

/// Namespaces the token owner can create repositories in.
///
/// Registered as `list_namespaces` by some services and
/// `list_user_namespaces` by others.
pub fn namespaces_tool(name: &str, created: &str) -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            name,
            format!(
                "Retrieve a list of namespaces or organizations that a user has access to create {created} from CSGHub with user access token."
            ),
            ToolParameters::object().token().build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                output(user::namespaces(&ctx.client, token).await?)
            },
        )
        .with_title("List user namespaces"),
    )
}

/// `{model_id}` when the model exists. The token is optional.
pub fn check_model_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "check_model_by_model_id",
            "Check whether a model exists on CSGHub by its model ID (namespace/name).",
            ToolParameters::object()
                .string("model_id", "Model ID in the form namespace/name.")
                .optional_token()
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let model_id = args.get_str("model_id")?;
                let token = args.get_str_opt("token");
                output(repo::check(&ctx.client, RepoKind::Model, token, model_id).await?)
            },
        )
        .with_title("Check model by model ID"),
    )
}

pub fn check_dataset_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "check_dataset_by_dataset_id",
            "Check whether a dataset exists on CSGHub by its dataset ID (namespace/name) with user access token.",
            ToolParameters::object()
                .token()
                .string("dataset_id", "Dataset ID in the form namespace/name.")
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let dataset_id = args.get_str("dataset_id")?;
                output(repo::check(&ctx.client, RepoKind::Dataset, Some(token), dataset_id).await?)
            },
        )
        .with_title("Check dataset by dataset ID"),
    )
}

pub fn list_clusters_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "list_clusters",
            "Retrieve the running compute clusters of CSGHub with their region and status.",
            ToolParameters::object().token().build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                output(resources::running_clusters(&ctx.client, token).await?)
            },
        )
        .with_title("List clusters"),
    )
}
