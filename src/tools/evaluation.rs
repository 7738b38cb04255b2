//! Evaluation tools.

use std::sync::Arc;

use crate::api::evaluation::{self, NewEvaluation, RUNTIME_TAG, RUNTIME_TAG_CATEGORY};
use crate::api::random_suffix;
use crate::api::repo::{self, RepoKind};
use crate::api::resources::{self, DeployType};
use crate::api::try_reply;
use crate::tools::common::list_clusters_tool;
use crate::tools::tool::{HubTool, Tool, ToolContext};
use crate::tools::types::ToolParameters;
use crate::tools::{output, username, ToolArguments};

const DEFAULT_PER: u64 = 10;

pub fn list_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "list_evaluation_services",
            "Retrieve a list of evaluation tasks for the token user from CSGHub. You can control the pagination by specifying the number of items per page and the page number.",
            ToolParameters::object()
                .token()
                .per_page("per", DEFAULT_PER)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let page = args.page("per", DEFAULT_PER)?;
                let username = try_reply!(username(&ctx, token).await?);
                output(evaluation::list(&ctx.client, token, &username, page).await?)
            },
        )
        .with_title("List evaluations"),
    )
}

pub fn get_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "get_evaluation_by_id",
            "Retrieve the details of an evaluation task by id from CSGHub with user access token.",
            ToolParameters::object()
                .token()
                .integer("id", "Evaluation id.")
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let id = args.get_u64("id")?;
                output(evaluation::get(&ctx.client, token, id).await?)
            },
        )
        .with_title("Get evaluation"),
    )
}

pub fn create_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "create_evaluation_task",
            "Create an evaluation task on CSGHub with user access token. Pick models from query_evaluation_models, datasets from query_evaluation_datasets and a framework from query_evaluation_runtime_frameworks. The task name defaults to a generated one.",
            ToolParameters::object()
                .token()
                .string_list("model_ids", "Models to evaluate, as namespace/name.")
                .string_list("datasets", "Evaluation datasets, as namespace/name.")
                .integer("runtime_framework_id", "Runtime framework id.")
                .optional_string("task_name", "Name of the evaluation task.")
                .optional_integer("resource_id", "Dedicated resource id; shared resources when omitted.")
                .boolean_or("share_mode", "Run on shared resources.", true)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let task = NewEvaluation {
                    task_name: args
                        .get_str_opt("task_name")
                        .map(String::from)
                        .unwrap_or_else(|| format!("evaluation_{}", random_suffix())),
                    model_ids: args.get_string_list("model_ids")?,
                    runtime_framework_id: args.get_u64("runtime_framework_id")?,
                    datasets: args.get_string_list("datasets")?,
                    share_mode: args.get_bool_or("share_mode", true)?,
                    resource_id: args.get_u64_opt("resource_id")?,
                };
                output(evaluation::create(&ctx.client, token, &task).await?)
            },
        )
        .with_title("Create evaluation task"),
    )
}

/// Models or datasets tagged for the evaluation runtime.
fn tagged_tool(kind: RepoKind) -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            format!("query_evaluation_{}", kind.plural()),
            format!(
                "Retrieve the {} that can be used for evaluation on CSGHub.",
                kind.plural()
            ),
            ToolParameters::object().token().build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                output(
                    repo::tagged(&ctx.client, kind, token, RUNTIME_TAG_CATEGORY, RUNTIME_TAG)
                        .await?,
                )
            },
        )
        .with_title(format!("Query evaluation {}", kind.plural())),
    )
}

pub fn runtime_frameworks_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "query_evaluation_runtime_frameworks",
            "Retrieve the runtime frameworks that can evaluate a model on CSGHub.",
            ToolParameters::object()
                .token()
                .string("model_id", "Model ID in the form namespace/name.")
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let model_id = args.get_str("model_id")?;
                output(
                    resources::model_frameworks(
                        &ctx.client,
                        Some(token),
                        model_id,
                        DeployType::Evaluation,
                        false,
                    )
                    .await?,
                )
            },
        )
        .with_title("Query evaluation runtime frameworks"),
    )
}

pub fn resources_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "query_evaluation_resources",
            "Retrieve the available compute resources for evaluation on a CSGHub cluster. The cluster defaults to the configured one.",
            ToolParameters::object()
                .token()
                .optional_string("cluster_id", "Cluster id from list_clusters.")
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                args.token()?;
                let cluster = args
                    .get_str_opt("cluster_id")
                    .unwrap_or(ctx.client.config().primary_cluster());
                output(resources::available(&ctx.client, cluster, DeployType::Evaluation).await?)
            },
        )
        .with_title("Query evaluation resources"),
    )
}

pub fn tools() -> Vec<Arc<dyn Tool>> {
    vec![
        list_tool(),
        get_tool(),
        create_tool(),
        tagged_tool(RepoKind::Model),
        tagged_tool(RepoKind::Dataset),
        runtime_frameworks_tool(),
        resources_tool(),
        list_clusters_tool(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_tools_are_named_by_plural() {
        assert_eq!(tagged_tool(RepoKind::Model).name(), "query_evaluation_models");
        assert_eq!(tagged_tool(RepoKind::Dataset).name(), "query_evaluation_datasets");
    }

    #[test]
    fn create_requires_lists() {
        let tool = create_tool();
        let required = &tool.parameters().schema["required"];
        assert_eq!(
            required,
            &serde_json::json!(["token", "model_ids", "datasets", "runtime_framework_id"])
        );
    }
}
