//! Inference endpoint and finetune instance tools.
//!
//! Both services share one set of builders over [`DeployKind`]; only the
//! tool names and descriptions differ.

use std::sync::Arc;

use crate::api::deploy::{self, Action, DeployKind, Placement};
use crate::api::resources::{self, conditions};
use crate::api::try_reply;
use crate::client::Reply;
use crate::tools::common::check_model_tool;
use crate::tools::tool::{HubTool, Tool, ToolContext};
use crate::tools::types::ToolParameters;
use crate::tools::{output, username, ToolArguments};

const DEFAULT_PER: u64 = 10;

fn deployment_parameters() -> ToolParameters {
    ToolParameters::object()
        .token()
        .string("model_id", "Model ID in the form namespace/name.")
        .integer("deploy_id", "Deployment id.")
        .build()
}

fn list_tool(kind: DeployKind) -> Arc<dyn Tool> {
    let (name, title) = match kind {
        DeployKind::Inference => ("list_inference_services", "List inference services"),
        DeployKind::Finetune => ("list_finetune_instance", "List finetune instances"),
    };
    Arc::new(
        HubTool::new(
            name,
            format!(
                "Retrieve a list of {kind} deployments for the token user from CSGHub. You can control the pagination by specifying the number of items per page and the page number."
            ),
            ToolParameters::object()
                .token()
                .per_page("per", DEFAULT_PER)
                .build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let page = args.page("per", DEFAULT_PER)?;
                let username = try_reply!(username(&ctx, token).await?);
                output(deploy::list(&ctx.client, kind, token, &username, page).await?)
            },
        )
        .with_title(title),
    )
}

fn status_tool(kind: DeployKind) -> Arc<dyn Tool> {
    let (name, description) = match kind {
        DeployKind::Inference => (
            "get_inference_status_by_deploy_id",
            "Retrieve the status of an inference service by model ID and deploy ID. A running service also reports its web access URL, API endpoint and a ready-to-run test command.",
        ),
        DeployKind::Finetune => (
            "get_finetune_status_by_id",
            "Retrieve the status of a finetune instance by model ID and deploy ID. A running instance also reports its web access URL.",
        ),
    };
    Arc::new(
        HubTool::new(
            name,
            description,
            deployment_parameters(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let model_id = args.get_str("model_id")?;
                let deploy_id = args.get_u64("deploy_id")?;
                output(deploy::status(&ctx.client, kind, token, model_id, deploy_id).await?)
            },
        )
        .with_title(format!("Get {kind} status")),
    )
}

fn create_tool(kind: DeployKind) -> Arc<dyn Tool> {
    let name = match kind {
        DeployKind::Inference => "deploy_model_as_inference_by_model_id",
        DeployKind::Finetune => "deploy_finetune_by_model_id",
    };
    Arc::new(
        HubTool::new(
            name,
            format!(
                "Deploy a model as a {kind} service on CSGHub with user access token. model_id, resource_id and runtime_framework_id are required."
            ),
            ToolParameters::object()
                .token()
                .string("model_id", "Model ID in the form namespace/name.")
                .integer("resource_id", "Compute resource id.")
                .integer("runtime_framework_id", "Runtime framework id.")
                .build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let model_id = args.get_str("model_id")?;
                let placement = Placement {
                    resource_id: args.get_u64("resource_id")?,
                    runtime_framework_id: args.get_u64("runtime_framework_id")?,
                };
                output(deploy::create(&ctx.client, kind, token, model_id, placement).await?)
            },
        )
        .with_title(format!("Deploy {kind}")),
    )
}

/// Available resources on the primary cluster plus the frameworks the model
/// supports. Finetune instances only list GPU frameworks.
fn conditions_tool(kind: DeployKind) -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            format!("query_available_resources_and_runtime_frameworks_for_{kind}"),
            format!(
                "Retrieve a list of available resources and runtime frameworks that can be used for deploying a model as {kind} on CSGHub."
            ),
            ToolParameters::object()
                .string("model_id", "Model ID in the form namespace/name.")
                .optional_token()
                .build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let model_id = args.get_str("model_id")?;
                let token = args.get_str_opt("token");
                let deploy_type = kind.deploy_type();
                let cluster = ctx.client.config().primary_cluster();

                let available = try_reply!(resources::available(&ctx.client, cluster, deploy_type).await?);
                let gpu_only = kind == DeployKind::Finetune;
                let frameworks = try_reply!(
                    resources::model_frameworks(&ctx.client, token, model_id, deploy_type, gpu_only).await?
                );
                output(Reply::Ok(conditions(available, frameworks)))
            },
        )
        .with_title(format!("Query {kind} resources and frameworks")),
    )
}

fn transition_tool(kind: DeployKind, action: Action) -> Arc<dyn Tool> {
    let verb = match action {
        Action::Start => "Start",
        Action::Stop => "Stop",
    };
    Arc::new(
        HubTool::new(
            format!("{action}_{kind}_by_modelid_and_deployid"),
            format!("{verb} a {kind} deployment by model ID and deploy ID with user access token."),
            deployment_parameters(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let model_id = args.get_str("model_id")?;
                let deploy_id = args.get_u64("deploy_id")?;
                output(deploy::transition(&ctx.client, kind, token, model_id, deploy_id, action).await?)
            },
        )
        .with_title(format!("{verb} {kind}")),
    )
}

fn delete_tool(kind: DeployKind) -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            format!("delete_{kind}_by_modelid_and_deployid"),
            format!("Delete a {kind} deployment by model ID and deploy ID with user access token."),
            deployment_parameters(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let model_id = args.get_str("model_id")?;
                let deploy_id = args.get_u64("deploy_id")?;
                output(deploy::delete(&ctx.client, kind, token, model_id, deploy_id).await?)
            },
        )
        .with_title(format!("Delete {kind}")),
    )
}

fn catalogue(kind: DeployKind) -> Vec<Arc<dyn Tool>> {
    vec![
        list_tool(kind),
        status_tool(kind),
        check_model_tool(),
        create_tool(kind),
        conditions_tool(kind),
        transition_tool(kind, Action::Stop),
        transition_tool(kind, Action::Start),
        delete_tool(kind),
    ]
}

pub fn inference_tools() -> Vec<Arc<dyn Tool>> {
    catalogue(DeployKind::Inference)
}

pub fn finetune_tools() -> Vec<Arc<dyn Tool>> {
    catalogue(DeployKind::Finetune)
}
