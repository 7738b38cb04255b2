//! Finetune job tools.

use std::sync::Arc;

use crate::api::finetune_job::{self, NewFinetuneJob, DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE};
use crate::api::resources::{self, conditions, DeployType};
use crate::api::try_reply;
use crate::client::Reply;
use crate::tools::common::{check_dataset_tool, check_model_tool};
use crate::tools::tool::{HubTool, Tool, ToolContext};
use crate::tools::types::ToolParameters;
use crate::tools::{output, username, ToolArguments};

const DEFAULT_PER: u64 = 10;

fn job_id_parameters() -> ToolParameters {
    ToolParameters::object()
        .token()
        .integer("id", "Finetune job id.")
        .build()
}

pub fn list_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "list_finetune_jobs",
            "Retrieve a list of finetune jobs for the token user from CSGHub. You can control the pagination by specifying the number of items per page and the page number.",
            ToolParameters::object()
                .token()
                .per_page("per", DEFAULT_PER)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let page = args.page("per", DEFAULT_PER)?;
                let username = try_reply!(username(&ctx, token).await?);
                output(finetune_job::list(&ctx.client, token, &username, page).await?)
            },
        )
        .with_title("List finetune jobs"),
    )
}

pub fn get_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "get_finetune_job_by_id",
            "Retrieve the details of a finetune job by id from CSGHub with user access token.",
            job_id_parameters(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let id = args.get_u64("id")?;
                output(finetune_job::get(&ctx.client, token, id).await?)
            },
        )
        .with_title("Get finetune job"),
    )
}

pub fn delete_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "delete_finetune_job_by_id",
            "Delete a finetune job by id from CSGHub with user access token.",
            job_id_parameters(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let id = args.get_u64("id")?;
                output(finetune_job::delete(&ctx.client, token, id).await?)
            },
        )
        .with_title("Delete finetune job"),
    )
}

/// GPU resources and GPU runtime frameworks for finetune jobs.
pub fn conditions_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "query_avai_res_and_frameworks_for_finetune_job",
            "Retrieve a list of available resources and runtime frameworks that can be used for deploying finetune job on CSGHub. Only using GPU resources.",
            ToolParameters::object().token().build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let cluster = ctx.client.config().primary_cluster();
                let available = try_reply!(
                    resources::available(&ctx.client, cluster, DeployType::FinetuneJob).await?
                );
                let frameworks = try_reply!(
                    resources::gpu_frameworks(&ctx.client, token, DeployType::FinetuneJob).await?
                );
                output(Reply::Ok(conditions(available, frameworks)))
            },
        )
        .with_title("Query finetune job resources and frameworks"),
    )
}

pub fn create_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "deploy_finetune_job",
            "Deploy a finetune job for a model and a dataset on CSGHub with user access token. model_id, dataset_id, resource_id and runtime_framework_id are required; epochs and learning_rate are optional. GPU resources are required.",
            ToolParameters::object()
                .token()
                .string("model_id", "Model ID in the form namespace/name.")
                .string("dataset_id", "Dataset ID in the form namespace/name.")
                .integer("resource_id", "GPU resource id.")
                .integer("runtime_framework_id", "Runtime framework id.")
                .integer_or("epochs", "Training epochs.", DEFAULT_EPOCHS)
                .number_or("learning_rate", "Learning rate.", DEFAULT_LEARNING_RATE)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let job = NewFinetuneJob {
                    model_id: args.get_str("model_id")?.to_string(),
                    dataset_id: args.get_str("dataset_id")?.to_string(),
                    resource_id: args.get_u64("resource_id")?,
                    runtime_framework_id: args.get_u64("runtime_framework_id")?,
                    epochs: args.get_u64_or("epochs", DEFAULT_EPOCHS)?,
                    learning_rate: args.get_f64_or("learning_rate", DEFAULT_LEARNING_RATE)?,
                };
                output(finetune_job::create(&ctx.client, token, &job).await?)
            },
        )
        .with_title("Deploy finetune job"),
    )
}

pub fn tools() -> Vec<Arc<dyn Tool>> {
    vec![
        list_tool(),
        get_tool(),
        delete_tool(),
        conditions_tool(),
        create_tool(),
        check_model_tool(),
        check_dataset_tool(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_schema_defaults() {
        let tool = create_tool();
        let props = &tool.parameters().schema["properties"];
        assert_eq!(props["epochs"]["default"], 1);
        assert_eq!(props["learning_rate"]["default"], 0.0001);
    }
}
