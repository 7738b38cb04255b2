//! Dataflow tools.

use std::sync::Arc;

use crate::api::dataflow::{self, JobSource, DEFAULT_JOB_TYPE, DEFAULT_TEXT_KEYS};
use crate::api::repo::DEFAULT_BRANCH;
use crate::api::try_reply;
use crate::tools::common::check_dataset_tool;
use crate::tools::tool::{HubTool, Tool, ToolContext};
use crate::tools::types::ToolParameters;
use crate::tools::{output, username, ToolArguments};

const DEFAULT_PER: u64 = 10;
const DEFAULT_TEMPLATE_PAGE_SIZE: u64 = 20;

pub fn list_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "list_user_dataflow_jobs",
            "Retrieve a list of dataflow jobs for the token user from CSGHub. You can control the pagination by specifying the number of items per page and the page number.",
            ToolParameters::object()
                .token()
                .per_page("per", DEFAULT_PER)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let page = args.page("per", DEFAULT_PER)?;
                output(dataflow::list(&ctx.client, token, page).await?)
            },
        )
        .with_title("List dataflow jobs"),
    )
}

pub fn detail_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "get_dataflow_job_detail_by_job_id",
            "Retrieve the details of a dataflow job by job id from CSGHub with user access token.",
            ToolParameters::object()
                .token()
                .integer("job_id", "Dataflow job id.")
                .string_or("template_type", "Template type of the job.", DEFAULT_JOB_TYPE)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let job_id = args.get_u64("job_id")?;
                let job_type = args.get_str_or("template_type", DEFAULT_JOB_TYPE);
                output(dataflow::detail(&ctx.client, token, job_id, job_type).await?)
            },
        )
        .with_title("Get dataflow job detail"),
    )
}

pub fn create_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "create_dataflow_job",
            "Create and run a dataflow job over a dataset from an algorithm template on CSGHub with user access token. Pick template_id from query_dataflow_templates.",
            ToolParameters::object()
                .token()
                .string("dataset_id", "Source dataset in the form namespace/name.")
                .integer("template_id", "Algorithm template id.")
                .string_or("branch", "Source branch of the dataset.", DEFAULT_BRANCH)
                .string_or("text_keys", "Dataset field holding the text.", DEFAULT_TEXT_KEYS)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let dataset_id = args.get_str("dataset_id")?;
                let template_id = args.get_u64("template_id")?;
                let owner = try_reply!(username(&ctx, token).await?);
                let source = JobSource {
                    dataset_id,
                    branch: args.get_str_or("branch", DEFAULT_BRANCH),
                    text_keys: args.get_str_or("text_keys", DEFAULT_TEXT_KEYS),
                };
                output(dataflow::create(&ctx.client, token, &owner, template_id, source).await?)
            },
        )
        .with_title("Create dataflow job"),
    )
}

pub fn delete_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "delete_dataflow_job_by_id",
            "Delete a dataflow job by job id from CSGHub with user access token.",
            ToolParameters::object()
                .token()
                .integer("job_id", "Dataflow job id.")
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let job_id = args.get_u64("job_id")?;
                output(dataflow::delete(&ctx.client, token, job_id).await?)
            },
        )
        .with_title("Delete dataflow job"),
    )
}

pub fn templates_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "query_dataflow_templates",
            "Retrieve the dataflow algorithm templates from CSGHub with user access token.",
            ToolParameters::object()
                .token()
                .integer_or("page", "Page number, starting from 1.", 1)
                .integer_or("page_size", "Number of items per page.", DEFAULT_TEMPLATE_PAGE_SIZE)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let page = args.page("page_size", DEFAULT_TEMPLATE_PAGE_SIZE)?;
                output(dataflow::templates(&ctx.client, token, page).await?)
            },
        )
        .with_title("Query dataflow templates"),
    )
}

pub fn tools() -> Vec<Arc<dyn Tool>> {
    vec![
        list_tool(),
        detail_tool(),
        create_tool(),
        delete_tool(),
        templates_tool(),
        check_dataset_tool(),
    ]
}
