//! Space tools: hosted apps on a compute resource.

use std::str::FromStr;
use std::sync::Arc;

use crate::api::repo::{self, RepoKind, Upload};
use crate::api::space::{self, NewSpace, Sdk};
use crate::api::try_reply;
use crate::client::Reply;
use crate::error::{HubError, Result};
use crate::tools::common::{list_clusters_tool, namespaces_tool};
use crate::tools::repo::{delete_tool, detail_tool, list_user_tool, top_downloads_tool};
use crate::tools::tool::{HubTool, Tool, ToolContext};
use crate::tools::types::ToolParameters;
use crate::tools::{namespace_or_username, output, username, ToolArguments};

const SDKS: &[&str] = &["gradio", "streamlit", "nginx", "docker", "mcp"];

fn space_parameters() -> ToolParameters {
    ToolParameters::object()
        .token()
        .string("space_name", "Name of the space.")
        .integer("resource_id", "Compute resource id from query_space_resources.")
        .string_enum("sdk", "App framework of the space.", SDKS, "gradio")
        .string_or("license", "Space license.", repo::DEFAULT_LICENSE)
        .string_or("description", "Space description.", "")
        .optional_string("namespace", "Namespace (user or organization) to create in.")
        .build()
}

/// Read the shared space arguments, resolving the namespace if absent.
async fn new_space(args: &ToolArguments, ctx: &ToolContext, token: &str) -> Result<Reply<NewSpace>> {
    let name = args.get_str("space_name")?;
    let resource_id = args.get_u64("resource_id")?;
    let sdk = Sdk::from_str(args.get_str_or("sdk", "gradio")).map_err(|_| {
        HubError::InvalidArgument(format!("Unsupported sdk, expected one of {}", SDKS.join(", ")))
    })?;
    let namespace = try_reply!(namespace_or_username(args, ctx, token).await?);
    Ok(Reply::Ok(NewSpace {
        namespace,
        name: name.to_string(),
        resource_id,
        sdk,
        license: args.get_str_or("license", repo::DEFAULT_LICENSE).to_string(),
        description: args.get_str_or("description", "").to_string(),
    }))
}

pub fn query_resources_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "query_space_resources",
            "Retrieve the available compute resources for spaces on every configured CSGHub cluster, with cluster region and price.",
            ToolParameters::object().token().build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                output(space::resources(&ctx.client, token).await?)
            },
        )
        .with_title("Query space resources"),
    )
}

pub fn create_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "create_space",
            "Create a new space in CSGHub with user access token. space_name and resource_id are required. Default sdk is gradio and default license is apache-2.0. The namespace defaults to the user's own.",
            space_parameters(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let new_space = try_reply!(new_space(&args, &ctx, token).await?);
                output(space::create(&ctx.client, token, &new_space).await?)
            },
        )
        .with_title("Create space"),
    )
}

pub fn upload_file_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "upload_space_file",
            "Upload a file into a space repository on CSGHub with user access token. The content is committed as-is to the given branch, replacing any existing file.",
            ToolParameters::object()
                .token()
                .string("space_id", "Space path in the form namespace/name.")
                .string("file_path", "Path of the file inside the repository.")
                .string("content", "File content.")
                .string_or("branch", "Target branch.", repo::DEFAULT_BRANCH)
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let space_id = args.get_str("space_id")?;
                let file = Upload {
                    path: args.get_str("file_path")?,
                    content: args.get_str("content")?.as_bytes(),
                    branch: args.get_str_or("branch", repo::DEFAULT_BRANCH),
                };
                output(repo::upload(&ctx.client, RepoKind::Space, token, space_id, file).await?)
            },
        )
        .with_title("Upload space file"),
    )
}

pub fn run_tool() -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            "run_space",
            "Starts a CSGHub space owned by the token user. Parameters: `token` (required): User's API token. `space_name` (required): Name of the space to run.",
            ToolParameters::object()
                .token()
                .string("space_name", "Name of the space to run.")
                .build(),
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let space_name = args.get_str("space_name")?;
                let username = try_reply!(username(&ctx, token).await?);
                let space_id = format!("{username}/{space_name}");
                output(space::run(&ctx.client, token, &space_id).await?)
            },
        )
        .with_title("Run space"),
    )
}

pub fn deploy_app_tool() -> Arc<dyn Tool> {
    let parameters = ToolParameters::object()
        .token()
        .string("space_name", "Name of the space.")
        .integer("resource_id", "Compute resource id from query_space_resources.")
        .string("app_code", "Source of the app.py entry file.")
        .string_enum("sdk", "App framework of the space.", SDKS, "gradio")
        .string_or("license", "Space license.", repo::DEFAULT_LICENSE)
        .string_or("description", "Space description.", "")
        .optional_string("namespace", "Namespace (user or organization) to create in.")
        .build();
    Arc::new(
        HubTool::new(
            "deploy_space_app",
            "Create a space, commit the given code as app.py and start it, in one step. Stops at the first failing step.",
            parameters,
            |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let app_code = args.get_str("app_code")?;
                let new_space = try_reply!(new_space(&args, &ctx, token).await?);
                output(space::deploy_app(&ctx.client, token, &new_space, app_code).await?)
            },
        )
        .with_title("Deploy space app"),
    )
}

pub fn tools() -> Vec<Arc<dyn Tool>> {
    let kind = RepoKind::Space;
    vec![
        query_resources_tool(),
        list_clusters_tool(),
        create_tool(),
        upload_file_tool(),
        run_tool(),
        deploy_app_tool(),
        top_downloads_tool(kind),
        detail_tool(kind),
        list_user_tool(kind),
        delete_tool(kind),
        namespaces_tool("list_namespaces", "spaces"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deploy_requires_app_code() {
        let tool = deploy_app_tool();
        let required = &tool.parameters().schema["required"];
        assert_eq!(
            required,
            &json!(["token", "space_name", "resource_id", "app_code"])
        );
    }

    #[test]
    fn catalogue_has_space_lifecycle() {
        let names: Vec<String> = tools().iter().map(|t| t.name().to_string()).collect();
        for expected in [
            "query_space_resources",
            "create_space",
            "upload_space_file",
            "run_space",
            "deploy_space_app",
            "get_top_download_spaces",
            "get_space_detail_by_id",
            "list_user_spaces",
            "delete_space_by_id",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }
}
