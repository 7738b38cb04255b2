//! Repository tools for models, datasets and code repos.
//!
//! Every builder takes a [`RepoKind`]; the kind decides the tool name, the
//! id argument (`model_id`, `dataset_id`, ...) and the URL plural.

use std::sync::Arc;

use crate::api::repo::{self, NewRepo, RepoKind};
use crate::api::try_reply;
use crate::tools::common::{check_dataset_tool, check_model_tool, namespaces_tool};
use crate::tools::tool::{HubTool, Tool, ToolContext};
use crate::tools::types::ToolParameters;
use crate::tools::{namespace_or_username, output, username, ToolArguments};

const DEFAULT_PER: u64 = 10;
const DEFAULT_SEARCH_SIZE: u64 = 20;
const DEFAULT_TOP: u64 = 5;

fn label(kind: RepoKind) -> &'static str {
    match kind {
        RepoKind::Model => "model",
        RepoKind::Dataset => "dataset repo",
        RepoKind::Code => "code repo",
        RepoKind::Space => "space",
    }
}

/// `list_user_{plural}`: the token owner's repositories.
pub fn list_user_tool(kind: RepoKind) -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            format!("list_user_{}", kind.plural()),
            format!(
                "Retrieve a list of {} for a specific user from CSGHub with user access token. You can control the pagination by specifying the number of items per page and the page number.",
                kind.plural()
            ),
            ToolParameters::object()
                .token()
                .per_page("per", DEFAULT_PER)
                .build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let page = args.page("per", DEFAULT_PER)?;
                let username = try_reply!(username(&ctx, token).await?);
                output(repo::list_user(&ctx.client, kind, token, &username, page).await?)
            },
        )
        .with_title(format!("List user {}", kind.plural())),
    )
}

/// Detail tool; code repos are looked up "by path", the rest "by id".
pub fn detail_tool(kind: RepoKind) -> Arc<dyn Tool> {
    let name = match kind {
        RepoKind::Code => "get_code_detail_by_path".to_string(),
        other => format!("get_{other}_detail_by_id"),
    };
    Arc::new(
        HubTool::new(
            name,
            format!(
                "Retrieve the {} details by a specific path from CSGHub with user access token.",
                label(kind)
            ),
            ToolParameters::object()
                .token()
                .string(kind.id_key(), "Repository path in the form namespace/name.")
                .build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let id = args.get_str(kind.id_key())?;
                output(repo::detail(&ctx.client, kind, Some(token), id).await?)
            },
        )
        .with_title(format!("Get {} detail", label(kind))),
    )
}

/// Create tool. The namespace defaults to the token owner.
pub fn create_tool(kind: RepoKind) -> Arc<dyn Tool> {
    let name = match kind {
        RepoKind::Dataset => "create_dataset_repo".to_string(),
        other => format!("create_{other}"),
    };
    let name_arg = format!("{kind}_name");
    Arc::new(
        HubTool::new(
            name,
            format!(
                "Create a new {label} in CSGHub with user access token. {kind}_name is required and must start with a letter, can only contain letters, numbers, underscores (_) and hyphens (-). Default license is apache-2.0. Default readme and description are empty. The namespace defaults to the user's own.",
                label = label(kind)
            ),
            ToolParameters::object()
                .token()
                .string(&name_arg, "Name of the new repository.")
                .string_or("license", "Repository license.", repo::DEFAULT_LICENSE)
                .string_or("readme", "README content.", "")
                .string_or("description", "Repository description.", "")
                .optional_string("namespace", "Namespace (user or organization) to create in.")
                .build(),
            move |args: ToolArguments, ctx: ToolContext| {
                let name_arg = name_arg.clone();
                async move {
                    let token = args.token()?;
                    let name = args.get_str(&name_arg)?;
                    let namespace = try_reply!(namespace_or_username(&args, &ctx, token).await?);

                    let mut new_repo = NewRepo::new(namespace, name);
                    new_repo.license = args.get_str_or("license", repo::DEFAULT_LICENSE).to_string();
                    new_repo.readme = args.get_str_or("readme", "").to_string();
                    new_repo.description = args.get_str_or("description", "").to_string();
                    output(repo::create(&ctx.client, kind, token, &new_repo).await?)
                }
            },
        )
        .with_title(format!("Create {}", label(kind))),
    )
}

pub fn delete_tool(kind: RepoKind) -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            format!("delete_{kind}_by_id"),
            format!(
                "Delete the {} by a specific id from CSGHub with user access token.",
                label(kind)
            ),
            ToolParameters::object()
                .token()
                .string(kind.id_key(), "Repository path in the form namespace/name.")
                .build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let id = args.get_str(kind.id_key())?;
                output(repo::delete(&ctx.client, kind, token, id).await?)
            },
        )
        .with_title(format!("Delete {}", label(kind))),
    )
}

/// `query_{plural}_by_name`: trending search with `page_size` mapped onto
/// the hub's `per`.
pub fn search_tool(kind: RepoKind) -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            format!("query_{}_by_name", kind.plural()),
            format!(
                "Query the {plural} from CSGHub by specifying a name. The default {DEFAULT_SEARCH_SIZE} {plural} will be returned if no page size is specified.",
                plural = kind.plural()
            ),
            ToolParameters::object()
                .token()
                .string("name", "Name or part of a name to search for.")
                .per_page("page_size", DEFAULT_SEARCH_SIZE)
                .build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let token = args.token()?;
                let name = args.get_str("name")?;
                let page = args.page("page_size", DEFAULT_SEARCH_SIZE)?;
                output(repo::search(&ctx.client, kind, token, name, page).await?)
            },
        )
        .with_title(format!("Query {} by name", kind.plural())),
    )
}

/// `get_top_download_{plural}`; anonymous.
pub fn top_downloads_tool(kind: RepoKind) -> Arc<dyn Tool> {
    Arc::new(
        HubTool::new(
            format!("get_top_download_{}", kind.plural()),
            format!(
                "Retrieve the top downloaded {plural} from CSGHub by specifying the number of {plural} to retrieve.",
                plural = kind.plural()
            ),
            ToolParameters::object()
                .integer_or("num", "Number of repositories to return.", DEFAULT_TOP)
                .build(),
            move |args: ToolArguments, ctx: ToolContext| async move {
                let num = args.get_u64_or("num", DEFAULT_TOP)?;
                output(repo::top_downloads(&ctx.client, kind, num).await?)
            },
        )
        .with_title(format!("Top downloaded {}", kind.plural())),
    )
}

pub fn model_tools() -> Vec<Arc<dyn Tool>> {
    let kind = RepoKind::Model;
    vec![
        top_downloads_tool(kind),
        search_tool(kind),
        list_user_tool(kind),
        detail_tool(kind),
        create_tool(kind),
        delete_tool(kind),
        namespaces_tool("list_namespaces", "model repos"),
        check_model_tool(),
    ]
}

pub fn dataset_tools() -> Vec<Arc<dyn Tool>> {
    let kind = RepoKind::Dataset;
    vec![
        search_tool(kind),
        list_user_tool(kind),
        detail_tool(kind),
        create_tool(kind),
        delete_tool(kind),
        namespaces_tool("list_user_namespaces", "dataset repos"),
        check_dataset_tool(),
    ]
}

pub fn code_tools() -> Vec<Arc<dyn Tool>> {
    let kind = RepoKind::Code;
    vec![
        list_user_tool(kind),
        detail_tool(kind),
        create_tool(kind),
        delete_tool(kind),
        namespaces_tool("list_namespaces", "code repos"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tools: &[Arc<dyn Tool>]) -> Vec<&str> {
        tools.iter().map(|t| t.name()).collect()
    }

    #[test]
    fn names_follow_the_hub_catalogue() {
        assert_eq!(
            names(&model_tools()),
            vec![
                "get_top_download_models",
                "query_models_by_name",
                "list_user_models",
                "get_model_detail_by_id",
                "create_model",
                "delete_model_by_id",
                "list_namespaces",
                "check_model_by_model_id",
            ]
        );
        let datasets = dataset_tools();
        let datasets = names(&datasets);
        assert!(datasets.contains(&"create_dataset_repo"));
        assert!(datasets.contains(&"list_user_namespaces"));
        let code = code_tools();
        assert!(names(&code).contains(&"get_code_detail_by_path"));
        assert!(names(&code).contains(&"delete_code_by_id"));
    }

    #[test]
    fn create_schema_requires_kind_name() {
        let tool = create_tool(RepoKind::Dataset);
        let schema = &tool.parameters().schema;
        assert_eq!(
            schema["required"],
            serde_json::json!(["token", "dataset_name"])
        );
        assert_eq!(schema["properties"]["license"]["default"], "apache-2.0");
    }
}
