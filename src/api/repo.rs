//! Repository operations shared by models, datasets, code repos and spaces.
//!
//! One engine parameterized by [`RepoKind`]: the kind picks the URL plural
//! and the output id key (`model_id`, `dataset_id`, ...).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::{acknowledged, try_reply, Page};
use crate::client::{endpoint, Call, HubClient, Reply};
use crate::error::Result;
use crate::projection::{str_field, web_url, Projection, Record};

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_LICENSE: &str = "apache-2.0";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum RepoKind {
    Model,
    Dataset,
    Code,
    Space,
}

impl RepoKind {
    /// URL segment: `models`, `datasets`, `codes`, `spaces`.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Model => "models",
            Self::Dataset => "datasets",
            Self::Code => "codes",
            Self::Space => "spaces",
        }
    }

    /// Output key carrying the `namespace/name` path.
    pub fn id_key(self) -> &'static str {
        match self {
            Self::Model => "model_id",
            Self::Dataset => "dataset_id",
            Self::Code => "code_id",
            Self::Space => "space_id",
        }
    }

    fn ids(self) -> Projection {
        Projection::new().rename("path", self.id_key())
    }

    fn with_web_url(self, projection: Projection, web_endpoint: &str) -> Projection {
        let web = web_endpoint.to_string();
        projection.derive("web_access_url", move |item| {
            str_field(item, "path").map(|path| json!(web_url(&web, &[self.plural(), path])))
        })
    }

    /// `{<kind>_id, clone_address, web_access_url}`.
    pub fn detail_projection(self, web_endpoint: &str) -> Projection {
        let projection = self.ids().rename("repository", "clone_address");
        self.with_web_url(projection, web_endpoint)
    }

    /// `{<kind>_id, web_access_url}`.
    pub fn created_projection(self, web_endpoint: &str) -> Projection {
        self.with_web_url(self.ids(), web_endpoint)
    }
}

/// Fields of a new repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRepo {
    pub namespace: String,
    pub name: String,
    pub license: String,
    #[serde(default)]
    pub readme: String,
    #[serde(default)]
    pub description: String,
    /// Kind-specific extras merged into the request body.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl NewRepo {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            license: DEFAULT_LICENSE.to_string(),
            readme: String::new(),
            description: String::new(),
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    fn body(&self) -> Value {
        let mut body = json!({
            "default_branch": DEFAULT_BRANCH,
            "description": self.description,
            "license": self.license,
            "name": self.name,
            "namespace": self.namespace,
            "private": true,
            "readme": self.readme,
        });
        if let Some(map) = body.as_object_mut() {
            map.extend(self.extra.clone());
        }
        body
    }
}

/// Repositories owned by `username`.
pub async fn list_user(
    client: &HubClient,
    kind: RepoKind,
    token: &str,
    username: &str,
    page: Page,
) -> Result<Reply<Vec<Record>>> {
    let call = Call::new()
        .param("username", username)
        .param("plural", kind.plural())
        .page(page.size, page.number)
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::USER_REPOS, call).await?);
    Ok(Reply::Ok(kind.ids().list(envelope.items())))
}

/// Detail of one repository.
pub async fn detail(
    client: &HubClient,
    kind: RepoKind,
    token: Option<&str>,
    id: &str,
) -> Result<Reply<Record>> {
    let mut call = Call::new().param("plural", kind.plural()).param("id", id);
    if let Some(token) = token {
        call = call.token(token);
    }
    let envelope = try_reply!(client.call(&endpoint::REPO_DETAIL, call).await?);
    let projection = kind.detail_projection(client.config().web_endpoint());
    Ok(Reply::Ok(projection.detail(envelope.object())))
}

/// Existence check: `{<kind>_id}` when the repository resolves.
pub async fn check(
    client: &HubClient,
    kind: RepoKind,
    token: Option<&str>,
    id: &str,
) -> Result<Reply<Record>> {
    let mut call = Call::new().param("plural", kind.plural()).param("id", id);
    if let Some(token) = token {
        call = call.token(token);
    }
    let envelope = try_reply!(client.call(&endpoint::REPO_DETAIL, call).await?);
    Ok(Reply::Ok(kind.ids().detail(envelope.object())))
}

/// Create a private repository on the `main` branch.
pub async fn create(
    client: &HubClient,
    kind: RepoKind,
    token: &str,
    repo: &NewRepo,
) -> Result<Reply<Record>> {
    let call = Call::new()
        .param("plural", kind.plural())
        .json(repo.body())
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::REPO_CREATE, call).await?);
    let projection = kind.created_projection(client.config().web_endpoint());
    Ok(Reply::Ok(projection.detail(envelope.object())))
}

pub async fn delete(
    client: &HubClient,
    kind: RepoKind,
    token: &str,
    id: &str,
) -> Result<Reply<Record>> {
    let call = Call::new()
        .param("plural", kind.plural())
        .param("id", id)
        .token(token);
    acknowledged(client, &endpoint::REPO_DELETE, call, kind.id_key(), json!(id)).await
}

/// Trending repositories matching `name`: `{total_found, <plural>: [...]}`.
pub async fn search(
    client: &HubClient,
    kind: RepoKind,
    token: &str,
    name: &str,
    page: Page,
) -> Result<Reply<Record>> {
    let call = Call::new()
        .param("plural", kind.plural())
        .page(page.size, page.number)
        .query("search", name)
        .query("sort", "trending")
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::REPO_INDEX, call).await?);

    let mut out = Record::new();
    out.insert(
        "total_found".to_string(),
        envelope.at(&["total"]).cloned().unwrap_or(json!(0)),
    );
    out.insert(
        kind.plural().to_string(),
        serde_json::to_value(kind.ids().list(envelope.items()))?,
    );
    Ok(Reply::Ok(out))
}

/// Most downloaded public repositories; no credentials.
pub async fn top_downloads(
    client: &HubClient,
    kind: RepoKind,
    num: u64,
) -> Result<Reply<Vec<Record>>> {
    let call = Call::new()
        .param("plural", kind.plural())
        .page(num, 1)
        .query("search", "")
        .query("sort", "most_download");
    let envelope = try_reply!(client.call(&endpoint::REPO_INDEX, call).await?);
    let projection = kind.ids().field("downloads").field("likes");
    Ok(Reply::Ok(projection.list(envelope.items())))
}

/// Repositories carrying a tag, e.g. `runtime_framework=opencompass`.
pub async fn tagged(
    client: &HubClient,
    kind: RepoKind,
    token: &str,
    category: &str,
    tag: &str,
) -> Result<Reply<Vec<Record>>> {
    let call = Call::new()
        .param("plural", kind.plural())
        .query("tag_category", category)
        .query("tag_name", tag)
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::REPO_INDEX, call).await?);
    let projection = kind.ids().field("name").field("description");
    Ok(Reply::Ok(projection.list(envelope.items())))
}

/// File to commit into a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload<'a> {
    pub path: &'a str,
    /// Raw file content; encoded to base64 on the wire.
    pub content: &'a [u8],
    pub branch: &'a str,
}

/// Commit a single file, creating or replacing it.
pub async fn upload(
    client: &HubClient,
    kind: RepoKind,
    token: &str,
    id: &str,
    file: Upload<'_>,
) -> Result<Reply<Record>> {
    use base64::Engine as _;

    let body = json!({
        "content": base64::engine::general_purpose::STANDARD.encode(file.content),
        "message": format!("Create {}", file.path),
        "branch": file.branch,
        "new_branch": file.branch,
    });
    let call = Call::new()
        .param("plural", kind.plural())
        .param("id", id)
        .param("file_path", file.path)
        .json(body)
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::REPO_UPLOAD, call).await?);

    let mut out = Record::new();
    out.insert(kind.id_key().to_string(), json!(id));
    out.insert("file_path".to_string(), json!(file.path));
    out.insert("branch".to_string(), json!(file.branch));
    out.insert("msg".to_string(), json!(envelope.message().unwrap_or("OK")));
    Ok(Reply::Ok(out))
}
