//! Spaces: hosted apps built from a repository plus a compute resource.

use serde_json::json;
use strum::{Display, EnumString};

use super::repo::{self, NewRepo, RepoKind, Upload};
use super::resources::{self, DeployType};
use super::{acknowledged, try_reply};
use crate::client::{endpoint, Call, HubClient, Reply};
use crate::error::Result;
use crate::projection::{str_field, Record};

pub const APP_FILE: &str = "app.py";
pub const UNKNOWN_CLUSTER: &str = "unknown";

/// App framework of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Sdk {
    #[default]
    Gradio,
    Streamlit,
    Nginx,
    Docker,
    Mcp,
}

/// A new space.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSpace {
    pub namespace: String,
    pub name: String,
    pub resource_id: u64,
    pub sdk: Sdk,
    pub license: String,
    pub description: String,
}

impl NewSpace {
    fn repo(&self, cluster_id: &str) -> NewRepo {
        let mut repo = NewRepo::new(&self.namespace, &self.name)
            .with_extra("sdk", json!(self.sdk.to_string()))
            .with_extra("resource_id", json!(self.resource_id))
            .with_extra("cluster_id", json!(cluster_id));
        repo.license = self.license.clone();
        repo.description = self.description.clone();
        repo
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Available space resources on every configured cluster, priced and
/// labelled with the cluster region.
pub async fn resources(client: &HubClient, token: &str) -> Result<Reply<Vec<Record>>> {
    let regions = try_reply!(resources::cluster_regions(client, token).await?);

    let mut all = Vec::new();
    for cluster_id in client.config().cluster_ids() {
        let name = regions
            .get(cluster_id)
            .map(String::as_str)
            .filter(|r| !r.is_empty())
            .unwrap_or(UNKNOWN_CLUSTER);
        let found = try_reply!(
            resources::available_priced(client, cluster_id, name, DeployType::Space).await?
        );
        all.extend(found);
    }
    Ok(Reply::Ok(all))
}

/// Create the space repository on the primary cluster.
pub async fn create(client: &HubClient, token: &str, space: &NewSpace) -> Result<Reply<Record>> {
    let repo = space.repo(client.config().primary_cluster());
    repo::create(client, RepoKind::Space, token, &repo).await
}

/// Build and start a space.
pub async fn run(client: &HubClient, token: &str, space_id: &str) -> Result<Reply<Record>> {
    let call = Call::new().param("id", space_id).token(token);
    acknowledged(client, &endpoint::SPACE_RUN, call, "space_id", json!(space_id)).await
}

/// Create a space, commit its `app.py`, then start it. Each step runs only
/// if the previous one succeeded.
pub async fn deploy_app(
    client: &HubClient,
    token: &str,
    space: &NewSpace,
    app_code: &str,
) -> Result<Reply<Record>> {
    let created = try_reply!(create(client, token, space).await?);
    let space_id = str_field(&created, RepoKind::Space.id_key())
        .map(String::from)
        .unwrap_or_else(|| space.id());

    let file = Upload {
        path: APP_FILE,
        content: app_code.as_bytes(),
        branch: repo::DEFAULT_BRANCH,
    };
    try_reply!(repo::upload(client, RepoKind::Space, token, &space_id, file).await?);
    let started = try_reply!(run(client, token, &space_id).await?);

    let mut out = created;
    out.insert(RepoKind::Space.id_key().to_string(), json!(space_id));
    if let Some(msg) = started.get("msg") {
        out.insert("msg".to_string(), msg.clone());
    }
    Ok(Reply::Ok(out))
}
