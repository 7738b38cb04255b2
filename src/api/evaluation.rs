//! Model evaluation tasks (deploy type 4).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{try_reply, Page};
use crate::client::{endpoint, Call, HubClient, Reply};
use crate::error::Result;
use crate::projection::{Projection, Record};

/// Tag that marks models and datasets usable by the evaluation runtime.
pub const RUNTIME_TAG_CATEGORY: &str = "runtime_framework";
pub const RUNTIME_TAG: &str = "opencompass";

fn summary() -> Projection {
    Projection::new()
        .field("id")
        .field("task_name")
        .field("task_desc")
        .field("status")
        .field("created_at")
}

fn detail_projection() -> Projection {
    summary()
        .field("reason")
        .id_list("repo_ids", "repo_ids")
        .id_list("datasets", "datasets")
        .field("result_url")
        .field("download_url")
}

/// A new evaluation task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvaluation {
    pub task_name: String,
    pub model_ids: Vec<String>,
    pub runtime_framework_id: u64,
    pub datasets: Vec<String>,
    #[serde(default = "default_share_mode")]
    pub share_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<u64>,
}

fn default_share_mode() -> bool {
    true
}

impl NewEvaluation {
    fn body(&self) -> Value {
        let mut body = json!({
            "task_name": self.task_name,
            "model_ids": self.model_ids,
            "runtime_framework_id": self.runtime_framework_id,
            "share_mode": self.share_mode,
            "datasets": self.datasets,
        });
        if let (Some(id), Some(map)) = (self.resource_id, body.as_object_mut()) {
            map.insert("resource_id".to_string(), json!(id));
        }
        body
    }
}

pub async fn list(
    client: &HubClient,
    token: &str,
    username: &str,
    page: Page,
) -> Result<Reply<Vec<Record>>> {
    let call = Call::new()
        .param("username", username)
        .page(page.size, page.number)
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::USER_EVALUATIONS, call).await?);
    Ok(Reply::Ok(summary().list(envelope.items())))
}

pub async fn get(client: &HubClient, token: &str, id: u64) -> Result<Reply<Record>> {
    let call = Call::new().param("id", id).token(token);
    let envelope = try_reply!(client.call(&endpoint::EVALUATION, call).await?);
    Ok(Reply::Ok(detail_projection().detail(envelope.object())))
}

pub async fn create(
    client: &HubClient,
    token: &str,
    evaluation: &NewEvaluation,
) -> Result<Reply<Record>> {
    let call = Call::new().json(evaluation.body()).token(token);
    let envelope = try_reply!(client.call(&endpoint::EVALUATION_CREATE, call).await?);
    Ok(Reply::Ok(summary().detail(envelope.object())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resource_id_is_only_sent_when_given() {
        let mut evaluation = NewEvaluation {
            task_name: "eval".into(),
            model_ids: vec!["u/m".into()],
            runtime_framework_id: 3,
            datasets: vec!["u/d".into()],
            share_mode: true,
            resource_id: None,
        };
        assert!(evaluation.body().get("resource_id").is_none());

        evaluation.resource_id = Some(9);
        assert_eq!(evaluation.body()["resource_id"], 9);
    }
}
