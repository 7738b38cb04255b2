//! Headless finetune jobs (deploy type 6).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{acknowledged, random_suffix, try_reply, Page};
use crate::client::{endpoint, Call, HubClient, Reply};
use crate::error::Result;
use crate::projection::{Projection, Record};

pub const DEFAULT_EPOCHS: u64 = 1;
pub const DEFAULT_LEARNING_RATE: f64 = 0.0001;

fn summary() -> Projection {
    Projection::new()
        .field("id")
        .field("task_name")
        .field("status")
        .field("created_at")
}

fn detail_projection() -> Projection {
    summary()
        .field("task_desc")
        .field("reason")
        .field("result_url")
}

/// Training parameters of a new job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFinetuneJob {
    pub model_id: String,
    pub dataset_id: String,
    pub resource_id: u64,
    pub runtime_framework_id: u64,
    #[serde(default = "default_epochs")]
    pub epochs: u64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

fn default_epochs() -> u64 {
    DEFAULT_EPOCHS
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

impl NewFinetuneJob {
    fn body(&self, task_name: &str) -> Value {
        json!({
            "task_name": task_name,
            "task_desc": "",
            "runtime_framework_id": self.runtime_framework_id,
            "resource_id": self.resource_id,
            "model_id": self.model_id,
            "dataset_id": self.dataset_id,
            "epochs": self.epochs,
            "learning_rate": self.learning_rate,
            "share_mode": false,
        })
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
    let envelope = try_reply!(client.call(&endpoint::USER_FINETUNE_JOBS, call).await?);
    Ok(Reply::Ok(summary().list(envelope.items())))
}

pub async fn get(client: &HubClient, token: &str, id: u64) -> Result<Reply<Record>> {
    let call = Call::new().param("id", id).token(token);
    let envelope = try_reply!(client.call(&endpoint::FINETUNE_JOB, call).await?);
    Ok(Reply::Ok(detail_projection().detail(envelope.object())))
}

pub async fn delete(client: &HubClient, token: &str, id: u64) -> Result<Reply<Record>> {
    let call = Call::new().param("id", id).token(token);
    acknowledged(client, &endpoint::FINETUNE_JOB_DELETE, call, "id", Value::from(id)).await
}

/// Submit a job under a generated `finetune_job_NNNN` name.
pub async fn create(
    client: &HubClient,
    token: &str,
    job: &NewFinetuneJob,
) -> Result<Reply<Record>> {
    let task_name = format!("finetune_job_{}", random_suffix());
    let call = Call::new().json(job.body(&task_name)).token(token);
    let envelope = try_reply!(client.call(&endpoint::FINETUNE_JOB_CREATE, call).await?);
    Ok(Reply::Ok(summary().detail(envelope.object())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_omitted() {
        let job: NewFinetuneJob = serde_json::from_value(json!({
            "model_id": "u/m",
            "dataset_id": "u/d",
            "resource_id": 1,
            "runtime_framework_id": 2
        }))
        .unwrap();
        assert_eq!(job.epochs, 1);
        assert_eq!(job.learning_rate, 0.0001);

        let body = job.body("finetune_job_0001");
        assert_eq!(body["share_mode"], false);
        assert_eq!(body["task_name"], "finetune_job_0001");
    }
}
