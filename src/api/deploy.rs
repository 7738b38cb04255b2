//! Model deployments: inference endpoints and finetune instances.
//!
//! Both live under `/api/v1/models/{model_id}/...` and differ only in the
//! path segment, deploy type and which access fields a running deployment
//! exposes.

use serde_json::{json, Value};
use strum::{AsRefStr, Display};

use super::resources::DeployType;
use super::{acknowledged, random_suffix, try_reply, Page};
use crate::client::{endpoint, Call, Endpoint, HubClient, Reply};
use crate::error::Result;
use crate::projection::{
    api_access_endpoint, is_running, str_field, test_command, web_url, Projection, Record,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DeployKind {
    Inference,
    Finetune,
}

/// Lifecycle transitions of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
}

impl DeployKind {
    fn segment(self) -> &'static str {
        match self {
            Self::Inference => "run",
            Self::Finetune => "finetune",
        }
    }

    pub fn deploy_type(self) -> DeployType {
        match self {
            Self::Inference => DeployType::Inference,
            Self::Finetune => DeployType::Finetune,
        }
    }

    fn list_endpoint(self) -> &'static Endpoint {
        match self {
            Self::Inference => &endpoint::USER_INFERENCES,
            Self::Finetune => &endpoint::USER_FINETUNE_INSTANCES,
        }
    }

    fn summary(self) -> Projection {
        Projection::new()
            .rename("id", "deploy_id")
            .field("deploy_name")
            .field("model_id")
            .field("status")
    }

    /// Status record; access fields appear only while the deployment runs.
    fn status_projection(self, web_endpoint: &str, model_id: &str, deploy_id: u64) -> Projection {
        let web = web_endpoint.to_string();
        let model = model_id.to_string();
        let running = |item: &Record| is_running(str_field(item, "status"));

        let projection = self.summary().derive("model_id", {
            let model = model.clone();
            move |item| item.get("model_id").cloned().or_else(|| Some(json!(model)))
        });

        match self {
            Self::Inference => projection
                .derive("test_command", {
                    let model = model.clone();
                    move |item| {
                        let model = str_field(item, "model_id").unwrap_or(model.as_str());
                        running(item).then(|| json!(test_command(&chat_endpoint(item), model)))
                    }
                })
                .derive("web_access_url", move |item| {
                    running(item).then(|| {
                        let url = web_url(&web, &["endpoints", model.as_str(), &deploy_id.to_string()]);
                        json!(format!("{url}?tab=summary"))
                    })
                })
                .derive("api_access_endpoint", move |item| {
                    running(item).then(|| json!(chat_endpoint(item)))
                }),
            Self::Finetune => projection.derive("web_access_url", move |item| {
                running(item).then(|| {
                    let name = str_field(item, "deploy_name").unwrap_or_default();
                    let url = web_url(&web, &["finetune", model.as_str(), name, &deploy_id.to_string()]);
                    json!(format!("{url}?tab=pages"))
                })
            }),
        }
    }
}

fn chat_endpoint(item: &Record) -> String {
    api_access_endpoint(str_field(item, "endpoint").unwrap_or_default())
}

/// Deployments owned by `username`.
pub async fn list(
    client: &HubClient,
    kind: DeployKind,
    token: &str,
    username: &str,
    page: Page,
) -> Result<Reply<Vec<Record>>> {
    let mut call = Call::new()
        .param("username", username)
        .page(page.size, page.number)
        .token(token);
    if kind == DeployKind::Inference {
        call = call.query("deploy_type", kind.deploy_type().code());
    }
    let envelope = try_reply!(client.call(kind.list_endpoint(), call).await?);
    Ok(Reply::Ok(kind.summary().list(envelope.items())))
}

/// Current status of one deployment.
pub async fn status(
    client: &HubClient,
    kind: DeployKind,
    token: &str,
    model_id: &str,
    deploy_id: u64,
) -> Result<Reply<Record>> {
    let call = Call::new()
        .param("model_id", model_id)
        .param("deploy_id", deploy_id)
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::DEPLOY_DETAIL, call).await?);
    let projection = kind.status_projection(client.config().web_endpoint(), model_id, deploy_id);
    Ok(Reply::Ok(projection.detail(envelope.object())))
}

/// Choice of hardware and runtime for a new deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub resource_id: u64,
    pub runtime_framework_id: u64,
}

/// Deploy a model on the primary cluster under a generated name.
pub async fn create(
    client: &HubClient,
    kind: DeployKind,
    token: &str,
    model_id: &str,
    placement: Placement,
) -> Result<Reply<Record>> {
    let deploy_name = format!("{kind}_{}", random_suffix());
    let mut body = json!({
        "deploy_name": deploy_name,
        "cluster_id": client.config().primary_cluster(),
        "resource_id": placement.resource_id,
        "runtime_framework_id": placement.runtime_framework_id,
        "revision": "main",
        "order_detail_id": 0,
        "engine_args": "",
    });
    if kind == DeployKind::Inference {
        if let Some(map) = body.as_object_mut() {
            map.insert("min_replica".to_string(), json!(1));
            map.insert("max_replica".to_string(), json!(1));
        }
    }

    let call = Call::new()
        .param("model_id", model_id)
        .param("segment", kind.segment())
        .json(body)
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::DEPLOY_CREATE, call).await?);

    let model = model_id.to_string();
    let projection = Projection::new()
        .derive("deploy_id", |item| {
            item.get("deploy_id").or_else(|| item.get("id")).cloned()
        })
        .derive("deploy_name", move |item| {
            item.get("deploy_name").cloned().or_else(|| Some(json!(deploy_name)))
        })
        .derive("model_id", move |_| Some(json!(model)))
        .field("status");
    Ok(Reply::Ok(projection.detail(envelope.object())))
}

/// Start or stop a deployment.
pub async fn transition(
    client: &HubClient,
    kind: DeployKind,
    token: &str,
    model_id: &str,
    deploy_id: u64,
    action: Action,
) -> Result<Reply<Record>> {
    let call = Call::new()
        .param("model_id", model_id)
        .param("segment", kind.segment())
        .param("deploy_id", deploy_id)
        .param("action", action)
        .token(token);
    acknowledged(client, &endpoint::DEPLOY_ACTION, call, "deploy_id", Value::from(deploy_id)).await
}

pub async fn delete(
    client: &HubClient,
    kind: DeployKind,
    token: &str,
    model_id: &str,
    deploy_id: u64,
) -> Result<Reply<Record>> {
    let call = Call::new()
        .param("model_id", model_id)
        .param("segment", kind.segment())
        .param("deploy_id", deploy_id)
        .token(token);
    acknowledged(client, &endpoint::DEPLOY_DELETE, call, "deploy_id", Value::from(deploy_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn upstream(status: &str) -> Record {
        json!({
            "id": 42,
            "deploy_name": "inference_0007",
            "model_id": "u/m",
            "status": status,
            "endpoint": "abc.space.opencsg.com",
            "secret": "x"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn running_inference_exposes_access_fields() {
        let out = DeployKind::Inference
            .status_projection("https://opencsg.com", "u/m", 42)
            .record(&upstream("Running"));
        assert_eq!(out["deploy_id"], 42);
        assert_eq!(
            out["web_access_url"],
            "https://opencsg.com/endpoints/u/m/42?tab=summary"
        );
        assert_eq!(
            out["api_access_endpoint"],
            "https://abc.space.opencsg.com/v1/chat/completions"
        );
        assert!(out["test_command"].as_str().unwrap().contains("u/m"));
        assert!(!out.contains_key("secret"));
    }

    #[test]
    fn stopped_inference_omits_access_fields() {
        let out = DeployKind::Inference
            .status_projection("https://opencsg.com", "u/m", 42)
            .record(&upstream("Stopped"));
        assert_eq!(out["status"], "Stopped");
        for key in ["web_access_url", "api_access_endpoint", "test_command"] {
            assert!(!out.contains_key(key), "{key} should be omitted");
        }
    }

    #[test]
    fn running_finetune_links_to_the_instance_page() {
        let out = DeployKind::Finetune
            .status_projection("https://opencsg.com", "u/m", 42)
            .record(&upstream("RUNNING"));
        assert_eq!(
            out["web_access_url"],
            "https://opencsg.com/finetune/u/m/inference_0007/42?tab=pages"
        );
        assert!(!out.contains_key("api_access_endpoint"));
    }

    #[test]
    fn model_id_falls_back_to_the_requested_model() {
        let mut item = upstream("Stopped");
        item.remove("model_id");
        let out = DeployKind::Inference
            .status_projection("https://opencsg.com", "u/m", 42)
            .record(&item);
        assert_eq!(out["model_id"], "u/m");
    }

    #[test]
    fn action_renders_as_path_segment() {
        assert_eq!(Action::Stop.to_string(), "stop");
        assert_eq!(DeployKind::Finetune.to_string(), "finetune");
    }
}
