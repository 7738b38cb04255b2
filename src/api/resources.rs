//! Compute resources, clusters and runtime frameworks.

use std::collections::HashMap;

use serde_json::{json, Value};

use super::try_reply;
use crate::client::{endpoint, Call, HubClient, Reply};
use crate::error::Result;
use crate::projection::{flag, format_price, is_running, str_field, Projection, Record};

/// Hub deployment categories. The wire value is the discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DeployType {
    Space = 0,
    Inference = 1,
    Finetune = 2,
    Serverless = 3,
    Evaluation = 4,
    Notebook = 5,
    FinetuneJob = 6,
}

impl DeployType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

fn is_available(item: &Record) -> bool {
    item.get("is_available") == Some(&Value::Bool(true))
}

fn is_gpu(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("gpu"))
}

/// Available resources of one cluster: `[{id, type, name}]`.
pub async fn available(
    client: &HubClient,
    cluster_id: &str,
    deploy_type: DeployType,
) -> Result<Reply<Vec<Record>>> {
    let call = Call::new()
        .query("cluster_id", cluster_id)
        .query("deploy_type", deploy_type.code());
    let envelope = try_reply!(client.call(&endpoint::SPACE_RESOURCES, call).await?);
    let projection = Projection::new()
        .field("id")
        .field("type")
        .field("name")
        .keep_if(is_available);
    Ok(Reply::Ok(projection.list(envelope.items())))
}

/// Available resources of one cluster with cluster and price columns.
pub async fn available_priced(
    client: &HubClient,
    cluster_id: &str,
    cluster_name: &str,
    deploy_type: DeployType,
) -> Result<Reply<Vec<Record>>> {
    let call = Call::new()
        .query("cluster_id", cluster_id)
        .query("deploy_type", deploy_type.code());
    let envelope = try_reply!(client.call(&endpoint::SPACE_RESOURCES, call).await?);

    let (id, name) = (cluster_id.to_string(), cluster_name.to_string());
    let projection = Projection::new()
        .derive("cluster_name", move |_| Some(json!(name)))
        .derive("cluster_id", move |_| Some(json!(id)))
        .field("id")
        .field("type")
        .field("name")
        .derive("price", |item| Some(json!(format_price(item))))
        .keep_if(is_available);
    Ok(Reply::Ok(projection.list(envelope.items())))
}

/// Cluster id to region.
pub async fn cluster_regions(
    client: &HubClient,
    token: &str,
) -> Result<Reply<HashMap<String, String>>> {
    let envelope = try_reply!(
        client
            .call(&endpoint::CLUSTERS, Call::new().token(token))
            .await?
    );
    let regions = envelope
        .items()
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|c| {
            let id = str_field(c, "cluster_id")?;
            let region = str_field(c, "region").unwrap_or_default();
            Some((id.to_string(), region.to_string()))
        })
        .collect();
    Ok(Reply::Ok(regions))
}

/// Clusters currently running: `[{cluster_id, region, status}]`.
pub async fn running_clusters(client: &HubClient, token: &str) -> Result<Reply<Vec<Record>>> {
    let envelope = try_reply!(
        client
            .call(&endpoint::CLUSTERS, Call::new().token(token))
            .await?
    );
    let projection = Projection::new()
        .field("cluster_id")
        .field("region")
        .field("status")
        .keep_if(|c| is_running(str_field(c, "status")));
    Ok(Reply::Ok(projection.list(envelope.items())))
}

/// Enabled framework versions for a model: `[{id, frame_name, compute_type}]`.
///
/// With `gpu_only`, frameworks whose `compute_types` lacks `gpu` are skipped.
pub async fn model_frameworks(
    client: &HubClient,
    token: Option<&str>,
    model_id: &str,
    deploy_type: DeployType,
    gpu_only: bool,
) -> Result<Reply<Vec<Record>>> {
    let mut call = Call::new()
        .param("model_id", model_id)
        .query("deploy_type", deploy_type.code());
    if let Some(token) = token {
        call = call.token(token);
    }
    let envelope = try_reply!(client.call(&endpoint::MODEL_FRAMEWORKS, call).await?);

    let version = Projection::new()
        .field("id")
        .field("frame_name")
        .field("compute_type")
        .keep_if(|v| flag(v, "enabled"));

    let frameworks = envelope
        .items()
        .iter()
        .filter_map(Value::as_object)
        .filter(|fw| !gpu_only || supports_gpu(fw))
        .flat_map(|fw| {
            fw.get("versions")
                .and_then(Value::as_array)
                .map(|versions| version.list(versions))
                .unwrap_or_default()
        })
        .collect();
    Ok(Reply::Ok(frameworks))
}

fn supports_gpu(framework: &Record) -> bool {
    framework
        .get("compute_types")
        .and_then(Value::as_array)
        .is_some_and(|types| types.iter().any(|t| is_gpu(t.as_str())))
}

/// Enabled GPU frameworks for a deploy type: `[{id, frame_name}]`.
pub async fn gpu_frameworks(
    client: &HubClient,
    token: &str,
    deploy_type: DeployType,
) -> Result<Reply<Vec<Record>>> {
    let call = Call::new()
        .query("deploy_type", deploy_type.code())
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::RUNTIME_FRAMEWORKS, call).await?);
    let projection = Projection::new()
        .field("id")
        .field("frame_name")
        .keep_if(|fw| is_gpu(str_field(fw, "compute_type")) && flag(fw, "enabled"));
    Ok(Reply::Ok(projection.list(envelope.items())))
}

/// Resources and frameworks for a deployment, as one record.
pub fn conditions(resources: Vec<Record>, frameworks: Vec<Record>) -> Record {
    let mut out = Record::new();
    out.insert("resources_data".to_string(), json!(resources));
    out.insert("runtime_frameworks_data".to_string(), json!(frameworks));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_type_codes_match_the_hub() {
        assert_eq!(DeployType::Space.code(), 0);
        assert_eq!(DeployType::Inference.code(), 1);
        assert_eq!(DeployType::Evaluation.code(), 4);
        assert_eq!(DeployType::FinetuneJob.code(), 6);
        assert_eq!(DeployType::FinetuneJob.to_string(), "finetune_job");
    }

    #[test]
    fn availability_requires_literal_true() {
        let yes = json!({"is_available": true});
        let no = json!({"is_available": 1});
        assert!(is_available(yes.as_object().unwrap()));
        assert!(!is_available(no.as_object().unwrap()));
    }

    #[test]
    fn gpu_support_is_case_insensitive() {
        let fw = json!({"compute_types": ["cpu", "GPU"]});
        assert!(supports_gpu(fw.as_object().unwrap()));
        let fw = json!({"compute_types": ["cpu"]});
        assert!(!supports_gpu(fw.as_object().unwrap()));
    }
}
