//! Dataflow pipelines: algorithm templates and the jobs built from them.

use serde_json::{json, Value};

use super::{acknowledged, random_suffix, try_reply, Page};
use crate::client::{endpoint, Call, HubClient, Reply};
use crate::error::{HubError, Result};
use crate::projection::{str_field, web_url, Projection, Record};

pub const DEFAULT_JOB_TYPE: &str = "data_refine";
pub const DEFAULT_TEXT_KEYS: &str = "text";

fn job_url(web_endpoint: &str, job_id: &Value, job_type: Option<&str>) -> String {
    let id = match job_id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut url = format!(
        "{}?id={id}&type=pipeline",
        web_url(web_endpoint, &["datapipelines", "dataflowInfo"])
    );
    if let Some(job_type) = job_type {
        url.push_str("&jobType=");
        url.push_str(job_type);
    }
    url
}

fn template_projection() -> Projection {
    Projection::new()
        .rename("id", "template_id")
        .rename("name", "template_name")
        .rename("type", "template_type")
}

/// Jobs visible to the token owner: `[{job_id, job_name, job_type, status}]`.
pub async fn list(client: &HubClient, token: &str, page: Page) -> Result<Reply<Vec<Record>>> {
    let call = Call::new()
        .page(page.size, page.number)
        .query("query", "")
        .token(token);
    let envelope = try_reply!(client.call(&endpoint::DATAFLOW_JOBS, call).await?);
    let projection = Projection::new()
        .field("job_id")
        .field("job_name")
        .field("job_type")
        .field("status");
    Ok(Reply::Ok(projection.list(envelope.items())))
}

/// Job detail. The payload lives under `job`, not `data`.
pub async fn detail(
    client: &HubClient,
    token: &str,
    job_id: u64,
    job_type: &str,
) -> Result<Reply<Record>> {
    let call = Call::new().param("job_id", job_id).token(token);
    let envelope = try_reply!(client.call(&endpoint::DATAFLOW_JOB, call).await?);

    let web = client.config().web_endpoint().to_string();
    let job_type = job_type.to_string();
    let projection = Projection::new()
        .field("job_id")
        .field("job_name")
        .field("status")
        .rename("date_finish", "finished_at")
        .rename("export_branch_name", "output_branch_name")
        .derive("web_access_url", move |_| {
            Some(json!(job_url(&web, &Value::from(job_id), Some(job_type.as_str()))))
        });
    Ok(Reply::Ok(projection.detail(envelope.object())))
}

/// Algorithm templates: `[{template_id, template_name, template_type}]`.
pub async fn templates(client: &HubClient, token: &str, page: Page) -> Result<Reply<Vec<Record>>> {
    let call = Call::new().page(page.size, page.number).token(token);
    let envelope = try_reply!(client.call(&endpoint::DATAFLOW_TEMPLATES, call).await?);
    Ok(Reply::Ok(
        template_projection().list(envelope.items_at(&["data", "templates"])),
    ))
}

/// A template including its pipeline DSL.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub kind: String,
    pub dsl_text: String,
}

pub async fn template_by_id(client: &HubClient, token: &str, template_id: u64) -> Result<Reply<Template>> {
    let call = Call::new().param("template_id", template_id).token(token);
    let envelope = try_reply!(client.call(&endpoint::DATAFLOW_TEMPLATE, call).await?);
    let data = envelope
        .object()
        .ok_or_else(|| HubError::InvalidArgument(format!("template {template_id} not found")))?;
    let text = |key: &str| str_field(data, key).unwrap_or_default().to_string();
    Ok(Reply::Ok(Template {
        name: text("name"),
        kind: text("type"),
        dsl_text: text("dslText"),
    }))
}

/// Source dataset of a new job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSource<'a> {
    pub dataset_id: &'a str,
    pub branch: &'a str,
    pub text_keys: &'a str,
}

/// Look up the template, then start a pipeline job over the dataset.
pub async fn create(
    client: &HubClient,
    token: &str,
    owner: &str,
    template_id: u64,
    source: JobSource<'_>,
) -> Result<Reply<Record>> {
    let template = try_reply!(template_by_id(client, token, template_id).await?);
    let body = json!({
        "name": template.name,
        "type": template.kind,
        "description": "",
        "owner": owner,
        "project_name": format!("job-{}", random_suffix()),
        "repo_id": source.dataset_id,
        "branch": source.branch,
        "text_keys": source.text_keys,
        "dataset_path": "",
        "export_path": "",
        "is_run": true,
        "process": [],
        "dslText": template.dsl_text,
    });
    let call = Call::new().json(body).token(token);
    let envelope = try_reply!(client.call(&endpoint::DATAFLOW_PIPELINE_CREATE, call).await?);

    let web = client.config().web_endpoint().to_string();
    let projection = Projection::new()
        .field("job_id")
        .field("job_name")
        .field("status")
        .derive("web_access_url", move |item| {
            item.get("job_id").map(|id| json!(job_url(&web, id, None)))
        });
    Ok(Reply::Ok(projection.detail(envelope.object())))
}

pub async fn delete(client: &HubClient, token: &str, job_id: u64) -> Result<Reply<Record>> {
    let call = Call::new().param("job_id", job_id).token(token);
    acknowledged(client, &endpoint::DATAFLOW_JOB_DELETE, call, "job_id", Value::from(job_id)).await
}
