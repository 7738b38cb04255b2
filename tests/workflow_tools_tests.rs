mod common;

use std::collections::HashSet;

use common::{MockHub, TOKEN, USERNAME, WEB};
use csghub_mcp::tools::{Service, ToolRegistry};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn dataflow_job_detail_reads_the_job_envelope() {
    let hub = MockHub::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dataflow/jobs/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job": {
                "job_id": 12,
                "job_name": "dedup",
                "status": "Finished",
                "date_finish": "2024-05-01T10:00:00Z",
                "export_branch_name": "dedup-out",
                "dslText": "..."
            }
        })))
        .mount(&hub.server)
        .await;

    let outcome = hub
        .invoke(
            "get_dataflow_job_detail_by_job_id",
            json!({"token": TOKEN, "job_id": 12}),
        )
        .await;

    assert!(!outcome.is_error);
    assert_eq!(
        outcome.json(),
        json!({
            "job_id": 12,
            "job_name": "dedup",
            "status": "Finished",
            "finished_at": "2024-05-01T10:00:00Z",
            "output_branch_name": "dedup-out",
            "web_access_url": format!(
                "{WEB}/datapipelines/dataflowInfo?id=12&type=pipeline&jobType=data_refine"
            )
        })
    );
}

#[tokio::test]
async fn dataflow_jobs_page_with_page_size() {
    let hub = MockHub::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dataflow/jobs"))
        .and(query_param("page_size", "5"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"job_id": 1, "job_name": "a", "job_type": "data_refine", "status": "Queued", "owner": "x"}]
        })))
        .expect(1)
        .mount(&hub.server)
        .await;

    let outcome = hub
        .invoke(
            "list_user_dataflow_jobs",
            json!({"token": TOKEN, "per": 5, "page": 2}),
        )
        .await;

    assert_eq!(
        outcome.json(),
        json!([{"job_id": 1, "job_name": "a", "job_type": "data_refine", "status": "Queued"}])
    );
}

#[tokio::test]
async fn create_dataflow_job_uses_the_template_pipeline() {
    let hub = MockHub::start().await;
    hub.mount_identity().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dataflow/algo_templates/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 4, "name": "clean", "type": "data_refine", "dslText": "pipeline: []"}
        })))
        .mount(&hub.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/dataflow/jobs/pipeline"))
        .and(body_partial_json(json!({
            "name": "clean",
            "type": "data_refine",
            "owner": USERNAME,
            "repo_id": "alice/ds1",
            "branch": "main",
            "text_keys": "text",
            "dslText": "pipeline: []",
            "is_run": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"job_id": 30, "job_name": "clean", "status": "Queued"}
        })))
        .expect(1)
        .mount(&hub.server)
        .await;

    let outcome = hub
        .invoke(
            "create_dataflow_job",
            json!({"token": TOKEN, "dataset_id": "alice/ds1", "template_id": 4}),
        )
        .await;

    assert!(!outcome.is_error);
    assert_eq!(
        outcome.json(),
        json!({
            "job_id": 30,
            "job_name": "clean",
            "status": "Queued",
            "web_access_url": format!("{WEB}/datapipelines/dataflowInfo?id=30&type=pipeline")
        })
    );
}

#[tokio::test]
async fn evaluation_task_defaults_to_shared_resources() {
    let hub = MockHub::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/evaluations"))
        .and(body_partial_json(json!({
            "task_name": "mmlu-run",
            "model_ids": ["alice/m1"],
            "datasets": ["opencompass/mmlu", "opencompass/ceval"],
            "runtime_framework_id": 3,
            "share_mode": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 5, "task_name": "mmlu-run", "status": "Pending", "secret": "x"}
        })))
        .expect(1)
        .mount(&hub.server)
        .await;

    let outcome = hub
        .invoke(
            "create_evaluation_task",
            json!({
                "token": TOKEN,
                "task_name": "mmlu-run",
                "model_ids": ["alice/m1"],
                "datasets": "opencompass/mmlu, opencompass/ceval",
                "runtime_framework_id": 3
            }),
        )
        .await;

    assert!(!outcome.is_error);
    assert_eq!(
        outcome.json(),
        json!({"id": 5, "task_name": "mmlu-run", "status": "Pending"})
    );
    let requests = hub.server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert!(body.get("resource_id").is_none());
}

#[tokio::test]
async fn evaluation_detail_flattens_repo_references() {
    let hub = MockHub::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/evaluations/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 5,
                "task_name": "mmlu-run",
                "status": "Succeeded",
                "repo_ids": ["alice/m1"],
                "datasets": [
                    {"repo_id": "opencompass/mmlu", "tags": [{"name": "en"}]},
                    {"repo_id": "opencompass/ceval"}
                ],
                "result_url": "https://r/5.json"
            }
        })))
        .mount(&hub.server)
        .await;

    let outcome = hub
        .invoke("get_evaluation_by_id", json!({"token": TOKEN, "id": 5}))
        .await;

    assert!(!outcome.is_error);
    let doc = outcome.json();
    assert_eq!(
        doc,
        json!({
            "id": 5,
            "task_name": "mmlu-run",
            "status": "Succeeded",
            "repo_ids": "alice/m1",
            "datasets": "opencompass/mmlu,opencompass/ceval",
            "result_url": "https://r/5.json"
        })
    );
    assert!(doc
        .as_object()
        .unwrap()
        .values()
        .all(|v| !v.is_array() && !v.is_object()));
}

#[tokio::test]
async fn evaluation_models_are_found_by_runtime_tag() {
    let hub = MockHub::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/models"))
        .and(query_param("tag_category", "runtime_framework"))
        .and(query_param("tag_name", "opencompass"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"path": "a/m", "name": "m", "description": "d", "downloads": 1}]
        })))
        .expect(1)
        .mount(&hub.server)
        .await;

    let outcome = hub
        .invoke("query_evaluation_models", json!({"token": TOKEN}))
        .await;

    assert_eq!(
        outcome.json(),
        json!([{"model_id": "a/m", "name": "m", "description": "d"}])
    );
}

#[test]
fn full_catalogue_has_unique_titled_tools() {
    let registry = ToolRegistry::for_services(&Service::all());
    let names = registry.names();
    let unique: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(unique.len(), names.len());

    for expected in [
        "list_user_models",
        "create_dataset_repo",
        "get_code_detail_by_path",
        "deploy_space_app",
        "list_inference_services",
        "deploy_finetune_by_model_id",
        "deploy_finetune_job",
        "create_evaluation_task",
        "create_dataflow_job",
        "check_model_by_model_id",
        "list_clusters",
    ] {
        assert!(registry.get(expected).is_some(), "missing {expected}");
    }
    assert!(registry.tools().iter().all(|t| t.title().is_some()));
}

#[test]
fn services_limit_the_catalogue() {
    let registry = ToolRegistry::for_services(&[Service::Dataflow]);
    assert!(registry.get("create_dataflow_job").is_some());
    assert!(registry.get("check_dataset_by_dataset_id").is_some());
    assert!(registry.get("create_model").is_none());
}
