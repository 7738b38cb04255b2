//! Upstream endpoint descriptors.
//!
//! The hub API is not uniform: some listings page with `per`, others with
//! `page_size`; some deletes answer 204; uploads answer 201; the dataflow job
//! detail wraps its payload in `job`. Each of those quirks is a field here so
//! the transport stays generic.

use reqwest::Method;
use strum::{AsRefStr, Display};

use crate::error::{HubError, Result};
use crate::projection::DATA_KEY;

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

/// How an endpoint names its page-size query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    Per,
    PageSize,
    None,
}

impl Paging {
    pub fn size_key(self) -> Option<&'static str> {
        match self {
            Self::Per => Some("per"),
            Self::PageSize => Some("page_size"),
            Self::None => None,
        }
    }
}

/// Which credential goes into the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// The caller's access token, when one was supplied.
    UserToken,
    /// The configured service key (`CSGHUB_SERVER_API_TOKEN`).
    ServiceKey,
    /// No credentials.
    Anonymous,
}

/// A single upstream REST endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub verb: Verb,
    /// Path template with `{name}` placeholders.
    pub path: &'static str,
    pub paging: Paging,
    /// Statuses treated as success.
    pub accepts: &'static [u16],
    pub auth: Auth,
    /// Envelope key holding the payload.
    pub envelope: &'static str,
}

const OK: &[u16] = &[200];
const OK_OR_NO_CONTENT: &[u16] = &[200, 204];
const OK_OR_CREATED: &[u16] = &[200, 201];

impl Endpoint {
    const fn new(verb: Verb, path: &'static str) -> Self {
        Self {
            verb,
            path,
            paging: Paging::None,
            accepts: OK,
            auth: Auth::UserToken,
            envelope: DATA_KEY,
        }
    }

    const fn get(path: &'static str) -> Self {
        Self::new(Verb::Get, path)
    }

    const fn post(path: &'static str) -> Self {
        Self::new(Verb::Post, path)
    }

    const fn put(path: &'static str) -> Self {
        Self::new(Verb::Put, path)
    }

    const fn delete(path: &'static str) -> Self {
        Self::new(Verb::Delete, path).accepting(OK_OR_NO_CONTENT)
    }

    const fn paged(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    const fn accepting(mut self, accepts: &'static [u16]) -> Self {
        self.accepts = accepts;
        self
    }

    const fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    const fn envelope(mut self, key: &'static str) -> Self {
        self.envelope = key;
        self
    }

    pub fn accepts_status(&self, status: u16) -> bool {
        self.accepts.contains(&status)
    }

    /// Substitute `{name}` placeholders. Values are inserted unencoded so
    /// `namespace/name` paths keep their slash; [`super::http::endpoint_url`]
    /// encodes each segment.
    pub fn render(&self, params: &[(&str, String)]) -> Result<String> {
        let mut path = self.path.to_string();
        for (name, value) in params {
            path = path.replace(&format!("{{{name}}}"), value);
        }
        if let Some(start) = path.find('{') {
            let end = path[start..].find('}').map_or(path.len(), |i| start + i + 1);
            return Err(HubError::InvalidArgument(format!(
                "missing path parameter {} for {}",
                &path[start..end],
                self.path
            )));
        }
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub const TOKEN_USER: Endpoint = Endpoint::get("/api/v1/token/{token}").auth(Auth::ServiceKey);
pub const ORGANIZATIONS: Endpoint = Endpoint::get("/api/v1/organizations");

// ---------------------------------------------------------------------------
// Repositories ({plural} is models, datasets, codes or spaces)
// ---------------------------------------------------------------------------

pub const USER_REPOS: Endpoint =
    Endpoint::get("/api/v1/user/{username}/{plural}").paged(Paging::Per);
pub const REPO_INDEX: Endpoint = Endpoint::get("/api/v1/{plural}").paged(Paging::Per);
pub const REPO_DETAIL: Endpoint = Endpoint::get("/api/v1/{plural}/{id}");
pub const REPO_CREATE: Endpoint = Endpoint::post("/api/v1/{plural}");
pub const REPO_DELETE: Endpoint = Endpoint::delete("/api/v1/{plural}/{id}");
pub const REPO_UPLOAD: Endpoint =
    Endpoint::post("/api/v1/{plural}/{id}/raw/{file_path}").accepting(OK_OR_CREATED);
pub const SPACE_RUN: Endpoint = Endpoint::post("/api/v1/spaces/{id}/run");

// ---------------------------------------------------------------------------
// Deployments ({segment} is run or finetune)
// ---------------------------------------------------------------------------

pub const USER_INFERENCES: Endpoint =
    Endpoint::get("/api/v1/user/{username}/run/model").paged(Paging::Per);
pub const USER_FINETUNE_INSTANCES: Endpoint =
    Endpoint::get("/api/v1/user/{username}/finetune/instances").paged(Paging::Per);
pub const DEPLOY_DETAIL: Endpoint = Endpoint::get("/api/v1/models/{model_id}/run/{deploy_id}");
pub const DEPLOY_CREATE: Endpoint = Endpoint::post("/api/v1/models/{model_id}/{segment}");
pub const DEPLOY_ACTION: Endpoint =
    Endpoint::put("/api/v1/models/{model_id}/{segment}/{deploy_id}/{action}");
pub const DEPLOY_DELETE: Endpoint =
    Endpoint::delete("/api/v1/models/{model_id}/{segment}/{deploy_id}");

// ---------------------------------------------------------------------------
// Finetune jobs
// ---------------------------------------------------------------------------

pub const USER_FINETUNE_JOBS: Endpoint =
    Endpoint::get("/api/v1/user/{username}/finetune/jobs").paged(Paging::Per);
pub const FINETUNE_JOB: Endpoint = Endpoint::get("/api/v1/finetunes/{id}");
pub const FINETUNE_JOB_CREATE: Endpoint = Endpoint::post("/api/v1/finetunes");
pub const FINETUNE_JOB_DELETE: Endpoint = Endpoint::delete("/api/v1/finetunes/{id}");

// ---------------------------------------------------------------------------
// Evaluations
// ---------------------------------------------------------------------------

pub const USER_EVALUATIONS: Endpoint =
    Endpoint::get("/api/v1/user/{username}/evaluations").paged(Paging::Per);
pub const EVALUATION: Endpoint = Endpoint::get("/api/v1/evaluations/{id}");
pub const EVALUATION_CREATE: Endpoint = Endpoint::post("/api/v1/evaluations");

// ---------------------------------------------------------------------------
// Compute resources
// ---------------------------------------------------------------------------

pub const SPACE_RESOURCES: Endpoint = Endpoint::get("/api/v1/space_resources").auth(Auth::Anonymous);
pub const CLUSTERS: Endpoint = Endpoint::get("/api/v1/cluster");
pub const MODEL_FRAMEWORKS: Endpoint =
    Endpoint::get("/api/v1/models/{model_id}/runtime_framework_v2");
pub const RUNTIME_FRAMEWORKS: Endpoint = Endpoint::get("/api/v1/models/runtime_framework");

// ---------------------------------------------------------------------------
// Dataflow
// ---------------------------------------------------------------------------

pub const DATAFLOW_JOBS: Endpoint = Endpoint::get("/api/v1/dataflow/jobs").paged(Paging::PageSize);
pub const DATAFLOW_JOB: Endpoint = Endpoint::get("/api/v1/dataflow/jobs/{job_id}").envelope("job");
pub const DATAFLOW_JOB_DELETE: Endpoint =
    Endpoint::delete("/api/v1/dataflow/jobs/{job_id}").accepting(OK);
pub const DATAFLOW_PIPELINE_CREATE: Endpoint = Endpoint::post("/api/v1/dataflow/jobs/pipeline");
pub const DATAFLOW_TEMPLATES: Endpoint =
    Endpoint::get("/api/v1/dataflow/algo_templates").paged(Paging::PageSize);
pub const DATAFLOW_TEMPLATE: Endpoint = Endpoint::get("/api/v1/dataflow/algo_templates/{template_id}");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_all_placeholders() {
        let path = DEPLOY_ACTION
            .render(&[
                ("model_id", "u/m".into()),
                ("segment", "run".into()),
                ("deploy_id", "42".into()),
                ("action", "stop".into()),
            ])
            .unwrap();
        assert_eq!(path, "/api/v1/models/u/m/run/42/stop");
    }

    #[test]
    fn render_rejects_missing_placeholder() {
        let err = REPO_DETAIL.render(&[("plural", "models".into())]).unwrap_err();
        assert!(err.to_string().contains("{id}"));
    }

    #[test]
    fn quirks_live_in_descriptors() {
        assert_eq!(DATAFLOW_JOBS.paging.size_key(), Some("page_size"));
        assert_eq!(USER_REPOS.paging.size_key(), Some("per"));
        assert_eq!(DATAFLOW_JOB.envelope, "job");
        assert!(REPO_DELETE.accepts_status(204));
        assert!(REPO_UPLOAD.accepts_status(201));
        assert!(!REPO_CREATE.accepts_status(201));
        assert_eq!(TOKEN_USER.auth, Auth::ServiceKey);
        assert_eq!(DEPLOY_ACTION.verb.to_string(), "PUT");
    }
}
