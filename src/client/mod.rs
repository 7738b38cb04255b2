//! Transport to the hub REST API.
//!
//! [`HubClient::call`] issues exactly one request per invocation. Statuses the
//! endpoint accepts produce an [`Envelope`]; any other status is logged and
//! handed back as an [`ErrorResult`] inside [`Reply::Failed`]. Only
//! network-level failures surface as `Err`.

pub mod endpoint;
pub mod http;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::HubConfig;
use crate::error::{ErrorResult, Result};
use crate::projection::Envelope;

pub use endpoint::{Auth, Endpoint, Paging, Verb};

/// Outcome of an upstream call that reached the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Ok(T),
    Failed(ErrorResult),
}

impl<T> Reply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Self::Ok(v) => Reply::Ok(f(v)),
            Self::Failed(e) => Reply::Failed(e),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn into_result(self) -> std::result::Result<T, ErrorResult> {
        match self {
            Self::Ok(v) => Ok(v),
            Self::Failed(e) => Err(e),
        }
    }
}

impl<T> From<ErrorResult> for Reply<T> {
    fn from(e: ErrorResult) -> Self {
        Self::Failed(e)
    }
}

/// Request parameters for one endpoint invocation.
#[derive(Debug, Clone, Default)]
pub struct Call {
    params: Vec<(&'static str, String)>,
    query: Vec<(String, String)>,
    page: Option<(u64, u64)>,
    body: Option<Value>,
    token: Option<String>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill a `{name}` path placeholder.
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Page size and page number, sent under the endpoint's paging keys.
    pub fn page(mut self, size: u64, page: u64) -> Self {
        self.page = Some((size, page));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The caller's access token for [`Auth::UserToken`] endpoints.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn query_pairs(&self, paging: Paging) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.query.len() + 2);
        if let (Some(key), Some((size, page))) = (paging.size_key(), self.page) {
            pairs.push((key.to_string(), size.to_string()));
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs.extend(self.query.iter().cloned());
        pairs
    }
}

/// Async client for the hub API.
///
/// Cheap to clone: the connection pool and configuration are shared.
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    config: Arc<HubConfig>,
}

impl HubClient {
    pub fn new(config: HubConfig) -> Result<Self> {
        Ok(Self {
            http: http::build_client()?,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Invoke one endpoint.
    pub async fn call(&self, endpoint: &Endpoint, call: Call) -> Result<Reply<Envelope>> {
        let path = endpoint.render(&call.params)?;
        let url = http::endpoint_url(self.config.api_endpoint(), &path)?;

        let credential = match endpoint.auth {
            Auth::UserToken => call.token.as_deref(),
            Auth::ServiceKey => self.config.api_key(),
            Auth::Anonymous => None,
        };

        let mut request = self
            .http
            .request(endpoint.verb.into(), url.clone())
            .headers(http::bearer_headers(credential));
        let query = call.query_pairs(endpoint.paging);
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        tracing::debug!(method = %endpoint.verb, url = %url, "calling hub API");
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if !endpoint.accepts_status(status) {
            tracing::error!(url = %url, status, body = %text, "hub API call failed");
            return Ok(Reply::Failed(ErrorResult::new(status, text)));
        }

        let body = http::parse_body(&text).inspect_err(|e| {
            tracing::error!(url = %url, status, error = %e, "hub API returned a non-JSON body");
        })?;
        Ok(Reply::Ok(Envelope::new(body).with_key(endpoint.envelope)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paging_keys_follow_the_endpoint() {
        let call = Call::new().page(10, 2).query("deploy_type", 1);
        assert_eq!(
            call.query_pairs(Paging::Per),
            vec![
                ("per".to_string(), "10".to_string()),
                ("page".to_string(), "2".to_string()),
                ("deploy_type".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(call.query_pairs(Paging::PageSize)[0].0, "page_size");
        assert_eq!(call.query_pairs(Paging::None).len(), 1);
    }

    #[test]
    fn reply_serializes_transparently() {
        let ok: Reply<Value> = Reply::Ok(serde_json::json!({"a": 1}));
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"a":1}"#);

        let failed: Reply<Value> = ErrorResult::new(404, "nope").into();
        assert!(failed.is_failed());
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"error_code":404,"error_message":"nope"}"#
        );
    }
}
