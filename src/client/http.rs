//! HTTP client construction and auth header utilities.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{HubError, Result};

/// Upper bound for any single upstream request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the reqwest client used for all upstream calls.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .pool_max_idle_per_host(10)
        .user_agent(concat!("csghub-mcp/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| HubError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// JSON headers, plus `Authorization: Bearer` when a credential is present.
pub fn bearer_headers(credential: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(credential) = credential.filter(|c| !c.is_empty()) {
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {credential}")) {
            headers.insert(AUTHORIZATION, val);
        }
    }
    headers
}

/// Join the API base and a rendered path. Each `/`-separated segment is
/// percent-encoded, so `?`, `#` and spaces in ids stay inside the path.
pub fn endpoint_url(base: &str, path: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(base)
        .map_err(|e| HubError::Configuration(format!("invalid API endpoint {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| HubError::Configuration(format!("API endpoint {base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(path.trim_start_matches('/').split('/'));
    Ok(url)
}

/// Decode a success body. An empty body is `Null`; anything else must be
/// JSON.
pub fn parse_body(text: &str) -> Result<serde_json::Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(trimmed)?)
}
