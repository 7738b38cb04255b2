//! Hub endpoint configuration (env > defaults).

use std::fmt;

/// Default API server.
pub const DEFAULT_API_ENDPOINT: &str = "https://hub.opencsg.com";
/// Default web portal, used to build browser links.
pub const DEFAULT_WEB_ENDPOINT: &str = "https://opencsg.com";
/// Default compute cluster for deployments.
pub const DEFAULT_CLUSTER_ID: &str = "ab45d3ba-a2ff-466e-887a-b2e5c0c070c5";

pub const ENV_API_ENDPOINT: &str = "CSGHUB_SERVER_ENDPOINT";
pub const ENV_WEB_ENDPOINT: &str = "CSGHUB_WEB_ENDPOINT";
pub const ENV_API_KEY: &str = "CSGHUB_SERVER_API_TOKEN";
pub const ENV_CLUSTER_ID: &str = "CLUSTER_ID";

/// Resolved hub configuration.
///
/// Immutable value data: resolve it with [`HubConfig::from_env`] (cheap, no
/// caching) or build it explicitly with the `with_*` methods.
#[derive(Clone, PartialEq, Eq)]
pub struct HubConfig {
    api_endpoint: String,
    web_endpoint: String,
    api_key: Option<String>,
    cluster_ids: Vec<String>,
}

impl fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConfig")
            .field("api_endpoint", &self.api_endpoint)
            .field("web_endpoint", &self.web_endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("cluster_ids", &self.cluster_ids)
            .finish()
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            web_endpoint: DEFAULT_WEB_ENDPOINT.to_string(),
            api_key: None,
            cluster_ids: vec![DEFAULT_CLUSTER_ID.to_string()],
        }
    }
}

impl HubConfig {
    /// Load from environment variables, falling back to the fixed defaults.
    ///
    /// A `.env` file in the working directory is honoured when present.
    /// Missing or empty variables are never an error.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_endpoint: non_empty(ENV_API_ENDPOINT)
                .map(|v| trim_endpoint(&v))
                .unwrap_or(defaults.api_endpoint),
            web_endpoint: non_empty(ENV_WEB_ENDPOINT)
                .map(|v| trim_endpoint(&v))
                .unwrap_or(defaults.web_endpoint),
            api_key: non_empty(ENV_API_KEY),
            cluster_ids: non_empty(ENV_CLUSTER_ID)
                .map(|v| split_cluster_ids(&v))
                .filter(|ids| !ids.is_empty())
                .unwrap_or(defaults.cluster_ids),
        }
    }

    pub fn with_api_endpoint(mut self, url: impl Into<String>) -> Self {
        self.api_endpoint = trim_endpoint(&url.into());
        self
    }

    pub fn with_web_endpoint(mut self, url: impl Into<String>) -> Self {
        self.web_endpoint = trim_endpoint(&url.into());
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_cluster_ids(mut self, ids: Vec<String>) -> Self {
        self.cluster_ids = ids;
        self
    }

    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    pub fn web_endpoint(&self) -> &str {
        &self.web_endpoint
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn cluster_ids(&self) -> &[String] {
        &self.cluster_ids
    }

    /// Cluster used for single-cluster deployments (inference, finetune).
    pub fn primary_cluster(&self) -> &str {
        self.cluster_ids
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_CLUSTER_ID)
    }
}

fn trim_endpoint(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn split_cluster_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config = HubConfig::from_lookup(lookup(&[]));
        assert_eq!(config, HubConfig::default());
        assert_eq!(config.api_endpoint(), DEFAULT_API_ENDPOINT);
        assert_eq!(config.api_key(), None);
        assert_eq!(config.primary_cluster(), DEFAULT_CLUSTER_ID);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = HubConfig::from_lookup(lookup(&[
            (ENV_API_ENDPOINT, "https://hub.example.test/"),
            (ENV_WEB_ENDPOINT, "https://web.example.test"),
            (ENV_API_KEY, "svc-key"),
        ]));
        assert_eq!(config.api_endpoint(), "https://hub.example.test");
        assert_eq!(config.web_endpoint(), "https://web.example.test");
        assert_eq!(config.api_key(), Some("svc-key"));
    }

    #[test]
    fn empty_values_are_treated_as_absent() {
        let config = HubConfig::from_lookup(lookup(&[(ENV_API_KEY, ""), (ENV_API_ENDPOINT, "  ")]));
        assert_eq!(config.api_key(), None);
        assert_eq!(config.api_endpoint(), DEFAULT_API_ENDPOINT);
    }

    #[test]
    fn cluster_ids_split_on_commas() {
        let config = HubConfig::from_lookup(lookup(&[(ENV_CLUSTER_ID, " c1 , ,c2")]));
        assert_eq!(config.cluster_ids(), ["c1".to_string(), "c2".to_string()]);
        assert_eq!(config.primary_cluster(), "c1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = HubConfig::default().with_api_key(Some("secret".into()));
        assert!(!format!("{config:?}").contains("secret"));
    }
}
