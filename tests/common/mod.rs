//! Shared test helpers: a mock hub and a registry wired to it.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use csghub_mcp::client::HubClient;
use csghub_mcp::config::HubConfig;
use csghub_mcp::tools::{Service, ToolArguments, ToolContext, ToolOutcome, ToolRegistry};
use serde_json::{json, Value};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SERVICE_KEY: &str = "svc-key";
pub const TOKEN: &str = "user-token";
pub const USERNAME: &str = "alice";
pub const WEB: &str = "https://web.test";

/// A hub API served by wiremock plus a context pointing at it.
pub struct MockHub {
    pub server: MockServer,
    pub ctx: ToolContext,
    pub registry: ToolRegistry,
}

impl MockHub {
    pub async fn start() -> Self {
        Self::start_with_clusters(vec!["c1".to_string()]).await
    }

    pub async fn start_with_clusters(clusters: Vec<String>) -> Self {
        let server = MockServer::start().await;
        let ctx = context(&server.uri(), clusters);
        Self {
            server,
            ctx,
            registry: ToolRegistry::for_services(&Service::all()),
        }
    }

    /// Resolve [`TOKEN`] to [`USERNAME`] through the service-key endpoint.
    pub async fn mount_identity(&self) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/token/{TOKEN}")))
            .and(header("authorization", format!("Bearer {SERVICE_KEY}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"user_name": USERNAME}})),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn invoke(&self, tool: &str, args: Value) -> ToolOutcome {
        self.registry
            .invoke(tool, ToolArguments::new(args), &self.ctx)
            .await
            .expect("tool should be registered")
    }
}

/// Context for a hub at `api_endpoint`.
pub fn context(api_endpoint: &str, clusters: Vec<String>) -> ToolContext {
    let config = HubConfig::default()
        .with_api_endpoint(api_endpoint)
        .with_web_endpoint(WEB)
        .with_api_key(Some(SERVICE_KEY.to_string()))
        .with_cluster_ids(clusters);
    ToolContext::new(HubClient::new(config).expect("client"))
}

/// In-memory log sink for a `tracing_subscriber::fmt` subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install as the thread's default subscriber until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
