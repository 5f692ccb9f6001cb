//! HTTP client for the hub's REST API.
//!
//! Every call is a single attempt with a per-request timeout. Failures are
//! logged at debug level and collapsed to `None`; the poller and the
//! presentation layer treat `None` as "no information this round".

use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mcphub_core::settings::{DEFAULT_READ_TIMEOUT_SECS, DEFAULT_WRITE_TIMEOUT_SECS};
use mcphub_core::{
    ActionResponse, DEFAULT_HUB_PORT, HealthSnapshot, HubApiPort, ServerList, ServerSummary,
    Settings,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

/// Connection parameters for [`HubClient`].
#[derive(Debug, Clone)]
pub struct HubClientConfig {
    pub host: String,
    pub port: u16,
    /// Timeout for `GET` requests.
    pub read_timeout: Duration,
    /// Timeout for `POST` requests.
    pub write_timeout: Duration,
}

impl Default for HubClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_HUB_PORT,
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
        }
    }
}

impl HubClientConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            port: settings.effective_port(),
            read_timeout: settings.read_timeout(),
            write_timeout: settings.write_timeout(),
            ..Self::default()
        }
    }
}

/// [`HubApiPort`] over HTTP.
///
/// The target port can be changed at any time; in-flight requests keep the
/// port they started with.
#[derive(Debug)]
pub struct HubClient {
    http: Client,
    host: String,
    port: AtomicU16,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl HubClient {
    /// Build a client. Proxy environment variables are ignored since the hub
    /// is always local.
    pub fn new(config: HubClientConfig) -> reqwest::Result<Self> {
        let http = Client::builder().no_proxy().build()?;
        Ok(Self {
            http,
            host: config.host,
            port: AtomicU16::new(config.port),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        })
    }

    /// Base URL for the currently targeted port, e.g. `http://127.0.0.1:3000`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let request = self.http.get(self.url(path)).timeout(self.read_timeout);
        Self::send(request, path).await
    }

    async fn post_json(&self, path: &str, body: Value, query: &[(&str, &str)]) -> Option<Value> {
        let mut request = self
            .http
            .post(self.url(path))
            .timeout(self.write_timeout)
            .json(&body);
        if !query.is_empty() {
            request = request.query(query);
        }
        Self::send(request, path).await
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder, path: &str) -> Option<T> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(%path, error = %e, "hub request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%path, %status, "hub returned non-success status");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(%path, error = %e, "hub response was not valid JSON");
                None
            }
        }
    }
}

#[async_trait]
impl HubApiPort for HubClient {
    async fn health(&self) -> Option<HealthSnapshot> {
        self.get_json("/api/health").await
    }

    async fn list_servers(&self) -> Option<Vec<ServerSummary>> {
        self.get_json::<ServerList>("/api/servers")
            .await
            .map(ServerList::into_vec)
    }

    async fn start_server(&self, name: &str) -> Option<ActionResponse> {
        self.post_json("/api/servers/start", json!({ "server_name": name }), &[])
            .await
    }

    async fn stop_server(&self, name: &str, disable: bool) -> Option<ActionResponse> {
        let query: &[(&str, &str)] = if disable { &[("disable", "true")] } else { &[] };
        self.post_json("/api/servers/stop", json!({ "server_name": name }), query)
            .await
    }

    async fn refresh_server(&self, name: &str) -> Option<ActionResponse> {
        self.post_json("/api/servers/refresh", json!({ "server_name": name }), &[])
            .await
    }

    async fn restart_hub(&self) -> Option<ActionResponse> {
        self.post_json("/api/restart", json!({}), &[]).await
    }

    fn set_port(&self, port: u16) {
        self.port.store(port, Ordering::Relaxed);
    }

    fn port(&self) -> u16 {
        self.port.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_follows_port_changes() {
        let client = HubClient::new(HubClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:3000");

        client.set_port(8123);
        assert_eq!(client.port(), 8123);
        assert_eq!(client.url("/api/health"), "http://127.0.0.1:8123/api/health");
    }

    #[test]
    fn config_takes_timeouts_from_settings() {
        let settings = Settings {
            port: Some(4100),
            read_timeout_secs: Some(2),
            ..Settings::default()
        };
        let config = HubClientConfig::from_settings(&settings);
        assert_eq!(config.port, 4100);
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert_eq!(
            config.write_timeout,
            Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS)
        );
    }

    #[tokio::test]
    async fn unreachable_hub_yields_none() {
        // Bind then drop a listener so the port is very likely closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = HubClient::new(HubClientConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..HubClientConfig::default()
        })
        .unwrap();

        assert!(client.health().await.is_none());
        assert!(client.start_server("files").await.is_none());
    }
}
