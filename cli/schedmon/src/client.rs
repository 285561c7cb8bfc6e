//! HTTP client for the scheduler control API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use schedmon_sync::StatusSource;
use schedmon_types::{DaemonStatus, DeleteResponse, LimitKind, Scheduler, SchedulerControl};

use crate::config::Config;
use crate::error::CliError;

/// API client for the scheduler endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from config.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List all schedulers with their status.
    pub async fn list(&self) -> Result<Vec<Scheduler>, CliError> {
        self.get("/scheduler/list").await
    }

    /// Fetch the summary snapshot for one scheduler.
    pub async fn scheduler_data(&self, name: &str) -> Result<Scheduler, CliError> {
        self.get(&format!("/scheduler/data/{}", name)).await
    }

    /// Fetch the daemon status snapshot for one scheduler.
    pub async fn daemon_status(&self, name: &str) -> Result<DaemonStatus, CliError> {
        self.get(&format!("/scheduler/status/{}", name)).await
    }

    /// Start a scheduler daemon, optionally overriding its limits.
    pub async fn start(&self, control: &SchedulerControl) -> Result<Scheduler, CliError> {
        self.post("/scheduler/start", control).await
    }

    /// Stop a running scheduler. The name travels as a query parameter on
    /// this endpoint, unlike the other mutations.
    pub async fn stop(&self, name: &str) -> Result<Scheduler, CliError> {
        let url = self.url("/scheduler/stop");
        debug!(url = %url, name, "POST stop");

        let response = self
            .client
            .post(&url)
            .query(&[("name", name)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete a stopped scheduler.
    pub async fn delete(&self, name: &str) -> Result<DeleteResponse, CliError> {
        self.post("/scheduler/delete", &SchedulerControl::named(name))
            .await
    }

    /// Register a new scheduler without starting it.
    pub async fn add(&self, control: &SchedulerControl) -> Result<Scheduler, CliError> {
        self.post("/scheduler/add", control).await
    }

    /// Update one concurrency limit; returns the updated snapshot with the
    /// server's authoritative (possibly clamped) value.
    pub async fn set_limit(
        &self,
        name: &str,
        kind: LimitKind,
        value: u32,
    ) -> Result<Scheduler, CliError> {
        let mut body = serde_json::Map::new();
        body.insert("name".to_string(), json!(name));
        body.insert(kind.field_name().to_string(), json!(value));
        self.post(kind.endpoint(), &body).await
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body.
    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CliError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Handle a successful or error response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CliError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to parse response: {}", e)))
        } else {
            // The server puts a human-readable message in `detail`; surface
            // it verbatim, with a generic fallback.
            let error_body: ApiErrorResponse =
                response.json().await.unwrap_or_else(|_| ApiErrorResponse {
                    detail: format!("request failed with status {}", status.as_u16()),
                });
            Err(CliError::api(status.as_u16(), error_body.detail))
        }
    }
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn scheduler_data(&self, name: &str) -> anyhow::Result<Scheduler> {
        Ok(ApiClient::scheduler_data(self, name).await?)
    }

    async fn daemon_status(&self, name: &str) -> anyhow::Result<DaemonStatus> {
        Ok(ApiClient::daemon_status(self, name).await?)
    }
}

/// API error response structure.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    detail: String,
}
