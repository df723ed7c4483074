// ABOUTME: HTTP client for the Optimizely v2 REST API: experiment create/update
// ABOUTME: and event listing, with bearer auth and upstream error mapping.

use serde_json::Value;

use optly_core::ToolError;

use crate::response::ApiBody;

pub const DEFAULT_BASE_URL: &str = "https://api.optimizely.com";

const SERVICE: &str = "Optimizely API";

/// Thin client over the Optimizely experimentation API. One instance is
/// shared across requests; per-call state is limited to the bearer token.
pub struct OptimizelyClient {
    client: reqwest::Client,
    base_url: String,
}

impl OptimizelyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Build the event-listing URL with its query parameters.
    pub fn events_url(&self, project_id: i64, per_page: u32) -> String {
        format!(
            "{}/v2/events?project_id={}&per_page={}&include_classic=false",
            self.base_url, project_id, per_page
        )
    }

    /// POST /v2/experiments — create an experiment.
    pub async fn create_experiment(&self, token: &str, body: &Value) -> Result<Value, ToolError> {
        let url = format!("{}/v2/experiments", self.base_url);
        tracing::debug!(%url, "creating experiment");
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        Self::handle(response).await
    }

    /// PATCH /v2/experiments/{id} — update an existing experiment.
    pub async fn update_experiment(
        &self,
        token: &str,
        experiment_id: i64,
        body: &Value,
    ) -> Result<Value, ToolError> {
        let url = format!("{}/v2/experiments/{}", self.base_url, experiment_id);
        tracing::debug!(%url, "updating experiment");
        let response = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        Self::handle(response).await
    }

    /// GET /v2/events — list events for a project.
    pub async fn list_events(
        &self,
        token: &str,
        project_id: i64,
        per_page: u32,
    ) -> Result<Value, ToolError> {
        let url = self.events_url(project_id, per_page);
        tracing::debug!(%url, "listing events");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        Self::handle(response).await
    }

    async fn handle(response: reqwest::Response) -> Result<Value, ToolError> {
        let status = response.status();
        let body = ApiBody::read(SERVICE, response).await?;
        if status.is_success() {
            Ok(body.into_value())
        } else {
            Err(ToolError::Upstream {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body: body.display(),
            })
        }
    }
}

fn transport(err: reqwest::Error) -> ToolError {
    ToolError::Transport {
        service: SERVICE.to_string(),
        message: err.to_string(),
    }
}
