//! REST wrapper for the Easel generation backend.
//!
//! Wraps the backend HTTP surface -- generation, task-group status,
//! translation, and the read-only configuration endpoints -- using
//! [`reqwest`]. Interpretation of response shapes lives in
//! [`crate::response`]; this module only moves bytes and maps
//! non-success statuses to errors.

use std::collections::HashMap;

use easel_core::limits::ModelLimits;

use crate::error::BackendError;
use crate::request::GenerationRequest;
use crate::response::{
    ApiModel, CategoriesResponse, GenerateResponseBody, GlobalConfig, ModelsResponse,
    PromptsResponse, TaskGroupStatus, TranslateResponse,
};

/// Session correlation header attached to generation calls.
pub const HEADER_SESSION_ID: &str = "X-Session-ID";

/// User identification header attached to generation calls.
pub const HEADER_USER_ID: &str = "X-User-ID";

/// HTTP client for one backend instance.
#[derive(Clone)]
pub struct BackendApi {
    client: reqwest::Client,
    base_url: String,
}

impl BackendApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://host:8000`. A
    ///   trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across clients).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base HTTP URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit one generation request.
    ///
    /// Identity headers are attached when provided so the backend can
    /// group production records by user and session.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        session_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<GenerateResponseBody, BackendError> {
        let mut req = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(request);
        if let Some(session_id) = session_id {
            req = req.header(HEADER_SESSION_ID, session_id);
        }
        if let Some(user_id) = user_id {
            req = req.header(HEADER_USER_ID, user_id);
        }

        let response = req.send().await?;
        Self::parse_response(response).await
    }

    /// Fetch the status of an asynchronous task group.
    pub async fn task_group(&self, job_id: &str) -> Result<TaskGroupStatus, BackendError> {
        let response = self
            .client
            .get(format!("{}/api/tasks/group/{}", self.base_url, job_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Translate helper text between Chinese and English.
    ///
    /// Callers wanting the recover-to-original behavior should go
    /// through [`crate::client::GenerationClient::translate_or_original`].
    pub async fn translate(&self, text: &str) -> Result<TranslateResponse, BackendError> {
        let response = self
            .client
            .post(format!("{}/api/translate", self.base_url))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- read-only configuration ----

    /// Fetch the per-model request caps.
    pub async fn model_limits(&self) -> Result<ModelLimits, BackendError> {
        let response = self
            .client
            .get(format!("{}/api/config/limits", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the global prompt defaults.
    pub async fn global_config(&self) -> Result<GlobalConfig, BackendError> {
        let response = self
            .client
            .get(format!("{}/api/config/global", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the category -> specific prompt map.
    pub async fn prompts(&self) -> Result<HashMap<String, String>, BackendError> {
        let response = self
            .client
            .get(format!("{}/api/prompts", self.base_url))
            .send()
            .await?;

        let body: PromptsResponse = Self::parse_response(response).await?;
        Ok(body.prompts)
    }

    /// Fetch the known category names.
    pub async fn categories(&self) -> Result<Vec<String>, BackendError> {
        let response = self
            .client
            .get(format!("{}/api/categories", self.base_url))
            .send()
            .await?;

        let body: CategoriesResponse = Self::parse_response(response).await?;
        Ok(body.categories)
    }

    /// Fetch the model catalog.
    pub async fn models(&self) -> Result<Vec<ApiModel>, BackendError> {
        let response = self
            .client
            .get(format!("{}/api/models", self.base_url))
            .send()
            .await?;

        let body: ModelsResponse = Self::parse_response(response).await?;
        Ok(body.models)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. On failure, the
    /// body's `message` field is preferred for the error text, falling
    /// back to the raw body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message")?.as_str().map(str::to_string))
                .unwrap_or(body);
            let message = if message.is_empty() {
                "Backend request failed".to_string()
            } else {
                message
            };
            return Err(BackendError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
