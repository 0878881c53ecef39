//! Generation client: one unit of work, end to end.
//!
//! Issues a single generation call, follows the submitted-job path
//! through the poller when the backend answers asynchronously, and
//! normalizes both paths into the uniform `{urls, prompt}` result the
//! orchestrator consumes.

use easel_core::session::SessionIdentity;
use easel_core::types::GenerationResult;

use crate::api::BackendApi;
use crate::error::BackendError;
use crate::poller::{poll_job, PollConfig};
use crate::request::GenerationRequest;
use crate::response::GenerateOutcome;

/// Client for running generation units against one backend.
pub struct GenerationClient {
    api: BackendApi,
    identity: SessionIdentity,
    poll: PollConfig,
}

impl GenerationClient {
    /// Client with the default 10 minute polling budget.
    pub fn new(api: BackendApi, identity: SessionIdentity) -> Self {
        Self {
            api,
            identity,
            poll: PollConfig::default(),
        }
    }

    /// Override the polling parameters.
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// The underlying REST wrapper.
    pub fn api(&self) -> &BackendApi {
        &self.api
    }

    /// The session identity requests are tagged with.
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Run one generation request to completion.
    ///
    /// `Ok(None)` means the backend produced nothing -- a normal
    /// non-progress outcome, not a failure. The client never retries;
    /// retry policy belongs to the caller.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<GenerationResult>, BackendError> {
        let session_id = self.identity.stable_session_id();
        let body = self
            .api
            .generate(request, Some(&session_id), Some(self.identity.user_id()))
            .await?;

        let urls = match GenerateOutcome::decode(body)? {
            GenerateOutcome::Immediate(urls) => urls,
            GenerateOutcome::Submitted { job_id } => {
                tracing::info!(
                    job_id = %job_id,
                    category = %request.category,
                    "Job submitted, polling for completion",
                );
                poll_job(&self.api, &job_id, &self.poll).await?
            }
        };

        if urls.is_empty() {
            return Ok(None);
        }
        Ok(Some(GenerationResult {
            urls,
            prompt: request.prompt.clone(),
        }))
    }

    /// Translate helper text, falling back to the original on failure.
    ///
    /// Translation is assistive only: any backend or network problem
    /// logs a notice and returns `text` unchanged, never an error.
    pub async fn translate_or_original(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        match self.api.translate(text).await {
            Ok(resp) => {
                let output = resp.output.unwrap_or_default();
                let output = output.trim();
                if output.is_empty() {
                    text.to_string()
                } else {
                    output.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Translation failed, keeping original text");
                text.to_string()
            }
        }
    }
}
