//! Bounded polling for asynchronous generation jobs.
//!
//! A submitted job is polled at a fixed interval until the backend
//! reports its task group ready. Transient problems -- non-success
//! statuses, network errors -- are counted against the attempt budget
//! and never fail the poll early; only exhausting the budget does.

use std::time::Duration;

use crate::api::BackendApi;
use crate::error::BackendError;

/// Tunable polling parameters.
pub struct PollConfig {
    /// Delay before every attempt, including the first.
    pub interval: Duration,
    /// Attempt budget; exhausting it fails with
    /// [`BackendError::PollTimeout`].
    pub max_attempts: u32,
}

impl Default for PollConfig {
    /// 120 attempts at 5 s spacing -- a 10 minute budget.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

/// Poll a task group until ready.
///
/// Returns the urls of successful tasks in backend order -- possibly
/// none, when every task in the group failed. Does not observe
/// cancellation: an in-flight unit of work always runs to completion
/// or timeout, and no further network calls happen after either.
pub async fn poll_job(
    api: &BackendApi,
    job_id: &str,
    config: &PollConfig,
) -> Result<Vec<String>, BackendError> {
    for attempt in 1..=config.max_attempts {
        tokio::time::sleep(config.interval).await;

        let status = match api.task_group(job_id).await {
            Ok(status) => status,
            Err(e) => {
                // Transient; keep polling until the budget runs out.
                tracing::warn!(job_id, attempt, error = %e, "Polling attempt failed");
                continue;
            }
        };

        if let Some(urls) = status.ready_urls() {
            tracing::info!(job_id, attempt, count = urls.len(), "Job ready");
            return Ok(urls);
        }

        tracing::debug!(job_id, attempt, "Job not ready yet");
    }

    Err(BackendError::PollTimeout {
        job_id: job_id.to_string(),
        attempts: config.max_attempts,
    })
}
