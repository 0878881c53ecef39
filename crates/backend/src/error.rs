//! Error taxonomy for backend communication.

/// Errors surfaced by the backend client layer.
///
/// These are unit-level outcomes: the batch orchestrator logs them and
/// moves on to the next unit of work, it never aborts a run for them.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("Backend request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// A submitted job did not become ready within the attempt budget.
    #[error("Job {job_id} timed out after {attempts} polling attempts")]
    PollTimeout { job_id: String, attempts: u32 },
}
