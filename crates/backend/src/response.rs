//! Typed decoding of backend responses.
//!
//! The generation endpoint answers in one of two shapes: an immediate
//! result carrying urls, or a submitted asynchronous job carrying a
//! `job_id`. The raw body is decoded into [`GenerateOutcome`] in one
//! place so the two paths stay exhaustive and independently testable,
//! instead of field-presence checks scattered across call sites.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::BackendError;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Raw generation response body. Every field is optional; decoding into
/// [`GenerateOutcome`] decides what the shape means.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponseBody {
    pub status: Option<String>,
    pub job_id: Option<String>,
    pub urls: Option<Vec<String>>,
    pub url: Option<String>,
}

/// Decoded outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The backend produced urls synchronously (possibly none).
    Immediate(Vec<String>),
    /// The backend queued an asynchronous job to poll.
    Submitted { job_id: String },
}

impl GenerateOutcome {
    /// Decode a raw body.
    ///
    /// `status == "submitted"` requires a `job_id`; a submitted answer
    /// without one is malformed. Any other shape is an immediate
    /// result: the `urls` array when present, else a single `url`, else
    /// nothing. Empty strings are dropped during normalization.
    pub fn decode(body: GenerateResponseBody) -> Result<Self, BackendError> {
        if body.status.as_deref() == Some("submitted") {
            return match body.job_id {
                Some(job_id) if !job_id.is_empty() => Ok(Self::Submitted { job_id }),
                _ => Err(BackendError::MalformedResponse(
                    "submitted response without job_id".to_string(),
                )),
            };
        }

        let urls = match (body.urls, body.url) {
            (Some(urls), _) => urls,
            (None, Some(url)) => vec![url],
            (None, None) => Vec::new(),
        };
        let urls: Vec<String> = urls.into_iter().filter(|u| !u.is_empty()).collect();
        Ok(Self::Immediate(urls))
    }
}

// ---------------------------------------------------------------------------
// Task groups
// ---------------------------------------------------------------------------

/// Status of an asynchronous task group.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskGroupStatus {
    #[serde(default)]
    pub ready: bool,
    pub results: Option<Vec<TaskResult>>,
}

/// One task entry within a group.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResult {
    pub status: Option<String>,
    pub url: Option<String>,
}

impl TaskGroupStatus {
    /// Urls of successful tasks in backend order, or `None` while the
    /// group is not ready (or reports ready without a results list --
    /// treated as not ready).
    pub fn ready_urls(&self) -> Option<Vec<String>> {
        if !self.ready {
            return None;
        }
        let results = self.results.as_ref()?;
        Some(
            results
                .iter()
                .filter(|r| r.status.as_deref() == Some("success"))
                .filter_map(|r| r.url.clone())
                .filter(|u| !u.is_empty())
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Translation and configuration reads
// ---------------------------------------------------------------------------

/// Translation response body.
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    pub output: Option<String>,
}

/// Global prompt defaults from the configuration subsystem.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub common_subject: String,
    #[serde(default)]
    pub global_style: String,
    #[serde(default)]
    pub negative_prompt: String,
}

/// Category -> specific prompt map.
#[derive(Debug, Default, Deserialize)]
pub struct PromptsResponse {
    #[serde(default)]
    pub prompts: HashMap<String, String>,
}

/// Known category names.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Model catalog entry as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiModel {
    pub model_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub provider: Option<String>,
    pub max_limit: Option<u32>,
}

/// Model catalog body.
#[derive(Debug, Default, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ApiModel>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn body(json: &str) -> GenerateResponseBody {
        serde_json::from_str(json).unwrap()
    }

    // -- GenerateOutcome::decode --

    #[test]
    fn submitted_with_job_id_decodes_to_submitted() {
        let outcome = GenerateOutcome::decode(body(
            r#"{"status":"submitted","job_id":"j-1","task_count":2}"#,
        ))
        .unwrap();
        assert_eq!(
            outcome,
            GenerateOutcome::Submitted {
                job_id: "j-1".to_string()
            }
        );
    }

    #[test]
    fn submitted_without_job_id_is_malformed() {
        let err = GenerateOutcome::decode(body(r#"{"status":"submitted"}"#)).unwrap_err();
        assert_matches!(err, BackendError::MalformedResponse(_));
    }

    #[test]
    fn urls_array_decodes_to_immediate() {
        let outcome =
            GenerateOutcome::decode(body(r#"{"urls":["a","","b"]}"#)).unwrap();
        assert_eq!(
            outcome,
            GenerateOutcome::Immediate(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn single_url_field_decodes_to_immediate() {
        let outcome = GenerateOutcome::decode(body(r#"{"url":"a"}"#)).unwrap();
        assert_eq!(outcome, GenerateOutcome::Immediate(vec!["a".to_string()]));
    }

    #[test]
    fn urls_array_wins_over_single_url() {
        let outcome =
            GenerateOutcome::decode(body(r#"{"urls":["a"],"url":"b"}"#)).unwrap();
        assert_eq!(outcome, GenerateOutcome::Immediate(vec!["a".to_string()]));
    }

    #[test]
    fn empty_body_decodes_to_empty_immediate() {
        let outcome = GenerateOutcome::decode(body("{}")).unwrap();
        assert_eq!(outcome, GenerateOutcome::Immediate(vec![]));
    }

    #[test]
    fn unknown_status_with_urls_is_immediate() {
        let outcome =
            GenerateOutcome::decode(body(r#"{"status":"done","urls":["a"]}"#)).unwrap();
        assert_eq!(outcome, GenerateOutcome::Immediate(vec!["a".to_string()]));
    }

    // -- TaskGroupStatus::ready_urls --

    #[test]
    fn not_ready_yields_none() {
        let status: TaskGroupStatus =
            serde_json::from_str(r#"{"ready":false,"results":[]}"#).unwrap();
        assert_eq!(status.ready_urls(), None);
    }

    #[test]
    fn ready_without_results_is_treated_as_not_ready() {
        let status: TaskGroupStatus = serde_json::from_str(r#"{"ready":true}"#).unwrap();
        assert_eq!(status.ready_urls(), None);
    }

    #[test]
    fn ready_filters_to_successful_urls_in_order() {
        let status: TaskGroupStatus = serde_json::from_str(
            r#"{"ready":true,"results":[
                {"status":"success","url":"a"},
                {"status":"failed","url":"x"},
                {"status":"success"},
                {"status":"success","url":"b"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            status.ready_urls(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn ready_with_no_successes_is_empty_not_none() {
        let status: TaskGroupStatus = serde_json::from_str(
            r#"{"ready":true,"results":[{"status":"failed","url":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(status.ready_urls(), Some(vec![]));
    }
}
