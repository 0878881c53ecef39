//! Shared domain types for the production console core.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Upstream image-generation service family, selected indirectly via
/// the model choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Aliyun Wan text-to-image family.
    Wan,
    /// Z-Image family.
    ZImage,
}

impl Provider {
    /// Wire slug used in generation requests.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Wan => "wan",
            Self::ZImage => "z_image",
        }
    }

    /// Route a model to its provider from the internal model name.
    ///
    /// Names containing `z-image` or `z_image` (case-insensitive) route
    /// to [`Provider::ZImage`]; everything else is Wan.
    pub fn infer(model_name: &str) -> Self {
        let name = model_name.to_lowercase();
        if name.contains("z-image") || name.contains("z_image") {
            Self::ZImage
        } else {
            Self::Wan
        }
    }
}

// ---------------------------------------------------------------------------
// Aspect ratios and resolutions
// ---------------------------------------------------------------------------

/// Aspect-ratio tokens accepted by the console.
pub const VALID_ASPECT_RATIOS: &[&str] =
    &["1:1", "16:9", "9:16", "4:3", "3:4", "2:3", "3:2", "21:9"];

/// Resolution labels accepted by the console.
pub const VALID_RESOLUTIONS: &[&str] = &["360p", "480p", "720p", "1080p", "2K", "4K"];

/// Pixel size sent for ratios with no dedicated mapping.
pub const DEFAULT_SIZE: &str = "1024*1024";

/// Map an aspect-ratio token to the provider's `W*H` pixel-size string.
///
/// Total over arbitrary input: unlisted ratios map to [`DEFAULT_SIZE`].
pub fn map_aspect_ratio(ratio: &str) -> &'static str {
    match ratio {
        "1:1" => "1024*1024",
        "16:9" => "1280*720",
        "9:16" => "720*1280",
        "4:3" => "1024*768",
        "3:4" => "768*1024",
        "2:3" => "832*1216",
        "3:2" => "1216*832",
        "21:9" => "1536*640",
        _ => DEFAULT_SIZE,
    }
}

/// Validate that an aspect-ratio token is one of the known values.
pub fn validate_aspect_ratio(ratio: &str) -> Result<(), CoreError> {
    if VALID_ASPECT_RATIOS.contains(&ratio) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown aspect ratio '{ratio}'. Must be one of: {}",
            VALID_ASPECT_RATIOS.join(", ")
        )))
    }
}

/// Validate that a resolution label is one of the known values.
pub fn validate_resolution(resolution: &str) -> Result<(), CoreError> {
    if VALID_RESOLUTIONS.contains(&resolution) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown resolution '{resolution}'. Must be one of: {}",
            VALID_RESOLUTIONS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// A selectable generation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Display name.
    pub name: String,
    /// Internal model name sent to the backend (e.g. `wan2.6-t2i`).
    pub model_name: String,
    /// Short human description.
    #[serde(default)]
    pub description: String,
}

impl ModelInfo {
    /// Build a minimal entry for a bare model name.
    pub fn from_model_name(model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        Self {
            name: model_name.clone(),
            model_name,
            description: String::new(),
        }
    }

    /// The provider this model routes to.
    pub fn provider(&self) -> Provider {
        Provider::infer(&self.model_name)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Uniform result of one successful unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Produced image urls, in backend order. Never empty: an empty
    /// outcome is represented by the absence of a result.
    pub urls: Vec<String>,
    /// The exact prompt string the images were produced from.
    pub prompt: String,
}

/// One image collected during a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    pub id: uuid::Uuid,
    pub url: String,
    pub category: String,
    pub prompt: String,
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// Batch progress
// ---------------------------------------------------------------------------

/// Lifecycle state of the batch orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// No batch is running.
    Idle,
    /// A batch run is in progress.
    Running,
    /// Terminal display state for embedders that distinguish it; the
    /// orchestrator itself returns to `Idle` after every run.
    Completed,
    /// Terminal display state for a run that ended in error.
    Error,
}

impl BatchStatus {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Error => "Error",
        }
    }
}

/// Snapshot of a batch run, owned by the orchestrator (single writer).
///
/// `current` is monotonic non-decreasing within one run and is never
/// decremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    /// Planned units for this run.
    pub total: u32,
    /// Units attempted so far.
    pub current: u32,
    /// Category of the unit in flight, if any.
    pub category: Option<String>,
    pub status: BatchStatus,
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self {
            total: 0,
            current: 0,
            category: None,
            status: BatchStatus::Idle,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Provider inference --

    #[test]
    fn z_image_models_route_to_z_image() {
        assert_eq!(Provider::infer("z-image-turbo"), Provider::ZImage);
        assert_eq!(Provider::infer("Z_IMAGE_BASE"), Provider::ZImage);
    }

    #[test]
    fn everything_else_routes_to_wan() {
        assert_eq!(Provider::infer("wan2.6-t2i"), Provider::Wan);
        assert_eq!(Provider::infer("wan-v2.1-t2i-14b"), Provider::Wan);
        assert_eq!(Provider::infer(""), Provider::Wan);
    }

    #[test]
    fn provider_slugs_match_wire_values() {
        assert_eq!(Provider::Wan.slug(), "wan");
        assert_eq!(Provider::ZImage.slug(), "z_image");
    }

    #[test]
    fn provider_serializes_to_slug() {
        assert_eq!(
            serde_json::to_string(&Provider::ZImage).unwrap(),
            "\"z_image\""
        );
        assert_eq!(serde_json::to_string(&Provider::Wan).unwrap(), "\"wan\"");
    }

    // -- Aspect ratio mapping --

    #[test]
    fn every_known_ratio_has_a_fixed_size() {
        let expected = [
            ("1:1", "1024*1024"),
            ("16:9", "1280*720"),
            ("9:16", "720*1280"),
            ("4:3", "1024*768"),
            ("3:4", "768*1024"),
            ("2:3", "832*1216"),
            ("3:2", "1216*832"),
            ("21:9", "1536*640"),
        ];
        for (ratio, size) in expected {
            assert_eq!(map_aspect_ratio(ratio), size);
        }
    }

    #[test]
    fn unlisted_ratios_fall_back_to_default() {
        assert_eq!(map_aspect_ratio("5:4"), DEFAULT_SIZE);
        assert_eq!(map_aspect_ratio(""), DEFAULT_SIZE);
        assert_eq!(map_aspect_ratio("square"), DEFAULT_SIZE);
    }

    #[test]
    fn valid_ratio_list_is_mapped_exhaustively() {
        for ratio in VALID_ASPECT_RATIOS {
            assert_ne!(map_aspect_ratio(ratio), "", "{ratio} must map");
        }
    }

    // -- Validation --

    #[test]
    fn known_tokens_validate() {
        for ratio in VALID_ASPECT_RATIOS {
            assert!(validate_aspect_ratio(ratio).is_ok());
        }
        for resolution in VALID_RESOLUTIONS {
            assert!(validate_resolution(resolution).is_ok());
        }
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert!(validate_aspect_ratio("7:5").is_err());
        assert!(validate_resolution("8K").is_err());
    }

    // -- Models --

    #[test]
    fn model_provider_follows_model_name() {
        let wan = ModelInfo::from_model_name("wan2.6-t2i");
        let z = ModelInfo::from_model_name("z-image-turbo");
        assert_eq!(wan.provider(), Provider::Wan);
        assert_eq!(z.provider(), Provider::ZImage);
    }

    // -- Batch progress --

    #[test]
    fn default_progress_is_idle_and_empty() {
        let p = BatchProgress::default();
        assert_eq!(p.total, 0);
        assert_eq!(p.current, 0);
        assert_eq!(p.category, None);
        assert_eq!(p.status, BatchStatus::Idle);
    }

    #[test]
    fn status_labels_are_non_empty() {
        for s in [
            BatchStatus::Idle,
            BatchStatus::Running,
            BatchStatus::Completed,
            BatchStatus::Error,
        ] {
            assert!(!s.label().is_empty());
        }
    }
}
