//! Generation request wire type.

use easel_core::types::{map_aspect_ratio, Provider};
use serde::Serialize;

/// Body of a generation call. Built fresh per unit of work and
/// immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Provider the backend should route to.
    pub service: Provider,
    /// Internal model name.
    pub model: String,
    /// The fully assembled prompt.
    pub prompt: String,
    /// Production category; the backend archives images under it.
    pub category: String,
    pub negative_prompt: String,
    /// Pixel size string, `W*H`.
    pub size: String,
    /// Images requested in this call.
    pub count: u32,
    pub resolution: String,
    pub aspect_ratio: String,
}

impl GenerationRequest {
    /// Build a single-image request for one category unit.
    ///
    /// The provider is inferred from the model name and the pixel size
    /// from the aspect-ratio token.
    pub fn single(
        model: &str,
        prompt: String,
        category: &str,
        negative_prompt: &str,
        aspect_ratio: &str,
        resolution: &str,
    ) -> Self {
        Self {
            service: Provider::infer(model),
            model: model.to_string(),
            prompt,
            category: category.to_string(),
            negative_prompt: negative_prompt.to_string(),
            size: map_aspect_ratio(aspect_ratio).to_string(),
            count: 1,
            resolution: resolution.to_string(),
            aspect_ratio: aspect_ratio.to_string(),
        }
    }

    /// Request `count` images in one call instead of one.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }
}
