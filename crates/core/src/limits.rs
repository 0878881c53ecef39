//! Per-model request-count limits.
//!
//! The backend exposes runtime-configurable caps on how many images may
//! be requested per call for each model. The map is fetched from the
//! limits endpoint at startup and re-applied whenever the selected
//! model changes; the per-family constants here are only the fallback
//! for models with no configured entry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Provider;

/// Fallback cap for Wan-family models without a configured limit.
pub const DEFAULT_WAN_LIMIT: u32 = 2;

/// Fallback cap for Z-Image-family models without a configured limit.
pub const DEFAULT_Z_IMAGE_LIMIT: u32 = 4;

/// Per-model request caps, keyed by internal model name.
///
/// Mirrors the `{"model_limits": {...}}` body of the limits endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelLimits {
    #[serde(default)]
    pub model_limits: HashMap<String, u32>,
}

impl ModelLimits {
    /// The cap for `model_name`: the configured value when present and
    /// non-zero, otherwise the family default for the model's provider.
    pub fn limit_for(&self, model_name: &str) -> u32 {
        match self.model_limits.get(model_name) {
            Some(&configured) if configured > 0 => configured,
            _ => match Provider::infer(model_name) {
                Provider::Wan => DEFAULT_WAN_LIMIT,
                Provider::ZImage => DEFAULT_Z_IMAGE_LIMIT,
            },
        }
    }

    /// Clamp a requested per-category count to the model's cap.
    ///
    /// Always at least 1: a nonsensical request of zero still plans one
    /// unit rather than silently planning none.
    pub fn clamp_count(&self, model_name: &str, requested: u32) -> u32 {
        requested.clamp(1, self.limit_for(model_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(pairs: &[(&str, u32)]) -> ModelLimits {
        ModelLimits {
            model_limits: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn configured_limit_wins() {
        let l = limits(&[("wan2.6-t2i", 8)]);
        assert_eq!(l.limit_for("wan2.6-t2i"), 8);
    }

    #[test]
    fn zero_configured_limit_falls_back_to_family_default() {
        let l = limits(&[("wan2.6-t2i", 0)]);
        assert_eq!(l.limit_for("wan2.6-t2i"), DEFAULT_WAN_LIMIT);
    }

    #[test]
    fn family_defaults_differ_by_provider() {
        let l = ModelLimits::default();
        assert_eq!(l.limit_for("wan2.6-t2i"), DEFAULT_WAN_LIMIT);
        assert_eq!(l.limit_for("z-image-turbo"), DEFAULT_Z_IMAGE_LIMIT);
    }

    #[test]
    fn clamp_caps_at_the_limit() {
        let l = limits(&[("wan2.6-t2i", 2)]);
        assert_eq!(l.clamp_count("wan2.6-t2i", 20), 2);
        assert_eq!(l.clamp_count("wan2.6-t2i", 2), 2);
        assert_eq!(l.clamp_count("wan2.6-t2i", 1), 1);
    }

    #[test]
    fn clamp_never_goes_below_one() {
        let l = ModelLimits::default();
        assert_eq!(l.clamp_count("wan2.6-t2i", 0), 1);
    }

    #[test]
    fn deserializes_the_limits_endpoint_body() {
        let l: ModelLimits =
            serde_json::from_str(r#"{"model_limits":{"wan2.6-t2i":2,"z-image-turbo":4}}"#)
                .unwrap();
        assert_eq!(l.limit_for("wan2.6-t2i"), 2);
        assert_eq!(l.limit_for("z-image-turbo"), 4);
    }

    #[test]
    fn missing_map_deserializes_to_empty() {
        let l: ModelLimits = serde_json::from_str("{}").unwrap();
        assert!(l.model_limits.is_empty());
    }
}
