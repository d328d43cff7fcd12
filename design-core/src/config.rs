//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::EditorResult;

/// Tunable constants of the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Smallest width/height a resize may produce, in pixels. Strictly positive.
    pub min_layer_size: f64,
    /// Hit radius of the corner and rotate handles, in pixels.
    pub handle_radius: f64,
    /// Distance of the rotate handle above the selection's top edge.
    pub rotate_handle_offset: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_layer_size: 1.0,
            handle_radius: 8.0,
            rotate_handle_offset: 30.0,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration supplied by the host shell.
    ///
    /// Missing fields take their defaults; out-of-range values are replaced
    /// by [`EngineConfig::validated`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Replace non-finite or non-positive values with their defaults.
    #[must_use]
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let pick = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                tracing::warn!("Ignoring invalid engine config value {value}");
                fallback
            }
        };
        Self {
            min_layer_size: pick(self.min_layer_size, defaults.min_layer_size),
            handle_radius: pick(self.handle_radius, defaults.handle_radius),
            rotate_handle_offset: pick(self.rotate_handle_offset, defaults.rotate_handle_offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{"minLayerSize": 4.0}"#).expect("parse");
        assert!((config.min_layer_size - 4.0).abs() < f64::EPSILON);
        assert!((config.handle_radius - EngineConfig::default().handle_radius).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = EngineConfig::from_json(r#"{"minLayerSize": -2.0, "handleRadius": 0}"#)
            .expect("parse");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(EngineConfig::from_json("{ nope").is_err());
    }
}
