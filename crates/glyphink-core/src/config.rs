//! Editor configuration.

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::metrics::FontLineFactors;
use crate::stroke::{DEFAULT_STROKE_WIDTH, clamp_width};
use crate::tools::{DEFAULT_CIRCLE_SEGMENTS, DrawMode};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default canvas edge length.
pub const DEFAULT_CANVAS_SIZE: f64 = 600.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Everything the editor needs to know about its surroundings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub line_factors: FontLineFactors,
    /// Width of newly drawn strokes.
    pub default_stroke_width: f64,
    /// Maximum number of undo states.
    pub history_capacity: usize,
    /// Extra distance around a stroke that still counts as a hit.
    pub hit_tolerance: f64,
    /// Radius of the bend handle.
    pub handle_radius: f64,
    pub circle_segments: usize,
    pub initial_mode: DrawMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            line_factors: FontLineFactors::default(),
            default_stroke_width: DEFAULT_STROKE_WIDTH,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            hit_tolerance: 4.0,
            handle_radius: 6.0,
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
            initial_mode: DrawMode::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Check ranges and normalize the clampable fields.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !self.hit_tolerance.is_finite() || self.hit_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hit_tolerance must be >= 0, got {}",
                self.hit_tolerance
            )));
        }
        if !positive(self.handle_radius) {
            return Err(ConfigError::Invalid(format!(
                "handle_radius must be positive, got {}",
                self.handle_radius
            )));
        }
        if self.circle_segments < 3 {
            return Err(ConfigError::Invalid(format!(
                "circle_segments must be at least 3, got {}",
                self.circle_segments
            )));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be at least 1".into()));
        }
        self.default_stroke_width = clamp_width(self.default_stroke_width);
        self.line_factors = self.line_factors.clamped();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.canvas_size(), Size::new(600.0, 600.0));
        assert_eq!(config.circle_segments, 24);
        assert_eq!(config.history_capacity, 200);
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(
            r#"{"canvas_width": 800, "initial_mode": "select", "line_factors": {"x_height": 0.4}}"#,
        )
        .unwrap();
        assert_eq!(config.canvas_width, 800.0);
        assert_eq!(config.canvas_height, 600.0);
        assert_eq!(config.initial_mode, DrawMode::Select);
        assert_eq!(config.line_factors.x_height, 0.4);
        assert_eq!(config.line_factors.ascender, 0.65);
    }

    #[test]
    fn test_values_normalized() {
        let config = EditorConfig::from_json(
            r#"{"default_stroke_width": 120, "line_factors": {"cap_height": 3.0}}"#,
        )
        .unwrap();
        assert_eq!(config.default_stroke_width, 50.0);
        assert_eq!(config.line_factors.cap_height, 1.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"canvas_width": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"circle_segments": 2}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        let config = EditorConfig {
            hit_tolerance: 2.5,
            ..EditorConfig::default()
        };
        std::fs::write(&path, config.to_json().unwrap()).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);

        let missing = EditorConfig::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
