use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LINE_WIDTH, DEFAULT_OFFSET_GRID, DEFAULT_THUMBNAIL_STROKE_WIDTH,
    DEFAULT_THUMBNAIL_THRESHOLD_FACTOR, MAX_HISTORY_SIZE,
};
use crate::error::{MapError, Result};

/// One tier of the spacing classification.
///
/// A system falls in the first tier whose threshold exceeds its average
/// station spacing; a tier without threshold catches everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingLevel {
    pub key: String,
    pub label: String,
    #[serde(default, rename = "spacingThreshold")]
    pub spacing_threshold: Option<f64>,
}

impl SpacingLevel {
    fn new(key: &str, label: &str, spacing_threshold: Option<f64>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            spacing_threshold,
        }
    }
}

#[must_use]
pub fn default_levels() -> Vec<SpacingLevel> {
    vec![
        SpacingLevel::new("LOCAL", "Local", Some(1.0)),
        SpacingLevel::new("LONG", "Long distance", Some(10.0)),
        SpacingLevel::new("REGIONAL", "Regional", Some(100.0)),
        SpacingLevel::new("XL", "Extra long distance", None),
    ]
}

/// Classify an average spacing (miles) against an ordered level table
#[must_use]
pub fn classify_spacing(levels: &[SpacingLevel], avg_spacing: f64) -> Option<&SpacingLevel> {
    levels
        .iter()
        .find(|level| level.spacing_threshold.map_or(true, |threshold| avg_spacing < threshold))
        .or_else(|| levels.last())
}

/// Tunables of the geometry engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Rendered width of one line in screen pixels; the unit of lateral offsets
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// Offsets snap to multiples of this value
    #[serde(default = "default_offset_grid")]
    pub offset_grid: f64,
    #[serde(default = "default_levels")]
    pub levels: Vec<SpacingLevel>,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    #[serde(default = "default_thumbnail_stroke_width")]
    pub thumbnail_stroke_width: u32,
    #[serde(default = "default_thumbnail_threshold_factor")]
    pub thumbnail_threshold_factor: f64,
}

fn default_line_width() -> f64 {
    DEFAULT_LINE_WIDTH
}

fn default_offset_grid() -> f64 {
    DEFAULT_OFFSET_GRID
}

fn default_max_history() -> usize {
    MAX_HISTORY_SIZE
}

fn default_thumbnail_stroke_width() -> u32 {
    DEFAULT_THUMBNAIL_STROKE_WIDTH
}

fn default_thumbnail_threshold_factor() -> f64 {
    DEFAULT_THUMBNAIL_THRESHOLD_FACTOR
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
            offset_grid: default_offset_grid(),
            levels: default_levels(),
            max_history: default_max_history(),
            thumbnail_stroke_width: default_thumbnail_stroke_width(),
            thumbnail_threshold_factor: default_thumbnail_threshold_factor(),
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON, filling unspecified fields with defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| MapError::InvalidSettings(format!("Failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns an error describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(MapError::InvalidSettings(format!("line_width must be positive, got {}", self.line_width)));
        }
        if !(self.offset_grid.is_finite() && self.offset_grid >= 0.0) {
            return Err(MapError::InvalidSettings(format!("offset_grid must not be negative, got {}", self.offset_grid)));
        }
        if self.levels.is_empty() {
            return Err(MapError::InvalidSettings("levels must not be empty".to_string()));
        }
        let thresholds: Vec<f64> = self.levels.iter().filter_map(|l| l.spacing_threshold).collect();
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MapError::InvalidSettings("level thresholds must increase".to_string()));
        }
        if self.max_history == 0 {
            return Err(MapError::InvalidSettings("max_history must be at least 1".to_string()));
        }
        if !(self.thumbnail_threshold_factor.is_finite() && self.thumbnail_threshold_factor > 0.0) {
            return Err(MapError::InvalidSettings("thumbnail_threshold_factor must be positive".to_string()));
        }
        Ok(())
    }
}
