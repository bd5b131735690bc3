// Engine configuration - canvas geometry and tuning for each stage

use crate::model::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Drawing area the engine lays nodes out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    /// Nodes are kept at least this far from every edge of the canvas.
    pub margin: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            clamp_axis(p.x, self.margin, self.width - self.margin),
            clamp_axis(p.y, self.margin, self.height - self.margin),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.margin
            && p.x <= self.width - self.margin
            && p.y >= self.margin
            && p.y <= self.height - self.margin
    }
}

// A canvas narrower than two margins collapses to its midline.
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        v.clamp(lo, hi)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: 50.0,
        }
    }
}

/// Damped spring integrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Fraction of the remaining displacement covered each tick.
    pub damping: f32,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self { damping: 0.05 }
    }
}

/// Force refinement settings for the layout pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Force iterations run at each refinement level.
    pub iterations: usize,
    /// Base repulsion constant; scaled by `10 * (level + 1)`.
    pub repulsion: f32,
    /// Pull toward the canvas centre; scaled by `1 / (level + 1)`.
    pub gravity: f32,
    /// Spring pull along visible edges.
    pub attraction: f32,
    /// Distances are clamped to at least this before dividing.
    pub min_distance: f32,
    /// Largest move a node may make in one iteration.
    pub max_step: f32,
    /// Offset radius when a synthetic node is expanded into its members.
    pub expansion_jitter: f32,
    /// Weight of the group-size similarity when pairing nodes.
    pub semantic_weight: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            repulsion: 2000.0,
            gravity: 0.05,
            attraction: 0.01,
            min_distance: 1.0,
            max_step: 20.0,
            expansion_jitter: 5.0,
            semantic_weight: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas: Canvas,
    pub integrator: IntegratorConfig,
    pub layout: LayoutConfig,
    /// Quiet period before a burst of filter edits is applied.
    pub filter_debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            integrator: IntegratorConfig::default(),
            layout: LayoutConfig::default(),
            filter_debounce_ms: 250,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas = &self.canvas;
        if !(canvas.width > 0.0
            && canvas.height > 0.0
            && canvas.width.is_finite()
            && canvas.height.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "canvas must have positive size, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        if !(canvas.margin >= 0.0
            && 2.0 * canvas.margin <= canvas.width.min(canvas.height))
        {
            return Err(ConfigError::Invalid(format!(
                "margin {} does not fit a {}x{} canvas",
                canvas.margin, canvas.width, canvas.height
            )));
        }
        let damping = self.integrator.damping;
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "damping must be in (0, 1], got {damping}"
            )));
        }
        self.layout.validate()
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::Invalid(
                "iterations must be at least 1".to_string(),
            ));
        }
        let positive = [
            ("min_distance", self.min_distance),
            ("max_step", self.max_step),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("repulsion", self.repulsion),
            ("gravity", self.gravity),
            ("attraction", self.attraction),
            ("expansion_jitter", self.expansion_jitter),
            ("semantic_weight", self.semantic_weight),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
