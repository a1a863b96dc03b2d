//! Editor tuning knobs: zoom behaviour, hit tolerances and visual sizes.
//!
//! All lengths are in screen pixels. They are converted to image units by
//! dividing by the current scale, so hit tolerance and stroke width stay
//! constant on screen at every zoom level.

use crate::error::ConfigError;
use crate::viewport::{MAX_SCALE, MIN_SCALE};
use serde::{Deserialize, Serialize};

/// Configuration for the trace editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Scale change per wheel delta unit (`k` in `scale * (1 - delta * k)`).
    pub zoom_sensitivity: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Visible node radius.
    pub node_radius: f32,
    /// Radius of the invisible hit circle around a node.
    pub node_hit_radius: f32,
    /// Visible edge stroke width.
    pub edge_width: f32,
    /// Full thickness of the invisible hit band around an edge.
    pub edge_hit_width: f32,
    /// Render the prospective edge from the chain anchor to the pointer.
    pub ghost_edges: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_sensitivity: 0.001,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            node_radius: 4.0,
            node_hit_radius: 10.0,
            edge_width: 2.0,
            edge_hit_width: 12.0,
            ghost_edges: true,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zoom_sensitivity(mut self, k: f32) -> Self {
        self.zoom_sensitivity = k;
        self
    }

    pub fn with_scale_limits(mut self, min: f32, max: f32) -> Self {
        self.min_scale = min;
        self.max_scale = max;
        self
    }

    pub fn with_node_hit_radius(mut self, radius: f32) -> Self {
        self.node_hit_radius = radius;
        self
    }

    pub fn with_edge_hit_width(mut self, width: f32) -> Self {
        self.edge_hit_width = width;
        self
    }

    pub fn with_ghost_edges(mut self, enabled: bool) -> Self {
        self.ghost_edges = enabled;
        self
    }

    /// Parse a (possibly partial) JSON config. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges: positive sizes and a non-empty scale interval inside
    /// `MIN_SCALE..=MAX_SCALE`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("zoom_sensitivity", self.zoom_sensitivity),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("node_radius", self.node_radius),
            ("node_hit_radius", self.node_hit_radius),
            ("edge_width", self.edge_width),
            ("edge_hit_width", self.edge_hit_width),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [("min_scale", self.min_scale), ("max_scale", self.max_scale)] {
            if !(MIN_SCALE..=MAX_SCALE).contains(&value) {
                return Err(ConfigError::ScaleOutOfBounds { field, value, min: MIN_SCALE, max: MAX_SCALE });
            }
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::ScaleRange { min: self.min_scale, max: self.max_scale });
        }
        Ok(())
    }

    /// Effective `(min, max)` scale limits, always a non-empty interval inside
    /// `MIN_SCALE..=MAX_SCALE`. Unusable limits fall back to the full range.
    pub fn scale_limits(&self) -> (f32, f32) {
        let bound = |v: f32, fallback: f32| if v.is_nan() { fallback } else { v.clamp(MIN_SCALE, MAX_SCALE) };
        let min = bound(self.min_scale, MIN_SCALE);
        let max = bound(self.max_scale, MAX_SCALE);
        if min > max { (MIN_SCALE, MAX_SCALE) } else { (min, max) }
    }

    /// Hit tolerance around an edge centerline, in screen pixels.
    pub fn edge_hit_tolerance(&self) -> f32 {
        self.edge_hit_width / 2.0
    }
}
