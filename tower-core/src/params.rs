//! Tower parameters.
//!
//! A `TowerParameters` value is the snapshot a host hands to every rebuild.
//! It can be loaded from a JSON file; every field is optional and falls
//! back to the compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "floor_count": 40,
//!   "twist_max": 270.0,
//!   "scale_easing": "ease_out",
//!   "color_top": [1.0, 0.8, 0.3],
//!   "scale_graph_enabled": true,
//!   "scale_graph_control_points": [[0.3, 0.1], [0.7, 0.9]]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::bezier::{ControlPoint, CubicBezier};
use crate::color::Rgb;
use crate::easing::Easing;
use crate::error::ConfigError;

/// Structural and gradient parameters of the tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerParameters {
    /// Number of stacked slabs. Zero produces no geometry.
    pub floor_count: u32,
    /// Vertical distance between slab centres.
    pub floor_height: f32,
    pub slab_thickness: f32,
    pub base_radius: f32,
    /// Sides of the slab polygon, at least 3.
    pub segment_count: u32,
    /// Twist of the bottom floor, in degrees.
    pub twist_min: f32,
    /// Twist of the top floor, in degrees.
    pub twist_max: f32,
    pub twist_easing: Easing,
    pub scale_min: f32,
    pub scale_max: f32,
    pub scale_easing: Easing,
    pub color_bottom: Rgb,
    pub color_top: Rgb,
    /// Use the Bezier scale graph instead of `scale_easing`.
    pub scale_graph_enabled: bool,
    pub scale_graph_control_points: [ControlPoint; 2],
}

impl Default for TowerParameters {
    fn default() -> Self {
        Self {
            floor_count: 30,
            floor_height: 1.0,
            slab_thickness: 0.3,
            base_radius: 4.0,
            segment_count: 6,
            twist_min: 0.0,
            twist_max: 180.0,
            twist_easing: Easing::Linear,
            scale_min: 1.0,
            scale_max: 0.5,
            scale_easing: Easing::EaseInOut,
            color_bottom: Rgb::from_hex(0x3a4a6b),
            color_top: Rgb::from_hex(0xf2c14e),
            scale_graph_enabled: false,
            scale_graph_control_points: [
                ControlPoint::new(0.25, 0.1),
                ControlPoint::new(0.25, 1.0),
            ],
        }
    }
}

impl TowerParameters {
    /// Load parameters from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let params = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(params)
    }

    /// Replace both scale-graph handles. Coordinates are clamped to [0,1].
    pub fn set_control_points(&mut self, points: [ControlPoint; 2]) {
        self.scale_graph_control_points = points.map(|p| ControlPoint::new(p.x, p.y));
    }

    /// The curve that drives the scale gradient right now.
    pub fn scale_easing_curve(&self) -> Easing {
        if self.scale_graph_enabled {
            let [p1, p2] = self.scale_graph_control_points;
            Easing::Bezier(CubicBezier::new(p1, p2))
        } else {
            self.scale_easing
        }
    }

    /// Segment count as the slab builder will use it.
    pub fn effective_segment_count(&self) -> u32 {
        self.segment_count.max(crate::geometry::MIN_SEGMENTS)
    }
}
