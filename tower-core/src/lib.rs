//! Tower Core Library - Parametric stacked-slab tower geometry
//!
//! This library turns a `TowerParameters` snapshot into a merged, coloured
//! triangle mesh: per-floor twist and scale driven by easing curves (or a
//! two-handle Bezier curve), a bottom-to-top colour gradient, and OBJ
//! export. Camera helpers are provided for hosts that draw the result.

pub mod assembler;
pub mod bezier;
pub mod color;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod obj;
pub mod params;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use assembler::{build_tower, FloorInstance, TowerBuilder};
pub use bezier::{ControlPoint, CubicBezier};
pub use color::Rgb;
pub use easing::Easing;
pub use error::{ConfigError, ObjError};
pub use geometry::{SlabTemplate, TowerMesh, Triangle, Vertex};
pub use obj::MeshView;
pub use params::TowerParameters;
pub use projection::{Camera, ProjectionMode};
pub use transform::{FloorTransform, RotationState, Transform};
