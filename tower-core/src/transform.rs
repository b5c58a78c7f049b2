/// Per-floor transforms, interpolation helpers and matrix builders
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

use crate::easing::Easing;
use crate::params::TowerParameters;

/// Linear interpolation without clamping `alpha`
#[inline]
pub fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    a + (b - a) * alpha
}

/// Normalized height of floor `index`: 0 at the bottom floor, 1 at the top.
///
/// A single-floor tower (or an empty one) always sits at t = 0.
pub fn normalized_height(index: u32, floor_count: u32) -> f32 {
    if floor_count <= 1 {
        0.0
    } else {
        index as f32 / (floor_count - 1) as f32
    }
}

/// Placement of one floor slab: rotate about +Y, scale, then lift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorTransform {
    pub position: Vector3<f32>,
    /// Twist about the vertical axis, in radians
    pub twist: f32,
    pub scale: Vector3<f32>,
}

impl FloorTransform {
    /// Transform for floor `index` using explicit twist and scale curves.
    pub fn compute(
        index: u32,
        params: &TowerParameters,
        twist_easing: &Easing,
        scale_easing: &Easing,
    ) -> Self {
        let t = normalized_height(index, params.floor_count);

        let twist_degrees = lerp(params.twist_min, params.twist_max, twist_easing.apply(t));
        let scale_factor = lerp(params.scale_min, params.scale_max, scale_easing.apply(t));
        let radius = params.base_radius * scale_factor;

        Self {
            position: Vector3::new(0.0, index as f32 * params.floor_height, 0.0),
            twist: twist_degrees.to_radians(),
            scale: Vector3::new(radius, params.slab_thickness, radius),
        }
    }

    /// Transform for floor `index` using the curves selected in `params`.
    pub fn for_floor(index: u32, params: &TowerParameters) -> Self {
        Self::compute(
            index,
            params,
            &params.twist_easing,
            &params.scale_easing_curve(),
        )
    }

    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.twist)
    }

    /// Model matrix, `T * R * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(self.position.x, self.position.y, self.position.z)
            * self.rotation().to_homogeneous()
            * Transform::scale_matrix(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Apply to a point in slab template space
    #[inline]
    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        let scaled = Point3::from(point.coords.component_mul(&self.scale));
        self.rotation() * scaled + self.position
    }
}

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Spin a model about its own vertical axis: the model is shifted so
    /// `pivot` sits at the origin before the view rotation is applied.
    pub fn spin_about(rotation: &RotationState, pivot: &Point3<f32>) -> Matrix4<f32> {
        Self::translation_matrix(pivot.x, pivot.y, pivot.z)
            * Self::rotation_matrix(rotation)
            * Self::translation_matrix(-pivot.x, -pivot.y, -pivot.z)
    }
}
