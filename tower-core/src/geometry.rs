/// Geometry primitives: the slab template and the merged tower mesh
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

use crate::color::Rgb;

/// Fewest sides a slab polygon can have.
pub const MIN_SEGMENTS: u32 = 3;

/// A resolved mesh vertex with position, normal and colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub color: Rgb,
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Average colour of the three corners
    pub fn color(&self) -> Rgb {
        let [a, b, c] = self.vertices.map(|v| v.color);
        Rgb::new(
            (a.r + b.r + c.r) / 3.0,
            (a.g + b.g + c.g) / 3.0,
            (a.b + b.b + c.b) / 3.0,
        )
    }
}

/// Unit polygon prism every floor is instanced from.
///
/// Radius 1, height 1, centred on the origin with its axis along +Y. Each
/// side face owns its four corners so side edges stay sharp after normals
/// are recomputed; each cap is a centre vertex fanned to one ring.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabTemplate {
    segments: u32,
    positions: Vec<Point3<f32>>,
    indices: Vec<u32>,
}

impl SlabTemplate {
    /// Build a prism with `segments` sides, clamped to at least [`MIN_SEGMENTS`].
    pub fn new(segments: u32) -> Self {
        let segments = segments.max(MIN_SEGMENTS);
        let n = segments as usize;

        let mut positions = Vec::with_capacity(Self::vertex_count_for(segments));
        let mut indices = Vec::with_capacity(n * 12);

        let corner = |k: u32, y: f32| {
            let theta = TAU * (k % segments) as f32 / segments as f32;
            Point3::new(theta.sin(), y, theta.cos())
        };

        // Sides
        for k in 0..segments {
            let base = positions.len() as u32;
            positions.push(corner(k, -0.5));
            positions.push(corner(k + 1, -0.5));
            positions.push(corner(k + 1, 0.5));
            positions.push(corner(k, 0.5));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        // Top cap
        let top_center = positions.len() as u32;
        positions.push(Point3::new(0.0, 0.5, 0.0));
        for k in 0..segments {
            positions.push(corner(k, 0.5));
        }
        for k in 0..segments {
            let current = top_center + 1 + k;
            let next = top_center + 1 + (k + 1) % segments;
            indices.extend_from_slice(&[top_center, current, next]);
        }

        // Bottom cap
        let bottom_center = positions.len() as u32;
        positions.push(Point3::new(0.0, -0.5, 0.0));
        for k in 0..segments {
            positions.push(corner(k, -0.5));
        }
        for k in 0..segments {
            let current = bottom_center + 1 + k;
            let next = bottom_center + 1 + (k + 1) % segments;
            indices.extend_from_slice(&[bottom_center, next, current]);
        }

        Self {
            segments,
            positions,
            indices,
        }
    }

    /// Vertices in one slab with `segments` sides (after clamping)
    pub fn vertex_count_for(segments: u32) -> usize {
        let n = segments.max(MIN_SEGMENTS) as usize;
        4 * n + 2 * (n + 1)
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Accumulate area-weighted face normals onto every referenced vertex and
/// normalize. Vertices no triangle touches keep a zero normal.
pub fn compute_vertex_normals(positions: &[Point3<f32>], indices: &[u32]) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zeros(); positions.len()];

    for face in indices.chunks_exact(3) {
        let (a, b, c) = (face[0] as usize, face[1] as usize, face[2] as usize);
        let weighted = (positions[b] - positions[a]).cross(&(positions[c] - positions[a]));
        normals[a] += weighted;
        normals[b] += weighted;
        normals[c] += weighted;
    }

    for normal in &mut normals {
        *normal = normal
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros);
    }
    normals
}

/// The merged, indexed, per-vertex coloured tower mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TowerMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub colors: Vec<Rgb>,
    pub indices: Vec<u32>,
}

impl TowerMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Has at least one triangle and no NaN or infinite positions
    pub fn is_renderable(&self) -> bool {
        !self.is_empty()
            && self
                .positions
                .iter()
                .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }

    /// Replace the normal buffer with freshly computed vertex normals
    pub fn recompute_normals(&mut self) {
        self.normals = compute_vertex_normals(&self.positions, &self.indices);
    }

    /// Flat `[x, y, z, x, y, z, ...]` position buffer
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Flat normal buffer, three floats per vertex
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect()
    }

    /// Flat colour buffer, three floats per vertex in [0,1]
    pub fn color_buffer(&self) -> Vec<f32> {
        self.colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    pub fn vertex(&self, index: usize) -> Vertex {
        Vertex {
            position: self.positions[index],
            normal: self.normals.get(index).copied().unwrap_or_else(Vector3::zeros),
            color: self.colors.get(index).copied().unwrap_or_default(),
        }
    }

    /// Resolve the index buffer into triangles
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |face| {
            Triangle::new(
                self.vertex(face[0] as usize),
                self.vertex(face[1] as usize),
                self.vertex(face[2] as usize),
            )
        })
    }

    /// Axis-aligned bounding box, `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }
}
