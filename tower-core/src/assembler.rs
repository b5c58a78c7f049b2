//! Mesh assembly: instance the slab template once per floor and merge.
//!
//! [`build_tower`] is the pure parameters-to-mesh operation. [`TowerBuilder`]
//! wraps it with the state a host keeps between rebuilds: the cached slab
//! template and the last mesh that was good enough to show.

use std::sync::Arc;

use crate::color::{gradient_color, Rgb};
use crate::easing::Easing;
use crate::geometry::{SlabTemplate, TowerMesh};
use crate::params::TowerParameters;
use crate::transform::{normalized_height, FloorTransform};

/// Everything derived for one floor during a rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorInstance {
    pub index: u32,
    /// Normalized height, 0 at the bottom floor and 1 at the top
    pub t: f32,
    pub transform: FloorTransform,
    pub color: Rgb,
}

impl FloorInstance {
    pub fn new(index: u32, params: &TowerParameters, twist: &Easing, scale: &Easing) -> Self {
        let t = normalized_height(index, params.floor_count);
        Self {
            index,
            t,
            transform: FloorTransform::compute(index, params, twist, scale),
            color: gradient_color(t, &params.color_bottom, &params.color_top),
        }
    }
}

/// Compute every floor of the tower, bottom first.
pub fn floor_instances(params: &TowerParameters) -> Vec<FloorInstance> {
    let twist = params.twist_easing;
    let scale = params.scale_easing_curve();
    (0..params.floor_count)
        .map(|index| FloorInstance::new(index, params, &twist, &scale))
        .collect()
}

/// Build the merged tower mesh for `params` from `template`.
///
/// Buffers are sized once for all floors; floor `i` owns the contiguous
/// vertex range `i * template.vertex_count()..` and its indices are offset
/// into that range. Floors are never welded together. Normals are computed
/// on the merged result.
pub fn build_tower(params: &TowerParameters, template: &SlabTemplate) -> TowerMesh {
    let floors = floor_instances(params);
    let per_floor = template.vertex_count();
    let per_floor_indices = template.indices().len();

    let mut mesh = TowerMesh {
        positions: Vec::with_capacity(floors.len() * per_floor),
        normals: Vec::new(),
        colors: Vec::with_capacity(floors.len() * per_floor),
        indices: Vec::with_capacity(floors.len() * per_floor_indices),
    };

    for floor in &floors {
        let base = (floor.index as usize * per_floor) as u32;
        mesh.positions.extend(
            template
                .positions()
                .iter()
                .map(|p| floor.transform.apply(p)),
        );
        mesh.colors
            .extend(std::iter::repeat(floor.color).take(per_floor));
        mesh.indices
            .extend(template.indices().iter().map(|i| base + i));
    }

    mesh.recompute_normals();
    mesh
}

/// Rebuild driver owned by the host display layer.
///
/// Holds the slab template (regenerated only when the segment count
/// changes) and the current mesh. Each rebuild publishes a fresh
/// `Arc<TowerMesh>`; meshes already handed out are never touched.
#[derive(Debug, Default)]
pub struct TowerBuilder {
    template: Option<SlabTemplate>,
    mesh: Option<Arc<TowerMesh>>,
}

impl TowerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a parameter snapshot and return the current mesh.
    ///
    /// A merge that yields nothing renderable (no floors, non-finite
    /// positions) leaves the previous mesh in place. Returns `None` only
    /// when no good mesh has ever been built.
    pub fn rebuild(&mut self, params: &TowerParameters) -> Option<Arc<TowerMesh>> {
        let template = self.template_for(params.effective_segment_count());
        let mesh = build_tower(params, template);

        if mesh.is_renderable() {
            log::debug!(
                "rebuilt tower: {} floors, {} vertices, {} triangles",
                params.floor_count,
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            self.mesh = Some(Arc::new(mesh));
        } else {
            log::warn!(
                "tower merge produced no renderable geometry ({} floors), keeping previous mesh",
                params.floor_count
            );
        }

        self.mesh.clone()
    }

    /// The most recently published mesh
    pub fn mesh(&self) -> Option<&Arc<TowerMesh>> {
        self.mesh.as_ref()
    }

    pub fn template(&self) -> Option<&SlabTemplate> {
        self.template.as_ref()
    }

    fn template_for(&mut self, segments: u32) -> &SlabTemplate {
        if self.template.as_ref().map(SlabTemplate::segments) != Some(segments) {
            log::debug!("building slab template with {} segments", segments);
            self.template = Some(SlabTemplate::new(segments));
        }
        self.template.get_or_insert_with(|| SlabTemplate::new(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HIGHLIGHT_BLEND;

    fn small_params() -> TowerParameters {
        TowerParameters {
            floor_count: 4,
            segment_count: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_floor_instances_span_zero_to_one() {
        for easing in Easing::PRESETS {
            let params = TowerParameters {
                floor_count: 7,
                twist_easing: easing,
                scale_easing: easing,
                ..Default::default()
            };
            let floors = floor_instances(&params);
            assert_eq!(floors.len(), 7);
            assert_eq!(floors[0].t, 0.0);
            assert_eq!(floors[6].t, 1.0);
            assert!((floors[6].transform.twist - params.twist_max.to_radians()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_single_floor_uses_bottom_values() {
        let params = TowerParameters {
            floor_count: 1,
            twist_min: 15.0,
            twist_max: 90.0,
            scale_min: 0.8,
            scale_max: 0.2,
            base_radius: 2.0,
            ..Default::default()
        };
        let floors = floor_instances(&params);
        assert_eq!(floors.len(), 1);
        let floor = floors[0];
        assert_eq!(floor.t, 0.0);
        assert!((floor.transform.twist - 15f32.to_radians()).abs() < 1e-6);
        assert!((floor.transform.scale.x - 1.6).abs() < 1e-6);
        assert_eq!(
            floor.color,
            params.color_bottom.lerp(&Rgb::WHITE, HIGHLIGHT_BLEND)
        );
    }

    #[test]
    fn test_floor_color_is_flat() {
        let params = small_params();
        let mesh = build_tower(&params, &SlabTemplate::new(params.segment_count));
        let per_floor = SlabTemplate::vertex_count_for(params.segment_count);
        for floor in mesh.colors.chunks(per_floor) {
            assert!(floor.iter().all(|c| *c == floor[0]));
        }
    }

    #[test]
    fn test_vertex_count_is_floors_times_template() {
        let params = small_params();
        let template = SlabTemplate::new(params.segment_count);
        let mesh = build_tower(&params, &template);
        assert_eq!(mesh.vertex_count(), 4 * template.vertex_count());
        assert_eq!(mesh.colors.len(), mesh.vertex_count());
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        assert_eq!(mesh.indices.len(), 4 * template.indices().len());
    }

    #[test]
    fn test_floor_indices_stay_in_their_range() {
        let params = small_params();
        let template = SlabTemplate::new(params.segment_count);
        let mesh = build_tower(&params, &template);
        let per_floor = template.vertex_count() as u32;
        for (floor, indices) in mesh.indices.chunks(template.indices().len()).enumerate() {
            let range = floor as u32 * per_floor..(floor as u32 + 1) * per_floor;
            assert!(indices.iter().all(|i| range.contains(i)));
        }
    }

    #[test]
    fn test_builder_reuses_template() {
        let mut builder = TowerBuilder::new();
        let mut params = small_params();
        builder.rebuild(&params);
        let first = builder.template().cloned();

        params.floor_count = 9;
        builder.rebuild(&params);
        assert_eq!(builder.template().cloned(), first);

        params.segment_count = 8;
        builder.rebuild(&params);
        assert_eq!(builder.template().map(SlabTemplate::segments), Some(8));
    }

    #[test]
    fn test_zero_floors_keeps_previous_mesh() {
        let mut builder = TowerBuilder::new();
        let mut params = small_params();

        params.floor_count = 0;
        assert!(builder.rebuild(&params).is_none());

        params.floor_count = 3;
        let good = builder.rebuild(&params).unwrap();

        params.floor_count = 0;
        let kept = builder.rebuild(&params).unwrap();
        assert!(Arc::ptr_eq(&good, &kept));
    }

    #[test]
    fn test_non_finite_parameters_keep_previous_mesh() {
        let mut builder = TowerBuilder::new();
        let mut params = small_params();
        let good = builder.rebuild(&params).unwrap();

        params.floor_height = f32::NAN;
        let kept = builder.rebuild(&params).unwrap();
        assert!(Arc::ptr_eq(&good, &kept));
    }

    #[test]
    fn test_published_mesh_is_not_mutated() {
        let mut builder = TowerBuilder::new();
        let mut params = small_params();
        let first = builder.rebuild(&params).unwrap();
        let snapshot = (*first).clone();

        params.twist_max = 45.0;
        let second = builder.rebuild(&params).unwrap();
        assert_eq!(*first, snapshot);
        assert_ne!(*second, snapshot);
    }
}
