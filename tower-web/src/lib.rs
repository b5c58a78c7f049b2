/// Tower Web - WASM bindings for the parametric tower
///
/// The page owns the renderer and the control panel. It pushes parameter
/// edits into a `WebTower`, calls `rebuild()`, and uploads the returned
/// buffers into its own vertex/index buffers.

use std::sync::Arc;
use tower_core::{obj, ControlPoint, MeshView, TowerBuilder, TowerMesh, TowerParameters};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebTower {
    params: TowerParameters,
    builder: TowerBuilder,
    mesh: Option<Arc<TowerMesh>>,
}

impl WebTower {
    fn with_mesh<T>(&self, read: impl FnOnce(&TowerMesh) -> T) -> Option<T> {
        self.mesh.as_deref().map(read)
    }
}

impl Default for WebTower {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WebTower {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebTower {
        WebTower {
            params: TowerParameters::default(),
            builder: TowerBuilder::new(),
            mesh: None,
        }
    }

    /// Replace the whole parameter snapshot with a JSON document.
    /// Missing fields take their defaults.
    pub fn set_parameters_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.params = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid tower parameters: {}", e)))?;
        Ok(())
    }

    pub fn parameters_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.params).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn set_floor_count(&mut self, floors: u32) {
        self.params.floor_count = floors;
    }

    pub fn set_segment_count(&mut self, segments: u32) {
        self.params.segment_count = segments;
    }

    pub fn set_scale_graph_enabled(&mut self, enabled: bool) {
        self.params.scale_graph_enabled = enabled;
    }

    /// Replace both scale-graph handles, as reported by the curve editor
    pub fn set_control_points(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.params
            .set_control_points([ControlPoint::new(x1, y1), ControlPoint::new(x2, y2)]);
    }

    /// Rebuild the mesh. Returns false when there is still nothing to show.
    pub fn rebuild(&mut self) -> bool {
        self.mesh = self.builder.rebuild(&self.params);
        self.mesh.is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.with_mesh(TowerMesh::vertex_count).unwrap_or(0)
    }

    pub fn positions(&self) -> Vec<f32> {
        self.with_mesh(TowerMesh::position_buffer).unwrap_or_default()
    }

    pub fn normals(&self) -> Vec<f32> {
        self.with_mesh(TowerMesh::normal_buffer).unwrap_or_default()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.with_mesh(TowerMesh::color_buffer).unwrap_or_default()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.with_mesh(|mesh| mesh.indices.clone()).unwrap_or_default()
    }

    /// Current mesh as OBJ text, empty when nothing has been built
    pub fn to_obj(&self) -> Result<String, JsValue> {
        match self.mesh.as_deref() {
            Some(mesh) => obj::to_obj_string(MeshView::from(mesh))
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_exposes_buffers() {
        let mut tower = WebTower::new();
        tower.set_floor_count(4);
        tower.set_segment_count(5);
        assert!(tower.positions().is_empty());

        assert!(tower.rebuild());
        let vertices = tower.vertex_count();
        assert!(vertices > 0);
        assert_eq!(tower.positions().len(), 3 * vertices);
        assert_eq!(tower.normals().len(), 3 * vertices);
        assert_eq!(tower.colors().len(), 3 * vertices);
        assert_eq!(tower.indices().len() % 3, 0);
    }

    #[test]
    fn test_zero_floors_before_first_build() {
        let mut tower = WebTower::new();
        tower.set_floor_count(0);
        assert!(!tower.rebuild());
        assert_eq!(tower.to_obj().ok(), Some(String::new()));
    }

    #[test]
    fn test_control_points_change_geometry() {
        let mut tower = WebTower::new();
        tower.set_scale_graph_enabled(true);
        tower.rebuild();
        let before = tower.positions();

        tower.set_control_points(0.9, 0.0, 1.0, 0.1);
        tower.rebuild();
        assert_ne!(before, tower.positions());
    }
}
