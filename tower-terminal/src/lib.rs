/// Terminal host for the parametric tower: live rebuild, spin and export
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use nalgebra::Point3;
use std::io::{self, stdout, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_core::{obj, Camera, MeshView, RotationState, TowerBuilder, TowerMesh, TowerParameters, Transform};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Constant spin about the tower axis, radians per frame
const SPIN_RATE: f32 = 0.02;
const TWIST_STEP: f32 = 15.0;
const EXPORT_PATH: &str = "tower.obj";

/// A parameter edit requested from the keyboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edit {
    Floors(i32),
    TwistMax(f32),
    Segments(i32),
    CycleTwistEasing,
    CycleScaleEasing,
    ToggleScaleGraph,
}

impl Edit {
    /// Apply to a parameter snapshot. Counts never drop below their minimum.
    pub fn apply(self, params: &mut TowerParameters) {
        match self {
            Edit::Floors(delta) => {
                params.floor_count = params.floor_count.saturating_add_signed(delta).max(1);
            }
            Edit::TwistMax(delta) => params.twist_max += delta,
            Edit::Segments(delta) => {
                params.segment_count = params
                    .effective_segment_count()
                    .saturating_add_signed(delta)
                    .max(tower_core::geometry::MIN_SEGMENTS);
            }
            Edit::CycleTwistEasing => params.twist_easing = params.twist_easing.next_preset(),
            Edit::CycleScaleEasing => params.scale_easing = params.scale_easing.next_preset(),
            Edit::ToggleScaleGraph => params.scale_graph_enabled = !params.scale_graph_enabled,
        }
    }

    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Edit::Floors(1)),
            KeyCode::Char('-') => Some(Edit::Floors(-1)),
            KeyCode::Char(']') => Some(Edit::TwistMax(TWIST_STEP)),
            KeyCode::Char('[') => Some(Edit::TwistMax(-TWIST_STEP)),
            KeyCode::Char('.') => Some(Edit::Segments(1)),
            KeyCode::Char(',') => Some(Edit::Segments(-1)),
            KeyCode::Char('e') => Some(Edit::CycleTwistEasing),
            KeyCode::Char('s') => Some(Edit::CycleScaleEasing),
            KeyCode::Char('g') => Some(Edit::ToggleScaleGraph),
            _ => None,
        }
    }
}

/// Main application struct for terminal tower rendering
pub struct TerminalApp {
    params: TowerParameters,
    builder: TowerBuilder,
    mesh: Option<Arc<TowerMesh>>,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    spinning: bool,
    running: bool,
    status: String,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(params: TowerParameters) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut app = Self::with_size(params, width as usize, height as usize);
        app.rebuild();
        Ok(app)
    }

    /// Show an already built mesh, e.g. one loaded from an OBJ file
    pub fn with_mesh(mesh: TowerMesh) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut app = Self::with_size(TowerParameters::default(), width as usize, height as usize);
        app.mesh = Some(Arc::new(mesh));
        app.frame_mesh();
        Ok(app)
    }

    fn with_size(params: TowerParameters, width: usize, height: usize) -> Self {
        // Two rows are reserved for the status lines
        let rows = height.saturating_sub(2).max(1);
        Self {
            params,
            builder: TowerBuilder::new(),
            mesh: None,
            rotation: RotationState::zero(),
            camera: Camera::new(width as u32, rows as u32 * 2),
            renderer: AsciiRenderer::new(width.max(1), rows),
            spinning: true,
            running: true,
            status: String::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn params(&self) -> &TowerParameters {
        &self.params
    }

    pub fn mesh(&self) -> Option<&Arc<TowerMesh>> {
        self.mesh.as_ref()
    }

    /// Rebuild from the current parameter snapshot and reframe the camera
    pub fn rebuild(&mut self) {
        let snapshot = self.params.clone();
        self.mesh = self.builder.rebuild(&snapshot);
        self.frame_mesh();
    }

    pub fn apply_edit(&mut self, edit: Edit) {
        edit.apply(&mut self.params);
        log::debug!("parameter edit {:?}", edit);
        self.rebuild();
    }

    fn frame_mesh(&mut self) {
        if let Some((min, max)) = self.mesh.as_ref().and_then(|m| m.bounds()) {
            self.camera.frame_bounds(&min, &max);
        }
    }

    /// Write the current mesh to `path`
    pub fn export(&mut self, path: &Path) {
        self.status = match &self.mesh {
            Some(mesh) => match obj::save_obj(path, MeshView::from(mesh.as_ref())) {
                Ok(()) => {
                    log::info!("exported {} vertices to {}", mesh.vertex_count(), path.display());
                    format!("exported {}", path.display())
                }
                Err(e) => {
                    log::error!("export to {} failed: {}", path.display(), e);
                    format!("export failed: {}", e)
                }
            },
            None => "nothing to export".to_string(),
        };
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                let rows = (height as usize).saturating_sub(2).max(1);
                self.renderer.resize((width as usize).max(1), rows);
                self.camera.aspect = width as f32 / (rows * 2) as f32;
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => {
                self.spinning = !self.spinning;
            }
            KeyCode::Char('x') => {
                self.export(Path::new(EXPORT_PATH));
            }
            KeyCode::Up => {
                self.rotation.rotate(0.1, 0.0, 0.0);
            }
            KeyCode::Down => {
                self.rotation.rotate(-0.1, 0.0, 0.0);
            }
            KeyCode::Left => {
                self.rotation.rotate(0.0, -0.1, 0.0);
            }
            KeyCode::Right => {
                self.rotation.rotate(0.0, 0.1, 0.0);
            }
            other => {
                if let Some(edit) = Edit::from_key(other) {
                    self.apply_edit(edit);
                }
            }
        }
    }

    fn update(&mut self) {
        if self.spinning {
            self.rotation.rotate(0.0, SPIN_RATE, 0.0);
        }
    }

    fn status_line(&self) -> String {
        let p = &self.params;
        let scale = if p.scale_graph_enabled {
            "bezier".to_string()
        } else {
            p.scale_easing.name().to_string()
        };
        format!(
            "floors {} | sides {} | twist {:.0}..{:.0} {} | scale {} | FPS {:.1} {}",
            p.floor_count,
            p.effective_segment_count(),
            p.twist_min,
            p.twist_max,
            p.twist_easing.name(),
            scale,
            self.fps,
            self.status
        )
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render mesh, spinning about its own axis
        if let Some(mesh) = &self.mesh {
            let pivot = match mesh.bounds() {
                Some((min, max)) => nalgebra::center(&min, &max),
                None => Point3::origin(),
            };
            let model = Transform::spin_about(&self.rotation, &pivot);
            self.renderer.render_mesh(mesh, &model, &self.camera);
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 2))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            cursor::MoveTo(0, 1),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::DarkGrey),
            Print("+/- floors  [/] twist  ,/. sides  e/s easing  g graph  x export  space spin  q quit"),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_core::Easing;

    #[test]
    fn test_edits_clamp_counts() {
        let mut params = TowerParameters {
            floor_count: 1,
            segment_count: 3,
            ..Default::default()
        };
        Edit::Floors(-1).apply(&mut params);
        Edit::Segments(-1).apply(&mut params);
        assert_eq!(params.floor_count, 1);
        assert_eq!(params.segment_count, 3);

        Edit::Floors(2).apply(&mut params);
        Edit::Segments(1).apply(&mut params);
        assert_eq!(params.floor_count, 3);
        assert_eq!(params.segment_count, 4);
    }

    #[test]
    fn test_edit_easing_and_graph() {
        let mut params = TowerParameters::default();
        params.twist_easing = Easing::Linear;
        Edit::CycleTwistEasing.apply(&mut params);
        assert_eq!(params.twist_easing, Easing::EaseIn);

        let enabled = params.scale_graph_enabled;
        Edit::ToggleScaleGraph.apply(&mut params);
        assert_eq!(params.scale_graph_enabled, !enabled);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Edit::from_key(KeyCode::Char(']')), Some(Edit::TwistMax(15.0)));
        assert_eq!(Edit::from_key(KeyCode::Char(',')), Some(Edit::Segments(-1)));
        assert_eq!(Edit::from_key(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_app_rebuilds_on_edit() {
        let mut app = TerminalApp::with_size(TowerParameters::default(), 80, 24);
        app.rebuild();
        let before = app.mesh().cloned().unwrap();
        app.apply_edit(Edit::Floors(1));
        let after = app.mesh().cloned().unwrap();
        assert!(after.vertex_count() > before.vertex_count());
    }
}
