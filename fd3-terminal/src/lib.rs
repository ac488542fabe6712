/// Terminal viewer for the FD3 Hasse diagram and wire-frame model
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use fd3_core::{
    stl, Camera, Config, HasseLayout, Mesh, ModelConfig, Poset, RotationState, StartView,
    Transform, WireframeModel,
};
use log::{error, info};
use nalgebra::{Matrix4, Point3};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod renderer;

pub use cli::Options;
pub use renderer::AsciiRenderer;

/// Everything the viewer can show
pub struct Scene {
    pub mesh: Mesh,
    /// Model edges for the wire view
    pub segments: Vec<(Point3<f32>, Point3<f32>)>,
    pub hasse: Option<HasseLayout>,
}

impl Scene {
    /// Both stages of FD3: the Hasse layout and the tessellated embedding
    pub fn fd3(poset: &Poset, config: &ModelConfig) -> Self {
        let model = WireframeModel::fd3();
        Self {
            mesh: model.to_mesh(config),
            segments: model
                .segments()
                .map(|(a, b)| (a.cast::<f32>(), b.cast::<f32>()))
                .collect(),
            hasse: Some(HasseLayout::layered(poset)),
        }
    }

    /// A bare mesh, such as one loaded from STL
    pub fn from_mesh(mesh: Mesh) -> Self {
        Self {
            mesh,
            segments: Vec::new(),
            hasse: None,
        }
    }
}

/// Which diagram is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Hasse,
    Model,
}

/// How the model is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    Solid,
    Wire,
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Scene,
    config: Config,
    bounds: (Point3<f32>, Point3<f32>),
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    view: View,
    shading: Shading,
    running: bool,
    status: Option<String>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: Config) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(scene, config, width, height))
    }

    /// Build the app for a fixed grid size without touching the terminal
    pub fn with_size(scene: Scene, config: Config, width: u16, height: u16) -> Self {
        let bounds = scene
            .mesh
            .bounds()
            .unwrap_or((Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)));
        let view = match (config.viewer.start_view, scene.hasse.is_some()) {
            (StartView::Hasse, true) => View::Hasse,
            _ => View::Model,
        };

        Self {
            scene,
            config,
            bounds,
            rotation: RotationState::new(0.3, 0.0, 0.6),
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            view,
            shading: Shading::Solid,
            running: true,
            status: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
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
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.viewer.fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Update
            self.update();

            // Render
            self.draw_frame()?;

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

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code)
            }
            Event::Resize(width, height) => {
                let mode = self.camera.mode;
                self.camera = Camera::new(width as u32, height as u32);
                self.camera.mode = mode;
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Tab => {
                self.view = match self.view {
                    View::Hasse => View::Model,
                    View::Model if self.scene.hasse.is_some() => View::Hasse,
                    View::Model => View::Model,
                };
            }
            KeyCode::Char('m') => {
                self.shading = match self.shading {
                    Shading::Solid if !self.scene.segments.is_empty() => Shading::Wire,
                    _ => Shading::Solid,
                };
            }
            KeyCode::Char('p') => {
                self.camera.toggle_mode();
            }
            KeyCode::Char('x') => {
                self.export();
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.rotation.rotate(0.1, 0.0, 0.0);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.rotation.rotate(-0.1, 0.0, 0.0);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.rotation.rotate(0.0, 0.0, -0.1);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.rotation.rotate(0.0, 0.0, 0.1);
            }
            KeyCode::Char('e') => {
                self.rotation.rotate(0.0, 0.1, 0.0);
            }
            KeyCode::Char('r') => {
                self.rotation.rotate(0.0, -0.1, 0.0);
            }
            _ => {}
        }
    }

    /// Write the model to the configured STL path
    fn export(&mut self) {
        let export = &self.config.export;
        let message = match stl::save_stl(&self.scene.mesh, &export.path, export.format) {
            Ok(()) => {
                info!("exported model to {}", export.path.display());
                format!("Exported {}", export.path.display())
            }
            Err(e) => {
                error!("export to {} failed: {}", export.path.display(), e);
                format!("Export failed: {e}")
            }
        };
        self.status = Some(message);
    }

    fn update(&mut self) {
        // Continuous slow turn about the lattice axis
        if self.config.viewer.auto_rotate && self.view == View::Model {
            self.rotation.rotate(0.0, 0.0, 0.01);
        }
    }

    fn model_matrix(&self) -> Matrix4<f32> {
        Transform::model_matrix(&self.rotation, &self.bounds.0, &self.bounds.1)
    }

    /// Fill the character buffer for the current view
    pub fn render(&mut self) {
        self.renderer.clear();
        match (self.view, &self.scene.hasse) {
            (View::Hasse, Some(layout)) => self.renderer.render_hasse(layout),
            _ => {
                let model = self.model_matrix();
                match self.shading {
                    Shading::Solid => self.renderer.render_mesh(&self.scene.mesh, &model, &self.camera),
                    Shading::Wire => {
                        self.renderer
                            .render_segments(&self.scene.segments, &model, &self.camera)
                    }
                }
            }
        }
    }

    fn status_line(&self) -> String {
        let title = match self.view {
            View::Hasse => "FD3 Hasse diagram".to_string(),
            View::Model => format!("FD3 model ({} triangles)", self.scene.mesh.len()),
        };
        let message = self.status.as_deref().unwrap_or(
            "Tab=View M=Solid/Wire P=Projection WASD/Arrows=Rotate E/R=Roll X=Export Q=Quit",
        );
        format!("{title} | FPS: {:.1} | {message}", self.fps)
    }

    fn draw_frame(&mut self) -> io::Result<()> {
        self.render();

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let mut line = self.status_line();
        line.truncate(self.renderer.width());
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(line),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd3_core::{ProjectionMode, StlFormat};

    fn app() -> TerminalApp {
        let poset = Poset::fd3().unwrap();
        let config = Config::default();
        let scene = Scene::fd3(&poset, &config.model);
        TerminalApp::with_size(scene, config, 80, 40)
    }

    #[test]
    fn test_scene_contents() {
        let poset = Poset::fd3().unwrap();
        let scene = Scene::fd3(&poset, &ModelConfig::default());
        assert_eq!(scene.segments.len(), 32);
        assert!(scene.hasse.is_some());
        assert!(!scene.mesh.is_empty());
    }

    #[test]
    fn test_starts_on_hasse_view() {
        let app = app();
        assert_eq!(app.view(), View::Hasse);
        assert!(app.is_running());
    }

    #[test]
    fn test_mesh_only_scene_starts_on_model() {
        let scene = Scene::from_mesh(Mesh::sphere(1.0, 4, 6));
        let mut app = TerminalApp::with_size(scene, Config::default(), 40, 20);
        assert_eq!(app.view(), View::Model);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.view(), View::Model);
        // No edges to draw, so wire mode is unavailable
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.shading(), Shading::Solid);
    }

    #[test]
    fn test_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.view(), View::Model);
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.shading(), Shading::Wire);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.view(), View::Hasse);
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_render_each_view() {
        let mut app = app();
        app.render();
        let hasse = app.renderer().lines().join("\n");
        assert!(hasse.contains("19"));

        app.handle_key(KeyCode::Tab);
        app.render();
        let solid = app.renderer().lines().join("");
        assert!(solid.chars().any(|c| c != ' '));

        app.handle_key(KeyCode::Char('m'));
        app.render();
        let wire = app.renderer().lines().join("");
        assert!(wire.contains('o'));
    }

    #[test_log::test]
    fn test_export_key_writes_stl() {
        let path = std::env::temp_dir().join(format!("fd3-export-{}.stl", std::process::id()));
        let mut config = Config::default();
        config.export.path = path.clone();
        config.export.format = StlFormat::Ascii;
        let poset = Poset::fd3().unwrap();
        let scene = Scene::fd3(&poset, &config.model);
        let triangles = scene.mesh.len();
        let mut app = TerminalApp::with_size(scene, config, 80, 40);

        app.handle_key(KeyCode::Char('x'));
        assert!(app.status().unwrap().starts_with("Exported"));
        let loaded = stl::load_stl(&path).unwrap();
        assert_eq!(loaded.len(), triangles);
        let _ = std::fs::remove_file(&path);
    }

    #[test_log::test]
    fn test_export_failure_is_reported() {
        let mut config = Config::default();
        config.export.path = "/nonexistent-dir/fd3.stl".into();
        let scene = Scene::from_mesh(Mesh::sphere(1.0, 4, 6));
        let mut app = TerminalApp::with_size(scene, config, 40, 20);
        app.handle_key(KeyCode::Char('x'));
        assert!(app.status().unwrap().starts_with("Export failed"));
    }

    #[test]
    fn test_resize() {
        let mut app = app();
        app.handle_event(Event::Resize(100, 50));
        assert_eq!(app.renderer().width(), 100);
        assert_eq!(app.renderer().height(), 50);
    }

    #[test]
    fn test_resize_to_zero_width() {
        let mut app = app();
        app.handle_key(KeyCode::Char('p'));
        app.handle_event(Event::Resize(0, 30));
        assert!(app.camera.aspect > 0.0);
        assert_eq!(app.camera.mode, ProjectionMode::Orthographic);
        app.render();
        app.handle_key(KeyCode::Tab);
        app.render();
        assert_eq!(app.renderer().width(), 0);
    }
}
