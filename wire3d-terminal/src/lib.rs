//! Terminal wireframe viewer driving the wire3d-core pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use nalgebra::Point3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wire3d_core::{
    projection, Bounds, FrameParams, FrameProjector, LodConfig, LodOptions, LodState, Mesh,
    OrbitCamera, ProjectionMode, RotationState, ScreenLine, Transform,
};

pub mod renderer;

pub use renderer::AsciiRenderer;

const ORBIT_STEP: f32 = 0.08;
const ZOOM_STEP: f32 = 0.9;
const PAN_STEP: f32 = 40.0;
const AXIS_NEAR: f32 = 0.01;

/// Viewer settings collected from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub target_fps: u32,
    pub orthographic: bool,
    pub lod_enabled: bool,
    pub max_lines: usize,
    pub aggressive_skip: bool,
    pub spin: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            orthographic: false,
            lod_enabled: true,
            max_lines: projection::DEFAULT_MAX_LINES,
            aggressive_skip: false,
            spin: false,
        }
    }
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    mesh: Mesh,
    bounds: Option<Bounds>,
    camera: OrbitCamera,
    rotation: RotationState,
    config: ViewerConfig,
    projector: FrameProjector,
    lod: LodState,
    lod_config: LodConfig,
    renderer: AsciiRenderer,
    running: bool,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(mesh, config, width as usize, height as usize))
    }

    /// Build the app for a fixed grid without querying the terminal
    pub fn with_size(mesh: Mesh, config: ViewerConfig, width: usize, height: usize) -> Self {
        let camera = initial_camera(&mesh, &config);
        Self {
            bounds: mesh.bounds(),
            mesh,
            camera,
            rotation: RotationState::default(),
            lod_config: LodConfig::with_target_fps(config.target_fps as f32),
            config,
            projector: FrameProjector::new(),
            lod: LodState::default(),
            renderer: AsciiRenderer::new(width, height),
            running: true,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn lod(&self) -> LodState {
        self.lod
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
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?)?;
            }

            if self.config.spin {
                self.rotation.rotate(0.0, 0.015, 0.0);
            }

            self.render()?;

            let elapsed = frame_start.elapsed();
            self.lod = self.lod.step(elapsed.as_secs_f64() * 1000.0, &self.lod_config);

            let budget = Duration::from_secs_f64(self.lod_config.budget_ms() / 1000.0);
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
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
                self.renderer.resize(width as usize, height as usize);
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.camera.orbit(0.0, ORBIT_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.camera.orbit(0.0, -ORBIT_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.camera.orbit(ORBIT_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.camera.orbit(-ORBIT_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom(ZOOM_STEP),
            KeyCode::Char('-') => self.camera.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('j') => self.camera.pan(-PAN_STEP, 0.0),
            KeyCode::Char('l') => self.camera.pan(PAN_STEP, 0.0),
            KeyCode::Char('i') => self.camera.pan(0.0, PAN_STEP),
            KeyCode::Char('k') => self.camera.pan(0.0, -PAN_STEP),
            KeyCode::Char('o') => self.camera.toggle_projection(),
            KeyCode::Char('f') => self.config.lod_enabled = !self.config.lod_enabled,
            KeyCode::Char('t') => {
                self.config.target_fps = if self.config.target_fps == 30 { 60 } else { 30 };
                self.lod_config.target_fps = self.config.target_fps as f32;
            }
            KeyCode::Char('r') => {
                self.camera = initial_camera(&self.mesh, &self.config);
                self.rotation = RotationState::default();
            }
            KeyCode::Char(' ') => self.config.spin = !self.config.spin,
            _ => {}
        }
    }

    fn frame_params(&self) -> FrameParams {
        let model = match &self.bounds {
            Some(bounds) => Transform::spin_about(&self.rotation, bounds),
            None => Transform::rotation_matrix(&self.rotation),
        };
        FrameParams {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(self.renderer.aspect()),
            model,
            near: self.camera.near,
            viewport: self.renderer.viewport(),
        }
    }

    fn lod_options(&self) -> LodOptions {
        LodOptions {
            lod_pixels: self.config.lod_enabled.then_some(self.lod.lod_pixels),
            max_lines: Some(self.config.max_lines),
            skip_unvalidated: self.config.aggressive_skip,
        }
    }

    /// Project the mesh and axes into the character grid
    pub fn compose_frame(&mut self) -> usize {
        let params = self.frame_params();
        let options = self.lod_options();

        self.renderer.clear();
        for (line, color) in axis_lines(&params) {
            self.renderer.draw_line(&line, color);
        }

        let lines = self.projector.project_frame(&self.mesh, &params, &options);
        self.renderer.draw_lines(lines, Color::White);
        lines.len()
    }

    fn render(&mut self) -> io::Result<()> {
        let drawn = self.compose_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.hud(drawn)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    pub fn hud(&self, drawn: usize) -> String {
        let mode = match self.camera.mode {
            ProjectionMode::Perspective => "Perspective",
            ProjectionMode::Orthographic => "Orthographic",
        };
        format!(
            "{} | FPS={:.1} | radius={:.2} | fov={:.1} | edges={} | drawn={} | \
             LOD={} {:.2}px | cap={} | target={}fps",
            mode,
            self.lod.fps(),
            self.camera.radius,
            self.camera.fov_y.to_degrees(),
            self.mesh.edge_count(),
            drawn,
            if self.config.lod_enabled { "on" } else { "off" },
            self.lod.lod_pixels,
            self.config.max_lines,
            self.config.target_fps,
        )
    }
}

fn initial_camera(mesh: &Mesh, config: &ViewerConfig) -> OrbitCamera {
    let mut camera = OrbitCamera::default();
    camera.frame_mesh(mesh);
    if config.orthographic {
        camera.mode = ProjectionMode::Orthographic;
    }
    camera
}

/// World X, Y and Z unit axes, clipped and projected like mesh edges
fn axis_lines(params: &FrameParams) -> Vec<(ScreenLine, Color)> {
    [
        (Point3::new(1.0, 0.0, 0.0), Color::Red),
        (Point3::new(0.0, 1.0, 0.0), Color::Green),
        (Point3::new(0.0, 0.0, 1.0), Color::Blue),
    ]
    .iter()
    .filter_map(|(tip, color)| axis_line(params, tip).map(|line| (line, *color)))
    .collect()
}

fn axis_line(params: &FrameParams, tip: &Point3<f32>) -> Option<ScreenLine> {
    let camera_space = |p: &Point3<f32>| {
        Point3::from(wire3d_core::math::transform_point(&params.view, p).xyz())
    };
    let origin = camera_space(&Point3::origin());
    let (a, b) = projection::clip_to_near(origin, camera_space(tip), AXIS_NEAR)?;
    let a = projection::project_point(&params.projection, &a, params.viewport).ok()?;
    let b = projection::project_point(&params.projection, &b, params.viewport).ok()?;
    Some(ScreenLine { a, b })
}
