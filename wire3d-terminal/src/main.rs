//! Wire3D Terminal - interactive wireframe viewer
//!
//! Controls:
//!   - WASD / Arrow Keys: Orbit
//!   - +/-: Zoom
//!   - I/J/K/L: Pan
//!   - O: Toggle perspective/orthographic
//!   - F: Toggle level of detail
//!   - T: Toggle 30/60 fps target
//!   - R: Reset camera
//!   - Space: Toggle model spin
//!   - Q/ESC: Quit
//!
//! Logging is configured through `RUST_LOG` and written to `--log-file`.
//! Without a log file nothing is logged, since stderr shares the alternate
//! screen with the viewer.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use wire3d_core::{obj, projection, Mesh};
use wire3d_terminal::{TerminalApp, ViewerConfig};

#[derive(Parser)]
#[command(name = "wire3d-terminal")]
#[command(about = "Orbit a wireframe OBJ mesh in the terminal", long_about = None)]
struct Cli {
    /// OBJ file to view (a cube is shown when omitted)
    file: Option<PathBuf>,

    /// Frame rate the level-of-detail controller aims for
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Start in orthographic projection
    #[arg(long)]
    ortho: bool,

    /// Disable level-of-detail culling
    #[arg(long)]
    no_lod: bool,

    /// Maximum segments drawn per frame
    #[arg(long, default_value_t = projection::DEFAULT_MAX_LINES)]
    max_lines: usize,

    /// Drop edges crossing the near plane instead of clipping them
    #[arg(long)]
    aggressive_skip: bool,

    /// Spin the model continuously
    #[arg(long)]
    spin: bool,

    /// Write log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            target_fps: self.fps.max(1),
            orthographic: self.ortho,
            lod_enabled: !self.no_lod,
            max_lines: self.max_lines,
            aggressive_skip: self.aggressive_skip,
            spin: self.spin,
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mesh = match &cli.file {
        Some(path) => {
            obj::load(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => {
            log::info!("no mesh given, using the built-in cube");
            Mesh::cube(2.0)
        }
    };
    if mesh.is_empty() {
        log::warn!("mesh has no vertices, nothing will be drawn");
    }

    let mut app = TerminalApp::new(mesh, cli.viewer_config())?;
    app.run()?;

    Ok(())
}
