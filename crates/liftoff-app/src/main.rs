//! Liftoff — interactive launch scene viewer
//!
//! Controls:
//!   WASD/QE     - Move the free camera
//!   Shift/Ctrl  - Fast / slow movement
//!   Right mouse - Hold to look around
//!   1 / 2 / 3   - Free / Chase / Ground camera
//!   L / P / R   - Launch / Pause / Reset
//!   Escape      - Release mouse / Exit

use anyhow::Result;
use liftoff_app::{AppConfig, LiftoffApp};
use std::path::Path;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load(Path::new("liftoff.toml"))?;
    log::info!(
        "Starting liftoff ({}x{}, assets from {})",
        config.window_width,
        config.window_height,
        config.asset_dir
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = LiftoffApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
