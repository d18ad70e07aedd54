//! Cauldron - click anywhere to set off an explosion
//!
//! Usage:
//!   cauldron [--config <demo.toml>] [--seed <n>] [--snapshot <out.png> [--age <secs>]]

use anyhow::{Context, Result};
use cauldron_demo::{render_snapshot, CauldronApp, DemoConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "cauldron")]
#[command(about = "Particle effects demo - click to spawn explosions")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Seed for particle generation; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Render a single frame headlessly to this PNG instead of opening a window
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Effect age in seconds for --snapshot
    #[arg(long, default_value_t = 0.5)]
    age: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DemoConfig::default(),
    };
    if let Some(width) = args.width {
        config.window.width = width;
    }
    if let Some(height) = args.height {
        config.window.height = height;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().context("Invalid configuration")?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    if let Some(output) = &args.snapshot {
        return render_snapshot(&config, args.age, output);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = CauldronApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
