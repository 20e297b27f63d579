//! shellwalk: headless driver for the splatshell demos.
//!
//! Mounts a demo on a stage backed by headless worlds, runs the capture
//! futures on the tokio runtime and steps a fixed number of frames, logging
//! every shell crossing.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use splatshell::config::{ShellConfig, WorldSource};
use splatshell::demos::{self, DemoKind, MountedDemo};
use splatshell::world::{HeadlessSplatWorld, SplatWorld};
use splatshell::{ShellError, Stage};

#[derive(Parser, Debug)]
#[command(name = "shellwalk", version, about = "Walk the camera through nested splat worlds")]
struct Args {
    /// Config file path. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Simulated frame time in milliseconds.
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,

    /// Demo to mount (transmission, scene-lighting).
    #[arg(long, default_value = "transmission")]
    demo: String,

    /// Fly the camera outward regardless of the config.
    #[arg(long)]
    animate: bool,

    /// Simulated capture latency per world in milliseconds.
    #[arg(long, default_value_t = 50)]
    capture_latency_ms: u64,

    /// Log filter override (debug, info, warn, error or a full directive).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into()),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(args).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ShellError> {
    let mut config = match &args.config {
        Some(path) => ShellConfig::load_from_path(path)?,
        None => ShellConfig::default(),
    };
    if args.animate {
        config.animation.enabled = true;
    }
    let kind = DemoKind::from_key(&args.demo)?;

    let latency = Duration::from_millis(args.capture_latency_ms);
    let mut factory = |source: &WorldSource| -> Box<dyn SplatWorld> {
        info!("creating world '{}' ({})", source.label, source.source);
        Box::new(HeadlessSplatWorld::new(source.source.clone()).with_capture_latency(latency))
    };

    let mut stage = Stage::default();
    let mounted = demos::mount(kind, &mut stage, &config, &mut factory)?;
    for capture in stage.take_pending_captures() {
        tokio::spawn(capture);
    }

    let dt = Duration::from_millis(args.dt_ms);
    let mut last_level = None;
    for _ in 0..args.frames {
        stage.render_frame(dt);

        if let MountedDemo::Transmission(controller) = &mounted {
            if let Ok(controller) = controller.lock() {
                let snapshot = controller.snapshot();
                if last_level != Some(snapshot.level) {
                    info!(
                        level = snapshot.level,
                        inner = snapshot.inner_index,
                        outer = snapshot.outer_index,
                        distance = snapshot.inner_surface_distance,
                        "traversal level changed"
                    );
                    last_level = Some(snapshot.level);
                }
            }
        }

        tokio::time::sleep(dt).await;
    }

    info!(
        frames = stage.frame_count(),
        lighting_swaps = stage.lighting.swap_count(),
        "{} finished",
        mounted.kind()
    );
    stage.teardown();
    Ok(())
}
