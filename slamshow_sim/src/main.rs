//! SlamShow simulator CLI
//!
//! Drives the overlay engine with a synthetic robot, headless by default or
//! in a Rerun viewer with `--viewer`.

use clap::Parser;
use slamshow_core::{DisplaySession, ShowConfig};
use slamshow_env::{HeadlessPlot, HeadlessRaster, KeyCode, PlotSurface, RasterSurface};
use slamshow_sim::{DemoConfig, DemoRunner, RunSummary, SimError};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// SlamShow synthetic robot demo
#[derive(Parser, Debug)]
#[command(name = "slamshow-sim")]
#[command(about = "Show a simulated robot exploring a room", long_about = None)]
struct Args {
    /// Seed for the scan noise
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of frames to show
    #[arg(short, long, default_value = "500")]
    frames: u64,

    /// Map side length in pixels (overrides the config file)
    #[arg(long)]
    size: Option<usize>,

    /// Map resolution in mm per pixel (overrides the config file)
    #[arg(long)]
    scale: Option<f64>,

    /// JSON display configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Headless only: press ESC after this many frames
    #[arg(long)]
    cancel_after: Option<usize>,

    /// Wait for a key press before exiting
    #[arg(long)]
    wait: bool,

    /// Show the run in a Rerun viewer
    #[arg(long)]
    viewer: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<ShowConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => ShowConfig::from_json_file(path)?,
        None => ShowConfig::default(),
    };
    if let Some(size) = args.size {
        config.map_size_pixels = size;
    }
    if let Some(scale) = args.scale {
        config.map_scale_mm_per_pixel = scale;
    }
    config.validate()?;
    Ok(config)
}

fn drive<R, P>(args: &Args, mut session: DisplaySession<R, P>) -> Result<RunSummary, SimError>
where
    R: RasterSurface,
    P: PlotSurface,
{
    let demo = DemoRunner::new(DemoConfig {
        seed: args.seed,
        frames: args.frames,
        ..Default::default()
    });
    let summary = demo.run(&mut session)?;

    if args.wait {
        session.wait_key("exit")?;
    }
    session.close();
    Ok(summary)
}

fn run_headless(args: &Args, config: ShowConfig) -> Result<RunSummary, SimError> {
    // One poll per refresh, so a key scripted after the loop's polls
    // is what the final wait reads
    let mut keys: Vec<Option<KeyCode>> = Vec::new();
    match args.cancel_after {
        Some(n) => {
            keys.extend(std::iter::repeat(None).take(n));
            keys.push(Some(KeyCode::ESC));
        }
        None if args.wait => keys.extend(std::iter::repeat(None).take(args.frames as usize)),
        None => {}
    }
    if args.wait {
        keys.push(Some(KeyCode::ENTER));
    }

    let mut raster = HeadlessRaster::new();
    raster.script_keys(keys);
    let session = DisplaySession::new(config, raster, HeadlessPlot::new())?;
    drive(args, session)
}

#[cfg(feature = "visualization")]
fn run_viewer(args: &Args, config: ShowConfig) -> Result<RunSummary, SimError> {
    let (raster, plot) = slamshow_core::viewer::spawn_viewer("slamshow")?;
    let session = DisplaySession::new(config, raster, plot)?;
    drive(args, session)
}

#[cfg(not(feature = "visualization"))]
fn run_viewer(_args: &Args, _config: ShowConfig) -> Result<RunSummary, SimError> {
    Err(SimError::invalid(
        "--viewer needs a build with the `visualization` feature",
    ))
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if !args.json {
        info!("SlamShow simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let result = load_config(&args).and_then(|config| {
        if args.viewer {
            run_viewer(&args, config)
        } else {
            run_headless(&args, config)
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!("Run failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match summary.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to encode summary: {}", e);
                std::process::exit(1);
            }
        }
    } else if summary.completed {
        info!(
            "✓ Showed {} frames (seed={}), explored {:.1}% of the map",
            summary.frames_shown,
            summary.seed,
            summary.explored * 100.0
        );
    } else {
        info!(
            "Stopped after {}/{} frames: {}",
            summary.frames_shown,
            summary.frames_requested,
            summary
                .stopped_by
                .map(|r| r.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    }
}
