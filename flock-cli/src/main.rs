use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flock_cli::{load_config, parse_pointer, run, RunOptions};
use flock_core::Viewport;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless flocking background runner", long_about = None)]
struct Args {
    /// Logical viewport width in CSS pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Logical viewport height in CSS pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Device pixel ratio used for the backing store size
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Seed for the random source
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// JSON file overriding config fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep the pointer active at X,Y for the whole run
    #[arg(short, long, value_parser = parse_pointer)]
    pointer: Option<(f64, f64)>,

    /// Write the final frame as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = load_config(args.config.as_deref())?;
    let viewport = Viewport::new(args.width, args.height, args.dpr);

    log::info!(
        "Simulating {} frames on {}x{} @{}x (seed {})",
        args.frames,
        viewport.width,
        viewport.height,
        viewport.device_pixel_ratio,
        args.seed
    );

    let output = run(&RunOptions {
        config,
        viewport,
        seed: args.seed,
        frames: args.frames,
        pointer: args.pointer,
    })?;
    let summary = &output.summary;

    log::info!(
        "Ran {} frames ({:.0} ms simulated), flocks {:?}",
        summary.frames,
        summary.clock_ms,
        summary.flock_sizes
    );
    log::info!(
        "Speed ratio range [{:.3}, {:.3}]",
        summary.min_speed_ratio,
        summary.max_speed_ratio
    );
    if summary.agents_outside > 0 {
        log::warn!("{} agent positions left the viewport", summary.agents_outside);
    }

    if let Some(path) = &args.svg {
        std::fs::write(path, &output.svg)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote final frame to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }

    Ok(())
}
