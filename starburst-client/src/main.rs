use anyhow::{Context, Result};
use clap::Parser;
use starburst_client::config::{apply_overrides, load_settings, validate_surface};
use starburst_client::trace::{Click, Simulation};
use starburst_core::{MotionConfig, Scene};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless starburst motion simulator", long_about = None)]
struct Args {
    /// Surface width in pixels
    #[arg(long, default_value_t = 500.0)]
    width: f32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 500.0)]
    height: f32,

    /// Pixels per tick (overrides the settings file)
    #[arg(short, long, value_parser = starburst_shared::parse_speed)]
    speed: Option<f32>,

    /// Scale the shorter axis so the shape approaches in a straight line
    #[arg(short, long)]
    prevent_slide: bool,

    /// JSON settings file, e.g. {"speed": 2.0, "prevent_slide": false}
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Click in surface coordinates, X,Y or X,Y@TICK (repeatable)
    #[arg(short, long = "click")]
    clicks: Vec<Click>,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u32,

    /// Record the draw calls of every tick
    #[arg(short, long)]
    frames: bool,

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

    validate_surface(args.width, args.height)?;
    let settings = apply_overrides(
        load_settings(args.settings.as_deref())?,
        args.speed,
        args.prevent_slide,
    );

    log::info!("Surface: {}x{}", args.width, args.height);
    log::info!(
        "Speed: {}, slide prevention: {}",
        settings.speed,
        settings.prevent_slide
    );
    log::info!("Scheduled clicks: {}", args.clicks.len());

    let scene = Scene::new(args.width, args.height, MotionConfig::from(settings));
    let mut simulation = Simulation::new(scene, args.clicks).with_frames(args.frames);
    let records = simulation.run(args.max_ticks);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in &records {
        serde_json::to_writer(&mut out, record).context("Failed to write tick record")?;
        writeln!(out)?;
    }
    out.flush()?;

    Ok(())
}
