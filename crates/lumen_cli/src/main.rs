//! `lumen`: render a Cornell box to a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{scenes, Image, RenderConfig, Renderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(version, about = "Monte Carlo path tracer")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Samples per pixel
    #[arg(long)]
    spp: Option<u32>,

    /// Russian roulette stop probability, in (0, 1]
    #[arg(long)]
    stop_probability: Option<f32>,

    /// Bounces that always continue before roulette applies
    #[arg(long)]
    min_bounces: Option<u32>,

    /// Side of the stratified jitter grid per pixel
    #[arg(long)]
    jitter_grid: Option<u32>,

    /// Worker threads (defaults to hardware concurrency)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Seed for all sampling. Given a seed, the output is deterministic.
    #[arg(long)]
    seed: Option<u64>,

    /// Use the Blinn-Phong variant of the box
    #[arg(long)]
    glossy: bool,

    /// JSON render configuration; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn apply_overrides(mut config: RenderConfig, args: &Args) -> RenderConfig {
    if let Some(spp) = args.spp {
        config.samples_per_pixel = spp;
    }
    if let Some(p) = args.stop_probability {
        config.stop_probability = p;
    }
    if let Some(n) = args.min_bounces {
        config.min_bounces = n;
    }
    if let Some(j) = args.jitter_grid {
        config.jitter_grid = j;
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    config.validate().context("invalid render configuration")?;

    log::info!("Starting Lumen ({}x{})", args.width, args.height);
    let scene = if args.glossy {
        scenes::glossy_cornell_box(args.width, args.height)
    } else {
        scenes::cornell_box(args.width, args.height)
    };

    let renderer = Renderer::new(config)?;
    let mut film = Image::new(args.width, args.height);
    let stats = renderer.render(
        Arc::new(scene.camera),
        scene.world,
        scene.lights,
        &mut film,
    )?;
    log::info!(
        "{} samples in {:.2?} (seed {})",
        stats.samples,
        stats.elapsed,
        stats.seed
    );

    film.to_rgba_image()?
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}
