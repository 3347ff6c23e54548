//! Headless viewer binary.
//!
//! Usage:
//!   cargo run -p glp_viewer --bin viewer -- [--config viewer.json]
//!       [--input script.json] [--frames N] [--tick-hz N] [--yaw R]
//!       [--pitch R] [--roll R]
//!
//! Runs the frame loop at a fixed rate against a no-op renderer and logs the
//! orientation once per second. Rates given with `--yaw`, `--pitch` and
//! `--roll` are applied every frame unless `--input` names a JSON script of
//! samples.

use std::env;
use std::fs;

use anyhow::Context;
use glp_core::config::ViewerConfig;
use glp_core::render::NullRenderer;
use glp_viewer::input::{ConstantInput, InputSource, InputState, ScriptEnd, ScriptedInput};
use glp_viewer::Viewer;
use tracing::info;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    input: Option<String>,
    frames: Option<u64>,
    tick_hz: Option<u32>,
    rates: InputState,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut out = Args::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config", Some(v)) => out.config = Some(v.clone()),
            ("--input", Some(v)) => out.input = Some(v.clone()),
            ("--frames", Some(v)) => out.frames = Some(v.parse().context("--frames")?),
            ("--tick-hz", Some(v)) => out.tick_hz = Some(v.parse().context("--tick-hz")?),
            ("--yaw", Some(v)) => out.rates.rvy = v.parse().context("--yaw")?,
            ("--pitch", Some(v)) => out.rates.rvx = v.parse().context("--pitch")?,
            ("--roll", Some(v)) => out.rates.rvz = v.parse().context("--roll")?,
            _ => {
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    Ok(out)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args()?;
    let mut cfg = match &args.config {
        Some(path) => ViewerConfig::load(path).with_context(|| format!("load config {path}"))?,
        None => ViewerConfig::default(),
    };
    if let Some(hz) = args.tick_hz {
        cfg.tick_hz = hz;
    }
    if args.frames.is_some() {
        cfg.frames = args.frames;
    }

    let mut source: Box<dyn InputSource> = match &args.input {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("read input {path}"))?;
            Box::new(
                ScriptedInput::from_json_str(&text, ScriptEnd::Zero)
                    .with_context(|| format!("parse input {path}"))?,
            )
        }
        None => Box::new(ConstantInput(args.rates)),
    };

    info!(
        tick_hz = cfg.tick_hz,
        frames = ?cfg.frames,
        projection = ?cfg.projection,
        "Starting viewer"
    );

    let frames = cfg.frames;
    let mut viewer = Viewer::new(cfg, NullRenderer).context("create viewer")?;
    let ran = viewer.run_paced(source.as_mut(), frames).await?;

    let q = viewer.orientation().rotation;
    info!(frames = ran, x = q.x, y = q.y, z = q.z, w = q.w, "Viewer finished");
    Ok(())
}
