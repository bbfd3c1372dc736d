//! `artifact-replay`: run a recorded reply through the artifact viewer core
//!
//! ```text
//! artifact-replay reply.txt --chunk-size 8 --back 1 --json
//! ```

mod replay;

use anyhow::Context;
use artifact_view::ViewConfig;
use clap::Parser;
use replay::{render_text, replay, ReplayOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "artifact-replay", version, about = "Replay a chat reply through the artifact viewer")]
struct Cli {
    /// Reply transcript containing `<x-artifact>` blocks
    transcript: PathBuf,

    /// Bytes per streamed chunk
    #[arg(long, default_value_t = 16)]
    chunk_size: usize,

    /// Viewer configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Back-navigation steps to apply after the reply finished
    #[arg(long = "back", default_value_t = 0)]
    back_steps: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. `debug` or `artifact_view=trace` (defaults to RUST_LOG, then `info`)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let config = match &cli.config {
        Some(path) => ViewConfig::load(path)?,
        None => ViewConfig::default(),
    };
    let transcript = std::fs::read_to_string(&cli.transcript)
        .with_context(|| format!("reading transcript {}", cli.transcript.display()))?;

    let report = replay(
        &transcript,
        &ReplayOptions {
            chunk_size: cli.chunk_size,
            back_steps: cli.back_steps,
            config,
        },
    )?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
