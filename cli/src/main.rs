mod commands;
mod snapshot;

use canvas_layout::config::CanvasConfig;
use canvas_layout::error::ConfigError;
use canvas_layout::geometry::CanvasRect;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use uuid::Uuid;

use crate::snapshot::CanvasSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("block {0} is not in the snapshot")]
    UnknownBlock(Uuid),
}

#[derive(Parser, Debug)]
#[command(name = "canvas-check", about = "Measure and collision-check canvas snapshots")]
struct Cli {
    #[arg(long, env = "CANVAS_SNAPSHOT", default_value = "-", help = "Snapshot file path, or - for stdin")]
    snapshot: String,

    #[arg(long, help = "Proximity margin in percent (overrides CANVAS_PROXIMITY_MARGIN)")]
    margin: Option<f64>,

    #[arg(long, default_value_t = false, help = "Confirm candidates against glyph rects")]
    refine: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a proposed rect for collisions.
    Check(CheckArgs),
    /// Dump every block's proximity zone.
    Zones,
    /// Measure one block: bounding box, lines and characters.
    Measure { block_id: Uuid },
    /// Measure every block and dump cache statistics and zones.
    Stats,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(long)]
    x: f64,
    #[arg(long)]
    y: f64,
    #[arg(long)]
    width: f64,
    #[arg(long)]
    height: f64,
    #[arg(long, help = "Block ids to ignore (repeatable)")]
    exclude: Vec<Uuid>,
    #[arg(long, default_value_t = false, help = "Use stored geometry only, no layouts")]
    heuristic: bool,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = commands::with_overrides(CanvasConfig::from_env()?, cli.margin, cli.refine)?;

    let snapshot = CanvasSnapshot::load(&cli.snapshot)?;
    tracing::debug!(blocks = snapshot.blocks.len(), layouts = snapshot.layouts.len(), "snapshot loaded");

    let output = match cli.command {
        Command::Check(args) => {
            let proposed = CanvasRect::new(args.x, args.y, args.width, args.height);
            commands::check(&snapshot, &config, proposed, &args.exclude, args.heuristic)?
        }
        Command::Zones => commands::zones(&snapshot, &config)?,
        Command::Measure { block_id } => commands::measure(&snapshot, &config, &block_id)?,
        Command::Stats => commands::stats(&snapshot, &config),
    };
    print_json(&output)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
