//! Subcommand bodies. Each returns the JSON document `main` prints.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use canvas_layout::block::BlockId;
use canvas_layout::collision::CollisionDetector;
use canvas_layout::config::{CanvasConfig, check_proximity_margin};
use canvas_layout::debug::overlay_snapshot;
use canvas_layout::geometry::CanvasRect;
use canvas_layout::legacy::HeuristicEstimator;
use serde_json::{Value, json};

use crate::CliError;
use crate::snapshot::CanvasSnapshot;

/// Apply command-line overrides on top of the environment config.
pub fn with_overrides(mut config: CanvasConfig, margin: Option<f64>, refine: bool) -> Result<CanvasConfig, CliError> {
    if let Some(margin) = margin {
        config.collision.proximity_margin = check_proximity_margin("--margin", margin)?;
    }
    if refine {
        config.collision.character_refinement = true;
    }
    Ok(config)
}

/// Check a proposed rect against the snapshot.
pub fn check(
    snapshot: &CanvasSnapshot,
    config: &CanvasConfig,
    proposed: CanvasRect,
    exclude: &[BlockId],
    heuristic: bool,
) -> Result<Value, CliError> {
    let result = if heuristic {
        HeuristicEstimator::from_config(&config.measure).check_collision(proposed, &snapshot.blocks, exclude)
    } else {
        let mut measure = snapshot.measurement_service(config.measure);
        CollisionDetector::new(config.collision).check_collision(
            &mut measure,
            proposed,
            &snapshot.blocks,
            exclude,
            snapshot.canvas_height_percent,
        )
    };
    tracing::info!(collides = result.collides, collision_type = ?result.collision_type, heuristic, "checked");
    Ok(serde_json::to_value(result)?)
}

/// Proximity zone of every block.
pub fn zones(snapshot: &CanvasSnapshot, config: &CanvasConfig) -> Result<Value, CliError> {
    let mut measure = snapshot.measurement_service(config.measure);
    let zones = CollisionDetector::new(config.collision).proximity_zones(&mut measure, &snapshot.blocks, &[]);
    Ok(serde_json::to_value(zones)?)
}

/// Full measurement of one block.
pub fn measure(snapshot: &CanvasSnapshot, config: &CanvasConfig, id: &BlockId) -> Result<Value, CliError> {
    let block = snapshot.block(id)?;
    let mut service = snapshot.measurement_service(config.measure);
    let bounding_box = service.bounding_box(block);
    let characters = service.character_measurements(block).to_vec();
    let lines = service.line_measurements(block).to_vec();
    Ok(json!({
        "block_id": block.id,
        "measured": service.cached(id).is_some(),
        "bounding_box": bounding_box,
        "lines": lines,
        "characters": characters,
    }))
}

/// Measure every block, then dump the development overlay.
pub fn stats(snapshot: &CanvasSnapshot, config: &CanvasConfig) -> Value {
    let mut service = snapshot.measurement_service(config.measure);
    for block in &snapshot.blocks {
        service.bounding_box(block);
    }
    overlay_snapshot(&mut service, &CollisionDetector::new(config.collision), &snapshot.blocks)
}
