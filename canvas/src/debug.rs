//! Development overlay data. Not for production control flow.

#[cfg(test)]
#[path = "debug_test.rs"]
mod debug_test;

use serde_json::{Value, json};

use crate::block::TextBlock;
use crate::collision::CollisionDetector;
use crate::measure::MeasurementService;

/// Cache statistics and every block's proximity zone, as JSON.
pub fn overlay_snapshot(measure: &mut MeasurementService, detector: &CollisionDetector, blocks: &[TextBlock]) -> Value {
    let zones = detector.proximity_zones(measure, blocks, &[]);
    let stats = measure.cache_stats();
    json!({
        "height_percent": measure.height_percent(),
        "canvas_bound": measure.has_canvas(),
        "cache": {
            "count": stats.count,
            "block_ids": stats.block_ids,
        },
        "zones": zones,
    })
}
