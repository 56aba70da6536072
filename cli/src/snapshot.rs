//! Canvas snapshot files: stored blocks plus their pre-rendered layouts.
//!
//! ```json
//! {
//!   "canvas_height_percent": 120.0,
//!   "root": { "left": 0, "top": 0, "width": 1000, "height": 1000 },
//!   "mono": { "char_width": 8, "line_height": 16, "padding_x": 0, "padding_y": 0 },
//!   "blocks": [ { "id": "…", "x": 10, "y": 10, "content": "hello" } ],
//!   "layouts": { "<block id>": { "rect": { "left": 100, "top": 120, "width": 200, "height": 60 } } }
//! }
//! ```
//!
//! Blocks without a layout are treated as unmounted and fall back to the
//! heuristic estimate. A layout with no glyphs gets monospace glyphs
//! synthesized from the block content when `mono` is present.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};

use canvas_layout::block::{BlockId, TextBlock};
use canvas_layout::clock::ManualClock;
use canvas_layout::config::MeasureConfig;
use canvas_layout::consts::DEFAULT_CANVAS_HEIGHT_PERCENT;
use canvas_layout::geometry::PixelRect;
use canvas_layout::measure::MeasurementService;
use canvas_layout::static_layout::{LayoutSnapshot, MonoMetrics, StaticBlock, StaticRoot};
use serde::{Deserialize, Serialize};

use crate::CliError;

fn default_height_percent() -> f64 {
    DEFAULT_CANVAS_HEIGHT_PERCENT
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    #[serde(default = "default_height_percent")]
    pub canvas_height_percent: f64,
    #[serde(default)]
    pub root: Option<PixelRect>,
    #[serde(default)]
    pub mono: Option<MonoMetrics>,
    pub blocks: Vec<TextBlock>,
    #[serde(default)]
    pub layouts: HashMap<BlockId, LayoutSnapshot>,
}

impl CanvasSnapshot {
    /// Read a snapshot from `path`, or from stdin when `path` is `-`.
    pub fn load(path: &str) -> Result<Self, CliError> {
        let raw = if path == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            fs::read_to_string(path)?
        };
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// A measurement service bound to the snapshot's root with every layout registered.
    ///
    /// The clock is frozen, so cache entries never expire during one run.
    #[must_use]
    pub fn measurement_service(&self, config: MeasureConfig) -> MeasurementService {
        let mut service = MeasurementService::with_clock(config, Box::new(ManualClock::new(0.0)));
        if let Some(root) = self.root {
            service.set_canvas(Box::new(StaticRoot::new(root)), self.canvas_height_percent);
        }
        for block in &self.blocks {
            let Some(layout) = self.layouts.get(&block.id) else {
                tracing::debug!(block_id = %block.id, "no layout, block treated as unmounted");
                continue;
            };
            service.register(block.id, Box::new(StaticBlock::new(self.resolve_layout(block, layout))));
        }
        service
    }

    fn resolve_layout(&self, block: &TextBlock, layout: &LayoutSnapshot) -> LayoutSnapshot {
        match self.mono {
            Some(metrics) if layout.glyphs.is_empty() => LayoutSnapshot::monospace(layout.rect, &block.content, metrics),
            _ => layout.clone(),
        }
    }

    pub fn block(&self, id: &BlockId) -> Result<&TextBlock, CliError> {
        self.blocks.iter().find(|b| b.id == *id).ok_or(CliError::UnknownBlock(*id))
    }
}
