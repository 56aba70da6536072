//! Percentage-heuristic estimator for blocks with no rendered layout.
//!
//! Before first paint, for unmounted blocks, or in hosts with no layout
//! engine at all, block geometry has to be guessed from the stored record.
//! This estimator does that with one line-height constant and one average
//! glyph advance, both scaled by font size. It is the fallback behind
//! [`crate::measure::MeasurementService`] and can also run a complete
//! DOM-unaware collision check on its own.

#[cfg(test)]
#[path = "legacy_test.rs"]
mod legacy_test;

use crate::block::{BlockId, TextBlock};
use crate::collision::{CollisionResult, CollisionType};
use crate::config::MeasureConfig;
use crate::consts::{AVERAGE_CHAR_WIDTH_PERCENT, BASE_FONT_SIZE_PX};
use crate::geometry::CanvasRect;

/// Layout estimator driven only by block records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicEstimator {
    /// Width assumed for blocks without a stored width, in percent.
    pub default_width: f64,
    /// Height of one line at the base font size, in percent.
    pub line_height: f64,
    /// Average glyph advance at the base font size, in percent.
    pub char_width: f64,
}

impl Default for HeuristicEstimator {
    fn default() -> Self {
        Self::from_config(&MeasureConfig::default())
    }
}

impl HeuristicEstimator {
    #[must_use]
    pub fn from_config(config: &MeasureConfig) -> Self {
        Self {
            default_width: config.fallback_width,
            line_height: config.fallback_line_height,
            char_width: AVERAGE_CHAR_WIDTH_PERCENT,
        }
    }

    /// Estimated rect: stored position, stored size where known.
    #[must_use]
    pub fn estimate_rect(&self, block: &TextBlock) -> CanvasRect {
        let width = block.stored_width().unwrap_or(self.default_width);
        let height = block.stored_height().unwrap_or_else(|| self.estimate_height(block, width));
        CanvasRect::new(block.x, block.y, width, height)
    }

    /// Height of `block` wrapped at `width`. Never zero.
    #[must_use]
    pub fn estimate_height(&self, block: &TextBlock, width: f64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let lines = self.estimate_line_count(block, width) as f64;
        lines * self.line_height * font_scale(block)
    }

    /// Visual lines of `block` wrapped at `width`: explicit lines, each
    /// wrapped by the average glyph advance. At least one.
    #[must_use]
    pub fn estimate_line_count(&self, block: &TextBlock, width: f64) -> usize {
        let advance = self.char_width * font_scale(block);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let per_line = if advance > 0.0 { (width / advance).floor().max(1.0) as usize } else { usize::MAX };
        block
            .content
            .split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum::<usize>()
            .max(1)
    }

    /// DOM-unaware collision check over estimated rects, without margin.
    #[must_use]
    pub fn check_collision(&self, proposed: CanvasRect, blocks: &[TextBlock], exclude_ids: &[BlockId]) -> CollisionResult {
        let colliding: Vec<BlockId> = blocks
            .iter()
            .filter(|b| !exclude_ids.contains(&b.id))
            .filter(|b| self.estimate_rect(b).intersects(&proposed))
            .map(|b| b.id)
            .collect();
        let collision_type = if colliding.is_empty() { CollisionType::None } else { CollisionType::BoundingBox };
        CollisionResult {
            collides: !colliding.is_empty(),
            colliding_block_ids: colliding,
            collision_type,
            checked_rect: proposed,
            proximity_zones: None,
        }
    }
}

fn font_scale(block: &TextBlock) -> f64 {
    if block.style.font_size > 0.0 { block.style.font_size / BASE_FONT_SIZE_PX } else { 1.0 }
}
