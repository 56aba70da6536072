//! Collision detection against measured block geometry.
//!
//! DESIGN
//! ======
//! The detector holds only its options. Every query borrows the
//! [`MeasurementService`] mutably, syncs the canvas height scale into it,
//! then works in two passes:
//!
//! 1. Proximity: each non-excluded block's measured bounding box is expanded
//!    by the margin into a [`ProximityZone`]; blocks whose outer box
//!    intersects the proposed rect become candidates. No candidates means an
//!    immediate `None` verdict.
//! 2. Refinement (opt-in): each candidate's glyph rects are tested against
//!    the proposed rect. Only a real glyph overlap confirms the candidate.
//!    Candidates with no measurable glyphs cannot be refined and keep their
//!    bounding-box verdict.
//!
//! Intersection is strict: rects that only share an edge do not collide.
//! Results are values, never errors.

#[cfg(test)]
#[path = "collision_test.rs"]
mod collision_test;

use serde::{Deserialize, Serialize};

use crate::block::{BlockId, TextBlock};
use crate::config::CollisionOptions;
use crate::geometry::{CanvasRect, Point, Size};
use crate::measure::MeasurementService;

// =============================================================================
// TYPES
// =============================================================================

/// How a collision verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionType {
    None,
    BoundingBox,
    CharacterLevel,
}

/// A block's measured box and the margin-expanded box used for detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityZone {
    pub block_id: BlockId,
    pub inner: CanvasRect,
    pub outer: CanvasRect,
    pub margin: f64,
}

/// Verdict of one collision query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub collides: bool,
    pub colliding_block_ids: Vec<BlockId>,
    pub collision_type: CollisionType,
    pub checked_rect: CanvasRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity_zones: Option<Vec<ProximityZone>>,
}

impl CollisionResult {
    fn new(checked_rect: CanvasRect, colliding_block_ids: Vec<BlockId>, collision_type: CollisionType) -> Self {
        Self {
            collides: !colliding_block_ids.is_empty(),
            colliding_block_ids,
            collision_type,
            checked_rect,
            proximity_zones: None,
        }
    }
}

// =============================================================================
// DETECTOR
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionDetector {
    options: CollisionOptions,
}

impl CollisionDetector {
    #[must_use]
    pub fn new(options: CollisionOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &CollisionOptions {
        &self.options
    }

    /// Check `proposed` against every block in `existing` not listed in `exclude_ids`.
    pub fn check_collision(
        &self,
        measure: &mut MeasurementService,
        proposed: CanvasRect,
        existing: &[TextBlock],
        exclude_ids: &[BlockId],
        canvas_height_percent: f64,
    ) -> CollisionResult {
        measure.update_canvas_height(canvas_height_percent);

        let zones = self.proximity_zones(measure, existing, exclude_ids);
        let candidates: Vec<&TextBlock> = existing
            .iter()
            .filter(|b| zones.iter().any(|z| z.block_id == b.id && z.outer.intersects(&proposed)))
            .collect();

        let mut result = if candidates.is_empty() {
            CollisionResult::new(proposed, Vec::new(), CollisionType::None)
        } else if self.options.character_refinement {
            refine(measure, proposed, &candidates)
        } else {
            CollisionResult::new(proposed, candidates.iter().map(|b| b.id).collect(), CollisionType::BoundingBox)
        };

        tracing::debug!(
            candidates = candidates.len(),
            colliding = result.colliding_block_ids.len(),
            collision_type = ?result.collision_type,
            "collision check"
        );

        if self.options.include_zones {
            result.proximity_zones = Some(zones);
        }
        result
    }

    /// Check `block` moved to `to`, keeping its measured size.
    pub fn check_move_collision(
        &self,
        measure: &mut MeasurementService,
        block: &TextBlock,
        to: Point,
        all_blocks: &[TextBlock],
        canvas_height_percent: f64,
    ) -> CollisionResult {
        measure.update_canvas_height(canvas_height_percent);
        let current = measure.bounding_box(block);
        let proposed = CanvasRect::new(to.x, to.y, current.width, current.height);
        self.check_collision(measure, proposed, all_blocks, &[block.id], canvas_height_percent)
    }

    /// Check `block` resized to `new_width`, keeping its position and measured height.
    pub fn check_resize_collision(
        &self,
        measure: &mut MeasurementService,
        block: &TextBlock,
        new_width: f64,
        all_blocks: &[TextBlock],
        canvas_height_percent: f64,
    ) -> CollisionResult {
        measure.update_canvas_height(canvas_height_percent);
        let current = measure.bounding_box(block);
        let proposed = CanvasRect::new(current.x, current.y, new_width, current.height);
        self.check_collision(measure, proposed, all_blocks, &[block.id], canvas_height_percent)
    }

    /// Check a new block of size `preview` centered on `cursor`.
    pub fn check_add_text_collision(
        &self,
        measure: &mut MeasurementService,
        cursor: Point,
        preview: Size,
        existing: &[TextBlock],
        canvas_height_percent: f64,
    ) -> CollisionResult {
        let proposed = CanvasRect::centered_on(cursor, preview);
        self.check_collision(measure, proposed, existing, &[], canvas_height_percent)
    }

    /// Proximity zones of every block not in `exclude_ids`. Performs no check.
    pub fn proximity_zones(
        &self,
        measure: &mut MeasurementService,
        blocks: &[TextBlock],
        exclude_ids: &[BlockId],
    ) -> Vec<ProximityZone> {
        let margin = self.options.proximity_margin;
        blocks
            .iter()
            .filter(|b| !exclude_ids.contains(&b.id))
            .map(|b| {
                let inner = measure.bounding_box(b);
                ProximityZone { block_id: b.id, inner, outer: inner.expand(margin), margin }
            })
            .collect()
    }
}

/// Confirm candidates by glyph overlap. Candidates without glyphs stay.
fn refine(measure: &mut MeasurementService, proposed: CanvasRect, candidates: &[&TextBlock]) -> CollisionResult {
    let mut confirmed = 0usize;
    let mut colliding = Vec::new();

    for block in candidates {
        let chars = measure.character_measurements(block);
        if chars.is_empty() {
            tracing::trace!(block_id = %block.id, "no glyphs, keeping bounding-box verdict");
            colliding.push(block.id);
        } else if chars.iter().any(|c| c.rect.intersects(&proposed)) {
            confirmed += 1;
            colliding.push(block.id);
        }
    }

    let collision_type = if confirmed > 0 {
        CollisionType::CharacterLevel
    } else if colliding.is_empty() {
        CollisionType::None
    } else {
        CollisionType::BoundingBox
    };
    CollisionResult::new(proposed, colliding, collision_type)
}
