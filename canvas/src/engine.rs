use uuid::Uuid;

use crate::block::{BlockChange, BlockId, BlockStore, PartialBlock, TextBlock};
use crate::clock::Clock;
use crate::collision::{CollisionDetector, CollisionResult, ProximityZone};
use crate::config::CanvasConfig;
use crate::consts::DEFAULT_CANVAS_HEIGHT_PERCENT;
use crate::geometry::{CanvasRect, Point, Size};
use crate::layout::{CanvasRoot, RenderedBlock};
use crate::measure::MeasurementService;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Outcomes of placement requests, returned for the host to persist.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    BlockCreated(TextBlock),
    BlockUpdated { id: BlockId, fields: PartialBlock },
    Rejected(CollisionResult),
}

/// State of one canvas instance: blocks, their measurements, and the detector.
///
/// Instances share nothing, so previews and tests can run side by side.
pub struct CanvasCore {
    pub blocks: BlockStore,
    pub measure: MeasurementService,
    pub detector: CollisionDetector,
    pub canvas_height_percent: f64,
}

impl Default for CanvasCore {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasCore {
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self::from_parts(MeasurementService::new(config.measure), config)
    }

    #[must_use]
    pub fn with_clock(config: CanvasConfig, clock: Box<dyn Clock>) -> Self {
        Self::from_parts(MeasurementService::with_clock(config.measure, clock), config)
    }

    fn from_parts(measure: MeasurementService, config: CanvasConfig) -> Self {
        Self {
            blocks: BlockStore::new(),
            measure,
            detector: CollisionDetector::new(config.collision),
            canvas_height_percent: DEFAULT_CANVAS_HEIGHT_PERCENT,
        }
    }

    // --- Data inputs ---

    /// Hydrate the block store from a persisted snapshot.
    pub fn load_snapshot(&mut self, blocks: Vec<TextBlock>) {
        self.blocks.load_snapshot(blocks);
        self.measure.clear_cache();
    }

    /// Apply a persisted create.
    pub fn apply_create(&mut self, block: TextBlock) {
        self.measure.invalidate(&[block.id]);
        self.blocks.insert(block);
    }

    /// Apply a persisted update. Cosmetic style edits keep the cached geometry.
    pub fn apply_update(&mut self, id: &BlockId, fields: &PartialBlock) -> Option<BlockChange> {
        let change = self.blocks.apply_partial(id, fields)?;
        if change.affects_geometry() {
            self.measure.invalidate(&[*id]);
        }
        Some(change)
    }

    /// Apply a persisted delete.
    pub fn apply_delete(&mut self, id: &BlockId) {
        self.blocks.remove(id);
        self.measure.invalidate(&[*id]);
    }

    // --- Canvas and rendered elements ---

    pub fn set_canvas(&mut self, root: Box<dyn CanvasRoot>, height_percent: f64) {
        self.measure.set_canvas(root, height_percent);
        self.canvas_height_percent = height_percent;
    }

    /// Record a new height scale as the canvas grows or shrinks with content.
    pub fn update_canvas_height(&mut self, height_percent: f64) -> bool {
        let changed = self.measure.update_canvas_height(height_percent);
        if changed {
            self.canvas_height_percent = height_percent;
        }
        changed
    }

    pub fn mount(&mut self, id: BlockId, element: Box<dyn RenderedBlock>) {
        self.measure.register(id, element);
    }

    pub fn unmount(&mut self, id: &BlockId) -> bool {
        self.measure.unregister(id)
    }

    // --- Placement ---

    /// Move a block to `to` unless the new position collides.
    pub fn try_move(&mut self, id: &BlockId, to: Point) -> Action {
        let Some(block) = self.blocks.get(id).cloned() else {
            return Action::None;
        };
        let all = self.blocks.snapshot();
        let result = self.detector.check_move_collision(&mut self.measure, &block, to, &all, self.canvas_height_percent);
        if result.collides {
            return Action::Rejected(result);
        }
        let fields = PartialBlock { x: Some(to.x), y: Some(to.y), ..PartialBlock::default() };
        self.apply_update(id, &fields);
        Action::BlockUpdated { id: *id, fields }
    }

    /// Resize a block to `new_width` unless the new extent collides.
    pub fn try_resize(&mut self, id: &BlockId, new_width: f64) -> Action {
        let Some(block) = self.blocks.get(id).cloned() else {
            return Action::None;
        };
        let all = self.blocks.snapshot();
        let result =
            self.detector.check_resize_collision(&mut self.measure, &block, new_width, &all, self.canvas_height_percent);
        if result.collides {
            return Action::Rejected(result);
        }
        let fields = PartialBlock { width: Some(new_width), ..PartialBlock::default() };
        self.apply_update(id, &fields);
        Action::BlockUpdated { id: *id, fields }
    }

    /// Create a block of size `preview` centered on `cursor` unless it collides.
    pub fn try_add_text(&mut self, cursor: Point, preview: Size, content: &str) -> Action {
        let all = self.blocks.snapshot();
        let result =
            self.detector.check_add_text_collision(&mut self.measure, cursor, preview, &all, self.canvas_height_percent);
        if result.collides {
            return Action::Rejected(result);
        }
        let rect = CanvasRect::centered_on(cursor, preview);
        let mut block = TextBlock::new(Uuid::new_v4(), rect.x, rect.y, content);
        block.width = Some(rect.width);
        block.height = Some(rect.height);
        self.apply_create(block.clone());
        Action::BlockCreated(block)
    }

    // --- Queries ---

    #[must_use]
    pub fn block(&self, id: &BlockId) -> Option<&TextBlock> {
        self.blocks.get(id)
    }

    /// Measured bounding box of a stored block.
    pub fn bounding_box(&mut self, id: &BlockId) -> Option<CanvasRect> {
        let block = self.blocks.get(id)?;
        Some(self.measure.bounding_box(block))
    }

    /// Proximity zones of every stored block.
    pub fn proximity_zones(&mut self) -> Vec<ProximityZone> {
        let all = self.blocks.snapshot();
        self.detector.proximity_zones(&mut self.measure, &all, &[])
    }
}
