//! Measurement service: rendered layout → canvas percentages, with caching.
//!
//! DESIGN
//! ======
//! One `MeasurementService` per canvas instance, owned by whoever owns the
//! canvas and lent by `&mut` to the collision detector and debug views.
//! The host registers a [`RenderedBlock`] for every mounted block and binds
//! the [`CanvasRoot`]; the service only ever asks those handles for rects.
//!
//! Measurements are cached per block and enriched on demand: the bounding
//! box first, then characters and lines together from one glyph pass. An
//! entry is valid while it is younger than the TTL and the block's content
//! hash and layout-style hash still match. Rebinding the root or changing
//! the height scale clears everything, since every cached percentage is
//! relative to both.
//!
//! TRADE-OFFS
//! ==========
//! The layout tree can change under the cache at any time (remote edits
//! re-render blocks). Staleness is bounded by the TTL and by explicit
//! `invalidate` calls; there is no retry or blocking. Nothing here returns an
//! error: blocks that cannot be measured get the heuristic fallback rect,
//! which is never cached so the first successful read replaces it.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::block::{BlockId, TextBlock, content_hash, style_hash};
use crate::clock::{Clock, SystemClock};
use crate::config::MeasureConfig;
use crate::consts::DEFAULT_CANVAS_HEIGHT_PERCENT;
use crate::error::LayoutError;
use crate::frame::CanvasFrame;
use crate::geometry::{CanvasRect, CharacterMeasurement, LineMeasurement, PixelRect};
use crate::layout::{CanvasRoot, RenderedBlock};
use crate::legacy::HeuristicEstimator;
use crate::lines::{TextMeasurement, measure_text};

// =============================================================================
// TYPES
// =============================================================================

/// Cached measurement of one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMeasurement {
    pub block_id: BlockId,
    /// Clock time the bounding box was read, in milliseconds.
    pub timestamp: f64,
    pub bounding_box: CanvasRect,
    /// Filled on the first line or character query.
    pub lines: Option<Vec<LineMeasurement>>,
    /// Filled on the first line or character query.
    pub characters: Option<Vec<CharacterMeasurement>>,
    pub content_hash: u64,
    pub style_hash: u64,
}

/// Cache contents summary for development overlays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub count: usize,
    pub block_ids: Vec<BlockId>,
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct MeasurementService {
    config: MeasureConfig,
    estimator: HeuristicEstimator,
    clock: Box<dyn Clock>,
    root: Option<Box<dyn CanvasRoot>>,
    height_percent: f64,
    elements: HashMap<BlockId, Box<dyn RenderedBlock>>,
    cache: HashMap<BlockId, BlockMeasurement>,
}

impl MeasurementService {
    /// A service on the wall clock with no canvas bound yet.
    #[must_use]
    pub fn new(config: MeasureConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(config: MeasureConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            estimator: HeuristicEstimator::from_config(&config),
            clock,
            root: None,
            height_percent: DEFAULT_CANVAS_HEIGHT_PERCENT,
            elements: HashMap::new(),
            cache: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    #[must_use]
    pub fn estimator(&self) -> &HeuristicEstimator {
        &self.estimator
    }

    // --- Canvas binding ---

    /// Bind the canvas root and height scale. Clears the whole cache.
    pub fn set_canvas(&mut self, root: Box<dyn CanvasRoot>, height_percent: f64) {
        self.root = Some(root);
        self.height_percent = height_percent;
        self.clear_cache();
        tracing::debug!(height_percent, "canvas bound");
    }

    /// Unbind the canvas root (canvas torn down). Clears the whole cache.
    pub fn unbind_canvas(&mut self) {
        self.root = None;
        self.clear_cache();
        tracing::debug!("canvas unbound");
    }

    #[must_use]
    pub fn has_canvas(&self) -> bool {
        self.root.is_some()
    }

    #[must_use]
    pub fn height_percent(&self) -> f64 {
        self.height_percent
    }

    /// Update the height scale. Changes within the epsilon are ignored; a real
    /// change clears the cache. Returns whether the scale changed.
    pub fn update_canvas_height(&mut self, height_percent: f64) -> bool {
        if !height_percent.is_finite() || height_percent <= 0.0 {
            return false;
        }
        if (height_percent - self.height_percent).abs() <= self.config.height_epsilon {
            return false;
        }
        tracing::debug!(from = self.height_percent, to = height_percent, "canvas height scale changed");
        self.height_percent = height_percent;
        self.clear_cache();
        true
    }

    // --- Element registration ---

    /// Register the rendered handle for a mounted block, replacing any previous one.
    pub fn register(&mut self, id: BlockId, element: Box<dyn RenderedBlock>) {
        self.elements.insert(id, element);
        self.cache.remove(&id);
    }

    /// Drop the rendered handle for an unmounted block. Returns whether one was registered.
    pub fn unregister(&mut self, id: &BlockId) -> bool {
        self.cache.remove(id);
        self.elements.remove(id).is_some()
    }

    #[must_use]
    pub fn is_registered(&self, id: &BlockId) -> bool {
        self.elements.contains_key(id)
    }

    // --- Eviction ---

    /// Evict cached measurements for `ids`.
    pub fn invalidate(&mut self, ids: &[BlockId]) {
        for id in ids {
            if self.cache.remove(id).is_some() {
                tracing::trace!(block_id = %id, "measurement invalidated");
            }
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    // --- Queries ---

    /// Bounding box of `block` in canvas percentages.
    ///
    /// Served from cache when valid, otherwise read from the registered
    /// element. Falls back to the heuristic estimate when the block cannot be
    /// measured. Never zero-height.
    pub fn bounding_box(&mut self, block: &TextBlock) -> CanvasRect {
        match self.ensure_entry(block) {
            Some(entry) => entry.bounding_box,
            None => self.fallback_rect(block),
        }
    }

    /// Visual lines of `block`. Empty when the block cannot be measured.
    pub fn line_measurements(&mut self, block: &TextBlock) -> &[LineMeasurement] {
        match self.ensure_text(block) {
            Some(entry) => entry.lines.as_deref().unwrap_or(&[]),
            None => &[],
        }
    }

    /// Per-character rects of `block`. Empty when the block cannot be measured.
    ///
    /// Costs one layout read per character on a cache miss.
    pub fn character_measurements(&mut self, block: &TextBlock) -> &[CharacterMeasurement] {
        match self.ensure_text(block) {
            Some(entry) => entry.characters.as_deref().unwrap_or(&[]),
            None => &[],
        }
    }

    /// The heuristic rect used when `block` cannot be measured.
    #[must_use]
    pub fn fallback_rect(&self, block: &TextBlock) -> CanvasRect {
        self.estimator.estimate_rect(block)
    }

    /// The cached entry for `id`, valid or not.
    #[must_use]
    pub fn cached(&self, id: &BlockId) -> Option<&BlockMeasurement> {
        self.cache.get(id)
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        let mut block_ids: Vec<BlockId> = self.cache.keys().copied().collect();
        block_ids.sort();
        CacheStats { count: block_ids.len(), block_ids }
    }

    // --- Coordinate conversion ---

    /// Convert a rendered pixel rect to canvas percentages against the current root.
    #[must_use]
    pub fn normalize(&self, px: PixelRect) -> Option<CanvasRect> {
        match self.frame() {
            Ok(frame) => Some(frame.normalize(px)),
            Err(err) => {
                tracing::debug!(error = %err, "cannot normalize without a usable root");
                None
            }
        }
    }

    /// Convert canvas percentages to rendered pixels against the current root.
    #[must_use]
    pub fn denormalize(&self, rect: CanvasRect) -> Option<PixelRect> {
        match self.frame() {
            Ok(frame) => Some(frame.denormalize(rect)),
            Err(err) => {
                tracing::debug!(error = %err, "cannot denormalize without a usable root");
                None
            }
        }
    }

    // --- Internals ---

    fn frame(&self) -> Result<CanvasFrame, LayoutError> {
        let root = self.root.as_ref().ok_or(LayoutError::RootUnbound)?;
        CanvasFrame::new(root.rect()?, self.height_percent).ok_or(LayoutError::RootCollapsed)
    }

    fn is_valid(&self, block: &TextBlock, now: f64) -> bool {
        self.cache.get(&block.id).is_some_and(|entry| {
            now - entry.timestamp < self.config.cache_ttl_ms
                && entry.content_hash == content_hash(&block.content)
                && entry.style_hash == style_hash(&block.style)
        })
    }

    fn read_bounding_box(&self, block: &TextBlock) -> Result<CanvasRect, LayoutError> {
        let element = self.elements.get(&block.id).ok_or(LayoutError::NotMounted(block.id))?;
        let frame = self.frame()?;
        let mut rect = frame.normalize(element.rect()?);
        if rect.height <= 0.0 {
            rect.height = match block.stored_height() {
                Some(h) => h,
                None => self.estimator.estimate_height(block, rect.width),
            };
        }
        Ok(rect)
    }

    /// Make sure a valid entry with a bounding box exists for `block`.
    fn ensure_entry(&mut self, block: &TextBlock) -> Option<&mut BlockMeasurement> {
        let now = self.clock.now_ms();
        if self.is_valid(block, now) {
            tracing::trace!(block_id = %block.id, "measurement cache hit");
            return self.cache.get_mut(&block.id);
        }

        match self.read_bounding_box(block) {
            Ok(bounding_box) => {
                tracing::trace!(block_id = %block.id, "measured bounding box");
                self.cache.insert(
                    block.id,
                    BlockMeasurement {
                        block_id: block.id,
                        timestamp: now,
                        bounding_box,
                        lines: None,
                        characters: None,
                        content_hash: content_hash(&block.content),
                        style_hash: style_hash(&block.style),
                    },
                );
                self.cache.get_mut(&block.id)
            }
            Err(err) => {
                tracing::debug!(block_id = %block.id, error = %err, "using fallback rect");
                self.cache.remove(&block.id);
                None
            }
        }
    }

    /// Make sure a valid entry with characters and lines exists for `block`.
    fn ensure_text(&mut self, block: &TextBlock) -> Option<&BlockMeasurement> {
        let has_text = self.ensure_entry(block)?.characters.is_some();
        if has_text {
            return self.cache.get(&block.id);
        }

        let text = match self.read_text(block) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(block_id = %block.id, error = %err, "text measurement unavailable");
                return None;
            }
        };
        tracing::trace!(
            block_id = %block.id,
            characters = text.characters.len(),
            lines = text.lines.len(),
            "measured text"
        );
        let entry = self.cache.get_mut(&block.id)?;
        entry.characters = Some(text.characters);
        entry.lines = Some(text.lines);
        Some(&*entry)
    }

    fn read_text(&self, block: &TextBlock) -> Result<TextMeasurement, LayoutError> {
        let element = self.elements.get(&block.id).ok_or(LayoutError::NotMounted(block.id))?;
        let frame = self.frame()?;
        let glyphs = element.glyphs()?;
        Ok(measure_text(&glyphs, &frame, self.config.line_jump_px))
    }
}
