//! Block records: the read-only shape the persisted store hands to the core.
//!
//! This module defines the text block record (`TextBlock`), its typography
//! (`BlockStyle`), a sparse-update type for incremental edits (`PartialBlock`),
//! and the in-memory store a canvas keeps in sync with the persisted store
//! (`BlockStore`).
//!
//! The measurement cache keys its validity on two hashes computed here:
//! [`content_hash`] over the text and [`style_hash`] over the typography
//! properties that change layout. Colour and decoration are left out of the
//! style hash so cosmetic edits never force a re-measure.

#[cfg(test)]
#[path = "block_test.rs"]
mod block_test;

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a text block.
pub type BlockId = Uuid;

/// Typography of a text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyle {
    /// Font size in CSS pixels.
    pub font_size: f64,
    pub font_family: String,
    /// Numeric CSS font weight (400 regular, 700 bold).
    pub font_weight: u16,
    /// Text colour as a CSS colour string.
    pub color: String,
    /// CSS text decoration (`underline`, `line-through`), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_family: "sans-serif".to_owned(),
            font_weight: 400,
            color: "#1F1A17".to_owned(),
            text_decoration: None,
        }
    }
}

impl BlockStyle {
    /// Whether `other` differs from `self` in a property that changes layout.
    #[must_use]
    pub fn layout_differs(&self, other: &BlockStyle) -> bool {
        style_hash(self) != style_hash(other)
    }
}

/// A text block as stored in the persisted store and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: BlockId,
    /// Left edge in canvas-width percent.
    pub x: f64,
    /// Top edge in canvas-height percent.
    pub y: f64,
    /// Last known width in canvas-width percent, if the store has one.
    #[serde(default)]
    pub width: Option<f64>,
    /// Last known height in canvas-height percent, if the store has one.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub style: BlockStyle,
}

impl TextBlock {
    /// A block with default style and no stored size.
    #[must_use]
    pub fn new(id: BlockId, x: f64, y: f64, content: impl Into<String>) -> Self {
        Self { id, x, y, width: None, height: None, content: content.into(), style: BlockStyle::default() }
    }

    /// Stored width, if positive.
    #[must_use]
    pub fn stored_width(&self) -> Option<f64> {
        self.width.filter(|w| *w > 0.0)
    }

    /// Stored height, if positive.
    #[must_use]
    pub fn stored_height(&self) -> Option<f64> {
        self.height.filter(|h| *h > 0.0)
    }
}

/// Hash of the block text.
#[must_use]
pub fn content_hash(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Hash of the layout-affecting style properties: font size, family and weight.
#[must_use]
pub fn style_hash(style: &BlockStyle) -> u64 {
    let mut hasher = DefaultHasher::new();
    style.font_size.to_bits().hash(&mut hasher);
    style.font_family.hash(&mut hasher);
    style.font_weight.hash(&mut hasher);
    hasher.finish()
}

/// Sparse update for a text block. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<BlockStyle>,
}

/// What an applied [`PartialBlock`] actually changed.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockChange {
    pub moved: bool,
    pub resized: bool,
    pub content: bool,
    /// A layout-affecting style property changed.
    pub layout_style: bool,
    /// Only cosmetic style properties changed.
    pub cosmetic_style: bool,
}

impl BlockChange {
    /// Whether any cached geometry for the block is now wrong.
    #[must_use]
    pub fn affects_geometry(&self) -> bool {
        self.moved || self.resized || self.content || self.layout_style
    }
}

/// In-memory store of text blocks.
#[derive(Debug, Default)]
pub struct BlockStore {
    blocks: HashMap<BlockId, TextBlock>,
}

impl BlockStore {
    #[must_use]
    pub fn new() -> Self {
        Self { blocks: HashMap::new() }
    }

    /// Insert or replace a block.
    pub fn insert(&mut self, block: TextBlock) {
        self.blocks.insert(block.id, block);
    }

    pub fn remove(&mut self, id: &BlockId) -> Option<TextBlock> {
        self.blocks.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &BlockId) -> Option<&TextBlock> {
        self.blocks.get(id)
    }

    /// Apply a partial update to an existing block. Returns `None` if the block doesn't exist.
    #[allow(clippy::float_cmp)]
    pub fn apply_partial(&mut self, id: &BlockId, partial: &PartialBlock) -> Option<BlockChange> {
        let block = self.blocks.get_mut(id)?;
        let mut change = BlockChange::default();

        if let Some(x) = partial.x {
            change.moved |= x != block.x;
            block.x = x;
        }
        if let Some(y) = partial.y {
            change.moved |= y != block.y;
            block.y = y;
        }
        if let Some(w) = partial.width {
            change.resized |= block.width != Some(w);
            block.width = Some(w);
        }
        if let Some(h) = partial.height {
            change.resized |= block.height != Some(h);
            block.height = Some(h);
        }
        if let Some(ref content) = partial.content {
            change.content = *content != block.content;
            block.content.clone_from(content);
        }
        if let Some(ref style) = partial.style {
            if block.style.layout_differs(style) {
                change.layout_style = true;
            } else if block.style != *style {
                change.cosmetic_style = true;
            }
            block.style = style.clone();
        }
        Some(change)
    }

    /// Replace all blocks with a full snapshot.
    pub fn load_snapshot(&mut self, blocks: Vec<TextBlock>) {
        self.blocks.clear();
        for block in blocks {
            self.blocks.insert(block.id, block);
        }
    }

    /// All blocks sorted by `(y, x, id)`, top-to-bottom reading order.
    #[must_use]
    pub fn sorted_blocks(&self) -> Vec<&TextBlock> {
        let mut blocks: Vec<&TextBlock> = self.blocks.values().collect();
        blocks.sort_by(|a, b| {
            a.y.total_cmp(&b.y)
                .then_with(|| a.x.total_cmp(&b.x))
                .then_with(|| a.id.cmp(&b.id))
        });
        blocks
    }

    /// Owned copy of every block in reading order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TextBlock> {
        self.sorted_blocks().into_iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
