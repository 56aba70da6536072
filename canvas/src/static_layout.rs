//! Snapshot-backed layout providers for hosts without a live layout engine.
//!
//! [`StaticRoot`] and [`StaticBlock`] answer layout queries from a stored
//! [`LayoutSnapshot`]. They serve server-side previews, the CLI (which reads
//! pre-rendered layouts from JSON) and tests. Clones share state, so the
//! owner can re-render a block underneath a registered handle the same way
//! a browser re-flows an element.

#[cfg(test)]
#[path = "static_layout_test.rs"]
mod static_layout_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::{Glyph, PixelRect};
use crate::layout::{CanvasRoot, RenderedBlock};

/// A block's rendered layout at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub rect: PixelRect,
    #[serde(default)]
    pub glyphs: Vec<Glyph>,
}

/// Fixed-advance text metrics for [`LayoutSnapshot::monospace`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonoMetrics {
    pub char_width: f64,
    pub line_height: f64,
    /// Space between the block edge and the first glyph column.
    pub padding_x: f64,
    /// Space between the block edge and the first glyph row.
    pub padding_y: f64,
}

impl Default for MonoMetrics {
    fn default() -> Self {
        Self { char_width: 8.0, line_height: 16.0, padding_x: 0.0, padding_y: 0.0 }
    }
}

impl LayoutSnapshot {
    #[must_use]
    pub fn new(rect: PixelRect, glyphs: Vec<Glyph>) -> Self {
        Self { rect, glyphs }
    }

    /// Lay `text` out in a fixed-advance font inside `rect`.
    ///
    /// Characters wrap when the next one would cross the right padding edge;
    /// `'\n'` starts a new row and is emitted as an empty glyph.
    #[must_use]
    pub fn monospace(rect: PixelRect, text: &str, metrics: MonoMetrics) -> Self {
        let usable = rect.width - metrics.padding_x * 2.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let columns = if metrics.char_width > 0.0 { (usable / metrics.char_width).floor().max(1.0) as usize } else { 1 };

        let mut glyphs = Vec::with_capacity(text.len());
        let mut row = 0usize;
        let mut col = 0usize;
        for ch in text.chars() {
            if ch == '\n' {
                let (left, top) = cell_origin(rect, metrics, row, col);
                glyphs.push(Glyph::new(ch, PixelRect::new(left, top, 0.0, 0.0)));
                row += 1;
                col = 0;
                continue;
            }
            if col >= columns {
                row += 1;
                col = 0;
            }
            let (left, top) = cell_origin(rect, metrics, row, col);
            glyphs.push(Glyph::new(ch, PixelRect::new(left, top, metrics.char_width, metrics.line_height)));
            col += 1;
        }
        Self { rect, glyphs }
    }
}

#[allow(clippy::cast_precision_loss)]
fn cell_origin(rect: PixelRect, metrics: MonoMetrics, row: usize, col: usize) -> (f64, f64) {
    (
        rect.left + metrics.padding_x + col as f64 * metrics.char_width,
        rect.top + metrics.padding_y + row as f64 * metrics.line_height,
    )
}

#[derive(Debug, Default)]
struct BlockState {
    layout: LayoutSnapshot,
    detached: bool,
    rect_reads: usize,
    glyph_reads: usize,
}

/// A registered block answering from a snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticBlock {
    state: Rc<RefCell<BlockState>>,
}

impl StaticBlock {
    #[must_use]
    pub fn new(layout: LayoutSnapshot) -> Self {
        Self { state: Rc::new(RefCell::new(BlockState { layout, ..BlockState::default() })) }
    }

    /// Replace the rendered layout, as a re-render would.
    pub fn set_layout(&self, layout: LayoutSnapshot) {
        self.state.borrow_mut().layout = layout;
    }

    /// Make every subsequent read fail as if the element left the document.
    pub fn detach(&self) {
        self.state.borrow_mut().detached = true;
    }

    /// Number of `rect` reads served so far.
    #[must_use]
    pub fn rect_reads(&self) -> usize {
        self.state.borrow().rect_reads
    }

    /// Number of `glyphs` reads served so far.
    #[must_use]
    pub fn glyph_reads(&self) -> usize {
        self.state.borrow().glyph_reads
    }
}

impl RenderedBlock for StaticBlock {
    fn rect(&self) -> Result<PixelRect, LayoutError> {
        let mut state = self.state.borrow_mut();
        if state.detached {
            return Err(LayoutError::Detached);
        }
        state.rect_reads += 1;
        Ok(state.layout.rect)
    }

    fn glyphs(&self) -> Result<Vec<Glyph>, LayoutError> {
        let mut state = self.state.borrow_mut();
        if state.detached {
            return Err(LayoutError::Detached);
        }
        state.glyph_reads += 1;
        Ok(state.layout.glyphs.clone())
    }
}

/// A canvas root with a settable rendered rect.
#[derive(Debug, Clone, Default)]
pub struct StaticRoot {
    rect: Rc<Cell<PixelRect>>,
}

impl StaticRoot {
    #[must_use]
    pub fn new(rect: PixelRect) -> Self {
        Self { rect: Rc::new(Cell::new(rect)) }
    }

    /// Change the rendered rect, as a zoom or window resize would.
    pub fn set_rect(&self, rect: PixelRect) {
        self.rect.set(rect);
    }
}

impl CanvasRoot for StaticRoot {
    fn rect(&self) -> Result<PixelRect, LayoutError> {
        let rect = self.rect.get();
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(LayoutError::RootCollapsed);
        }
        Ok(rect)
    }
}
