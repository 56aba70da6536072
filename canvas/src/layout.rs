//! Narrow interfaces to the rendering layer.
//!
//! The measurement service never walks a layout tree itself. The host
//! registers one [`RenderedBlock`] per mounted block and binds one
//! [`CanvasRoot`]; the service asks them for rendered pixel rects and nothing
//! else. A browser host implements these over the DOM (see `dom`), a
//! native host over whatever text-shaping library it renders with, and
//! previews or tests over fixed snapshots (see [`crate::static_layout`]).

use crate::error::LayoutError;
use crate::geometry::{Glyph, PixelRect};

/// The element all block positions are relative to.
pub trait CanvasRoot {
    /// Current rendered rect of the canvas root, after any zoom or transform.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if the root cannot be measured right now.
    fn rect(&self) -> Result<PixelRect, LayoutError>;
}

/// A mounted block's rendered text.
pub trait RenderedBlock {
    /// Current rendered rect of the whole block.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if the element cannot be measured (detached, hidden).
    fn rect(&self) -> Result<PixelRect, LayoutError>;

    /// Every character of the block's rendered text with its own rect, in text order.
    ///
    /// Explicit line breaks appear as `'\n'` glyphs; their rects are ignored.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if the text cannot be measured.
    fn glyphs(&self) -> Result<Vec<Glyph>, LayoutError>;
}
