//! Browser layout providers over `web-sys`.
//!
//! [`DomCanvasRoot`] wraps the canvas container element. [`DomTextBlock`]
//! wraps a mounted block element and measures its text one character at a
//! time with a DOM `Range`, which is the only way the browser exposes glyph
//! positions. Offsets passed to the range are UTF-16 code units, so
//! astral-plane characters advance the offset by two.

use wasm_bindgen::JsValue;
use web_sys::{Document, DomRect, Element, Node};

use crate::block::BlockId;
use crate::error::LayoutError;
use crate::geometry::{Glyph, PixelRect};
use crate::layout::{CanvasRoot, RenderedBlock};

/// `NodeFilter.SHOW_TEXT`.
const SHOW_TEXT: u32 = 0x4;

/// Selectors tried, in order, for the element holding a block's text.
const TEXT_CONTAINER_SELECTORS: [&str; 2] = [".text-content", "[contenteditable]"];

fn js_error(err: JsValue) -> LayoutError {
    LayoutError::Engine(format!("{err:?}"))
}

fn pixel_rect(rect: &DomRect) -> PixelRect {
    PixelRect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

fn connected_rect(element: &Element) -> Result<PixelRect, LayoutError> {
    if !element.is_connected() {
        return Err(LayoutError::Detached);
    }
    Ok(pixel_rect(&element.get_bounding_client_rect()))
}

/// The canvas container element.
#[derive(Debug, Clone)]
pub struct DomCanvasRoot {
    element: Element,
}

impl DomCanvasRoot {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl CanvasRoot for DomCanvasRoot {
    fn rect(&self) -> Result<PixelRect, LayoutError> {
        let rect = connected_rect(&self.element)?;
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(LayoutError::RootCollapsed);
        }
        Ok(rect)
    }
}

/// A mounted text block element.
#[derive(Debug, Clone)]
pub struct DomTextBlock {
    element: Element,
}

impl DomTextBlock {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// Find the element marked `data-block-id="<id>"` under `root`.
    ///
    /// For hosts that tag blocks in markup instead of registering elements
    /// from their mount hooks.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::Engine` if the selector query throws.
    pub fn locate(root: &Element, id: &BlockId) -> Result<Option<Self>, LayoutError> {
        let selector = format!("[data-block-id=\"{id}\"]");
        let found = root.query_selector(&selector).map_err(js_error)?;
        Ok(found.map(Self::new))
    }

    fn text_container(&self) -> Result<Element, LayoutError> {
        for selector in TEXT_CONTAINER_SELECTORS {
            if let Some(found) = self.element.query_selector(selector).map_err(js_error)? {
                return Ok(found);
            }
        }
        Ok(self.element.clone())
    }

    fn document(&self) -> Result<Document, LayoutError> {
        self.element.owner_document().ok_or(LayoutError::Detached)
    }
}

impl RenderedBlock for DomTextBlock {
    fn rect(&self) -> Result<PixelRect, LayoutError> {
        connected_rect(&self.element)
    }

    fn glyphs(&self) -> Result<Vec<Glyph>, LayoutError> {
        if !self.element.is_connected() {
            return Err(LayoutError::Detached);
        }
        let document = self.document()?;
        let container = self.text_container()?;
        let walker = document.create_tree_walker_with_what_to_show(&container, SHOW_TEXT).map_err(js_error)?;
        let range = document.create_range().map_err(js_error)?;

        let mut glyphs = Vec::new();
        while let Some(node) = walker.next_node().map_err(js_error)? {
            measure_text_node(&node, &range, &mut glyphs)?;
        }
        Ok(glyphs)
    }
}

fn measure_text_node(node: &Node, range: &web_sys::Range, out: &mut Vec<Glyph>) -> Result<(), LayoutError> {
    let Some(text) = node.text_content() else {
        return Ok(());
    };
    let mut offset: u32 = 0;
    for ch in text.chars() {
        let units: u32 = if ch.len_utf16() == 2 { 2 } else { 1 };
        range.set_start(node, offset).map_err(js_error)?;
        range.set_end(node, offset + units).map_err(js_error)?;
        out.push(Glyph::new(ch, pixel_rect(&range.get_bounding_client_rect())));
        offset += units;
    }
    Ok(())
}
