//! Coordinate frame: conversion between rendered pixels and canvas percentages.
//!
//! Every rendered rect passes through [`CanvasFrame::normalize`] before anyone
//! else sees it. The frame is built from the canvas root's own rendered rect,
//! which already reflects any zoom or transform applied to the canvas, so the
//! percentages it produces are scale-free.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use crate::geometry::{CanvasRect, PixelRect};

/// The canvas root's rendered rect plus the current height scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFrame {
    pub root: PixelRect,
    /// Percentage span of the full rendered root height (100 for a canvas one
    /// "page" tall, larger once it has grown to fit content).
    pub height_percent: f64,
}

impl CanvasFrame {
    /// Build a frame. Returns `None` when the root has no usable size, since
    /// dividing by it would produce infinities.
    #[must_use]
    pub fn new(root: PixelRect, height_percent: f64) -> Option<Self> {
        if root.width <= 0.0 || root.height <= 0.0 || height_percent <= 0.0 {
            return None;
        }
        Some(Self { root, height_percent })
    }

    /// Convert a rendered pixel rect to canvas percentages.
    #[must_use]
    pub fn normalize(&self, px: PixelRect) -> CanvasRect {
        CanvasRect {
            x: (px.left - self.root.left) * 100.0 / self.root.width,
            y: (px.top - self.root.top) * self.height_percent / self.root.height,
            width: px.width * 100.0 / self.root.width,
            height: px.height * self.height_percent / self.root.height,
        }
    }

    /// Convert canvas percentages back to rendered pixels.
    #[must_use]
    pub fn denormalize(&self, rect: CanvasRect) -> PixelRect {
        PixelRect {
            left: self.root.left + rect.x * self.root.width / 100.0,
            top: self.root.top + rect.y * self.root.height / self.height_percent,
            width: rect.width * self.root.width / 100.0,
            height: rect.height * self.root.height / self.height_percent,
        }
    }
}
