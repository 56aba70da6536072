//! Geometry records shared by the measurement service and the collision detector.
//!
//! Two coordinate spaces exist. [`PixelRect`] is what the layout engine reports
//! (CSS pixels, viewport-relative). [`CanvasRect`] is what everything else
//! consumes: percentages of the canvas width (x, width) and of the dynamic
//! canvas height scale (y, height). Conversion between the two happens only in
//! [`crate::frame::CanvasFrame`].

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in canvas percentage space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in canvas percentage space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in rendered CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// True when the rect is zero in both dimensions (collapsed whitespace, detached nodes).
    ///
    /// A zero-width rect with height still marks a glyph position and is not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }
}

/// Axis-aligned rectangle in canvas percentage coordinates.
///
/// `x` and `width` are percentages of the canvas width; `y` and `height` are
/// percentages of the dynamic canvas height scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rect of `size` whose center sits on `center`.
    #[must_use]
    pub fn centered_on(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap test.
    ///
    /// Two rects intersect unless one lies entirely left of, right of, above,
    /// or below the other. Rects that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &CanvasRect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// Grow the rect by `margin` on every side.
    #[must_use]
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    /// Smallest rect enclosing every rect in `rects`, or `None` for an empty iterator.
    #[must_use]
    pub fn union_all<I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = CanvasRect>,
    {
        let mut iter = rects.into_iter();
        let first = iter.next()?;
        let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.right(), first.bottom());
        for r in iter {
            left = left.min(r.x);
            top = top.min(r.y);
            right = right.max(r.right());
            bottom = bottom.max(r.bottom());
        }
        Some(Self { x: left, y: top, width: right - left, height: bottom - top })
    }
}

/// One rendered character as reported by the text layout engine, in text order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    pub rect: PixelRect,
}

impl Glyph {
    #[must_use]
    pub fn new(ch: char, rect: PixelRect) -> Self {
        Self { ch, rect }
    }
}

/// A measured character in canvas percentage space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterMeasurement {
    pub ch: char,
    /// Position of the character in the block's glyph sequence.
    pub index: usize,
    pub rect: CanvasRect,
    /// Visual line the character was laid out on.
    pub line_index: usize,
}

/// A visual line of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineMeasurement {
    pub line_index: usize,
    /// Index of the first character on the line.
    pub start_char_index: usize,
    /// One past the index of the last character on the line.
    pub end_char_index: usize,
    pub rect: CanvasRect,
    /// True when the line exists because of word wrap rather than an explicit break.
    pub is_wrapped: bool,
}
