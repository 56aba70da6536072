//! Character and line measurement from per-glyph rects.
//!
//! The layout engine reports one rect per character and nothing about lines.
//! Line boundaries are recovered by watching the glyph tops: when a glyph sits
//! more than `line_jump_px` above or below the previous measured glyph, a new
//! visual line starts. A line that starts right after a `'\n'` glyph came from
//! an explicit break; any other new line came from word wrap.

#[cfg(test)]
#[path = "lines_test.rs"]
mod lines_test;

use crate::frame::CanvasFrame;
use crate::geometry::{CanvasRect, CharacterMeasurement, Glyph, LineMeasurement};

/// Characters and lines of one block, in canvas percentages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMeasurement {
    pub characters: Vec<CharacterMeasurement>,
    pub lines: Vec<LineMeasurement>,
}

struct OpenLine {
    start: usize,
    end: usize,
    is_wrapped: bool,
    rects: Vec<CanvasRect>,
}

impl OpenLine {
    fn close(self, line_index: usize) -> LineMeasurement {
        LineMeasurement {
            line_index,
            start_char_index: self.start,
            end_char_index: self.end,
            rect: CanvasRect::union_all(self.rects).unwrap_or(CanvasRect::ZERO),
            is_wrapped: self.is_wrapped,
        }
    }
}

/// Measure every glyph and group them into visual lines.
///
/// Glyphs with empty rects (collapsed whitespace, explicit breaks) are not
/// measured but still occupy an index, so indices line up with the glyph
/// sequence the layout engine reported.
#[must_use]
pub fn measure_text(glyphs: &[Glyph], frame: &CanvasFrame, line_jump_px: f64) -> TextMeasurement {
    let mut out = TextMeasurement::default();
    let mut open: Option<OpenLine> = None;
    let mut prev_top: Option<f64> = None;
    let mut after_break = false;

    for (index, glyph) in glyphs.iter().enumerate() {
        if glyph.ch == '\n' {
            after_break = true;
            continue;
        }
        if glyph.rect.is_empty() {
            continue;
        }

        let jumped = prev_top.is_some_and(|top| (glyph.rect.top - top).abs() > line_jump_px);
        if jumped {
            if let Some(line) = open.take() {
                out.lines.push(line.close(out.lines.len()));
            }
        }
        let line = open.get_or_insert_with(|| OpenLine {
            start: index,
            end: index,
            is_wrapped: prev_top.is_some() && !after_break,
            rects: Vec::new(),
        });

        let rect = frame.normalize(glyph.rect);
        line.end = index + 1;
        line.rects.push(rect);
        out.characters.push(CharacterMeasurement { ch: glyph.ch, index, rect, line_index: out.lines.len() });

        prev_top = Some(glyph.rect.top);
        after_break = false;
    }

    if let Some(line) = open.take() {
        out.lines.push(line.close(out.lines.len()));
    }
    out
}
