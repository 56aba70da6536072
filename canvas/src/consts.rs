//! Shared numeric constants for the canvas crate.

// ── Measurement cache ───────────────────────────────────────────

/// How long a cached block measurement stays valid, in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: f64 = 5_000.0;

/// Minimum change in the canvas height scale that clears the cache.
pub const HEIGHT_SCALE_EPSILON: f64 = 0.1;

/// Vertical jump between consecutive glyphs that starts a new visual line, in pixels.
pub const LINE_JUMP_THRESHOLD_PX: f64 = 2.0;

/// Canvas height scale assumed before the host reports one.
pub const DEFAULT_CANVAS_HEIGHT_PERCENT: f64 = 100.0;

// ── Fallback estimation ─────────────────────────────────────────

/// Block width used when neither layout nor a stored width is available, in percent.
pub const FALLBACK_WIDTH_PERCENT: f64 = 20.0;

/// Height of one text line at the base font size, in canvas-height percent.
pub const FALLBACK_LINE_HEIGHT_PERCENT: f64 = 5.0;

/// Average glyph advance at the base font size, in canvas-width percent.
pub const AVERAGE_CHAR_WIDTH_PERCENT: f64 = 1.0;

/// Font size the fallback line height and glyph advance are calibrated for.
pub const BASE_FONT_SIZE_PX: f64 = 16.0;

// ── Collision ───────────────────────────────────────────────────

/// Proximity margin added around every block, in percent of each axis.
pub const DEFAULT_PROXIMITY_MARGIN_PERCENT: f64 = 1.0;
