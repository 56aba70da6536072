//! Canvas configuration with defaults and environment overrides.
//!
//! Every knob has a compiled-in default (see [`crate::consts`]). Hosts that
//! have an environment (the CLI, native previews) can override them:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `CANVAS_CACHE_TTL_MS` | `measure.cache_ttl_ms` | 5000 |
//! | `CANVAS_HEIGHT_EPSILON` | `measure.height_epsilon` | 0.1 |
//! | `CANVAS_LINE_JUMP_PX` | `measure.line_jump_px` | 2.0 |
//! | `CANVAS_FALLBACK_WIDTH` | `measure.fallback_width` | 20.0 |
//! | `CANVAS_FALLBACK_LINE_HEIGHT` | `measure.fallback_line_height` | 5.0 |
//! | `CANVAS_PROXIMITY_MARGIN` | `collision.proximity_margin` | 1.0 |
//! | `CANVAS_CHAR_REFINEMENT` | `collision.character_refinement` | false |
//!
//! Present but unparseable or out-of-range values are errors rather than
//! silently falling back, so a typo in a deployment is visible.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CACHE_TTL_MS, DEFAULT_PROXIMITY_MARGIN_PERCENT, FALLBACK_LINE_HEIGHT_PERCENT, FALLBACK_WIDTH_PERCENT,
    HEIGHT_SCALE_EPSILON, LINE_JUMP_THRESHOLD_PX,
};
use crate::error::ConfigError;

/// Measurement service settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    /// Cache entry lifetime in milliseconds.
    pub cache_ttl_ms: f64,
    /// Height-scale changes at or below this are ignored.
    pub height_epsilon: f64,
    /// Vertical glyph jump that starts a new line, in pixels.
    pub line_jump_px: f64,
    /// Width used when a block has neither layout nor a stored width, in percent.
    pub fallback_width: f64,
    /// Estimated height of one line at the base font size, in percent.
    pub fallback_line_height: f64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            height_epsilon: HEIGHT_SCALE_EPSILON,
            line_jump_px: LINE_JUMP_THRESHOLD_PX,
            fallback_width: FALLBACK_WIDTH_PERCENT,
            fallback_line_height: FALLBACK_LINE_HEIGHT_PERCENT,
        }
    }
}

/// Collision detector settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionOptions {
    /// Margin added around each block's bounding box, in percent of each axis.
    pub proximity_margin: f64,
    /// Confirm bounding-box candidates against individual glyph rects.
    pub character_refinement: bool,
    /// Attach the proximity zones that were checked to every result.
    pub include_zones: bool,
}

impl Default for CollisionOptions {
    fn default() -> Self {
        Self {
            proximity_margin: DEFAULT_PROXIMITY_MARGIN_PERCENT,
            character_refinement: false,
            include_zones: false,
        }
    }
}

/// Full configuration for one canvas instance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub measure: MeasureConfig,
    pub collision: CollisionOptions,
}

impl CanvasConfig {
    /// Build config from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable,
    /// non-UTF-8 or out-of-range value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|var| env_value(var, std::env::var(var)))
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is unparseable or out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_source(|var| Ok(lookup(var)))
    }

    fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
    {
        let d = Self::default();
        let measure = MeasureConfig {
            cache_ttl_ms: parse_f64(&source, "CANVAS_CACHE_TTL_MS", d.measure.cache_ttl_ms, Bound::NonNegative)?,
            height_epsilon: parse_f64(&source, "CANVAS_HEIGHT_EPSILON", d.measure.height_epsilon, Bound::NonNegative)?,
            line_jump_px: parse_f64(&source, "CANVAS_LINE_JUMP_PX", d.measure.line_jump_px, Bound::Positive)?,
            fallback_width: parse_f64(&source, "CANVAS_FALLBACK_WIDTH", d.measure.fallback_width, Bound::Positive)?,
            fallback_line_height: parse_f64(
                &source,
                "CANVAS_FALLBACK_LINE_HEIGHT",
                d.measure.fallback_line_height,
                Bound::Positive,
            )?,
        };
        let collision = CollisionOptions {
            proximity_margin: parse_f64(
                &source,
                "CANVAS_PROXIMITY_MARGIN",
                d.collision.proximity_margin,
                Bound::NonNegative,
            )?,
            character_refinement: parse_bool(&source, "CANVAS_CHAR_REFINEMENT", d.collision.character_refinement)?,
            include_zones: d.collision.include_zones,
        };
        Ok(Self { measure, collision })
    }
}

/// Validate a proximity margin supplied outside the environment (CLI flags, host settings).
///
/// # Errors
///
/// Returns `ConfigError::Invalid` for non-finite values and
/// `ConfigError::OutOfRange` for negative ones.
pub fn check_proximity_margin(var: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid { var, value: value.to_string() });
    }
    check_bound(var, value, Bound::NonNegative)
}

fn env_value(var: &'static str, value: Result<String, VarError>) -> Result<Option<String>, ConfigError> {
    match value {
        Ok(v) => Ok(Some(v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::Invalid { var, value: raw.to_string_lossy().into_owned() }),
    }
}

#[derive(Clone, Copy)]
enum Bound {
    NonNegative,
    Positive,
}

fn check_bound(var: &'static str, value: f64, bound: Bound) -> Result<f64, ConfigError> {
    match bound {
        Bound::NonNegative if value < 0.0 => Err(ConfigError::OutOfRange { var, expected: ">= 0", value }),
        Bound::Positive if value <= 0.0 => Err(ConfigError::OutOfRange { var, expected: "> 0", value }),
        _ => Ok(value),
    }
}

fn parse_f64<F>(source: &F, var: &'static str, default: f64, bound: Bound) -> Result<f64, ConfigError>
where
    F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
{
    let Some(raw) = source(var)? else {
        return Ok(default);
    };
    let value = match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return Err(ConfigError::Invalid { var, value: raw }),
    };
    check_bound(var, value, bound)
}

fn parse_bool<F>(source: &F, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
{
    let Some(raw) = source(var)? else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value: raw }),
    }
}
