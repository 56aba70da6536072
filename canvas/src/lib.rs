//! Measurement and collision core for percentage-positioned text blocks.
//!
//! Blocks are stored as percentages of the canvas width and of a dynamic
//! canvas height scale, but their real footprint depends on fonts, wrapping
//! and live layout. This crate reads that footprint from the rendering layer,
//! converts it back into canvas percentages, caches it, and answers "would
//! this placement collide?" for move, resize and add-text gestures. The host
//! renders blocks, registers their rendered handles, and persists the
//! resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Per-canvas state and placement actions ([`engine::CanvasCore`]) |
//! | [`measure`] | Measurement service and its cache |
//! | [`collision`] | Proximity-zone and character-level collision detection |
//! | [`legacy`] | Heuristic geometry estimator used when layout is unavailable |
//! | [`lines`] | Line grouping of per-character rects |
//! | [`layout`] | Traits the rendering layer implements |
//! | [`static_layout`] | Snapshot-backed layout providers for previews and tests |
//! | `dom` | Browser layout providers (feature `dom`) |
//! | [`block`] | Text block records and the in-memory block store |
//! | [`geometry`] | Rects and measurement records |
//! | [`frame`] | Pixel to canvas-percentage conversion |
//! | [`config`] | Defaults and environment overrides |
//! | [`clock`] | Time source for cache expiry |
//! | [`debug`] | Development overlay data |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants (TTL, thresholds, fallback sizes) |

pub mod block;
pub mod clock;
pub mod collision;
pub mod config;
pub mod consts;
pub mod debug;
#[cfg(feature = "dom")]
pub mod dom;
pub mod engine;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod layout;
pub mod legacy;
pub mod lines;
pub mod measure;
pub mod static_layout;
