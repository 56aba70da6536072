#![allow(clippy::float_cmp)]

use canvas_layout::geometry::CanvasRect;

use super::*;

const ID_A: &str = "6f3c1f0e-8a47-4c65-9a0d-2b8f7a1c0d01";
const ID_B: &str = "6f3c1f0e-8a47-4c65-9a0d-2b8f7a1c0d02";

fn sample() -> CanvasSnapshot {
    let raw = format!(
        r#"{{
            "canvas_height_percent": 100.0,
            "root": {{ "left": 0, "top": 0, "width": 1000, "height": 1000 }},
            "mono": {{ "char_width": 10, "line_height": 20, "padding_x": 0, "padding_y": 0 }},
            "blocks": [
                {{ "id": "{ID_A}", "x": 10, "y": 10, "content": "hello" }},
                {{ "id": "{ID_B}", "x": 50, "y": 50, "width": 10, "height": 4, "content": "ghost" }}
            ],
            "layouts": {{
                "{ID_A}": {{ "rect": {{ "left": 100, "top": 100, "width": 200, "height": 50 }} }}
            }}
        }}"#
    );
    match CanvasSnapshot::parse(&raw) {
        Ok(s) => s,
        Err(e) => panic!("sample snapshot should parse: {e}"),
    }
}

fn id(raw: &str) -> BlockId {
    match raw.parse() {
        Ok(id) => id,
        Err(e) => panic!("bad id {raw}: {e}"),
    }
}

#[test]
fn parses_blocks_and_layouts() {
    let s = sample();
    assert_eq!(s.blocks.len(), 2);
    assert_eq!(s.layouts.len(), 1);
    assert_eq!(s.blocks[0].style.font_size, 16.0);
}

#[test]
fn height_percent_defaults_when_missing() {
    let s = CanvasSnapshot::parse(r#"{ "blocks": [] }"#).unwrap_or_default();
    assert_eq!(s.canvas_height_percent, 100.0);
    assert!(s.root.is_none());
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(CanvasSnapshot::parse("{ not json"), Err(CliError::InvalidJson(_))));
}

#[test]
fn service_measures_registered_layouts() {
    let s = sample();
    let mut service = s.measurement_service(MeasureConfig::default());
    assert!(service.is_registered(&id(ID_A)));
    assert!(!service.is_registered(&id(ID_B)));
    assert_eq!(service.bounding_box(&s.blocks[0]), CanvasRect::new(10.0, 10.0, 20.0, 5.0));
    assert_eq!(service.bounding_box(&s.blocks[1]), CanvasRect::new(50.0, 50.0, 10.0, 4.0));
}

#[test]
fn mono_metrics_synthesize_glyphs() {
    let s = sample();
    let mut service = s.measurement_service(MeasureConfig::default());
    assert_eq!(service.character_measurements(&s.blocks[0]).len(), 5);
}

#[test]
fn missing_root_falls_back_for_everything() {
    let mut s = sample();
    s.root = None;
    let mut service = s.measurement_service(MeasureConfig::default());
    assert!(!service.has_canvas());
    assert_eq!(service.bounding_box(&s.blocks[0]), service.fallback_rect(&s.blocks[0]));
}

#[test]
fn unknown_block_lookup_fails() {
    let s = sample();
    assert!(s.block(&id(ID_A)).is_ok());
    assert!(matches!(s.block(&BlockId::nil()), Err(CliError::UnknownBlock(_))));
}
