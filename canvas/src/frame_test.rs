#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn px_approx_eq(a: PixelRect, b: PixelRect) -> bool {
    approx_eq(a.left, b.left) && approx_eq(a.top, b.top) && approx_eq(a.width, b.width) && approx_eq(a.height, b.height)
}

fn frame(root: PixelRect, height_percent: f64) -> CanvasFrame {
    let Some(f) = CanvasFrame::new(root, height_percent) else {
        panic!("frame should be valid for {root:?}");
    };
    f
}

// --- construction ---

#[test]
fn zero_width_root_has_no_frame() {
    assert!(CanvasFrame::new(PixelRect::new(0.0, 0.0, 0.0, 600.0), 100.0).is_none());
}

#[test]
fn zero_height_root_has_no_frame() {
    assert!(CanvasFrame::new(PixelRect::new(0.0, 0.0, 800.0, 0.0), 100.0).is_none());
}

#[test]
fn non_positive_height_scale_has_no_frame() {
    assert!(CanvasFrame::new(PixelRect::new(0.0, 0.0, 800.0, 600.0), 0.0).is_none());
}

// --- normalize ---

#[test]
fn normalize_identity_root() {
    let f = frame(PixelRect::new(0.0, 0.0, 1000.0, 1000.0), 100.0);
    let r = f.normalize(PixelRect::new(100.0, 100.0, 200.0, 50.0));
    assert_eq!(r, CanvasRect::new(10.0, 10.0, 20.0, 5.0));
}

#[test]
fn normalize_subtracts_root_offset() {
    let f = frame(PixelRect::new(50.0, 80.0, 1000.0, 1000.0), 100.0);
    let r = f.normalize(PixelRect::new(150.0, 180.0, 200.0, 50.0));
    assert!(approx_eq(r.x, 10.0));
    assert!(approx_eq(r.y, 10.0));
}

#[test]
fn normalize_uses_height_scale() {
    // A canvas grown to 200% spans 200 height units over its rendered height.
    let f = frame(PixelRect::new(0.0, 0.0, 1000.0, 2000.0), 200.0);
    let r = f.normalize(PixelRect::new(0.0, 1000.0, 100.0, 100.0));
    assert!(approx_eq(r.y, 100.0));
    assert!(approx_eq(r.height, 10.0));
}

#[test]
fn normalize_is_zoom_independent() {
    // The same block at 2x zoom: root and element both double in pixels.
    let f1 = frame(PixelRect::new(0.0, 0.0, 800.0, 600.0), 100.0);
    let f2 = frame(PixelRect::new(0.0, 0.0, 1600.0, 1200.0), 100.0);
    let a = f1.normalize(PixelRect::new(80.0, 60.0, 160.0, 30.0));
    let b = f2.normalize(PixelRect::new(160.0, 120.0, 320.0, 60.0));
    assert!(approx_eq(a.x, b.x));
    assert!(approx_eq(a.y, b.y));
    assert!(approx_eq(a.width, b.width));
    assert!(approx_eq(a.height, b.height));
}

// --- round trip ---

#[test]
fn normalize_then_denormalize_recovers_pixels() {
    let f = frame(PixelRect::new(37.5, 12.25, 913.0, 1421.0), 143.7);
    let cases = [
        PixelRect::new(37.5, 12.25, 10.0, 10.0),
        PixelRect::new(400.3, 900.9, 123.4, 56.7),
        PixelRect::new(950.0, 1433.25, 0.5, 0.25),
    ];
    for px in cases {
        let back = f.denormalize(f.normalize(px));
        assert!(px_approx_eq(px, back), "{px:?} -> {back:?}");
    }
}

