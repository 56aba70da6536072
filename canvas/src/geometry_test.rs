#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn rect_approx_eq(a: CanvasRect, b: CanvasRect) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.width, b.width) && approx_eq(a.height, b.height)
}

// =============================================================
// CanvasRect edges
// =============================================================

#[test]
fn right_and_bottom() {
    let r = CanvasRect::new(10.0, 20.0, 5.0, 7.0);
    assert_eq!(r.right(), 15.0);
    assert_eq!(r.bottom(), 27.0);
}

#[test]
fn zero_rect_is_all_zero() {
    assert_eq!(CanvasRect::ZERO, CanvasRect::new(0.0, 0.0, 0.0, 0.0));
}

// =============================================================
// intersects
// =============================================================

#[test]
fn overlapping_rects_intersect() {
    let a = CanvasRect::new(10.0, 10.0, 20.0, 5.0);
    let b = CanvasRect::new(25.0, 10.0, 10.0, 5.0);
    assert!(a.intersects(&b));
}

#[test]
fn contained_rect_intersects() {
    let outer = CanvasRect::new(0.0, 0.0, 50.0, 50.0);
    let inner = CanvasRect::new(10.0, 10.0, 1.0, 1.0);
    assert!(outer.intersects(&inner));
    assert!(inner.intersects(&outer));
}

#[test]
fn shared_vertical_edge_does_not_intersect() {
    let a = CanvasRect::new(10.0, 10.0, 20.0, 5.0);
    let b = CanvasRect::new(30.0, 10.0, 10.0, 5.0);
    assert!(!a.intersects(&b));
}

#[test]
fn shared_horizontal_edge_does_not_intersect() {
    let a = CanvasRect::new(10.0, 10.0, 20.0, 5.0);
    let b = CanvasRect::new(10.0, 15.0, 20.0, 5.0);
    assert!(!a.intersects(&b));
}

#[test]
fn shared_corner_does_not_intersect() {
    let a = CanvasRect::new(0.0, 0.0, 10.0, 10.0);
    let b = CanvasRect::new(10.0, 10.0, 10.0, 10.0);
    assert!(!a.intersects(&b));
}

#[test]
fn separated_rects_do_not_intersect() {
    let a = CanvasRect::new(10.0, 10.0, 20.0, 5.0);
    let b = CanvasRect::new(30.1, 10.0, 10.0, 5.0);
    assert!(!a.intersects(&b));
}

#[test]
fn intersection_is_symmetric() {
    let rects = [
        CanvasRect::new(0.0, 0.0, 10.0, 10.0),
        CanvasRect::new(5.0, 5.0, 10.0, 10.0),
        CanvasRect::new(10.0, 0.0, 5.0, 5.0),
        CanvasRect::new(-5.0, -5.0, 2.0, 2.0),
        CanvasRect::new(2.0, 9.999, 3.0, 1.0),
        CanvasRect::new(0.0, 10.0, 10.0, 10.0),
    ];
    for a in &rects {
        for b in &rects {
            assert_eq!(a.intersects(b), b.intersects(a), "asymmetric for {a:?} / {b:?}");
        }
    }
}

// =============================================================
// expand / centered_on / union_all
// =============================================================

#[test]
fn expand_grows_every_side() {
    let r = CanvasRect::new(10.0, 10.0, 20.0, 5.0).expand(1.0);
    assert!(rect_approx_eq(r, CanvasRect::new(9.0, 9.0, 22.0, 7.0)));
}

#[test]
fn expand_by_zero_is_identity() {
    let r = CanvasRect::new(10.0, 10.0, 20.0, 5.0);
    assert_eq!(r.expand(0.0), r);
}

#[test]
fn expanded_zone_catches_near_miss() {
    let a = CanvasRect::new(10.0, 10.0, 20.0, 5.0);
    let b = CanvasRect::new(30.5, 10.0, 10.0, 5.0);
    assert!(!a.intersects(&b));
    assert!(a.expand(1.0).intersects(&b));
}

#[test]
fn centered_on_puts_center_at_point() {
    let r = CanvasRect::centered_on(Point::new(50.0, 40.0), Size::new(20.0, 10.0));
    assert!(rect_approx_eq(r, CanvasRect::new(40.0, 35.0, 20.0, 10.0)));
}

#[test]
fn union_all_of_nothing_is_none() {
    assert!(CanvasRect::union_all(Vec::new()).is_none());
}

#[test]
fn union_all_encloses_inputs() {
    let u = CanvasRect::union_all([CanvasRect::new(10.0, 10.0, 5.0, 5.0), CanvasRect::new(2.0, 12.0, 3.0, 10.0)]);
    let Some(u) = u else {
        panic!("expected a union rect");
    };
    assert!(rect_approx_eq(u, CanvasRect::new(2.0, 10.0, 13.0, 12.0)));
}

// =============================================================
// PixelRect
// =============================================================

#[test]
fn pixel_rect_empty_only_when_zero_in_both_dimensions() {
    assert!(PixelRect::new(5.0, 5.0, 0.0, 0.0).is_empty());
    assert!(!PixelRect::new(5.0, 5.0, 0.0, 12.0).is_empty());
    assert!(!PixelRect::new(5.0, 5.0, 8.0, 0.0).is_empty());
    assert!(!PixelRect::new(5.0, 5.0, 8.0, 12.0).is_empty());
}

// =============================================================
// serde
// =============================================================

#[test]
fn canvas_rect_serde_roundtrip() {
    let r = CanvasRect::new(1.5, 2.5, 3.5, 4.5);
    let json = serde_json::to_string(&r).unwrap();
    let back: CanvasRect = serde_json::from_str(&json).unwrap();
    assert_eq!(r, back);
}
