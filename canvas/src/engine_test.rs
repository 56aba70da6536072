#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::block::BlockStyle;
use crate::clock::ManualClock;
use crate::collision::CollisionType;
use crate::config::CollisionOptions;
use crate::geometry::PixelRect;
use crate::static_layout::{LayoutSnapshot, MonoMetrics, StaticBlock, StaticRoot};

// =============================================================
// Helpers
// =============================================================

fn core_with_margin(margin: f64) -> CanvasCore {
    let config = CanvasConfig {
        collision: CollisionOptions { proximity_margin: margin, ..CollisionOptions::default() },
        ..CanvasConfig::default()
    };
    let mut core = CanvasCore::with_clock(config, Box::new(ManualClock::new(0.0)));
    core.set_canvas(Box::new(StaticRoot::new(PixelRect::new(0.0, 0.0, 1000.0, 1000.0))), 100.0);
    core
}

/// Create and mount a block whose rendered box matches `(x, y, w, h)` percent.
fn add_block(core: &mut CanvasCore, x: f64, y: f64, w: f64, h: f64) -> (BlockId, StaticBlock) {
    let block = TextBlock::new(Uuid::new_v4(), x, y, "text");
    let id = block.id;
    let handle = StaticBlock::new(LayoutSnapshot::monospace(
        PixelRect::new(x * 10.0, y * 10.0, w * 10.0, h * 10.0),
        "text",
        MonoMetrics::default(),
    ));
    core.apply_create(block);
    core.mount(id, Box::new(handle.clone()));
    (id, handle)
}

// =============================================================
// Data inputs
// =============================================================

#[test]
fn load_snapshot_replaces_blocks_and_clears_cache() {
    let mut core = core_with_margin(0.0);
    let (id, _) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    core.bounding_box(&id);
    assert_eq!(core.measure.cache_stats().count, 1);

    let fresh = TextBlock::new(Uuid::new_v4(), 0.0, 0.0, "new");
    core.load_snapshot(vec![fresh.clone()]);
    assert!(core.block(&id).is_none());
    assert!(core.block(&fresh.id).is_some());
    assert_eq!(core.measure.cache_stats().count, 0);
}

#[test]
fn content_update_invalidates_measurement() {
    let mut core = core_with_margin(0.0);
    let (id, handle) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    core.bounding_box(&id);
    let change = core.apply_update(&id, &PartialBlock { content: Some("changed".into()), ..PartialBlock::default() });
    assert!(change.is_some_and(|c| c.content));
    assert!(core.measure.cached(&id).is_none());
    core.bounding_box(&id);
    assert_eq!(handle.rect_reads(), 2);
}

#[test]
fn colour_update_keeps_measurement() {
    let mut core = core_with_margin(0.0);
    let (id, handle) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    core.bounding_box(&id);
    let style = BlockStyle { color: "#00FF00".into(), ..BlockStyle::default() };
    let change = core.apply_update(&id, &PartialBlock { style: Some(style), ..PartialBlock::default() });
    assert!(change.is_some_and(|c| c.cosmetic_style && !c.affects_geometry()));
    assert!(core.measure.cached(&id).is_some());
    core.bounding_box(&id);
    assert_eq!(handle.rect_reads(), 1);
}

#[test]
fn update_of_unknown_block_is_none() {
    let mut core = core_with_margin(0.0);
    assert!(core.apply_update(&Uuid::new_v4(), &PartialBlock::default()).is_none());
}

#[test]
fn delete_removes_block_and_cache_entry() {
    let mut core = core_with_margin(0.0);
    let (id, _) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    core.bounding_box(&id);
    core.apply_delete(&id);
    assert!(core.block(&id).is_none());
    assert!(core.measure.cached(&id).is_none());
    assert!(core.bounding_box(&id).is_none());
}

// =============================================================
// Canvas binding
// =============================================================

#[test]
fn height_update_is_epsilon_gated() {
    let mut core = core_with_margin(0.0);
    assert!(!core.update_canvas_height(100.05));
    assert_eq!(core.canvas_height_percent, 100.0);
    assert!(core.update_canvas_height(180.0));
    assert_eq!(core.canvas_height_percent, 180.0);
    assert_eq!(core.measure.height_percent(), 180.0);
}

#[test]
fn unmount_falls_back_to_stored_geometry() {
    let mut core = core_with_margin(0.0);
    let (id, _) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    assert!(core.unmount(&id));
    assert!(!core.unmount(&id));
    let fallback = core.bounding_box(&id).unwrap_or(CanvasRect::ZERO);
    assert_eq!((fallback.x, fallback.y), (10.0, 10.0));
}

// =============================================================
// Placement
// =============================================================

#[test]
fn move_into_free_space_is_applied() {
    let mut core = core_with_margin(0.0);
    let (a, _) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    add_block(&mut core, 50.0, 10.0, 20.0, 5.0);
    let action = core.try_move(&a, Point::new(10.0, 40.0));
    let Action::BlockUpdated { id, fields } = action else {
        panic!("expected update, got {action:?}");
    };
    assert_eq!(id, a);
    assert_eq!((fields.x, fields.y), (Some(10.0), Some(40.0)));
    assert_eq!(core.block(&a).map(|b| b.y), Some(40.0));
    assert!(core.measure.cached(&a).is_none());
}

#[test]
fn move_onto_another_block_is_rejected() {
    let mut core = core_with_margin(0.0);
    let (a, _) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    let (b, _) = add_block(&mut core, 50.0, 10.0, 20.0, 5.0);
    let action = core.try_move(&a, Point::new(45.0, 11.0));
    let Action::Rejected(result) = action else {
        panic!("expected rejection, got {action:?}");
    };
    assert_eq!(result.colliding_block_ids, vec![b]);
    assert_eq!(result.collision_type, CollisionType::BoundingBox);
    assert_eq!(core.block(&a).map(|blk| blk.x), Some(10.0));
}

#[test]
fn move_of_unknown_block_does_nothing() {
    let mut core = core_with_margin(0.0);
    assert_eq!(core.try_move(&Uuid::new_v4(), Point::new(0.0, 0.0)), Action::None);
    assert_eq!(core.try_resize(&Uuid::new_v4(), 10.0), Action::None);
}

#[test]
fn resize_respects_neighbours() {
    let mut core = core_with_margin(0.0);
    let (a, _) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    add_block(&mut core, 40.0, 10.0, 20.0, 5.0);
    assert!(matches!(core.try_resize(&a, 35.0), Action::Rejected(_)));
    assert!(matches!(core.try_resize(&a, 30.0), Action::BlockUpdated { .. }));
    assert_eq!(core.block(&a).and_then(|b| b.width), Some(30.0));
}

#[test]
fn add_text_creates_centered_block() {
    let mut core = core_with_margin(1.0);
    let action = core.try_add_text(Point::new(50.0, 50.0), Size::new(20.0, 6.0), "hello");
    let Action::BlockCreated(block) = action else {
        panic!("expected create, got {action:?}");
    };
    assert_eq!((block.x, block.y, block.width, block.height), (40.0, 47.0, Some(20.0), Some(6.0)));
    assert_eq!(block.content, "hello");
    assert!(core.block(&block.id).is_some());
}

#[test]
fn add_text_near_existing_block_is_rejected_by_margin() {
    let mut core = core_with_margin(1.0);
    add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    // Preview spans 30.5%..40.5%: clear of the box, inside its 1% zone.
    let action = core.try_add_text(Point::new(35.5, 12.0), Size::new(10.0, 4.0), "x");
    assert!(matches!(action, Action::Rejected(_)));
    assert_eq!(core.blocks.len(), 1);
}

#[test]
fn added_block_keeps_the_accepted_preview_area() {
    let mut core = core_with_margin(0.0);
    let first = core.try_add_text(Point::new(50.0, 50.0), Size::new(10.0, 20.0), "hi");
    let Action::BlockCreated(block) = first else {
        panic!("expected create, got {first:?}");
    };
    assert_eq!(core.bounding_box(&block.id), Some(CanvasRect::new(45.0, 40.0, 10.0, 20.0)));

    // Entirely inside the first preview, well below its first text line.
    let second = core.try_add_text(Point::new(50.0, 55.0), Size::new(10.0, 4.0), "yo");
    let Action::Rejected(result) = second else {
        panic!("expected rejection, got {second:?}");
    };
    assert_eq!(result.colliding_block_ids, vec![block.id]);
    assert_eq!(core.blocks.len(), 1);
}

#[test]
fn proximity_zones_cover_every_block() {
    let mut core = core_with_margin(1.0);
    let (a, _) = add_block(&mut core, 10.0, 10.0, 20.0, 5.0);
    let (b, _) = add_block(&mut core, 50.0, 50.0, 20.0, 5.0);
    let zones = core.proximity_zones();
    let ids: Vec<BlockId> = zones.iter().map(|z| z.block_id).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(zones[0].outer, CanvasRect::new(9.0, 9.0, 22.0, 7.0));
}
