//! Property tests: store invariants (rd-core).
//!
//! Arbitrary operation sequences must keep the scene map and z-order in
//! lockstep, the history within its cap, resize above its minimum and the
//! zoom anchor fixed on screen.

use proptest::prelude::*;
use rd_core::handles::ResizeHandle;
use rd_core::kurbo::{Point, Rect, Vec2};
use rd_core::resize::{ResizeOptions, compute_resize};
use rd_core::{EditorConfig, Shape, ShapeId, ShapePatch, Store};

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Delete(u8),
    Move(u8, f64),
    Front(u8),
    Back(u8),
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12).prop_map(Op::Add),
        (0u8..12).prop_map(Op::Delete),
        (0u8..12, -50.0..50.0f64).prop_map(|(i, d)| Op::Move(i, d)),
        (0u8..12).prop_map(Op::Front),
        (0u8..12).prop_map(Op::Back),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn id(i: u8) -> ShapeId {
    ShapeId::intern(&format!("prop_{i}"))
}

fn handle() -> impl Strategy<Value = ResizeHandle> {
    proptest::sample::select(ResizeHandle::ALL.to_vec())
}

proptest! {
    #[test]
    fn z_order_matches_map(ops in proptest::collection::vec(op(), 0..60)) {
        let mut store = Store::default();
        for op in ops {
            match op {
                Op::Add(i) => {
                    store.add_shape(Shape::rectangle(id(i), i as f64, 0.0, 10.0, 10.0), true);
                }
                Op::Delete(i) => {
                    store.delete_shape(&id(i), true);
                }
                Op::Move(i, d) => {
                    store.update_shape(&id(i), &ShapePatch::position(d, d), true);
                }
                Op::Front(i) => {
                    store.bring_to_front(&[id(i)]);
                }
                Op::Back(i) => {
                    store.send_to_back(&[id(i)]);
                }
                Op::Undo => {
                    store.undo();
                }
                Op::Redo => {
                    store.redo();
                }
            }
            store.scene().check_invariants();
        }
    }

    #[test]
    fn history_cap_holds(max in 1usize..30, extra in 0usize..30) {
        let config = EditorConfig { max_history: max, ..Default::default() };
        let mut store = Store::new(config);
        store.add_shape(Shape::rectangle(ShapeId::intern("cap_target"), 0.0, 0.0, 10.0, 10.0), false);
        for i in 0..(max + extra) {
            store.update_shape(&ShapeId::intern("cap_target"), &ShapePatch::position(i as f64 + 1.0, 0.0), true);
        }
        prop_assert_eq!(store.history().len(), max);
        prop_assert_eq!(store.history().index(), Some(max - 1));
    }

    #[test]
    fn resize_never_below_minimum(
        x in -500.0..500.0f64,
        y in -500.0..500.0f64,
        w in 10.0..400.0f64,
        h in 10.0..400.0f64,
        dx in -1000.0..1000.0f64,
        dy in -1000.0..1000.0f64,
        handle in handle(),
        keep_aspect in any::<bool>(),
    ) {
        let start = Rect::new(x, y, x + w, y + h);
        let opts = ResizeOptions { keep_aspect, min_size: 10.0 };
        let r = compute_resize(start, handle, Vec2::new(dx, dy), opts);
        prop_assert!(r.width() >= 10.0 - 1e-9);
        prop_assert!(r.height() >= 10.0 - 1e-9);

        // The edge opposite a moving left/top edge stays put.
        if handle.moves_left() {
            prop_assert!((r.x1 - start.x1).abs() < 1e-6);
        }
        if handle.moves_top() {
            prop_assert!((r.y1 - start.y1).abs() < 1e-6);
        }
        if handle.moves_right() {
            prop_assert!((r.x0 - start.x0).abs() < 1e-6);
        }
        if handle.moves_bottom() {
            prop_assert!((r.y0 - start.y0).abs() < 1e-6);
        }
    }

    #[test]
    fn zoom_keeps_anchor_on_screen(
        start_zoom in 0.1..10.0f64,
        delta in -5.0..5.0f64,
        ax in 0.0..1600.0f64,
        ay in 0.0..1200.0f64,
        px in -500.0..500.0f64,
        py in -500.0..500.0f64,
    ) {
        let mut store = Store::default();
        store.set_viewport(rd_core::Viewport { x: px, y: py, zoom: start_zoom });
        let anchor = Point::new(ax, ay);
        let under = store.viewport().screen_to_world(anchor);

        store.zoom(delta, Some(anchor));
        let vp = store.viewport();
        prop_assert!(vp.zoom >= 0.1 && vp.zoom <= 10.0);
        prop_assert!(vp.world_to_screen(under).distance(anchor) < 1e-6);
    }
}
