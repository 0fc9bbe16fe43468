//! Integration tests: store changes → scheduler → pipeline (rd-render).

use pretty_assertions::assert_eq;
use rd_core::kurbo::Size;
use rd_core::{EditorConfig, Shape, ShapeId, ShapePatch, Store, StoreChange};
use rd_render::{FrameScheduler, Layer, RenderPipeline, Theme, Transient};
use std::collections::HashSet;
use std::rc::Rc;

fn wired() -> (Store, Rc<FrameScheduler>) {
    let mut store = Store::new(EditorConfig::default());
    let scheduler = Rc::new(FrameScheduler::new());
    let sink = Rc::clone(&scheduler);
    store.subscribe(move |change| {
        match change {
            StoreChange::Selection => sink.request(Layer::Interactive),
            StoreChange::Viewport | StoreChange::Document => sink.mark_all(),
            _ => {
                sink.request(Layer::Interactive);
                sink.request(Layer::Static)
            }
        };
    });
    (store, scheduler)
}

#[test]
fn burst_of_mutations_paints_once() {
    let (mut store, scheduler) = wired();
    for i in 0..10 {
        let id = ShapeId::intern(&format!("ff_{i}"));
        store.add_shape(Shape::rectangle(id, i as f64 * 20.0, 0.0, 10.0, 10.0), true);
    }
    assert!(scheduler.is_frame_pending());

    let dirty = scheduler.take_frame();
    assert!(dirty.static_layer && dirty.interactive);
    let mut pipeline = RenderPipeline::new(Theme::light(), Size::new(800.0, 600.0));
    pipeline.render(dirty, &store, &Transient::default(), &[], false);
    assert_eq!(pipeline.stats().painted, 10);

    assert!(!scheduler.take_frame().any());
}

#[test]
fn drag_only_repaints_interactive_layer() {
    let (mut store, scheduler) = wired();
    let id = ShapeId::intern("ff_drag");
    store.add_shape(Shape::rectangle(id, 0.0, 0.0, 40.0, 40.0), true);
    scheduler.take_frame();

    let mut pipeline = RenderPipeline::new(Theme::light(), Size::new(800.0, 600.0));
    let transient = Transient {
        ids: HashSet::from([id]),
        previews: Vec::new(),
    };
    scheduler.set_dragging(true);
    for step in 1..=4 {
        store.update_shape(&id, &ShapePatch::position(step as f64 * 5.0, 0.0), false);
        let dirty = scheduler.take_frame();
        assert!(dirty.interactive);
        assert!(!dirty.static_layer);
        pipeline.render(dirty, &store, &transient, &[], true);
    }
    assert_eq!(pipeline.stats().cache_misses, 1);
    assert_eq!(pipeline.stats().cache_hits, 3);

    assert!(scheduler.set_dragging(false));
    pipeline.end_drag();
    let dirty = scheduler.take_frame();
    assert!(dirty.static_layer);
    pipeline.render(dirty, &store, &Transient::default(), &[], false);
    assert_eq!(pipeline.stats().painted, 1);
}

#[test]
fn zoom_culls_against_new_view() {
    let (mut store, scheduler) = wired();
    store.add_shape(Shape::rectangle(ShapeId::intern("ff_far"), 1500.0, 0.0, 50.0, 50.0), false);
    let mut pipeline = RenderPipeline::new(Theme::light(), Size::new(800.0, 600.0));
    pipeline.render(scheduler.take_frame(), &store, &Transient::default(), &[], false);
    assert_eq!(pipeline.stats().culled, 1);

    store.zoom_to(0.5, None);
    let dirty = scheduler.take_frame();
    assert!(dirty.static_layer);
    pipeline.render(dirty, &store, &Transient::default(), &[], false);
    assert_eq!(pipeline.stats().culled, 0);
}
