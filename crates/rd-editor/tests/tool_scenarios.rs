//! Integration tests: full pointer gestures through the editor (rd-editor).
//!
//! The viewport starts at identity, so screen and world coordinates agree.

use pretty_assertions::assert_eq;
use rd_core::kurbo::{Rect, Size};
use rd_core::{EditorConfig, Shape, ShapeProps};
use rd_editor::{Editor, KeyEvent, Modifiers, PointerInput, ToolKind};
use rd_render::Theme;

fn editor() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::new(EditorConfig::default(), Theme::light(), Size::new(1024.0, 768.0))
}

fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64), modifiers: Modifiers) {
    editor.pointer_down(&PointerInput::mouse(from.0, from.1).with_modifiers(modifiers));
    editor.pointer_move(&PointerInput::mouse(to.0, to.1).with_modifiers(modifiers));
    editor.pointer_up(&PointerInput::mouse(to.0, to.1).with_modifiers(modifiers));
}

fn only_shape(editor: &Editor) -> Shape {
    let shapes: Vec<&Shape> = editor.store().shapes().collect();
    assert_eq!(shapes.len(), 1);
    shapes[0].clone()
}

// ─── Creation tools ─────────────────────────────────────────────────────

#[test]
fn rectangle_drag_creates_exact_bounds() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Rectangle);
    drag(&mut editor, (50.0, 50.0), (150.0, 120.0), Modifiers::NONE);

    let shape = only_shape(&editor);
    assert_eq!(shape.rect(), Rect::new(50.0, 50.0, 150.0, 120.0));
    assert!(editor.store().is_selected(&shape.id));
    assert_eq!(editor.store().history().len(), 1);
    assert!(!editor.tools().is_dragging());
}

#[test]
fn shift_rectangle_is_square() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Rectangle);
    drag(&mut editor, (50.0, 50.0), (150.0, 120.0), Modifiers::SHIFT);

    let shape = only_shape(&editor);
    assert_eq!((shape.x, shape.y, shape.width, shape.height), (50.0, 50.0, 100.0, 100.0));
}

#[test]
fn undersized_shapes_are_discarded() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Ellipse);
    drag(&mut editor, (10.0, 10.0), (13.0, 12.0), Modifiers::NONE);
    assert!(editor.store().scene().is_empty());
    assert_eq!(editor.store().history().len(), 0);
}

#[test]
fn arrow_keeps_points_relative_to_origin() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Arrow);
    drag(&mut editor, (100.0, 100.0), (40.0, 160.0), Modifiers::NONE);

    let shape = only_shape(&editor);
    assert!(matches!(shape.props, ShapeProps::Arrow(_)));
    let points = shape.linear_points().map(<[_]>::to_vec).unwrap_or_default();
    let absolute: Vec<(f64, f64)> = points.iter().map(|p| (p.x + shape.x, p.y + shape.y)).collect();
    assert_eq!(absolute, vec![(100.0, 100.0), (40.0, 160.0)]);
}

#[test]
fn freehand_stroke_is_capped() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Draw);
    editor.pointer_down(&PointerInput::mouse(0.0, 0.0));
    assert!(editor.store().is_drawing());
    for i in 1..=3000 {
        let t = i as f64;
        editor.pointer_move(&PointerInput::mouse(t * 0.1, (t * 0.05).sin() * 40.0));
    }
    editor.pointer_up(&PointerInput::mouse(300.0, 0.0));
    assert!(!editor.store().is_drawing());

    let shape = only_shape(&editor);
    let ShapeProps::Path(path) = &shape.props else {
        panic!("expected a path, got {:?}", shape.props);
    };
    assert!(path.points.len() <= 2000, "{} points", path.points.len());
    assert!(path.simulate_pressure);
}

// ─── Select tool ────────────────────────────────────────────────────────

#[test]
fn corner_resize_records_one_entry() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Rectangle);
    drag(&mut editor, (50.0, 50.0), (150.0, 120.0), Modifiers::NONE);
    let id = only_shape(&editor).id;
    editor.set_tool(ToolKind::Select);
    editor.store_mut().select(&id);
    let entries = editor.store().history().len();

    drag(&mut editor, (150.0, 120.0), (170.0, 140.0), Modifiers::NONE);
    let resized = only_shape(&editor);
    assert_eq!(resized.rect(), Rect::new(50.0, 50.0, 170.0, 140.0));
    assert_eq!(editor.store().history().len(), entries + 1);

    assert!(editor.key_down(&KeyEvent::new("z").with_modifiers(Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    })));
    assert_eq!(only_shape(&editor).rect(), Rect::new(50.0, 50.0, 150.0, 120.0));
}

#[test]
fn click_without_moving_records_nothing() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Rectangle);
    drag(&mut editor, (0.0, 0.0), (80.0, 80.0), Modifiers::NONE);
    editor.set_tool(ToolKind::Select);

    editor.pointer_down(&PointerInput::mouse(40.0, 40.0));
    editor.pointer_up(&PointerInput::mouse(40.0, 40.0));
    assert_eq!(editor.store().history().len(), 1);
    assert_eq!(editor.store().selected_ids().len(), 1);

    editor.pointer_down(&PointerInput::mouse(500.0, 500.0));
    editor.pointer_up(&PointerInput::mouse(500.0, 500.0));
    assert!(editor.store().selected_ids().is_empty());
}

#[test]
fn lost_capture_finalizes_move() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Rectangle);
    drag(&mut editor, (0.0, 0.0), (80.0, 80.0), Modifiers::NONE);
    editor.set_tool(ToolKind::Select);

    editor.pointer_down(&PointerInput::mouse(40.0, 40.0));
    editor.pointer_move(&PointerInput::mouse(90.0, 40.0));
    editor.pointer_cancel();

    assert!(!editor.tools().is_dragging());
    assert_eq!(only_shape(&editor).x, 50.0);
    assert_eq!(editor.store().history().len(), 2);
}

#[test]
fn lost_capture_keeps_shift_constraint() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Rectangle);
    editor.pointer_down(&PointerInput::mouse(50.0, 50.0).with_modifiers(Modifiers::SHIFT));
    editor.pointer_move(&PointerInput::mouse(150.0, 120.0).with_modifiers(Modifiers::SHIFT));
    editor.pointer_cancel();

    let shape = only_shape(&editor);
    assert_eq!((shape.x, shape.y, shape.width, shape.height), (50.0, 50.0, 100.0, 100.0));
    assert_eq!(editor.store().history().len(), 1);
}

// ─── Text ───────────────────────────────────────────────────────────────

#[test]
fn text_commits_after_blur_debounce() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Text);
    editor.pointer_down(&PointerInput::mouse(200.0, 150.0));
    editor.pointer_up(&PointerInput::mouse(200.0, 150.0));
    assert!(editor.set_text_content("Hello\nworld"));

    editor.text_blur(1_000.0);
    assert!(!editor.tick(1_100.0));
    assert!(editor.tick(1_120.0));

    let shape = only_shape(&editor);
    assert_eq!(shape.text_props().map(|p| p.text.as_str()), Some("Hello\nworld"));
    assert_eq!((shape.x, shape.y), (200.0, 150.0));
    assert!(editor.text_edit_region().is_none());
}

#[test]
fn clicking_existing_text_reopens_it() {
    let mut editor = editor();
    editor.set_tool(ToolKind::Text);
    editor.pointer_down(&PointerInput::mouse(100.0, 100.0));
    editor.set_text_content("first");
    let id = editor.confirm_text().unwrap();

    editor.pointer_down(&PointerInput::mouse(105.0, 105.0));
    let region = editor.text_edit_region().unwrap();
    assert_eq!(region.content, "first");
    assert_eq!(editor.store().shape(&id).map(|s| s.opacity), Some(0.0));

    editor.cancel_text();
    assert_eq!(editor.store().shape(&id).map(|s| s.opacity), Some(1.0));
}
