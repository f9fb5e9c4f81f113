use std::sync::Arc;

use egui::{Rect, pos2, vec2};
use image::{Rgba, RgbaImage};
use mask_canvas::{
    InputEvent, InputLocation, MaskCanvas, MaskCanvasConfig, MaskError, MaskEvent, SourceImage,
    StrokeState,
};
use parking_lot::Mutex;

fn source(width: u32, height: u32) -> Arc<SourceImage> {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 64, 255])
    });
    Arc::new(SourceImage::from_rgba(pixels).unwrap())
}

// Helper to collect every event a canvas emits
fn recorded_events(canvas: &MaskCanvas) -> Arc<Mutex<Vec<MaskEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    canvas.subscribe(move |event: &MaskEvent| sink.lock().push(event.clone()));
    events
}

fn selection_reports(events: &Mutex<Vec<MaskEvent>>) -> Vec<bool> {
    events
        .lock()
        .iter()
        .filter_map(|event| match event {
            MaskEvent::SelectionChanged { is_empty } => Some(*is_empty),
            _ => None,
        })
        .collect()
}

fn mount(canvas: &mut MaskCanvas) -> Rect {
    let surface = canvas.display_surface().unwrap();
    let rect = Rect::from_min_size(pos2(10.0, 20.0), surface.size_vec2());
    canvas.set_surface_rect(Some(rect));
    rect
}

fn inside(rect: Rect, x: f32, y: f32) -> InputLocation {
    InputLocation::new(pos2(rect.min.x + x, rect.min.y + y), rect)
}

#[test]
fn test_pointer_up_reports_non_empty_selection() {
    let mut canvas = MaskCanvas::default();
    canvas.load(source(200, 100), 200.0).unwrap();
    let rect = mount(&mut canvas);
    let events = recorded_events(&canvas);

    canvas.handle_input(&InputEvent::PointerDown { location: inside(rect, 10.0, 10.0) });
    assert!(canvas.is_drawing());
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, 10.0, 10.0) });
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, 190.0, 90.0) });
    canvas.handle_input(&InputEvent::PointerUp { location: inside(rect, 190.0, 90.0) });

    assert!(!canvas.is_drawing());
    assert_eq!(selection_reports(&events), vec![false]);
    assert_eq!(canvas.recorder().path().points(), &[pos2(10.0, 10.0), pos2(190.0, 90.0)]);
}

#[test]
fn test_click_without_move_reports_empty() {
    let mut canvas = MaskCanvas::default();
    canvas.load(source(50, 50), 50.0).unwrap();
    let rect = mount(&mut canvas);
    let events = recorded_events(&canvas);

    canvas.handle_input(&InputEvent::PointerDown { location: inside(rect, 5.0, 5.0) });
    canvas.handle_input(&InputEvent::PointerUp { location: inside(rect, 5.0, 5.0) });

    assert_eq!(selection_reports(&events), vec![true]);
    assert!(canvas.extract_mask().unwrap().is_none());
}

#[test]
fn test_input_before_mount_is_ignored() {
    let mut canvas = MaskCanvas::default();
    canvas.load(source(50, 50), 50.0).unwrap();
    let events = recorded_events(&canvas);
    let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(50.0, 50.0));

    canvas.handle_input(&InputEvent::PointerDown { location: inside(rect, 5.0, 5.0) });
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, 25.0, 25.0) });
    canvas.handle_input(&InputEvent::PointerUp { location: inside(rect, 25.0, 25.0) });

    assert!(!canvas.is_drawing());
    assert!(canvas.is_empty());
    assert!(selection_reports(&events).is_empty());
}

#[test]
fn test_press_outside_canvas_does_not_start_a_gesture() {
    let mut canvas = MaskCanvas::default();
    canvas.load(source(50, 50), 50.0).unwrap();
    let rect = mount(&mut canvas);

    let outside = InputLocation::new(pos2(rect.max.x + 40.0, rect.max.y + 40.0), rect);
    canvas.handle_input(&InputEvent::PointerDown { location: outside });
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, 20.0, 20.0) });

    assert_eq!(canvas.recorder().state(), StrokeState::Idle);
    assert!(canvas.is_empty());
}

#[test]
fn test_leaving_the_canvas_ends_the_gesture() {
    let mut canvas = MaskCanvas::default();
    canvas.load(source(100, 100), 100.0).unwrap();
    let rect = mount(&mut canvas);
    let events = recorded_events(&canvas);

    canvas.handle_input(&InputEvent::PointerDown { location: inside(rect, 10.0, 10.0) });
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, 30.0, 30.0) });
    let last_known_location = inside(rect, 99.0, 30.0);
    canvas.handle_input(&InputEvent::PointerLeave { last_known_location });
    // moves after leaving do not draw
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, 60.0, 60.0) });

    assert_eq!(selection_reports(&events), vec![false]);
    assert_eq!(canvas.recorder().path().len(), 1);
}

#[test]
fn test_touch_gestures_draw_like_pointer_gestures() {
    let mut canvas = MaskCanvas::default();
    canvas.load(source(100, 100), 100.0).unwrap();
    let rect = mount(&mut canvas);
    let events = recorded_events(&canvas);

    canvas.handle_input(&InputEvent::TouchStart { location: inside(rect, 20.0, 20.0) });
    canvas.handle_input(&InputEvent::TouchMove { location: inside(rect, 40.0, 40.0) });
    canvas.handle_input(&InputEvent::TouchMove { location: inside(rect, 60.0, 40.0) });
    canvas.handle_input(&InputEvent::TouchEnd { location: inside(rect, 60.0, 40.0) });

    assert_eq!(selection_reports(&events), vec![false]);
    assert_eq!(canvas.recorder().path().len(), 2);
    assert!(canvas.extract_mask().unwrap().unwrap().is_selected(50, 40));
}

#[test]
fn test_clear_restores_the_unmarked_display() {
    let mut canvas = MaskCanvas::default();
    canvas.load(source(300, 150), 150.0).unwrap();
    let rect = mount(&mut canvas);
    let events = recorded_events(&canvas);
    let unmarked = canvas.display_frame().unwrap();

    canvas.handle_input(&InputEvent::PointerDown { location: inside(rect, 10.0, 10.0) });
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, 100.0, 60.0) });
    canvas.handle_input(&InputEvent::PointerUp { location: inside(rect, 100.0, 60.0) });
    assert_ne!(canvas.display_frame().unwrap(), unmarked);

    canvas.clear();
    assert_eq!(canvas.display_frame().unwrap(), unmarked);
    assert!(canvas.extract_mask().unwrap().is_none());
    assert_eq!(selection_reports(&events), vec![false, true]);
}

#[test]
fn test_brush_size_is_clamped_and_announced() {
    let mut canvas = MaskCanvas::default();
    let events = recorded_events(&canvas);
    assert_eq!(canvas.brush_size(), 30);

    canvas.set_brush_size(500);
    assert_eq!(canvas.brush_size(), 100);
    canvas.set_brush_size(1);
    assert_eq!(canvas.brush_size(), 5);
    // unchanged sizes are not announced again
    canvas.set_brush_size(5);

    assert_eq!(
        *events.lock(),
        vec![
            MaskEvent::BrushSizeChanged { size: 100 },
            MaskEvent::BrushSizeChanged { size: 5 },
        ]
    );
}

#[test]
fn test_replaced_image_is_released_once() {
    let first = source(40, 40);
    let second = source(60, 30);
    let mut canvas = MaskCanvas::default();

    canvas.load(Arc::clone(&first), 100.0).unwrap();
    assert_eq!(Arc::strong_count(&first), 2);

    canvas.load(Arc::clone(&second), 100.0).unwrap();
    assert_eq!(Arc::strong_count(&first), 1);
    assert_eq!(Arc::strong_count(&second), 2);
    assert_eq!(canvas.source().unwrap().id(), second.id());

    canvas.unload();
    assert_eq!(Arc::strong_count(&second), 1);
    assert!(canvas.source().is_none());
    assert!(canvas.surface_rect().is_none());

    drop(canvas);
    assert_eq!(Arc::strong_count(&second), 1);
}

#[test]
fn test_dropping_the_canvas_releases_the_image() {
    let image = source(10, 10);
    let canvas = {
        let mut canvas = MaskCanvas::default();
        canvas.load(Arc::clone(&image), 10.0).unwrap();
        canvas
    };
    assert_eq!(Arc::strong_count(&image), 2);
    drop(canvas);
    assert_eq!(Arc::strong_count(&image), 1);
}

#[test]
fn test_load_announces_display_size() {
    let image = source(1000, 500);
    let mut canvas = MaskCanvas::default();
    let events = recorded_events(&canvas);
    canvas.load(Arc::clone(&image), 500.0).unwrap();

    assert_eq!(
        *events.lock(),
        vec![MaskEvent::ImageLoaded {
            image_id: image.id(),
            width: 1000,
            height: 500,
            display_width: 500,
            display_height: 250,
        }]
    );
}

// Rows of `column` whose pixel differs from the unmarked frame
fn tinted_rows(canvas: &MaskCanvas, unmarked: &RgbaImage, column: u32) -> Vec<u32> {
    let frame = canvas.display_frame().unwrap();
    (0..frame.height())
        .filter(|&y| frame.get_pixel(column, y) != unmarked.get_pixel(column, y))
        .collect()
}

fn drag(canvas: &mut MaskCanvas, rect: Rect, from: (f32, f32), to: (f32, f32)) {
    canvas.handle_input(&InputEvent::PointerDown { location: inside(rect, from.0, from.1) });
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, from.0, from.1) });
    canvas.handle_input(&InputEvent::PointerMove { location: inside(rect, to.0, to.1) });
    canvas.handle_input(&InputEvent::PointerUp { location: inside(rect, to.0, to.1) });
}

#[test]
fn test_brush_size_sets_live_feedback_width() {
    let mut canvas = MaskCanvas::default();
    canvas.load(source(200, 100), 200.0).unwrap();
    let rect = mount(&mut canvas);
    let unmarked = canvas.display_frame().unwrap();

    canvas.set_brush_size(6);
    drag(&mut canvas, rect, (20.0, 50.0), (180.0, 50.0));
    let thin = tinted_rows(&canvas, &unmarked, 100);

    canvas.clear();
    canvas.set_brush_size(30);
    drag(&mut canvas, rect, (20.0, 50.0), (180.0, 50.0));
    let thick = tinted_rows(&canvas, &unmarked, 100);

    // anti-aliased edges may tint one extra row on each side
    assert!((6..=8).contains(&thin.len()), "thin band was {} rows", thin.len());
    assert!((30..=32).contains(&thick.len()), "thick band was {} rows", thick.len());
    assert!(thick.contains(&36) && thick.contains(&63));
    assert!(!thin.contains(&40));
}

#[test]
fn test_unusable_config_is_rejected() {
    let inverted = MaskCanvasConfig {
        min_brush_size: 50,
        max_brush_size: 10,
        ..Default::default()
    };
    assert!(matches!(MaskCanvas::new(inverted), Err(MaskError::Config(_))));

    let zero_brush = MaskCanvasConfig {
        brush_size: 0,
        min_brush_size: 0,
        ..Default::default()
    };
    assert!(matches!(MaskCanvas::new(zero_brush), Err(MaskError::Config(_))));
}

#[test]
fn test_smallest_allowed_brush_still_selects_pixels() {
    let config = MaskCanvasConfig {
        brush_size: 1,
        min_brush_size: 1,
        ..Default::default()
    };
    let mut canvas = MaskCanvas::new(config).unwrap();
    canvas.load(source(50, 50), 50.0).unwrap();
    let rect = mount(&mut canvas);
    assert_eq!(canvas.brush_size(), 1);

    drag(&mut canvas, rect, (5.0, 25.5), (45.0, 25.5));
    assert!(!canvas.is_empty());
    let mask = canvas.extract_mask().unwrap().unwrap();
    assert!(mask.selected_pixel_count() > 0);
}

#[test]
fn test_accessors_report_display_size_and_strokes() {
    let mut canvas = MaskCanvas::default();
    assert_eq!(canvas.display_size(), None);
    canvas.load(source(1000, 500), 500.0).unwrap();
    assert_eq!(canvas.display_size(), Some([500, 250]));
    let rect = mount(&mut canvas);

    drag(&mut canvas, rect, (10.0, 10.0), (50.0, 10.0));
    // a click without movement records nothing
    canvas.handle_input(&InputEvent::PointerDown { location: inside(rect, 70.0, 70.0) });
    canvas.handle_input(&InputEvent::PointerUp { location: inside(rect, 70.0, 70.0) });
    drag(&mut canvas, rect, (100.0, 100.0), (150.0, 120.0));
    assert_eq!(canvas.stroke_count(), 2);

    canvas.clear();
    assert_eq!(canvas.stroke_count(), 0);
}
