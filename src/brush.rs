//! Thick round strokes on a `tiny_skia::Pixmap`

use egui::Pos2;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Below this length a polyline is painted as a single dot
const DEGENERATE_LENGTH: f32 = 1e-3;

/// Stroke `points` as one polyline `width` pixels wide with round caps and joins.
///
/// A single point, or a run of coincident points, paints a disc of diameter
/// `width`. Nothing is painted for an empty slice or a non-positive width.
pub fn stroke_polyline(pixmap: &mut Pixmap, points: &[Pos2], width: f32, paint: &Paint<'_>) {
    let Some(&first) = points.first() else {
        return;
    };
    if !(width > 0.0) {
        return;
    }

    let degenerate = points
        .iter()
        .all(|point| point.distance(first) < DEGENERATE_LENGTH);
    if degenerate {
        if let Some(dot) = PathBuilder::from_circle(first.x, first.y, width / 2.0) {
            pixmap.fill_path(&dot, paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for point in &points[1..] {
        pb.line_to(point.x, point.y);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
}

/// An opaque or translucent solid paint
pub fn solid_paint(rgba: [u8; 4], anti_alias: bool) -> Paint<'static> {
    let [r, g, b, a] = rgba;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = anti_alias;
    paint
}
