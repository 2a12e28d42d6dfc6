//! Point math shared by the editor, the codec and the tools.

use crate::stroke::Stroke;
use kurbo::{ParamCurve, Point, QuadBez, Rect};

/// Inclusive point-in-rectangle test.
///
/// `kurbo::Rect::contains` excludes the far edges; marquee selection must
/// include strokes whose centre sits exactly on the border.
pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Point on the quadratic curve `p0 → ctrl → p1` at `t = 0.5`.
pub fn quad_midpoint(p0: Point, ctrl: Point, p1: Point) -> Point {
    QuadBez::new(p0, ctrl, p1).eval(0.5)
}

/// Visual midpoint of a stroke: on the curve if bent, on the chord otherwise.
pub fn stroke_midpoint(stroke: &Stroke) -> Point {
    match stroke.ctrl {
        Some(ctrl) => quad_midpoint(stroke.p0, ctrl, stroke.p1),
        None => stroke.chord_midpoint(),
    }
}

/// Centroid used for marquee selection (centre of the stroke's bounding box).
pub fn stroke_centroid(stroke: &Stroke) -> Point {
    stroke.center()
}

/// Bounding box of several strokes, `None` when empty.
pub fn strokes_bounds<'a>(strokes: impl IntoIterator<Item = &'a Stroke>) -> Option<Rect> {
    strokes.into_iter().map(Stroke::bounds).reduce(|acc, b| acc.union(b))
}
