//! Stroke shape: a straight segment or a single-control quadratic curve.

use kurbo::{Affine, BezPath, Line, ParamCurveNearest, Point, QuadBez, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// Unique identifier for stroke groups.
pub type GroupId = Uuid;

/// Thinnest allowed stroke.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
/// Thickest allowed stroke.
pub const MAX_STROKE_WIDTH: f64 = 50.0;
/// Width used for new strokes and as the fallback for malformed widths.
pub const DEFAULT_STROKE_WIDTH: f64 = 8.0;

/// Accuracy passed to kurbo's nearest-point solver for curved strokes.
const NEAREST_ACCURACY: f64 = 1e-3;

/// Clamp a width into `[MIN_STROKE_WIDTH, MAX_STROKE_WIDTH]`.
pub fn clamp_width(width: f64) -> f64 {
    if width.is_nan() {
        return DEFAULT_STROKE_WIDTH;
    }
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

/// One drawable stroke.
///
/// Without `ctrl` the stroke is the straight segment `p0 → p1`; with `ctrl`
/// it is the quadratic curve `M p0 Q ctrl p1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: StrokeId,
    /// Start point.
    pub p0: Point,
    /// End point.
    pub p1: Point,
    /// Bend control point (None = straight).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctrl: Option<Point>,
    /// Stroke width in canvas units.
    pub width: f64,
}

impl Stroke {
    /// Create a straight stroke with a fresh id.
    pub fn new(p0: Point, p1: Point, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            p0,
            p1,
            ctrl: None,
            width: clamp_width(width),
        }
    }

    /// Create a quadratic stroke with a fresh id.
    pub fn curved(p0: Point, ctrl: Point, p1: Point, width: f64) -> Self {
        Self {
            ctrl: Some(ctrl),
            ..Self::new(p0, p1, width)
        }
    }

    /// Get the stroke id.
    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Whether the stroke is bent.
    pub fn is_curved(&self) -> bool {
        self.ctrl.is_some()
    }

    /// Midpoint of the chord `p0 → p1`.
    pub fn chord_midpoint(&self) -> Point {
        self.p0.midpoint(self.p1)
    }

    /// Bounding box of the defining points (control point included).
    pub fn bounds(&self) -> Rect {
        let mut rect = Rect::from_points(self.p0, self.p1);
        if let Some(ctrl) = self.ctrl {
            rect = rect.union_pt(ctrl);
        }
        rect
    }

    /// Centre of the bounding box, used for marquee hit tests.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Set the width, clamped to the allowed range.
    pub fn set_width(&mut self, width: f64) {
        self.width = clamp_width(width);
    }

    /// Move every defining point by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.p0 += delta;
        self.p1 += delta;
        if let Some(ctrl) = self.ctrl.as_mut() {
            *ctrl += delta;
        }
    }

    /// Apply an affine transform to every defining point.
    pub fn transform(&mut self, affine: Affine) {
        self.p0 = affine * self.p0;
        self.p1 = affine * self.p1;
        if let Some(ctrl) = self.ctrl.as_mut() {
            *ctrl = affine * *ctrl;
        }
    }

    /// Distance from `point` to the stroke's centre line.
    pub fn distance_to(&self, point: Point) -> f64 {
        let distance_sq = match self.ctrl {
            Some(ctrl) => QuadBez::new(self.p0, ctrl, self.p1)
                .nearest(point, NEAREST_ACCURACY)
                .distance_sq,
            None => Line::new(self.p0, self.p1)
                .nearest(point, NEAREST_ACCURACY)
                .distance_sq,
        };
        distance_sq.sqrt()
    }

    /// Whether `point` touches the painted stroke, with extra `tolerance`.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.distance_to(point) <= self.width / 2.0 + tolerance
    }

    /// Centre-line path of the stroke.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.p0);
        match self.ctrl {
            Some(ctrl) => path.quad_to(ctrl, self.p1),
            None => path.line_to(self.p1),
        }
        path
    }

    /// Compare geometry and width, ignoring ids.
    pub fn same_geometry(&self, other: &Stroke, epsilon: f64) -> bool {
        let close = |a: Point, b: Point| (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon;
        let ctrl_matches = match (self.ctrl, other.ctrl) {
            (Some(a), Some(b)) => close(a, b),
            (None, None) => true,
            _ => false,
        };
        close(self.p0, other.p0)
            && close(self.p1, other.p1)
            && ctrl_matches
            && (self.width - other.width).abs() <= epsilon
    }
}

/// A named set of strokes that select and move together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeGroup {
    pub(crate) id: GroupId,
    /// Member stroke ids.
    pub stroke_ids: HashSet<StrokeId>,
}

impl StrokeGroup {
    /// Create a group with a fresh id.
    pub fn new(stroke_ids: impl IntoIterator<Item = StrokeId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            stroke_ids: stroke_ids.into_iter().collect(),
        }
    }

    /// Get the group id.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: StrokeId) -> bool {
        self.stroke_ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.stroke_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stroke_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_clamped_on_creation() {
        assert_eq!(Stroke::new(Point::ZERO, Point::new(1.0, 1.0), 0.0).width, MIN_STROKE_WIDTH);
        assert_eq!(Stroke::new(Point::ZERO, Point::new(1.0, 1.0), 80.0).width, MAX_STROKE_WIDTH);
        assert_eq!(Stroke::new(Point::ZERO, Point::new(1.0, 1.0), f64::NAN).width, DEFAULT_STROKE_WIDTH);
    }

    #[test]
    fn test_width_clamp_for_any_delta() {
        let mut stroke = Stroke::new(Point::ZERO, Point::new(10.0, 0.0), 1.0);
        for start in 1..=50 {
            for delta in [-100.0, -7.5, -1.0, 0.0, 1.0, 3.25, 100.0] {
                stroke.set_width(start as f64);
                stroke.set_width(stroke.width + delta);
                assert!((MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).contains(&stroke.width));
            }
        }
    }

    #[test]
    fn test_bounds_include_control_point() {
        let stroke = Stroke::curved(
            Point::new(0.0, 0.0),
            Point::new(50.0, -40.0),
            Point::new(100.0, 0.0),
            8.0,
        );
        let bounds = stroke.bounds();
        assert_eq!(bounds, Rect::new(0.0, -40.0, 100.0, 0.0));
        assert_eq!(stroke.center(), Point::new(50.0, -20.0));
    }

    #[test]
    fn test_translate_moves_control_point() {
        let mut stroke = Stroke::curved(
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
            8.0,
        );
        stroke.translate(Vec2::new(3.0, -2.0));
        assert_eq!(stroke.p0, Point::new(3.0, -2.0));
        assert_eq!(stroke.ctrl, Some(Point::new(8.0, 3.0)));
        assert_eq!(stroke.p1, Point::new(13.0, -2.0));
    }

    #[test]
    fn test_hit_test_straight() {
        let stroke = Stroke::new(Point::new(10.0, 10.0), Point::new(50.0, 50.0), 8.0);
        assert!(stroke.hit_test(Point::new(30.0, 30.0), 0.0));
        assert!(stroke.hit_test(Point::new(33.0, 30.0), 0.0));
        assert!(!stroke.hit_test(Point::new(50.0, 10.0), 2.0));
    }

    #[test]
    fn test_hit_test_curved_follows_bend() {
        let stroke = Stroke::curved(
            Point::new(0.0, 0.0),
            Point::new(50.0, 100.0),
            Point::new(100.0, 0.0),
            4.0,
        );
        // The curve's apex is at (50, 50), far from the chord.
        assert!(stroke.hit_test(Point::new(50.0, 50.0), 1.0));
        assert!(!stroke.hit_test(Point::new(50.0, 0.0), 1.0));
    }

    #[test]
    fn test_same_geometry_ignores_id() {
        let a = Stroke::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0), 8.0);
        let b = Stroke::new(Point::new(1.001, 2.0), Point::new(3.0, 4.0), 8.0);
        assert_ne!(a.id(), b.id());
        assert!(a.same_geometry(&b, 0.005));
        assert!(!a.same_geometry(&b, 0.0001));
    }
}
