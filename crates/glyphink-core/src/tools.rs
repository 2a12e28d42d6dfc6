//! Drawing modes and the shapes they produce.

use crate::stroke::Stroke;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Default number of segments used to approximate a circle.
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 24;

/// Available drawing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Two clicks draw one straight stroke.
    #[default]
    Stroke,
    /// Two clicks span the diameter of a segmented circle.
    Circle,
    /// Canvas drags draw a selection marquee.
    Select,
}

impl DrawMode {
    pub const ALL: [DrawMode; 3] = [DrawMode::Stroke, DrawMode::Circle, DrawMode::Select];

    /// Get the display name of the mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            DrawMode::Stroke => "Stroke",
            DrawMode::Circle => "Circle",
            DrawMode::Select => "Select",
        }
    }

    /// Whether canvas clicks place points in this mode.
    pub fn draws(&self) -> bool {
        matches!(self, DrawMode::Stroke | DrawMode::Circle)
    }
}

/// Straight strokes approximating the circle whose diameter is `a → b`.
///
/// Returns nothing when the two points coincide.
pub fn circle_strokes(a: Point, b: Point, segments: usize, width: f64) -> Vec<Stroke> {
    let center = a.midpoint(b);
    let radius = a.distance(b) / 2.0;
    if radius <= f64::EPSILON || segments < 3 {
        return Vec::new();
    }

    let vertex = |i: usize| {
        let angle = TAU * i as f64 / segments as f64;
        Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    };
    (0..segments)
        .map(|i| Stroke::new(vertex(i), vertex(i + 1), width))
        .collect()
}
