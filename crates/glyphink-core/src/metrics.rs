//! Vertical font lines, per-letter ink boxes and the resulting canvas layout.

use crate::codec::HorizontalBox;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Fraction of the canvas height kept free above the cap-height band and
/// below the baseline band.
const VERTICAL_MARGIN: f64 = 0.10;

/// The five horizontal reference lines a skeleton can anchor to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontLine {
    CapHeight,
    Ascender,
    XHeight,
    Baseline,
    Descender,
}

impl FontLine {
    /// All lines, top to bottom.
    pub const ALL: [FontLine; 5] = [
        FontLine::CapHeight,
        FontLine::Ascender,
        FontLine::XHeight,
        FontLine::Baseline,
        FontLine::Descender,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            FontLine::CapHeight => "cap-height",
            FontLine::Ascender => "ascender",
            FontLine::XHeight => "x-height",
            FontLine::Baseline => "baseline",
            FontLine::Descender => "descender",
        }
    }
}

/// Positions of the font lines relative to the main vertical band.
///
/// `x_height`, `ascender` and `cap_height` are measured upwards from the
/// baseline; `descender` downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontLineFactors {
    pub x_height: f64,
    pub ascender: f64,
    pub cap_height: f64,
    pub descender: f64,
}

impl Default for FontLineFactors {
    fn default() -> Self {
        Self {
            x_height: 0.35,
            ascender: 0.65,
            cap_height: 0.85,
            descender: 0.20,
        }
    }
}

impl FontLineFactors {
    /// Copy with every factor clamped to `[0, 1]`.
    pub fn clamped(self) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            x_height: clamp(self.x_height),
            ascender: clamp(self.ascender),
            cap_height: clamp(self.cap_height),
            descender: clamp(self.descender),
        }
    }
}

/// Horizontal placement of a glyph's ink box, as fractions of the canvas width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphMetricProfile {
    pub advance_width_factor: f64,
    pub left_side_bearing_factor: f64,
}

impl GlyphMetricProfile {
    pub const fn new(advance_width_factor: f64, left_side_bearing_factor: f64) -> Self {
        Self {
            advance_width_factor,
            left_side_bearing_factor,
        }
    }
}

/// Profile used for letters without an entry in the metrics table.
pub const DEFAULT_GLYPH_METRIC: GlyphMetricProfile = GlyphMetricProfile::new(0.7, 0.15);

const GLYPH_METRICS: &[(char, GlyphMetricProfile)] = &[
    ('A', GlyphMetricProfile::new(0.75, 0.125)),
    ('B', GlyphMetricProfile::new(0.72, 0.14)),
    ('C', GlyphMetricProfile::new(0.70, 0.15)),
    ('D', GlyphMetricProfile::new(0.72, 0.14)),
    ('E', GlyphMetricProfile::new(0.68, 0.16)),
    ('F', GlyphMetricProfile::new(0.66, 0.17)),
    ('G', GlyphMetricProfile::new(0.74, 0.13)),
    ('H', GlyphMetricProfile::new(0.78, 0.11)),
    ('I', GlyphMetricProfile::new(0.40, 0.30)),
    ('J', GlyphMetricProfile::new(0.55, 0.23)),
    ('K', GlyphMetricProfile::new(0.74, 0.13)),
    ('a', GlyphMetricProfile::new(0.70, 0.15)),
    ('b', GlyphMetricProfile::new(0.65, 0.18)),
    ('c', GlyphMetricProfile::new(0.62, 0.19)),
    ('d', GlyphMetricProfile::new(0.65, 0.18)),
    ('e', GlyphMetricProfile::new(0.63, 0.185)),
    ('f', GlyphMetricProfile::new(0.50, 0.25)),
    ('g', GlyphMetricProfile::new(0.68, 0.16)),
    ('h', GlyphMetricProfile::new(0.68, 0.16)),
    ('i', GlyphMetricProfile::new(0.35, 0.325)),
    ('j', GlyphMetricProfile::new(0.45, 0.275)),
    ('k', GlyphMetricProfile::new(0.62, 0.19)),
    ('l', GlyphMetricProfile::new(0.35, 0.325)),
];

/// First character of a letter string, `'A'` when blank.
pub(crate) fn leading_char(letter: &str) -> char {
    letter.trim().chars().next().unwrap_or('A')
}

/// Look up `ch` in a per-letter table: exact, then upper-case, then lower-case.
pub(crate) fn lookup_case_insensitive<T: Copy>(table: &[(char, T)], ch: char) -> Option<T> {
    let find = |c: char| table.iter().find(|(k, _)| *k == c).map(|(_, v)| *v);
    find(ch)
        .or_else(|| ch.to_uppercase().next().and_then(find))
        .or_else(|| ch.to_lowercase().next().and_then(find))
}

/// Metric profile for a letter, falling back to [`DEFAULT_GLYPH_METRIC`].
pub fn glyph_metric(letter: &str) -> GlyphMetricProfile {
    lookup_case_insensitive(GLYPH_METRICS, leading_char(letter)).unwrap_or(DEFAULT_GLYPH_METRIC)
}

/// Default export framing for a letter: its ink box in canvas coordinates.
pub fn default_horizontal_box(letter: &str, canvas_width: f64) -> HorizontalBox {
    let metric = glyph_metric(letter);
    let left = metric.left_side_bearing_factor * canvas_width;
    HorizontalBox {
        left,
        right: left + metric.advance_width_factor * canvas_width,
    }
}

/// Ink box and font-line positions in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBoxLayout {
    pub glyph_x_min: f64,
    pub glyph_x_max: f64,
    pub baseline_y: f64,
    pub x_height_y: f64,
    pub ascender_y: f64,
    pub cap_height_y: f64,
    pub descender_y: f64,
}

impl GlyphBoxLayout {
    /// Place the ink box and font lines on a canvas.
    pub fn compute(canvas: Size, metric: GlyphMetricProfile, factors: FontLineFactors) -> Self {
        let margin = canvas.height * VERTICAL_MARGIN;
        let baseline_y = canvas.height - margin;
        let band = baseline_y - margin;

        let glyph_x_min = metric.left_side_bearing_factor * canvas.width;
        let glyph_x_max = glyph_x_min + metric.advance_width_factor * canvas.width;

        Self {
            glyph_x_min,
            glyph_x_max,
            baseline_y,
            x_height_y: baseline_y - band * factors.x_height,
            ascender_y: baseline_y - band * factors.ascender,
            cap_height_y: baseline_y - band * factors.cap_height,
            descender_y: baseline_y + band * factors.descender,
        }
    }

    /// Layout for a letter using the metrics table.
    pub fn for_letter(letter: &str, canvas: Size, factors: FontLineFactors) -> Self {
        Self::compute(canvas, glyph_metric(letter), factors)
    }

    /// Width of the ink box.
    pub fn glyph_width(&self) -> f64 {
        self.glyph_x_max - self.glyph_x_min
    }

    /// Device Y of a font line.
    pub fn line_y(&self, line: FontLine) -> f64 {
        match line {
            FontLine::CapHeight => self.cap_height_y,
            FontLine::Ascender => self.ascender_y,
            FontLine::XHeight => self.x_height_y,
            FontLine::Baseline => self.baseline_y,
            FontLine::Descender => self.descender_y,
        }
    }

    /// Device X of a fraction of the ink box.
    pub fn x_at(&self, fraction: f64) -> f64 {
        self.glyph_x_min + fraction * self.glyph_width()
    }

    /// Ink box as an export view-box override.
    pub fn horizontal_box(&self) -> HorizontalBox {
        HorizontalBox {
            left: self.glyph_x_min,
            right: self.glyph_x_max,
        }
    }
}
