//! Default letter skeletons: straight strokes anchored to the font lines.

use crate::metrics::{FontLine, GlyphBoxLayout, leading_char, lookup_case_insensitive};
use crate::stroke::Stroke;
use kurbo::Point;

/// A point of a skeleton: a fraction of the ink box width plus a font line.
pub type SkeletonAnchor = (f64, FontLine);

/// One straight segment of a letter skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonSegment {
    pub from: SkeletonAnchor,
    pub to: SkeletonAnchor,
}

impl SkeletonSegment {
    /// Map both anchors into device space.
    pub fn resolve(&self, layout: &GlyphBoxLayout) -> (Point, Point) {
        let map = |(fraction, line): SkeletonAnchor| Point::new(layout.x_at(fraction), layout.line_y(line));
        (map(self.from), map(self.to))
    }
}

use crate::metrics::FontLine::{Ascender as ASC, Baseline as BASE, CapHeight as CAP, Descender as DESC, XHeight as XH};

const fn seg(x0: f64, l0: FontLine, x1: f64, l1: FontLine) -> SkeletonSegment {
    SkeletonSegment {
        from: (x0, l0),
        to: (x1, l1),
    }
}

const SKELETONS: &[(char, &[SkeletonSegment])] = &[
    (
        'A',
        &[
            seg(0.10, BASE, 0.50, CAP),
            seg(0.90, BASE, 0.50, CAP),
            seg(0.25, XH, 0.75, XH),
        ],
    ),
    (
        'B',
        &[
            seg(0.18, CAP, 0.18, BASE),
            seg(0.18, CAP, 0.68, CAP),
            seg(0.68, CAP, 0.78, XH),
            seg(0.78, XH, 0.18, XH),
            seg(0.18, XH, 0.68, XH),
            seg(0.68, XH, 0.78, BASE),
            seg(0.78, BASE, 0.18, BASE),
        ],
    ),
    (
        'C',
        &[
            seg(0.80, CAP, 0.20, CAP),
            seg(0.20, CAP, 0.20, BASE),
            seg(0.20, BASE, 0.80, BASE),
        ],
    ),
    (
        'D',
        &[
            seg(0.15, CAP, 0.15, BASE),
            seg(0.15, CAP, 0.80, CAP),
            seg(0.15, BASE, 0.80, BASE),
            seg(0.80, CAP, 0.80, BASE),
        ],
    ),
    (
        'E',
        &[
            seg(0.10, CAP, 0.10, BASE),
            seg(0.10, CAP, 0.90, CAP),
            seg(0.10, XH, 0.70, XH),
            seg(0.10, BASE, 0.90, BASE),
        ],
    ),
    (
        'F',
        &[
            seg(0.15, CAP, 0.15, BASE),
            seg(0.15, CAP, 0.85, CAP),
            seg(0.15, XH, 0.65, XH),
        ],
    ),
    (
        'G',
        &[
            seg(0.80, CAP, 0.20, CAP),
            seg(0.20, CAP, 0.20, BASE),
            seg(0.20, BASE, 0.80, BASE),
            seg(0.50, XH, 0.80, XH),
        ],
    ),
    (
        'H',
        &[
            seg(0.15, CAP, 0.15, BASE),
            seg(0.85, CAP, 0.85, BASE),
            seg(0.15, XH, 0.85, XH),
        ],
    ),
    (
        'I',
        &[
            seg(0.30, CAP, 0.70, CAP),
            seg(0.50, CAP, 0.50, BASE),
            seg(0.30, BASE, 0.70, BASE),
        ],
    ),
    (
        'J',
        &[
            seg(0.20, CAP, 0.80, CAP),
            seg(0.80, CAP, 0.80, BASE),
            seg(0.80, BASE, 0.40, BASE),
            seg(0.40, BASE, 0.40, XH),
        ],
    ),
    (
        'K',
        &[
            seg(0.15, CAP, 0.15, BASE),
            seg(0.15, XH, 0.85, CAP),
            seg(0.15, XH, 0.85, BASE),
        ],
    ),
    ('L', &[seg(0.15, CAP, 0.15, BASE), seg(0.15, BASE, 0.90, BASE)]),
    ('T', &[seg(0.10, CAP, 0.90, CAP), seg(0.50, CAP, 0.50, BASE)]),
    ('X', &[seg(0.10, CAP, 0.90, BASE), seg(0.90, CAP, 0.10, BASE)]),
    (
        'a',
        &[
            seg(0.25, XH, 0.25, BASE),
            seg(0.25, XH, 0.75, XH),
            seg(0.75, XH, 0.75, BASE),
            seg(0.25, BASE, 0.75, BASE),
        ],
    ),
    (
        'b',
        &[
            seg(0.30, ASC, 0.30, BASE),
            seg(0.30, XH, 0.70, XH),
            seg(0.70, XH, 0.70, BASE),
            seg(0.70, BASE, 0.30, BASE),
        ],
    ),
    (
        'c',
        &[
            seg(0.70, XH, 0.30, XH),
            seg(0.30, XH, 0.30, BASE),
            seg(0.30, BASE, 0.70, BASE),
        ],
    ),
    (
        'd',
        &[
            seg(0.70, ASC, 0.70, BASE),
            seg(0.70, XH, 0.30, XH),
            seg(0.30, XH, 0.30, BASE),
            seg(0.30, BASE, 0.70, BASE),
        ],
    ),
    (
        'e',
        &[
            seg(0.70, XH, 0.30, XH),
            seg(0.30, XH, 0.30, BASE),
            seg(0.30, BASE, 0.70, BASE),
        ],
    ),
    ('f', &[seg(0.40, CAP, 0.40, DESC), seg(0.20, XH, 0.70, XH)]),
    (
        'g',
        &[
            seg(0.30, XH, 0.70, XH),
            seg(0.70, XH, 0.70, BASE),
            seg(0.70, BASE, 0.30, BASE),
            seg(0.30, BASE, 0.30, XH),
            seg(0.55, BASE, 0.55, DESC),
        ],
    ),
    (
        'h',
        &[
            seg(0.30, ASC, 0.30, BASE),
            seg(0.30, XH, 0.70, XH),
            seg(0.70, XH, 0.70, BASE),
        ],
    ),
    ('i', &[seg(0.50, XH, 0.50, BASE), seg(0.50, CAP, 0.50, ASC)]),
    ('j', &[seg(0.55, XH, 0.55, DESC), seg(0.55, CAP, 0.55, ASC)]),
    (
        'k',
        &[
            seg(0.30, ASC, 0.30, BASE),
            seg(0.30, XH, 0.75, XH),
            seg(0.30, XH, 0.75, BASE),
        ],
    ),
    ('l', &[seg(0.40, ASC, 0.40, BASE)]),
];

/// Skeleton definition for a letter, if the table has one.
pub fn skeleton_for(letter: &str) -> Option<&'static [SkeletonSegment]> {
    lookup_case_insensitive(SKELETONS, leading_char(letter))
}

/// Letters with a skeleton definition, in table order.
pub fn known_letters() -> impl Iterator<Item = char> {
    SKELETONS.iter().map(|(c, _)| *c)
}

/// Default strokes for `letter` in the given layout.
///
/// Returns an empty list for letters without a definition.
pub fn skeleton_strokes(letter: &str, layout: &GlyphBoxLayout, width: f64) -> Vec<Stroke> {
    let Some(segments) = skeleton_for(letter) else {
        log::debug!("No skeleton for letter {letter:?}");
        return Vec::new();
    };
    segments
        .iter()
        .map(|segment| {
            let (p0, p1) = segment.resolve(layout);
            Stroke::new(p0, p1, width)
        })
        .collect()
}
