//! SVG export and import of glyph strokes.
//!
//! The exported document contains only ink: one `<g>` with a `<line>` per
//! straight stroke and a `<path d="M .. Q ..">` per curved stroke. The parser
//! reads exactly that shape back and ignores everything else.

use crate::stroke::{DEFAULT_STROKE_WIDTH, Stroke, clamp_width};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Horizontal crop applied to the exported view box, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalBox {
    pub left: f64,
    pub right: f64,
}

impl HorizontalBox {
    /// Clamp into the canvas: `left` to `[0, width]`, `right` to `[left + 1, width]`.
    pub fn clamped(self, canvas_width: f64) -> Self {
        let left = self.left.max(0.0).min(canvas_width);
        let right = self.right.min(canvas_width).max(left + 1.0);
        Self { left, right }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Serialize strokes into a standalone SVG document.
pub fn export_svg(strokes: &[Stroke], canvas: Size, view_box: Option<HorizontalBox>) -> String {
    let (left, width) = match view_box {
        Some(hb) => {
            let hb = hb.clamped(canvas.width);
            (hb.left, hb.width())
        }
        None => (0.0, canvas.width),
    };

    let elements = strokes.iter().map(stroke_element).collect::<Vec<_>>().join("\n    ");

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg\n  xmlns=\"http://www.w3.org/2000/svg\"\n  viewBox=\"{left:.2} 0 {width:.2} {height:.2}\"\n>\n  \
         <g stroke=\"black\" stroke-linecap=\"round\" stroke-linejoin=\"round\" fill=\"none\">\n    \
         {elements}\n  </g>\n</svg>",
        height = canvas.height,
    );
    svg
}

fn stroke_element(stroke: &Stroke) -> String {
    let Stroke { p0, p1, ctrl, width, .. } = stroke;
    match ctrl {
        Some(c) => format!(
            "<path d=\"M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}\" stroke-width=\"{}\" />",
            p0.x, p0.y, c.x, c.y, p1.x, p1.y, width
        ),
        None => format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke-width=\"{}\" />",
            p0.x, p0.y, p1.x, p1.y, width
        ),
    }
}

/// Parse strokes out of an SVG document produced by [`export_svg`].
///
/// Never fails: unknown elements are ignored, primitives with unreadable
/// coordinates are skipped and a bad width falls back to the default.
pub fn parse_svg(text: &str) -> Vec<Stroke> {
    Tags::new(text)
        .filter_map(|tag| match tag.name {
            "line" => parse_line(&tag),
            "path" => parse_path(&tag),
            _ => None,
        })
        .collect()
}

fn parse_line(tag: &Tag<'_>) -> Option<Stroke> {
    let coord = |name: &str| tag.attr(name).and_then(parse_number);
    let (Some(x1), Some(y1), Some(x2), Some(y2)) = (coord("x1"), coord("y1"), coord("x2"), coord("y2")) else {
        log::debug!("Skipping <line> with unreadable coordinates: {:?}", tag.attrs);
        return None;
    };
    Some(Stroke::new(Point::new(x1, y1), Point::new(x2, y2), tag_width(tag)))
}

fn parse_path(tag: &Tag<'_>) -> Option<Stroke> {
    let Some([x0, y0, cx, cy, x1, y1]) = tag.attr("d").and_then(parse_quad_path) else {
        log::debug!("Skipping <path> that is not a single quadratic: {:?}", tag.attr("d"));
        return None;
    };
    Some(Stroke::curved(
        Point::new(x0, y0),
        Point::new(cx, cy),
        Point::new(x1, y1),
        tag_width(tag),
    ))
}

fn tag_width(tag: &Tag<'_>) -> f64 {
    tag.attr("stroke-width")
        .and_then(parse_number)
        .map(clamp_width)
        .unwrap_or(DEFAULT_STROKE_WIDTH)
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accept exactly `M x y Q cx cy x y` (absolute commands, space or comma separated).
fn parse_quad_path(d: &str) -> Option<[f64; 6]> {
    let mut tokens = PathTokens { rest: d };
    if tokens.next()? != PathToken::Command('M') {
        return None;
    }
    let mut values = [0.0; 6];
    for (i, slot) in values.iter_mut().enumerate() {
        if i == 2 && tokens.next()? != PathToken::Command('Q') {
            return None;
        }
        match tokens.next()? {
            PathToken::Number(v) => *slot = v,
            PathToken::Command(_) => return None,
        }
    }
    tokens.next().is_none().then_some(values)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathToken {
    Command(char),
    Number(f64),
}

struct PathTokens<'a> {
    rest: &'a str,
}

impl Iterator for PathTokens<'_> {
    type Item = PathToken;

    fn next(&mut self) -> Option<PathToken> {
        self.rest = self.rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        let first = self.rest.chars().next()?;
        if first.is_ascii_alphabetic() && first != 'e' && first != 'E' {
            self.rest = &self.rest[first.len_utf8()..];
            return Some(PathToken::Command(first));
        }
        let end = self
            .rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')))
            .unwrap_or(self.rest.len());
        if end == 0 {
            // Unknown character: poison the stream.
            self.rest = "";
            return Some(PathToken::Command('?'));
        }
        let (number, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(match parse_number(number) {
            Some(v) => PathToken::Number(v),
            None => PathToken::Command('?'),
        })
    }
}

/// A start (or self-closing) tag with its attributes.
#[derive(Debug, Clone, PartialEq)]
struct Tag<'a> {
    name: &'a str,
    attrs: Vec<(&'a str, &'a str)>,
}

impl<'a> Tag<'a> {
    fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

/// Iterator over the start tags of a markup document.
///
/// End tags, comments, processing instructions and declarations are skipped.
struct Tags<'a> {
    rest: &'a str,
}

impl<'a> Tags<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn skip_past(&mut self, terminator: &str) {
        self.rest = match self.rest.find(terminator) {
            Some(i) => &self.rest[i + terminator.len()..],
            None => "",
        };
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        loop {
            let start = self.rest.find('<')?;
            self.rest = &self.rest[start + 1..];

            if self.rest.starts_with("!--") {
                self.skip_past("-->");
                continue;
            }
            if self.rest.starts_with(&['?', '!', '/'][..]) {
                self.skip_past(">");
                continue;
            }

            let name_end = self
                .rest
                .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .unwrap_or(self.rest.len());
            let name = &self.rest[..name_end];
            self.rest = &self.rest[name_end..];
            let attrs = self.read_attributes();
            if name.is_empty() {
                continue;
            }
            return Some(Tag { name, attrs });
        }
    }
}

impl<'a> Tags<'a> {
    /// Read `name="value"` pairs up to the end of the current tag.
    fn read_attributes(&mut self) -> Vec<(&'a str, &'a str)> {
        let mut attrs = Vec::new();
        loop {
            self.rest = self.rest.trim_start();
            let Some(first) = self.rest.chars().next() else {
                return attrs;
            };
            match first {
                '>' => {
                    self.rest = &self.rest[1..];
                    return attrs;
                }
                '/' => {
                    self.rest = &self.rest[1..];
                    continue;
                }
                _ => {}
            }

            let name_end = self
                .rest
                .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
                .unwrap_or(self.rest.len());
            let name = &self.rest[..name_end];
            self.rest = self.rest[name_end..].trim_start();

            let Some(after_eq) = self.rest.strip_prefix('=') else {
                // Valueless attribute.
                continue;
            };
            self.rest = after_eq.trim_start();

            let value = match self.rest.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &self.rest[1..];
                    match body.find(quote) {
                        Some(end) => {
                            self.rest = &body[end + 1..];
                            &body[..end]
                        }
                        None => {
                            self.rest = "";
                            body
                        }
                    }
                }
                _ => {
                    let end = self
                        .rest
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .unwrap_or(self.rest.len());
                    let value = &self.rest[..end];
                    self.rest = &self.rest[end..];
                    value.trim_end_matches('/')
                }
            };
            attrs.push((name, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Size = Size::new(600.0, 600.0);

    fn assert_same(a: &[Stroke], b: &[Stroke]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!(x.same_geometry(y, 0.005), "{x:?} != {y:?}");
        }
    }

    #[test]
    fn test_export_single_line() {
        let stroke = Stroke::new(Point::new(10.0, 10.0), Point::new(50.0, 50.0), 8.0);
        let svg = export_svg(&[stroke], CANVAS, None);
        assert!(svg.contains(r#"<line x1="10.00" y1="10.00" x2="50.00" y2="50.00" stroke-width="8" />"#));
        assert_eq!(svg.matches("<line").count(), 1);
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.contains(r#"viewBox="0.00 0 600.00 600.00""#));
    }

    #[test]
    fn test_export_exact_document() {
        let strokes = [
            Stroke::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0), 8.5),
            Stroke::curved(Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0), 4.0),
        ];
        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<svg\n",
            "  xmlns=\"http://www.w3.org/2000/svg\"\n",
            "  viewBox=\"0.00 0 600.00 600.00\"\n",
            ">\n",
            "  <g stroke=\"black\" stroke-linecap=\"round\" stroke-linejoin=\"round\" fill=\"none\">\n",
            "    <line x1=\"1.00\" y1=\"2.00\" x2=\"3.00\" y2=\"4.00\" stroke-width=\"8.5\" />\n",
            "    <path d=\"M 0.00 0.00 Q 5.00 5.00 10.00 0.00\" stroke-width=\"4\" />\n",
            "  </g>\n",
            "</svg>",
        );
        assert_eq!(export_svg(&strokes, CANVAS, None), expected);
    }

    #[test]
    fn test_view_box_override_clamped() {
        let svg = export_svg(&[], CANVAS, Some(HorizontalBox { left: 75.0, right: 525.0 }));
        assert!(svg.contains(r#"viewBox="75.00 0 450.00 600.00""#));

        let svg = export_svg(&[], CANVAS, Some(HorizontalBox { left: -20.0, right: -50.0 }));
        assert!(svg.contains(r#"viewBox="0.00 0 1.00 600.00""#));

        let svg = export_svg(&[], CANVAS, Some(HorizontalBox { left: 100.0, right: 900.0 }));
        assert!(svg.contains(r#"viewBox="100.00 0 500.00 600.00""#));
    }

    #[test]
    fn test_round_trip() {
        let strokes = vec![
            Stroke::new(Point::new(10.123, 20.456), Point::new(300.0, 400.0), 12.0),
            Stroke::curved(Point::new(5.0, 5.0), Point::new(-10.0, 80.5), Point::new(100.0, 7.25), 3.5),
            Stroke::new(Point::new(0.0, 0.0), Point::new(600.0, 600.0), 50.0),
        ];
        let parsed = parse_svg(&export_svg(&strokes, CANVAS, None));
        assert_same(&strokes, &parsed);
        assert!(parsed.iter().zip(&strokes).all(|(a, b)| a.id() != b.id()));
    }

    #[test]
    fn test_round_trip_empty() {
        assert!(parse_svg(&export_svg(&[], CANVAS, None)).is_empty());
    }

    #[test]
    fn test_parse_preserves_document_order() {
        let svg = r#"<svg><path d="M 1 1 Q 2 2 3 3" stroke-width="4"/><line x1="0" y1="0" x2="9" y2="9" stroke-width="2"/></svg>"#;
        let strokes = parse_svg(svg);
        assert_eq!(strokes.len(), 2);
        assert!(strokes[0].is_curved());
        assert!(!strokes[1].is_curved());
    }

    #[test]
    fn test_parse_attribute_order_irrelevant() {
        let svg = r#"<line stroke-width='6' y2="4" x2="3" y1="2" x1="1" stroke="red"/>"#;
        let strokes = parse_svg(svg);
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].p0, Point::new(1.0, 2.0));
        assert_eq!(strokes[0].p1, Point::new(3.0, 4.0));
        assert_eq!(strokes[0].width, 6.0);
    }

    #[test]
    fn test_parse_width_fallback_and_clamp() {
        let svg = r#"
            <line x1="0" y1="0" x2="1" y2="1" stroke-width="wide" />
            <line x1="0" y1="0" x2="1" y2="1" />
            <line x1="0" y1="0" x2="1" y2="1" stroke-width="500" />
            <line x1="0" y1="0" x2="1" y2="1" stroke-width="0.2" />
        "#;
        let widths: Vec<f64> = parse_svg(svg).iter().map(|s| s.width).collect();
        assert_eq!(widths, vec![8.0, 8.0, 50.0, 1.0]);
    }

    #[test]
    fn test_parse_skips_bad_primitives() {
        let svg = r#"
            <!-- <line x1="1" y1="1" x2="2" y2="2" stroke-width="3" /> -->
            <line x1="abc" y1="0" x2="1" y2="1" stroke-width="3" />
            <path d="M 0 0 L 10 10" stroke-width="3" />
            <path d="M 0 0 Q 5 5 10 10 Q 1 1 2 2" stroke-width="3" />
            <path d="M0,0 Q5,5 10,10" stroke-width="3" />
        "#;
        let strokes = parse_svg(svg);
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].ctrl, Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        assert!(parse_svg("").is_empty());
        assert!(parse_svg("not an svg <<<>>> at all").is_empty());
        assert!(parse_svg("<line x1=\"1\"").is_empty());
    }
}
