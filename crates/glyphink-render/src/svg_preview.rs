//! Editor preview as an SVG document: ink plus guides, reference letter and
//! overlays, unlike the exported glyph which carries only the ink.

use crate::renderer::{RenderContext, RenderResult, Renderer};
use crate::scene::{Paint, Primitive, Scene, SceneRenderer};
use kurbo::Cap;
use peniko::Color;
use std::fmt::Write;
use std::path::Path;

/// Renderer that serializes the built scene as SVG text.
#[derive(Debug, Default)]
pub struct SvgPreviewRenderer {
    scene: SceneRenderer,
    svg: String,
}

impl SvgPreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last rendered document.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn scene(&self) -> &Scene {
        self.scene.scene()
    }

    /// Write the last rendered document to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        std::fs::write(path.as_ref(), &self.svg)?;
        log::info!("Wrote preview to {}", path.as_ref().display());
        Ok(())
    }
}

impl Renderer for SvgPreviewRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.scene.build_scene(ctx)?;
        self.svg = scene_to_svg(self.scene.scene());
        Ok(())
    }
}

/// Serialize a scene, back to front.
pub fn scene_to_svg(scene: &Scene) -> String {
    let bounds = scene.bounds;
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\" width=\"{}\" height=\"{}\">",
        num(bounds.x0),
        num(bounds.y0),
        num(bounds.width()),
        num(bounds.height()),
        num(bounds.width()),
        num(bounds.height()),
    );
    for (_, primitive) in scene.items() {
        svg.push_str("  ");
        svg.push_str(&element(primitive));
        svg.push('\n');
    }
    svg.push_str("</svg>\n");
    svg
}

fn element(primitive: &Primitive) -> String {
    match primitive {
        Primitive::Rect { rect, fill, stroke } => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{}{} />",
            num(rect.x0),
            num(rect.y0),
            num(rect.width()),
            num(rect.height()),
            fill_attrs(*fill),
            stroke.as_ref().map(paint_attrs).unwrap_or_default(),
        ),
        Primitive::Line { line, paint } => format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{} />",
            num(line.p0.x),
            num(line.p0.y),
            num(line.p1.x),
            num(line.p1.y),
            paint_attrs(paint),
        ),
        Primitive::Path { path, paint } => format!(
            "<path d=\"{}\" fill=\"none\"{} />",
            path.to_svg(),
            paint_attrs(paint)
        ),
        Primitive::Circle {
            circle,
            fill,
            stroke,
        } => format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{}{} />",
            num(circle.center.x),
            num(circle.center.y),
            num(circle.radius),
            fill_attrs(Some(*fill)),
            stroke.as_ref().map(paint_attrs).unwrap_or_default(),
        ),
        Primitive::Text {
            text,
            anchor,
            size,
            color,
            opacity,
        } => format!(
            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"middle\"{} opacity=\"{}\">{}</text>",
            num(anchor.x),
            num(anchor.y),
            num(*size),
            fill_attrs(Some(*color)),
            num(*opacity),
            escape(text),
        ),
    }
}

fn fill_attrs(fill: Option<Color>) -> String {
    let Some(color) = fill else {
        return " fill=\"none\"".to_string();
    };
    let (hex, alpha) = hex_and_alpha(color);
    let mut attrs = format!(" fill=\"{hex}\"");
    if alpha < 1.0 {
        let _ = write!(attrs, " fill-opacity=\"{}\"", num(alpha));
    }
    attrs
}

fn paint_attrs(paint: &Paint) -> String {
    let (hex, alpha) = hex_and_alpha(paint.color);
    let mut attrs = format!(" stroke=\"{hex}\" stroke-width=\"{}\"", num(paint.width()));
    if alpha < 1.0 {
        let _ = write!(attrs, " stroke-opacity=\"{}\"", num(alpha));
    }
    if paint.style.start_cap == Cap::Round {
        attrs.push_str(" stroke-linecap=\"round\" stroke-linejoin=\"round\"");
    }
    if !paint.dashes().is_empty() {
        let dashes: Vec<String> = paint.dashes().iter().map(|d| num(*d)).collect();
        let _ = write!(attrs, " stroke-dasharray=\"{}\"", dashes.join(" "));
    }
    if paint.opacity < 1.0 {
        let _ = write!(attrs, " opacity=\"{}\"", num(paint.opacity));
    }
    attrs
}

fn hex_and_alpha(color: Color) -> (String, f64) {
    let rgba = color.to_rgba8();
    (
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b),
        rgba.a as f64 / 255.0,
    )
}

/// Two decimals at most, without trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
