//! Display-list projection of the editor state.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use glyphink_core::{FontLine, GlyphBoxLayout, Stroke};
use kurbo::{BezPath, Cap, Circle, Join, Line, Point, Rect};
use peniko::Color;

/// Opacity of unselected ink.
const INK_OPACITY: f64 = 0.8;
/// Opacity of the reference letter.
const REFERENCE_OPACITY: f64 = 0.22;
/// Reference letter size relative to the cap-height band.
const REFERENCE_SCALE: f64 = 1.1;
const PREVIEW_OPACITY: f64 = 0.6;
const START_MARKER_RADIUS: f64 = 3.0;

/// Drawing order groups, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Guides,
    Reference,
    Ink,
    /// Handles, previews and the marquee.
    Overlay,
}

/// How a primitive is outlined.
#[derive(Debug, Clone)]
pub struct Paint {
    pub color: Color,
    pub opacity: f64,
    pub style: kurbo::Stroke,
}

impl Paint {
    /// Solid outline of `width`.
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            opacity: 1.0,
            style: kurbo::Stroke::new(width),
        }
    }

    /// Dashed outline of `width`.
    pub fn dashed(color: Color, width: f64, dashes: &[f64]) -> Self {
        Self {
            color,
            opacity: 1.0,
            style: kurbo::Stroke::new(width).with_dashes(0.0, dashes),
        }
    }

    /// Round caps and joins, as ink is drawn.
    pub fn round(mut self) -> Self {
        self.style = self.style.with_caps(Cap::Round).with_join(Join::Round);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn width(&self) -> f64 {
        self.style.width
    }

    pub fn dashes(&self) -> &[f64] {
        &self.style.dash_pattern
    }
}

/// One drawable item.
#[derive(Debug, Clone)]
pub enum Primitive {
    Rect {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<Paint>,
    },
    Line {
        line: Line,
        paint: Paint,
    },
    Path {
        path: BezPath,
        paint: Paint,
    },
    Circle {
        circle: Circle,
        fill: Color,
        stroke: Option<Paint>,
    },
    /// Text centred horizontally on `anchor`, sitting on its baseline.
    Text {
        text: String,
        anchor: Point,
        size: f64,
        color: Color,
        opacity: f64,
    },
}

/// Ordered display list for one frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Canvas bounds.
    pub bounds: Rect,
    items: Vec<(Layer, Primitive)>,
}

impl Scene {
    pub fn push(&mut self, layer: Layer, primitive: Primitive) {
        self.items.push((layer, primitive));
    }

    /// Everything, back to front.
    pub fn items(&self) -> impl Iterator<Item = &(Layer, Primitive)> {
        self.items.iter()
    }

    /// Primitives on one layer, in drawing order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &Primitive> {
        self.items
            .iter()
            .filter(move |(l, _)| *l == layer)
            .map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn sort(&mut self) {
        // Stable: order within a layer is preserved.
        self.items.sort_by_key(|(layer, _)| *layer);
    }
}

/// Renderer that builds a [`Scene`].
#[derive(Debug, Default)]
pub struct SceneRenderer {
    scene: Scene,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last built scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    fn render_guides(&mut self, ctx: &RenderContext, layout: &GlyphBoxLayout) {
        let guide = Paint::dashed(ctx.guide_color, 1.0, &[6.0, 4.0]);
        for line in FontLine::ALL {
            let y = layout.line_y(line);
            self.scene.push(
                Layer::Guides,
                Primitive::Line {
                    line: Line::new((layout.glyph_x_min, y), (layout.glyph_x_max, y)),
                    paint: guide.clone(),
                },
            );
        }

        let ink_box = Rect::new(
            layout.glyph_x_min,
            layout.cap_height_y,
            layout.glyph_x_max,
            layout.descender_y,
        );
        self.scene.push(
            Layer::Guides,
            Primitive::Rect {
                rect: ink_box,
                fill: None,
                stroke: Some(Paint::dashed(ctx.ink_box_color, 1.0, &[4.0, 4.0])),
            },
        );
    }

    fn render_reference(&mut self, ctx: &RenderContext, layout: &GlyphBoxLayout) {
        let letter = ctx.editor.letter().trim();
        if letter.is_empty() {
            return;
        }
        let size = (layout.baseline_y - layout.cap_height_y) * REFERENCE_SCALE;
        if size <= 0.0 {
            return;
        }
        self.scene.push(
            Layer::Reference,
            Primitive::Text {
                text: letter.to_string(),
                anchor: Point::new(layout.x_at(0.5), layout.baseline_y),
                size,
                color: ctx.ink_color,
                opacity: REFERENCE_OPACITY,
            },
        );
    }

    fn render_stroke(&mut self, ctx: &RenderContext, stroke: &Stroke) {
        let paint = if ctx.editor.is_selected(stroke.id()) {
            Paint::solid(ctx.selection_color, stroke.width).round()
        } else {
            Paint::solid(ctx.ink_color, stroke.width)
                .round()
                .with_opacity(INK_OPACITY)
        };
        let primitive = match stroke.ctrl {
            Some(_) => Primitive::Path {
                path: stroke.to_path(),
                paint,
            },
            None => Primitive::Line {
                line: Line::new(stroke.p0, stroke.p1),
                paint,
            },
        };
        self.scene.push(Layer::Ink, primitive);
    }

    /// Helper lines and the draggable handle of a selected curved stroke.
    fn render_bend_handle(&mut self, ctx: &RenderContext, stroke: &Stroke, ctrl: Point) {
        let helper = Paint::dashed(ctx.selection_color, 1.0, &[4.0, 4.0]);
        for line in [Line::new(stroke.p0, ctrl), Line::new(ctrl, stroke.p1)] {
            self.scene.push(
                Layer::Overlay,
                Primitive::Line {
                    line,
                    paint: helper.clone(),
                },
            );
        }
        self.scene.push(
            Layer::Overlay,
            Primitive::Circle {
                circle: Circle::new(ctrl, ctx.editor.config().handle_radius),
                fill: ctx.selection_color,
                stroke: Some(Paint::solid(Color::WHITE, 2.0)),
            },
        );
    }

    fn render_gesture(&mut self, ctx: &RenderContext) {
        if let Some(start) = ctx.editor.pending_start() {
            self.scene.push(
                Layer::Overlay,
                Primitive::Circle {
                    circle: Circle::new(start, START_MARKER_RADIUS),
                    fill: ctx.selection_color,
                    stroke: None,
                },
            );
        }
        if let Some((start, end)) = ctx.editor.preview_line() {
            let width = ctx.editor.config().default_stroke_width;
            self.scene.push(
                Layer::Overlay,
                Primitive::Line {
                    line: Line::new(start, end),
                    paint: Paint::dashed(ctx.selection_color, width, &[4.0, 4.0])
                        .round()
                        .with_opacity(PREVIEW_OPACITY),
                },
            );
        }
        if let Some(rect) = ctx.editor.marquee_rect() {
            self.scene.push(
                Layer::Overlay,
                Primitive::Rect {
                    rect,
                    fill: Some(ctx.selection_color.with_alpha(0.1)),
                    stroke: Some(Paint::dashed(ctx.selection_color, 1.0, &[4.0, 2.0])),
                },
            );
        }
    }
}

impl Renderer for SceneRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let size = ctx.editor.canvas_size();
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(RendererError::InvalidCanvas(format!(
                "{}x{}",
                size.width, size.height
            )));
        }

        self.scene = Scene {
            bounds: size.to_rect(),
            items: Vec::new(),
        };
        self.scene.push(
            Layer::Background,
            Primitive::Rect {
                rect: size.to_rect(),
                fill: Some(self.background_color(ctx)),
                stroke: None,
            },
        );

        let layout = ctx.editor.layout();
        if ctx.show_guides {
            self.render_guides(ctx, &layout);
        }
        if ctx.show_reference {
            self.render_reference(ctx, &layout);
        }

        for stroke in ctx.editor.strokes() {
            self.render_stroke(ctx, stroke);
            if let Some(ctrl) = stroke.ctrl.filter(|_| ctx.editor.is_selected(stroke.id())) {
                self.render_bend_handle(ctx, stroke, ctrl);
            }
        }
        self.render_gesture(ctx);
        self.scene.sort();

        log::trace!("Built scene with {} primitives", self.scene.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphink_core::{DrawMode, GlyphEditor, Modifiers, PointerEvent};

    fn click(editor: &mut GlyphEditor, x: f64, y: f64) {
        let position = Point::new(x, y);
        editor.handle_pointer(PointerEvent::Down {
            position,
            modifiers: Modifiers::NONE,
        });
        editor.handle_pointer(PointerEvent::Up { position });
    }

    fn build(editor: &GlyphEditor) -> Scene {
        let mut renderer = SceneRenderer::new();
        renderer.build_scene(&RenderContext::new(editor)).unwrap();
        renderer.into_scene()
    }

    fn rgba(color: Color) -> [u8; 4] {
        let c = color.to_rgba8();
        [c.r, c.g, c.b, c.a]
    }

    #[test]
    fn test_empty_editor_scene() {
        let editor = GlyphEditor::default();
        let scene = build(&editor);
        assert_eq!(scene.layer(Layer::Background).count(), 1);
        // Five font lines plus the ink box.
        assert_eq!(scene.layer(Layer::Guides).count(), 6);
        assert_eq!(scene.layer(Layer::Reference).count(), 1);
        assert_eq!(scene.layer(Layer::Ink).count(), 0);
        assert_eq!(scene.layer(Layer::Overlay).count(), 0);
    }

    #[test]
    fn test_guides_follow_layout() {
        let editor = GlyphEditor::default();
        let layout = editor.layout();
        let scene = build(&editor);
        let ys: Vec<f64> = scene
            .layer(Layer::Guides)
            .filter_map(|p| match p {
                Primitive::Line { line, paint } => {
                    assert_eq!(paint.dashes(), &[6.0, 4.0]);
                    assert_eq!(rgba(paint.color), [255, 85, 85, 255]);
                    assert_eq!(line.p0.x, layout.glyph_x_min);
                    assert_eq!(line.p1.x, layout.glyph_x_max);
                    Some(line.p0.y)
                }
                _ => None,
            })
            .collect();
        let expected: Vec<f64> = FontLine::ALL.iter().map(|l| layout.line_y(*l)).collect();
        assert_eq!(ys, expected);
    }

    #[test]
    fn test_toggles_hide_guides_and_reference() {
        let editor = GlyphEditor::default();
        let mut renderer = SceneRenderer::new();
        let ctx = RenderContext::new(&editor).with_guides(false).with_reference(false);
        renderer.build_scene(&ctx).unwrap();
        assert_eq!(renderer.scene().len(), 1);
    }

    #[test]
    fn test_reference_letter_size() {
        let editor = GlyphEditor::default();
        let layout = editor.layout();
        let scene = build(&editor);
        match scene.layer(Layer::Reference).next() {
            Some(Primitive::Text {
                text,
                anchor,
                size,
                opacity,
                ..
            }) => {
                assert_eq!(text, "A");
                assert_eq!(anchor.y, layout.baseline_y);
                assert!((size - (layout.baseline_y - layout.cap_height_y) * 1.1).abs() < 1e-9);
                assert_eq!(*opacity, 0.22);
            }
            other => panic!("expected reference text, got {other:?}"),
        }
    }

    #[test]
    fn test_selected_and_unselected_ink() {
        let mut editor = GlyphEditor::default();
        click(&mut editor, 100.0, 100.0);
        click(&mut editor, 100.0, 300.0);
        click(&mut editor, 300.0, 100.0);
        click(&mut editor, 300.0, 300.0);
        // Select the second stroke; the click also bends it.
        click(&mut editor, 300.0, 150.0);

        let scene = build(&editor);
        let ink: Vec<&Primitive> = scene.layer(Layer::Ink).collect();
        assert_eq!(ink.len(), 2);
        match ink[0] {
            Primitive::Line { paint, .. } => {
                assert_eq!(paint.opacity, 0.8);
                assert_eq!(rgba(paint.color), [0, 0, 0, 255]);
                assert_eq!(paint.width(), 8.0);
            }
            other => panic!("expected line, got {other:?}"),
        }
        match ink[1] {
            Primitive::Path { paint, .. } => {
                assert_eq!(paint.opacity, 1.0);
                assert_eq!(rgba(paint.color), [0, 112, 243, 255]);
            }
            other => panic!("expected path, got {other:?}"),
        }

        // Two dashed helper lines and the handle.
        let overlay: Vec<&Primitive> = scene.layer(Layer::Overlay).collect();
        assert_eq!(overlay.len(), 3);
        match overlay[2] {
            Primitive::Circle { circle, stroke, .. } => {
                assert_eq!(circle.center, Point::new(300.0, 200.0));
                assert_eq!(circle.radius, 6.0);
                assert_eq!(stroke.as_ref().map(Paint::width), Some(2.0));
            }
            other => panic!("expected handle, got {other:?}"),
        }
    }

    #[test]
    fn test_preview_line() {
        let mut editor = GlyphEditor::default();
        click(&mut editor, 50.0, 50.0);
        editor.handle_pointer(PointerEvent::Move {
            position: Point::new(80.0, 90.0),
        });
        let scene = build(&editor);
        let preview = scene.layer(Layer::Overlay).find_map(|p| match p {
            Primitive::Line { line, paint } => Some((*line, paint.clone())),
            _ => None,
        });
        let (line, paint) = preview.unwrap();
        assert_eq!(line, Line::new((50.0, 50.0), (80.0, 90.0)));
        assert_eq!(paint.opacity, 0.6);
        assert_eq!(paint.dashes(), &[4.0, 4.0]);
        assert_eq!(paint.width(), 8.0);
    }

    #[test]
    fn test_marquee_overlay() {
        let mut editor = GlyphEditor::default();
        editor.set_mode(DrawMode::Select);
        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            modifiers: Modifiers::NONE,
        });
        editor.handle_pointer(PointerEvent::Move {
            position: Point::new(60.0, 40.0),
        });
        let scene = build(&editor);
        match scene.layer(Layer::Overlay).next() {
            Some(Primitive::Rect { rect, fill, stroke }) => {
                assert_eq!(*rect, Rect::new(10.0, 10.0, 60.0, 40.0));
                assert!(matches!(fill.map(|c| rgba(c)[3]), Some(25 | 26)));
                assert_eq!(stroke.as_ref().map(|s| s.dashes().to_vec()), Some(vec![4.0, 2.0]));
            }
            other => panic!("expected marquee, got {other:?}"),
        }
    }
}
