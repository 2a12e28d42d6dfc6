//! GlyphInk Render Library
//!
//! Renderer abstraction for the glyph editor canvas. The editor state is
//! projected into a display list of primitives; the SVG preview renderer
//! serializes that list for viewing outside the editor.

mod renderer;
pub mod scene;
mod svg_preview;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{Layer, Paint, Primitive, Scene, SceneRenderer};
pub use svg_preview::{SvgPreviewRenderer, scene_to_svg};
