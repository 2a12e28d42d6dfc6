//! Renderer trait abstraction.

use glyphink_core::GlyphEditor;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid canvas size: {0}")]
    InvalidCanvas(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor to render.
    pub editor: &'a GlyphEditor,
    pub background_color: Color,
    /// Highlight for selected strokes, handles, previews and the marquee.
    pub selection_color: Color,
    /// Color of unselected ink.
    pub ink_color: Color,
    pub guide_color: Color,
    /// Outline of the letter's ink box.
    pub ink_box_color: Color,
    /// Draw font lines and the ink box.
    pub show_guides: bool,
    /// Draw the faint reference letter behind the ink.
    pub show_reference: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(editor: &'a GlyphEditor) -> Self {
        Self {
            editor,
            background_color: Color::WHITE,
            selection_color: Color::from_rgba8(0, 112, 243, 255),
            ink_color: Color::BLACK,
            guide_color: Color::from_rgba8(255, 85, 85, 255),
            ink_box_color: Color::from_rgba8(221, 221, 221, 255),
            show_guides: true,
            show_reference: true,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Show or hide font lines and the ink box.
    pub fn with_guides(mut self, show: bool) -> Self {
        self.show_guides = show;
        self
    }

    /// Show or hide the reference letter.
    pub fn with_reference(mut self, show: bool) -> Self {
        self.show_reference = show;
        self
    }
}

/// Trait for rendering backends.
///
/// Renderers only read the editor; nothing flows back into it.
pub trait Renderer {
    /// Build the frame for the current editor state.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
