//! GlyphInk Core Library
//!
//! Platform-agnostic data structures and editing logic for the GlyphInk
//! stroke glyph editor: the stroke model, skeletons, the SVG codec,
//! selection and grouping, undo history and the editor controller.

pub mod codec;
pub mod config;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod input;
pub mod metrics;
pub mod selection;
pub mod skeleton;
pub mod storage;
pub mod stroke;
pub mod tools;

pub use codec::{HorizontalBox, export_svg, parse_svg};
pub use config::{ConfigError, EditorConfig};
pub use editor::{GlyphEditor, Interaction, LoadOutcome, LoadTicket};
pub use history::History;
pub use input::{EditorCommand, KeyEvent, Modifiers, PointerEvent};
pub use metrics::{FontLine, FontLineFactors, GlyphBoxLayout, GlyphMetricProfile};
pub use selection::{GroupTable, Selection, expand_selection};
pub use storage::{GlyphKey, GlyphStore, StorageError, StorageResult};
pub use stroke::{GroupId, Stroke, StrokeGroup, StrokeId};
pub use tools::DrawMode;
