//! GlyphInk Application
//!
//! The `glyphink` command-line shell: config loading, store access and the
//! skeleton, normalize, preview, push and pull commands.

mod cli;
mod shortcuts;

pub use cli::{Cli, Commands, run};
pub use shortcuts::{Shortcut, ShortcutRegistry};
