//! Command-line interface.

use crate::shortcuts::ShortcutRegistry;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glyphink_core::skeleton::known_letters;
use glyphink_core::storage::{FileStore, load_glyph, upload_glyph};
use glyphink_core::{EditorConfig, GlyphEditor, GlyphKey, GlyphStore, LoadOutcome};
use glyphink_render::{RenderContext, Renderer, SvgPreviewRenderer};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "glyphink", about = "Stroke glyph editor tools", version)]
pub struct Cli {
    /// Editor config JSON; defaults are used when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the default skeleton of a letter as a glyph document.
    Skeleton {
        letter: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List letters with a default skeleton.
    Letters,
    /// Re-export a glyph document in canonical form.
    Normalize {
        file: PathBuf,
        #[arg(short, long, default_value = "A")]
        letter: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Render a glyph document with guides and reference letter.
    Preview {
        file: PathBuf,
        #[arg(short, long, default_value = "A")]
        letter: String,
        #[arg(short, long, default_value = "preview.svg")]
        out: PathBuf,
        #[arg(long)]
        no_guides: bool,
        #[arg(long)]
        no_reference: bool,
    },
    /// Upload a glyph document to the store.
    Push {
        file: PathBuf,
        #[arg(short, long)]
        job: String,
        #[arg(short, long)]
        letter: String,
        #[arg(long)]
        variant: Option<u32>,
        /// Store directory; the platform data directory when omitted.
        #[arg(short, long)]
        store: Option<PathBuf>,
    },
    /// Fetch a glyph document from the store.
    Pull {
        #[arg(short, long)]
        job: String,
        #[arg(short, long)]
        letter: String,
        #[arg(long)]
        variant: Option<u32>,
        #[arg(short, long)]
        store: Option<PathBuf>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List stored variants of a letter.
    Variants {
        #[arg(short, long)]
        job: String,
        #[arg(short, long)]
        letter: String,
        #[arg(short, long)]
        store: Option<PathBuf>,
    },
    /// Print the effective editor config as JSON.
    Config,
    /// Print the editor keyboard shortcuts.
    Shortcuts,
}

/// Run one command, writing documents and listings to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Skeleton { letter, out: path } => {
            let mut editor = GlyphEditor::new(config, letter.as_str());
            if !editor.insert_skeleton() {
                bail!("no skeleton for {letter:?}");
            }
            emit(&editor.export_document(), path.as_deref(), out)?;
        }
        Commands::Letters => {
            let letters: String = known_letters().collect();
            writeln!(out, "{letters}")?;
        }
        Commands::Normalize {
            file,
            letter,
            out: path,
        } => {
            let editor = open_document(config, &file, &letter)?;
            emit(&editor.export_document(), path.as_deref(), out)?;
        }
        Commands::Preview {
            file,
            letter,
            out: path,
            no_guides,
            no_reference,
        } => {
            let editor = open_document(config, &file, &letter)?;
            let ctx = RenderContext::new(&editor)
                .with_guides(!no_guides)
                .with_reference(!no_reference);
            let mut renderer = SvgPreviewRenderer::new();
            renderer.build_scene(&ctx)?;
            renderer.write_to(&path)?;
            writeln!(out, "{}", path.display())?;
        }
        Commands::Push {
            file,
            job,
            letter,
            variant,
            store,
        } => {
            let editor = open_document(config, &file, &letter)?;
            let store = open_store(store)?;
            let key = glyph_key(job, letter, variant);
            if !pollster::block_on(upload_glyph(&store, &key, &editor))? {
                bail!("{} has no strokes to upload", file.display());
            }
            writeln!(out, "uploaded {key} ({} strokes)", editor.strokes().len())?;
        }
        Commands::Pull {
            job,
            letter,
            variant,
            store,
            out: path,
        } => {
            let store = open_store(store)?;
            let key = glyph_key(job, letter.clone(), variant);
            let mut editor = GlyphEditor::new(config, letter);
            match pollster::block_on(load_glyph(&store, &key, &mut editor)) {
                LoadOutcome::Loaded { .. } => {
                    emit(&editor.export_document(), path.as_deref(), out)?;
                }
                LoadOutcome::Empty => bail!("{key} is not stored"),
                LoadOutcome::Failed | LoadOutcome::Superseded => bail!("could not load {key}"),
            }
        }
        Commands::Variants { job, letter, store } => {
            let store = open_store(store)?;
            let variants = pollster::block_on(store.variants(&job, &letter))?;
            for variant in variants {
                writeln!(out, "{variant}")?;
            }
        }
        Commands::Config => {
            writeln!(out, "{}", config.to_json()?)?;
        }
        Commands::Shortcuts => ShortcutRegistry::write_all(out)?,
    }
    Ok(())
}

fn glyph_key(job: String, letter: String, variant: Option<u32>) -> GlyphKey {
    let key = GlyphKey::new(job, letter);
    match variant {
        Some(v) => key.with_variant(v),
        None => key,
    }
}

fn open_store(dir: Option<PathBuf>) -> anyhow::Result<FileStore> {
    let store = match dir {
        Some(dir) => FileStore::new(dir)?,
        None => FileStore::default_location()?,
    };
    log::debug!("Using glyph store at {}", store.base_path().display());
    Ok(store)
}

fn open_document(config: EditorConfig, file: &Path, letter: &str) -> anyhow::Result<GlyphEditor> {
    let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let mut editor = GlyphEditor::new(config, letter);
    let count = editor.load_svg(&text);
    log::info!("Read {} strokes from {}", count, file.display());
    Ok(editor)
}

fn emit(document: &str, path: Option<&Path>, out: &mut impl Write) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, document).with_context(|| format!("writing {}", path.display()))?;
            writeln!(out, "{}", path.display())?;
        }
        None => writeln!(out, "{document}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphink_core::parse_svg;

    fn run_args(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("glyphink").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_skeleton_command() {
        let svg = run_args(&["skeleton", "A"]).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(!parse_svg(&svg).is_empty());
    }

    #[test]
    fn test_skeleton_unknown_letter_fails() {
        assert!(run_args(&["skeleton", "\u{2603}"]).is_err());
    }

    #[test]
    fn test_push_then_pull() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("a.svg");
        let store = dir.path().join("store");
        let skeleton = run_args(&["skeleton", "A", "--out", doc.to_str().unwrap()]).unwrap();
        assert!(skeleton.contains("a.svg"));

        let store_arg = store.to_str().unwrap();
        let pushed = run_args(&[
            "push", doc.to_str().unwrap(), "--job", "demo", "--letter", "A", "--store", store_arg,
        ])
        .unwrap();
        assert!(pushed.starts_with("uploaded"));

        let pulled = run_args(&["pull", "--job", "demo", "--letter", "A", "--store", store_arg]).unwrap();
        let original = std::fs::read_to_string(&doc).unwrap();
        assert_eq!(pulled.trim_end(), original.trim_end());

        let variants = run_args(&["variants", "--job", "demo", "--letter", "A", "--store", store_arg]).unwrap();
        assert_eq!(variants, "0\n");
    }

    #[test]
    fn test_pull_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().to_str().unwrap();
        assert!(run_args(&["pull", "--job", "demo", "--letter", "B", "--store", store]).is_err());
    }

    #[test]
    fn test_push_empty_document_refused() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("empty.svg");
        std::fs::write(&doc, "<svg></svg>").unwrap();
        let store = dir.path().join("store");
        let result = run_args(&[
            "push", doc.to_str().unwrap(), "--job", "demo", "--letter", "A", "--store",
            store.to_str().unwrap(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_preview_command() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("a.svg");
        let preview = dir.path().join("preview.svg");
        run_args(&["skeleton", "A", "--out", doc.to_str().unwrap()]).unwrap();
        run_args(&["preview", doc.to_str().unwrap(), "--out", preview.to_str().unwrap()]).unwrap();
        let svg = std::fs::read_to_string(preview).unwrap();
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_shortcuts_command() {
        let listing = run_args(&["shortcuts"]).unwrap();
        assert!(listing.starts_with("=== Keyboard Shortcuts ==="));
        assert!(listing.contains("Ctrl+Z"));
        assert_eq!(listing.matches("by 10").count(), 4);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"default_stroke_width": 12}"#).unwrap();
        let json = run_args(&["--config", path.to_str().unwrap(), "config"]).unwrap();
        assert!(json.contains("\"default_stroke_width\": 12.0"));
    }
}
