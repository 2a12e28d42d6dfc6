//! Glyph document storage.
//!
//! The editor never persists anything itself; callers move exported SVG
//! documents in and out of a [`GlyphStore`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::editor::{GlyphEditor, LoadOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Glyph not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid glyph key: {0}")]
    InvalidKey(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Address of one stored glyph document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlyphKey {
    /// Font job the glyph belongs to.
    pub job: String,
    pub letter: String,
    /// Variant index; `None` means the default (lowest stored) variant.
    pub variant: Option<u32>,
}

impl GlyphKey {
    pub fn new(job: impl Into<String>, letter: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            letter: letter.into(),
            variant: None,
        }
    }

    pub fn with_variant(mut self, variant: u32) -> Self {
        self.variant = Some(variant);
        self
    }

    /// The letter without surrounding whitespace.
    pub fn trimmed_letter(&self) -> &str {
        self.letter.trim()
    }

    /// Reject blank letters and job names that are unsafe as path segments.
    pub fn validate(&self) -> StorageResult<()> {
        if self.trimmed_letter().is_empty() {
            return Err(StorageError::InvalidKey(format!("{self}: blank letter")));
        }
        let job_ok = !self.job.is_empty()
            && self
                .job
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !job_ok {
            return Err(StorageError::InvalidKey(format!("{self}: bad job name")));
        }
        Ok(())
    }
}

impl fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:?}", self.job, self.letter)?;
        if let Some(variant) = self.variant {
            write!(f, "#{variant}")?;
        }
        Ok(())
    }
}

/// Trait for glyph storage backends.
///
/// Implementations can keep documents in memory, on disk or behind a
/// remote service.
pub trait GlyphStore: Send + Sync {
    /// Store a document. Without a variant the default variant is replaced
    /// (variant 0 when nothing is stored yet).
    fn upload(&self, key: &GlyphKey, document: &[u8]) -> BoxFuture<'_, StorageResult<()>>;

    /// Fetch a document.
    fn fetch(&self, key: &GlyphKey) -> BoxFuture<'_, StorageResult<Vec<u8>>>;

    /// Stored variant indices for a letter, ascending.
    fn variants(&self, job: &str, letter: &str) -> BoxFuture<'_, StorageResult<Vec<u32>>>;
}

/// Export the editor's glyph, framed for the key's letter, and upload it.
///
/// Returns `Ok(false)` without contacting the store when there is nothing to
/// upload (no strokes or a blank letter). Editor state is never touched.
pub async fn upload_glyph<S: GlyphStore + ?Sized>(
    store: &S,
    key: &GlyphKey,
    editor: &GlyphEditor,
) -> StorageResult<bool> {
    if !editor.has_strokes() || key.trimmed_letter().is_empty() {
        return Ok(false);
    }
    let document = editor.export_document_for(key.trimmed_letter());
    match store.upload(key, document.as_bytes()).await {
        Ok(()) => {
            log::info!("Uploaded {} ({} strokes)", key, editor.strokes().len());
            Ok(true)
        }
        Err(e) => {
            log::error!("Upload of {} failed: {}", key, e);
            Err(e)
        }
    }
}

/// Fetch a document, treating a missing one as `None`.
pub async fn fetch_glyph<S: GlyphStore + ?Sized>(
    store: &S,
    key: &GlyphKey,
) -> StorageResult<Option<Vec<u8>>> {
    match store.fetch(key).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(StorageError::NotFound(_)) => Ok(None),
        Err(e) => {
            log::error!("Fetch of {} failed: {}", key, e);
            Err(e)
        }
    }
}

/// Fetch a document into the editor, replacing its contents.
pub async fn load_glyph<S: GlyphStore + ?Sized>(
    store: &S,
    key: &GlyphKey,
    editor: &mut GlyphEditor,
) -> LoadOutcome {
    let ticket = editor.begin_load();
    let result = store.fetch(key).await;
    editor.finish_load(ticket, result)
}

/// Directory name for a letter: its code points as `U+XXXX`, joined by `_`.
pub(crate) fn letter_dir_name(letter: &str) -> String {
    letter
        .trim()
        .chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join("_")
}
