//! File-based glyph store for native platforms.

use super::{BoxFuture, GlyphKey, GlyphStore, StorageError, StorageResult, letter_dir_name};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each glyph variant as `<base>/<job>/<U+XXXX>/<variant>.svg`.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_path`, creating the directory.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the platform data directory.
    ///
    /// On Linux: `~/.local/share/glyphink/glyphs/`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("glyphink").join("glyphs"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn letter_dir(&self, job: &str, letter: &str) -> PathBuf {
        self.base_path.join(job).join(letter_dir_name(letter))
    }

    fn variant_path(dir: &Path, variant: u32) -> PathBuf {
        dir.join(format!("{variant}.svg"))
    }
}

/// Variant indices stored in `dir`, ascending.
fn read_variants(dir: &Path) -> StorageResult<Vec<u32>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", dir.display(), e)))?;

    let mut variants: Vec<u32> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "svg") {
                path.file_stem()?.to_str()?.parse().ok()
            } else {
                None
            }
        })
        .collect();
    variants.sort_unstable();
    Ok(variants)
}

impl GlyphStore for FileStore {
    fn upload(&self, key: &GlyphKey, document: &[u8]) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.clone();
        let document = document.to_vec();
        Box::pin(async move {
            key.validate()?;
            let dir = self.letter_dir(&key.job, &key.letter);
            let variant = match key.variant {
                Some(v) => v,
                None => read_variants(&dir)?.first().copied().unwrap_or(0),
            };
            fs::create_dir_all(&dir).map_err(|e| {
                StorageError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
            let path = Self::variant_path(&dir, variant);
            fs::write(&path, document).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            log::debug!("Wrote {}", path.display());
            Ok(())
        })
    }

    fn fetch(&self, key: &GlyphKey) -> BoxFuture<'_, StorageResult<Vec<u8>>> {
        let key = key.clone();
        Box::pin(async move {
            key.validate()?;
            let dir = self.letter_dir(&key.job, &key.letter);
            let variant = match key.variant {
                Some(v) => Some(v),
                None => read_variants(&dir)?.first().copied(),
            };
            let path = match variant {
                Some(v) => Self::variant_path(&dir, v),
                None => return Err(StorageError::NotFound(key.to_string())),
            };
            if !path.exists() {
                return Err(StorageError::NotFound(key.to_string()));
            }
            fs::read(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))
        })
    }

    fn variants(&self, job: &str, letter: &str) -> BoxFuture<'_, StorageResult<Vec<u32>>> {
        let dir = self.letter_dir(job, letter);
        Box::pin(async move { read_variants(&dir) })
    }
}
