//! In-memory glyph store.

use super::{BoxFuture, GlyphKey, GlyphStore, StorageError, StorageResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

type Variants = BTreeMap<u32, Vec<u8>>;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    glyphs: RwLock<HashMap<(String, String), Variants>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn slot(job: &str, letter: &str) -> (String, String) {
    (job.to_string(), letter.trim().to_string())
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl GlyphStore for MemoryStore {
    fn upload(&self, key: &GlyphKey, document: &[u8]) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.clone();
        let document = document.to_vec();
        Box::pin(async move {
            key.validate()?;
            let mut glyphs = self.glyphs.write().map_err(lock_error)?;
            let variants = glyphs.entry(slot(&key.job, &key.letter)).or_default();
            let variant = key
                .variant
                .or_else(|| variants.keys().next().copied())
                .unwrap_or(0);
            variants.insert(variant, document);
            Ok(())
        })
    }

    fn fetch(&self, key: &GlyphKey) -> BoxFuture<'_, StorageResult<Vec<u8>>> {
        let key = key.clone();
        Box::pin(async move {
            key.validate()?;
            let glyphs = self.glyphs.read().map_err(lock_error)?;
            let variants = glyphs.get(&slot(&key.job, &key.letter));
            let document = match key.variant {
                Some(v) => variants.and_then(|vs| vs.get(&v)),
                None => variants.and_then(|vs| vs.values().next()),
            };
            document
                .cloned()
                .ok_or_else(|| StorageError::NotFound(key.to_string()))
        })
    }

    fn variants(&self, job: &str, letter: &str) -> BoxFuture<'_, StorageResult<Vec<u32>>> {
        let slot = slot(job, letter);
        Box::pin(async move {
            let glyphs = self.glyphs.read().map_err(lock_error)?;
            Ok(glyphs
                .get(&slot)
                .map(|vs| vs.keys().copied().collect())
                .unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_memory_store_upload_fetch() {
        let store = MemoryStore::new();
        let key = GlyphKey::new("job", "A");
        block_on(store.upload(&key, b"<svg/>")).unwrap();
        assert_eq!(block_on(store.fetch(&key)).unwrap(), b"<svg/>");
        assert_eq!(block_on(store.fetch(&key.clone().with_variant(0))).unwrap(), b"<svg/>");
    }

    #[test]
    fn test_memory_store_not_found() {
        let store = MemoryStore::new();
        let result = block_on(store.fetch(&GlyphKey::new("job", "B")));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_memory_store_variants() {
        let store = MemoryStore::new();
        let base = GlyphKey::new("job", "g");
        block_on(store.upload(&base.clone().with_variant(3), b"three")).unwrap();
        block_on(store.upload(&base.clone().with_variant(1), b"one")).unwrap();
        assert_eq!(block_on(store.variants("job", "g")).unwrap(), vec![1, 3]);

        // Default variant is the lowest one, for reads and writes.
        assert_eq!(block_on(store.fetch(&base)).unwrap(), b"one");
        block_on(store.upload(&base, b"uno")).unwrap();
        assert_eq!(block_on(store.fetch(&base.clone().with_variant(1))).unwrap(), b"uno");
        assert_eq!(block_on(store.variants("job", "g")).unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_memory_store_rejects_bad_key() {
        let store = MemoryStore::new();
        let result = block_on(store.upload(&GlyphKey::new("", "A"), b"x"));
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
