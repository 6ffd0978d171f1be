//! Result cache keyed by author and input fingerprint

use inkprint_domain::{ContentTable, ImageBatch};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

/// Identifies one extraction run: same author, same images
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    author: String,
    inputs_hash: [u8; 32],
}

impl CacheKey {
    /// Fingerprint `batch` for `author`
    ///
    /// Source names and payloads are both hashed, in batch order, so
    /// renaming or reordering files gives a different key. The author is
    /// trimmed the same way the pipeline trims it.
    pub fn new(author: &str, batch: &ImageBatch) -> Self {
        let mut hasher = Sha256::new();
        for (source, index, image) in batch.iter() {
            // Length prefixes keep ("ab", "c") and ("a", "bc") apart
            hasher.update((source.len() as u64).to_le_bytes());
            hasher.update(source.as_bytes());
            hasher.update((index as u64).to_le_bytes());
            hasher.update((image.len() as u64).to_le_bytes());
            hasher.update(image.as_str().as_bytes());
        }

        Self {
            author: author.trim().to_string(),
            inputs_hash: hasher.finalize().into(),
        }
    }

    /// Author part of the key
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Hex form of the input fingerprint
    pub fn inputs_hex(&self) -> String {
        hex::encode(self.inputs_hash)
    }
}

/// In-memory store of finished content tables
///
/// A hit means the whole pipeline is skipped, including all model calls.
/// Entries live as long as the cache value and are never written to disk;
/// each `inkprint` invocation starts empty, so reuse only happens for
/// callers that keep one cache across several runs in the same process.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: HashMap<CacheKey, ContentTable>,
}

impl ExtractionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a finished table
    pub fn get(&self, key: &CacheKey) -> Option<&ContentTable> {
        self.entries.get(key)
    }

    /// Store a finished table, replacing any previous one for the key
    pub fn insert(&mut self, key: CacheKey, table: ContentTable) {
        self.entries.insert(key, table);
    }

    /// Return the cached table, or compute and store it
    ///
    /// Errors from `compute` are passed through and nothing is stored.
    pub fn get_or_try_insert_with<F, E>(&mut self, key: CacheKey, compute: F) -> Result<&ContentTable, E>
    where
        F: FnOnce() -> Result<ContentTable, E>,
    {
        use std::collections::hash_map::Entry;

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!(
                    "Cache hit for author '{}' ({})",
                    entry.key().author,
                    entry.key().inputs_hex()
                );
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let table = compute()?;
                Ok(entry.insert(table))
            }
        }
    }

    /// Drop one entry
    pub fn invalidate(&mut self, key: &CacheKey) -> Option<ContentTable> {
        self.entries.remove(key)
    }

    /// Drop every entry for `author`, returning how many were removed
    pub fn invalidate_author(&mut self, author: &str) -> usize {
        let author = author.trim();
        let before = self.entries.len();
        self.entries.retain(|key, _| key.author != author);
        before - self.entries.len()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached tables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
