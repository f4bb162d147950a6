//! Memoization of encoder output
//!
//! Entries are keyed by a [`Fingerprint`] of the canonical value, the
//! output format and the encoder settings, and are write-once: the first store for a key wins and later
//! stores return the entry that is already there.

use crate::format::OutputFormat;
use crate::formatter::Artifact;
use crate::model::Value;
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Content-addressed cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// SHA-256 over the compact canonical JSON, a separator and the format id
    pub fn new(value: &Value, format: OutputFormat) -> Self {
        Self::with_settings(value, format, "")
    }

    /// Like [`Fingerprint::new`], also covering the encoder settings that shape the bytes
    pub fn with_settings(value: &Value, format: OutputFormat, settings: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(value.to_json().to_string().as_bytes());
        // JSON text never contains a raw NUL, so the boundary is unambiguous
        hasher.update([0u8]);
        hasher.update(format.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(settings.as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// How many entries the cache retains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Keep every entry for the lifetime of the cache
    #[default]
    Unbounded,
    /// Keep at most `max_entries`, evicting the oldest insertion first
    Bounded { max_entries: usize },
    /// Never retain anything
    Disabled,
}

/// Counters describing cache behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub evictions: u64,
}

/// Thread-safe, write-once conversion cache
#[derive(Debug)]
pub struct ConversionCache {
    policy: CachePolicy,
    entries: RwLock<IndexMap<Fingerprint, Arc<Artifact>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl ConversionCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: RwLock::new(IndexMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Fetch a previously stored artifact
    pub fn lookup(&self, key: &Fingerprint) -> Option<Arc<Artifact>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(artifact) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(fingerprint = %key, "cache hit");
                Some(Arc::clone(artifact))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `artifact` unless the key is already present.
    ///
    /// Returns the artifact that ends up associated with the key, which is the
    /// earlier one when another writer got there first.
    pub fn store(&self, key: Fingerprint, artifact: Artifact) -> Arc<Artifact> {
        let artifact = Arc::new(artifact);
        let max_entries = match self.policy {
            CachePolicy::Disabled => return artifact,
            CachePolicy::Bounded { max_entries } => Some(max_entries),
            CachePolicy::Unbounded => None,
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = entries.get(&key) {
            return Arc::clone(existing);
        }

        if let Some(max_entries) = max_entries {
            while entries.len() >= max_entries.max(1) {
                if let Some((evicted, _)) = entries.shift_remove_index(0) {
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    warn!(fingerprint = %evicted, max_entries, "evicting cached conversion");
                }
            }
        }

        entries.insert(key, Arc::clone(&artifact));
        debug!(fingerprint = %key, entries = entries.len(), "cached conversion");
        artifact
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry; counters are kept
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
