//! Snapshot cache for the parsed vocabulary graph.
//!
//! The cache owns the lifecycle of one [`TripleStore`]: it rebuilds the store
//! from the vocabulary source when the persisted snapshot is missing, stale
//! or corrupt, and restores it otherwise. Staleness is wall-clock based on
//! the snapshot file's modification time, so a manual clock change or a
//! long-lived process can cause an early or late rebuild; that is an accepted
//! limitation of mtime-based expiry, not something this layer second-guesses.
//!
//! Rebuild-and-persist is the one slow, mutating operation and runs behind a
//! mutex; restores of an already-persisted snapshot run lock-free and every
//! `load` hands back an owned store, so concurrent readers never contend.

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use lexigraph_store::TripleStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

const SNAPSHOT_MAGIC: u32 = 0x4c58_4752; // "LXGR"
const SNAPSHOT_VERSION: u32 = 1;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Vocabulary source file (Turtle / N-Triples / RDF/XML).
    pub source: PathBuf,
    /// Where the snapshot is persisted.
    pub snapshot_path: PathBuf,
    /// Snapshots older than this many hours are rebuilt.
    pub max_age_hours: u64,
    /// Rebuild unconditionally on every load (debug aid).
    pub force_rebuild: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("./vocab.ttl"),
            snapshot_path: PathBuf::from("./cache/vocab.snapshot"),
            max_age_hours: 1,
            force_rebuild: false,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("vocabulary ingest failed: {0}")]
    Ingest(#[from] lexigraph_ingest::IngestError),
    #[error("corrupt snapshot at {path}: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode snapshot: {0}")]
    Encode(String),
}

// ============================================================================
// Snapshot framing
// ============================================================================

#[derive(Serialize, Deserialize)]
struct Snapshot {
    magic: u32,
    version: u32,
    built_at: DateTime<Utc>,
    store: TripleStore,
}

/// A snapshot is stale once its age strictly exceeds the threshold; a
/// snapshot exactly at the boundary is not yet stale.
pub fn is_expired(age: Duration, max_age_hours: u64) -> bool {
    age > Duration::from_secs(max_age_hours.saturating_mul(3600))
}

// ============================================================================
// Cache manager
// ============================================================================

/// Owns the persisted snapshot and decides when to rebuild it.
///
/// Explicitly constructed and injectable; there is no process-wide instance.
pub struct CacheManager {
    config: CacheConfig,
    rebuild: Mutex<()>,
}

impl CacheManager {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            rebuild: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Obtain the current store.
    ///
    /// `reload` forces a rebuild. Otherwise a fresh persisted snapshot is
    /// restored; a missing, stale or corrupt one triggers rebuild-and-persist.
    pub fn load(&self, reload: bool) -> Result<TripleStore, CacheError> {
        if reload || self.config.force_rebuild {
            return self.rebuild_and_persist(false);
        }
        if let Some(store) = self.restore_if_fresh() {
            return Ok(store);
        }
        self.rebuild_and_persist(true)
    }

    /// Remove the persisted snapshot. No-op when absent.
    pub fn invalidate(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.config.snapshot_path) {
            Ok(()) => {
                tracing::debug!(path = %self.config.snapshot_path.display(), "snapshot invalidated");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    /// Parse the vocabulary source into a fresh store. A missing source
    /// yields an empty store.
    pub fn build(&self) -> Result<TripleStore, CacheError> {
        Ok(lexigraph_ingest::load_vocab(&self.config.source)?)
    }

    /// Write a snapshot of `store`, creating the parent directory if needed.
    pub fn persist(&self, store: &TripleStore) -> Result<(), CacheError> {
        let snapshot = Snapshot {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
            built_at: Utc::now(),
            store: store.clone(),
        };
        let bytes = bincode::serialize(&snapshot).map_err(|e| CacheError::Encode(e.to_string()))?;
        if let Some(parent) = self.config.snapshot_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config.snapshot_path, bytes)?;
        tracing::debug!(
            path = %self.config.snapshot_path.display(),
            triples = store.len(),
            "snapshot persisted"
        );
        Ok(())
    }

    /// Read the persisted snapshot back. Unreadable or foreign files are a
    /// [`CacheError::CorruptSnapshot`].
    pub fn restore(&self) -> Result<TripleStore, CacheError> {
        let bytes = std::fs::read(&self.config.snapshot_path)?;
        let snapshot: Snapshot = bincode::deserialize(&bytes).map_err(|e| {
            CacheError::CorruptSnapshot {
                path: self.config.snapshot_path.clone(),
                reason: e.to_string(),
            }
        })?;
        if snapshot.magic != SNAPSHOT_MAGIC || snapshot.version != SNAPSHOT_VERSION {
            return Err(CacheError::CorruptSnapshot {
                path: self.config.snapshot_path.clone(),
                reason: format!(
                    "unexpected header {:#010x}/v{}",
                    snapshot.magic, snapshot.version
                ),
            });
        }
        Ok(snapshot.store)
    }

    /// Age of the persisted snapshot, or `None` when there is none.
    pub fn snapshot_age(&self) -> Option<Duration> {
        let modified = std::fs::metadata(&self.config.snapshot_path)
            .ok()?
            .modified()
            .ok()?;
        Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO),
        )
    }

    fn restore_if_fresh(&self) -> Option<TripleStore> {
        let age = self.snapshot_age()?;
        if is_expired(age, self.config.max_age_hours) {
            tracing::debug!(age_secs = age.as_secs(), "snapshot stale, rebuilding");
            return None;
        }
        match self.restore() {
            Ok(store) => Some(store),
            Err(err) => {
                // A corrupt or unreadable snapshot is a cache miss, never a
                // surfaced failure.
                tracing::warn!(error = %err, "snapshot unreadable, rebuilding");
                None
            }
        }
    }

    fn rebuild_and_persist(&self, recheck: bool) -> Result<TripleStore, CacheError> {
        let _guard = self.rebuild.lock();
        // Another caller may have finished the same rebuild while we waited
        // on the lock; staleness-triggered rebuilds re-check under it.
        if recheck {
            if let Some(store) = self.restore_if_fresh() {
                return Ok(store);
            }
        }
        self.invalidate()?;
        let store = self.build()?;
        self.persist(&store)?;
        Ok(store)
    }
}
