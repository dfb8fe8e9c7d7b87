//! Snapshot files in a cache directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use revlens_core::config::CacheConfig;
use revlens_core::errors::CacheError;
use revlens_index::{DerivedIndex, IndexEntry, IndexKind};
use tracing::{info, warn};

use crate::format::{decode, encode, CacheSnapshot, SnapshotMeta};
use crate::freshness::{evaluate_freshness, Freshness};

/// File name of the snapshot for `kind`.
pub fn snapshot_file_name(kind: IndexKind) -> &'static str {
    match kind {
        IndexKind::Sentiment => "sentiment.rvls",
        IndexKind::Embedding => "embeddings.rvls",
    }
}

/// Snapshot store rooted at one directory. Sentiment and embedding snapshots
/// are independent files.
#[derive(Debug, Clone)]
pub struct IndexCache {
    dir: PathBuf,
}

impl IndexCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `None` when caching is disabled. A relative `cache.dir` is resolved
    /// against `root`.
    pub fn from_config(config: &CacheConfig, root: &Path) -> Option<Self> {
        config.enabled.then(|| Self::new(root.join(&config.dir)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: IndexKind) -> PathBuf {
        self.dir.join(snapshot_file_name(kind))
    }

    /// Write `index` atomically: temp file in the cache dir, then rename.
    pub fn save<E: IndexEntry>(&self, index: &DerivedIndex<E>) -> Result<SnapshotMeta, CacheError> {
        let path = self.path_for(E::KIND);
        let created_at = Utc::now();
        let bytes = encode(index, created_at).map_err(|reason| CacheError::Io {
            path: path.display().to_string(),
            reason,
        })?;

        std::fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| io_err(&self.dir, e))?;
        tmp.write_all(&bytes).map_err(|e| io_err(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| io_err(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| io_err(&path, e.error))?;

        info!(
            kind = E::KIND.as_str(),
            path = %path.display(),
            version = index.version(),
            bytes = bytes.len(),
            "saved index snapshot"
        );
        Ok(SnapshotMeta {
            kind: E::KIND.as_str().to_string(),
            version: index.version(),
            model_id: index.model_id().to_string(),
            dimension: index.dimension(),
            created_at,
        })
    }

    /// Load the snapshot for `E`. `Ok(None)` if there is none.
    pub fn load<E: IndexEntry>(&self) -> Result<Option<CacheSnapshot<E>>, CacheError> {
        let path = self.path_for(E::KIND);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&path, e)),
        };
        decode(&bytes)
            .map(Some)
            .map_err(|reason| CacheError::Corrupt {
                path: path.display().to_string(),
                reason,
            })
    }

    /// Load a snapshot only if it is usable as a build seed for the given
    /// window, model and dimension. Corrupt and stale snapshots are logged
    /// and ignored.
    pub fn load_fresh<E: IndexEntry>(
        &self,
        desired_window: usize,
        model_id: &str,
        dimension: usize,
    ) -> Option<DerivedIndex<E>> {
        match self.load::<E>() {
            Ok(Some(snapshot)) => {
                match evaluate_freshness(&snapshot.meta, desired_window, model_id, dimension) {
                    Freshness::Usable => {
                        info!(
                            kind = E::KIND.as_str(),
                            version = snapshot.meta.version,
                            "using cached snapshot"
                        );
                        Some(snapshot.index)
                    }
                    Freshness::Stale { .. } => None,
                }
            }
            Ok(None) => None,
            Err(e) => {
                warn!(kind = E::KIND.as_str(), error = %e, "ignoring unreadable snapshot");
                None
            }
        }
    }

    /// Remove the snapshot for `kind`. Returns whether a file was removed.
    pub fn invalidate(&self, kind: IndexKind) -> Result<bool, CacheError> {
        let path = self.path_for(kind);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!(kind = kind.as_str(), "snapshot invalidated");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_err(&path, e)),
        }
    }
}

fn io_err(path: &Path, e: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
