//! Last-known-good snapshot cache
//!
//! One JSON file per view. The cache is advisory: a missing or corrupt file
//! means starting from an empty snapshot, never an error. Writes go through
//! a temp file and a rename so a crash mid-write cannot leave a truncated
//! cache behind.

use std::fs;
use std::path::{Path, PathBuf};

use shared::error::{AppError, AppResult};
use shared::models::Snapshot;

#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
}

impl SnapshotCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached snapshot, tolerating a missing or unreadable file.
    pub fn load(&self) -> Option<Snapshot> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "snapshot cache unreadable");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "snapshot cache corrupt");
                None
            }
        }
    }

    /// Persist a snapshot atomically.
    pub fn save(&self, snapshot: &Snapshot) -> AppResult<()> {
        let json = serde_json::to_vec(snapshot)
            .map_err(|err| AppError::internal(format!("snapshot serialization failed: {err}")))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|err| {
                AppError::internal(format!(
                    "snapshot cache write failed at {}: {err}",
                    self.path.display()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Snapshot;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path().join("view.json"));

        assert!(cache.load().is_none());

        let mut snapshot = Snapshot::empty();
        snapshot.fetched_at = 42;
        cache.save(&snapshot).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.fetched_at, 42);
    }

    #[test]
    fn test_corrupt_cache_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");
        std::fs::write(&path, b"not json").unwrap();

        let cache = SnapshotCache::new(path);
        assert!(cache.load().is_none());
    }
}
