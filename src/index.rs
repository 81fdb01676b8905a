/// Persistent fingerprint index for cross-run duplicate detection.
///
/// The index is a JSON object mapping a content fingerprint to the
/// last-known canonical location of a file with that content. It lives at a
/// reserved filename directly under the destination root, is loaded at pass
/// start, mutated in memory, and written once at pass end.
///
/// An entry may point at a path that no longer exists; the next file seen
/// with that fingerprint simply becomes canonical again, so a stale or lost
/// index heals itself over subsequent passes.
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reserved filename of the persisted index under the destination root.
pub const INDEX_FILENAME: &str = ".tidysweep_index.json";

/// In-memory fingerprint → canonical path mapping.
#[derive(Debug, Default, Clone)]
pub struct HashIndex {
    entries: HashMap<String, String>,
    /// Fingerprints recorded since load. Dry-run passes treat these as
    /// live even though the simulated targets were never created, so a
    /// preview reports the same duplicate counts as a real run would.
    fresh: HashSet<String>,
}

impl HashIndex {
    /// Loads the index from `path`.
    ///
    /// A missing file or unparsable JSON yields an empty index; corruption
    /// is never fatal because the index regenerates on the next save.
    pub fn load(path: &Path) -> Self {
        let Ok(raw) = fs::read_to_string(path) else {
            return Self::default();
        };

        match serde_json::from_str::<HashMap<String, String>>(&raw) {
            Ok(entries) => Self {
                entries,
                fresh: HashSet::new(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Writes the index to `path` as a pretty-printed JSON object.
    ///
    /// No-op in dry-run mode: a preview must leave the persisted index
    /// byte-identical.
    pub fn save(&self, path: &Path, dry_run: bool) -> io::Result<()> {
        if dry_run {
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Returns the canonical path recorded for a fingerprint, if any.
    pub fn canonical(&self, fingerprint: &str) -> Option<PathBuf> {
        self.entries.get(fingerprint).map(PathBuf::from)
    }

    /// Records `path` as the canonical location for a fingerprint,
    /// overwriting any stale prior entry.
    pub fn record(&mut self, fingerprint: String, path: &Path) {
        self.fresh.insert(fingerprint.clone());
        self.entries
            .insert(fingerprint, path.to_string_lossy().to_string());
    }

    /// True if the fingerprint was recorded since this index was loaded.
    pub fn is_fresh(&self, fingerprint: &str) -> bool {
        self.fresh.contains(fingerprint)
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let index = HashIndex::load(Path::new("/no/such/index.json"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let index_path = temp_dir.path().join(INDEX_FILENAME);
        fs::write(&index_path, "{ not valid json").expect("Failed to write file");

        let index = HashIndex::load(&index_path);
        assert!(index.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let index_path = temp_dir.path().join(INDEX_FILENAME);

        let mut index = HashIndex::default();
        index.record("abc123".to_string(), Path::new("/dest/images/photo.png"));
        index.save(&index_path, false).expect("Failed to save index");

        let loaded = HashIndex::load(&index_path);
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.canonical("abc123"),
            Some(PathBuf::from("/dest/images/photo.png"))
        );
    }

    #[test]
    fn test_record_overwrites_stale_entry() {
        let mut index = HashIndex::default();
        index.record("abc123".to_string(), Path::new("/old/location.png"));
        index.record("abc123".to_string(), Path::new("/new/location.png"));

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.canonical("abc123"),
            Some(PathBuf::from("/new/location.png"))
        );
    }

    #[test]
    fn test_dry_run_save_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let index_path = temp_dir.path().join(INDEX_FILENAME);

        let mut index = HashIndex::default();
        index.record("abc123".to_string(), Path::new("/dest/images/photo.png"));
        index.save(&index_path, true).expect("Dry-run save failed");

        assert!(!index_path.exists());
    }

    #[test]
    fn test_freshness_tracking() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let index_path = temp_dir.path().join(INDEX_FILENAME);

        let mut index = HashIndex::default();
        index.record("abc123".to_string(), Path::new("/dest/images/photo.png"));
        assert!(index.is_fresh("abc123"));
        index.save(&index_path, false).expect("Failed to save index");

        // Entries loaded from disk are not fresh.
        let loaded = HashIndex::load(&index_path);
        assert!(!loaded.is_fresh("abc123"));
    }
}
