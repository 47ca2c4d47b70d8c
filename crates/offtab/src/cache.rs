//! Session-scoped offset cache.
//!
//! Loads a persisted offset table once and serves point queries against it
//! for the rest of the session, logging every hit and miss. The consumer on
//! the instrumentation path treats `None` as "skip this field", never as a
//! failure.

use std::path::{Path, PathBuf};

use semver::Version;
use tracing::debug;

use crate::error::Result;
use crate::field::FieldId;
use crate::table::{OffsetIndex, load_table};

/// Read-only cache over one loaded offset table.
///
/// The table is static for the lifetime of the cache; a changed file on
/// disk is not observed until a new cache is constructed. A cache whose
/// load failed is represented by [`OffsetCache::empty`]: it accepts
/// queries and answers every one with `None`.
#[derive(Debug, Default)]
pub struct OffsetCache {
    index: Option<OffsetIndex>,
    table_path: Option<PathBuf>,
}

impl OffsetCache {
    /// Cache with no table behind it; every query misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and index the offset table at `path`.
    ///
    /// Fails with [`crate::Error::Io`] when the file cannot be read and
    /// [`crate::Error::Json`] when it cannot be decoded. The caller
    /// decides whether a missing table is fatal or falls back to
    /// [`Self::empty`] and skips instrumentation for the dependency.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let table = load_table(path)?;
        let index = OffsetIndex::from_table(table);
        debug!(table = %path.display(), fields = index.len(), "offset table loaded");

        Ok(Self {
            index: Some(index),
            table_path: Some(path.to_path_buf()),
        })
    }

    /// Whether a table is loaded behind this cache.
    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    /// Path the table was loaded from, if any.
    pub fn table_path(&self) -> Option<&Path> {
        self.table_path.as_deref()
    }

    /// Resolve the offset for `id` at `version`.
    ///
    /// Emits one debug-level log line per call recording the identifier,
    /// the version, and whether the lookup hit; the log line is the sole
    /// side effect.
    pub fn get(&self, id: &FieldId, version: &Version) -> Option<u64> {
        let Some(index) = &self.index else {
            debug!(field = %id, version = %version, "cache miss (no table loaded)");
            return None;
        };

        match index.get(id, version) {
            Some(offset) => {
                debug!(field = %id, version = %version, offset, "cache hit");
                Some(offset)
            }
            None => {
                debug!(field = %id, version = %version, "cache miss");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::table::{OffsetTable, VersionRange, save_table};
    use std::fs;
    use tempfile::NamedTempFile;

    fn ver(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn conn_buf() -> FieldId {
        FieldId::new("pkg", "Conn", "buf")
    }

    fn write_test_table(path: &Path) {
        let mut table = OffsetTable::new();
        table.insert(
            conn_buf(),
            VersionRange::new(ver("1.0.0"), Some(ver("2.0.0"))),
            24,
        );
        save_table(path, &table).unwrap();
    }

    #[test]
    fn test_load_and_get() {
        let temp_file = NamedTempFile::new().unwrap();
        write_test_table(temp_file.path());

        let cache = OffsetCache::load(temp_file.path()).unwrap();
        assert!(cache.is_loaded());
        assert_eq!(cache.table_path(), Some(temp_file.path()));

        assert_eq!(cache.get(&conn_buf(), &ver("1.5.0")), Some(24));
        assert_eq!(cache.get(&conn_buf(), &ver("2.0.0")), None);
        assert_eq!(cache.get(&conn_buf(), &ver("0.9.9")), None);
    }

    #[test]
    fn test_empty_cache_always_misses() {
        let cache = OffsetCache::empty();
        assert!(!cache.is_loaded());
        assert_eq!(cache.table_path(), None);
        assert_eq!(cache.get(&conn_buf(), &ver("1.5.0")), None);
        assert_eq!(cache.get(&conn_buf(), &ver("0.0.1")), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = OffsetCache::load("/nonexistent/offsets.json").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_malformed_table_then_fall_back_to_empty() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "not json at all").unwrap();

        let err = OffsetCache::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        // the documented fallback state: queries keep working, all miss
        let cache = OffsetCache::empty();
        assert_eq!(cache.get(&conn_buf(), &ver("1.5.0")), None);
    }

    #[test]
    fn test_roundtrip_answers_match_source_table() {
        let temp_file = NamedTempFile::new().unwrap();

        let mut table = OffsetTable::new();
        table.insert(
            conn_buf(),
            VersionRange::new(ver("1.0.0"), Some(ver("2.0.0"))),
            24,
        );
        table.insert(conn_buf(), VersionRange::open(ver("2.0.0")), 32);
        let id2 = FieldId::new("net/http", "Request", "URL");
        table.insert(id2.clone(), VersionRange::open(ver("1.12.0")), 16);
        save_table(temp_file.path(), &table).unwrap();

        let cache = OffsetCache::load(temp_file.path()).unwrap();
        assert_eq!(cache.get(&conn_buf(), &ver("1.0.0")), Some(24));
        assert_eq!(cache.get(&conn_buf(), &ver("3.1.4")), Some(32));
        assert_eq!(cache.get(&id2, &ver("1.12.0")), Some(16));
        assert_eq!(cache.get(&id2, &ver("1.11.9")), None);
    }
}
