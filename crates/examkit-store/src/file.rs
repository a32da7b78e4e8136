//! On-disk key-value store: one JSON file per key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use examkit_core::error::StoreError;
use examkit_core::traits::KeyValueStore;

const EXTENSION: &str = "json";

/// A [`KeyValueStore`] that keeps each key in `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!("opened file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examkit_core::store::{read_json, write_json};

    #[test]
    fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.get("exams").unwrap().is_none());
        store.set("exams", "[]").unwrap();
        assert_eq!(store.get("exams").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("exams.json").exists());

        store.remove("exams").unwrap();
        assert!(store.get("exams").unwrap().is_none());
        store.remove("exams").unwrap();
    }

    #[test]
    fn keys_are_sorted_and_skip_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("examSummaries", "[]").unwrap();
        store.set("exam-history-e1", "{}").unwrap();
        std::fs::write(dir.path().join("stray.json.tmp"), "x").unwrap();
        std::fs::write(dir.path().join("README"), "x").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["exam-history-e1", "examSummaries"]);
    }

    #[test]
    fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        for key in ["../escape", "a/b", "", ".hidden", "sp ace"] {
            assert!(
                matches!(store.set(key, "1"), Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        store.set("folders", "[]").unwrap();
        assert!(nested.join("folders.json").exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            assert!(write_json(&store, "exam-answers-e1", &vec!["A", "B"]));
        }
        let store = FileStore::open(dir.path()).unwrap();
        let value: Option<Vec<String>> = read_json(&store, "exam-answers-e1");
        assert_eq!(value, Some(vec!["A".to_string(), "B".to_string()]));
    }
}
