//! JSON File Store
//!
//! Persists the whole map as one JSON object. Every mutation writes a
//! temporary sibling file and renames it over the original, so a reader
//! (or a crash) only ever sees a complete batch.
//!
//! The web server and the CLI may share one file. Reads always go to disk,
//! and every write re-reads the file while holding an exclusive lock on a
//! `.lock` sibling, so a write from one process never resurrects entries
//! another process removed.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fd_lock::RwLock as FileLock;

use super::{KeyValueStore, StorageError, StorageResult, StoreOp};

type Entries = BTreeMap<String, String>;

/// Key-value store backed by a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    /// Serializes writers inside this process
    writer: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file is an empty store; the file is only created on the
    /// first write. A file that is not a JSON object of strings is rejected.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = path.with_extension("json.lock");
        let store = Self {
            path,
            lock_path,
            writer: Mutex::new(()),
        };

        let entries = store.read_entries()?;
        tracing::debug!(path = ?store.path, entries = entries.len(), "Opened key-value store");

        Ok(store)
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<Entries> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Entries::new()),
            Ok(content) => serde_json::from_str::<Entries>(&content).map_err(|e| {
                StorageError::Corruption {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn ensure_parent(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Run `stage` on the on-disk entries and persist the result, all under
    /// the in-process mutex and the cross-process file lock
    fn write_locked(
        &self,
        stage: &mut dyn FnMut(&mut Entries) -> StorageResult<()>,
    ) -> StorageResult<()> {
        let _writer = self
            .writer
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        self.ensure_parent()?;
        let lock_err = |source| StorageError::Io {
            path: self.lock_path.clone(),
            source,
        };
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(lock_err)?;
        let mut lock = FileLock::new(lock_file);
        let _held = lock.write().map_err(lock_err)?;

        let mut entries = self.read_entries()?;
        stage(&mut entries)?;
        self.persist(&entries)
    }

    fn persist(&self, entries: &Entries) -> StorageResult<()> {
        let body = serde_json::to_vec_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let io_err = |source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        };
        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        file.write_all(&body).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        fs::rename(&tmp_path, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn apply(&self, ops: Vec<StoreOp>) -> StorageResult<()> {
        let mut ops = Some(ops);
        self.write_locked(&mut |entries| {
            for op in ops.take().into_iter().flatten() {
                op.apply_to(entries);
            }
            Ok(())
        })
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> StorageResult<Option<String>>,
    ) -> StorageResult<()> {
        self.write_locked(&mut |entries| {
            match f(entries.get(key).cloned())? {
                Some(value) => entries.insert(key.to_string(), value),
                None => entries.remove(key),
            };
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();

        assert_eq!(store.get(keys::TOKEN).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_batch_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let store = FileStore::open(&path).unwrap();
            store
                .apply(vec![
                    StoreOp::set(keys::TOKEN, "tok"),
                    StoreOp::set(keys::USER, r#"{"id":1,"email":"a@b.c"}"#),
                ])
                .unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::TOKEN).unwrap().as_deref(), Some("tok"));
        assert_eq!(
            reopened.get(keys::USER).unwrap().as_deref(),
            Some(r#"{"id":1,"email":"a@b.c"}"#)
        );

        reopened
            .apply(vec![StoreOp::remove(keys::TOKEN), StoreOp::remove(keys::USER)])
            .unwrap();

        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.get(keys::TOKEN).unwrap(), None);
        assert_eq!(again.get(keys::USER).unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_second_handle_removal_is_not_undone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let server = FileStore::open(&path).unwrap();
        server
            .apply(vec![
                StoreOp::set(keys::TOKEN, "tok"),
                StoreOp::set(keys::USER, r#"{"id":1,"email":"a@b.c"}"#),
            ])
            .unwrap();

        let cli = FileStore::open(&path).unwrap();
        cli.apply(vec![StoreOp::remove(keys::TOKEN), StoreOp::remove(keys::USER)])
            .unwrap();

        // Server sees the removal and its own write keeps it
        assert_eq!(server.get(keys::TOKEN).unwrap(), None);
        server.set(keys::DARK_MODE, "true").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::TOKEN).unwrap(), None);
        assert_eq!(reopened.get(keys::USER).unwrap(), None);
        assert_eq!(reopened.get(keys::DARK_MODE).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_concurrent_updates_across_handles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let store = FileStore::open(&path).unwrap();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store
                            .update("count", &mut |current| {
                                let n: u32 = current.as_deref().unwrap_or("0").parse().unwrap();
                                Ok(Some((n + 1).to_string()))
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("count").unwrap().as_deref(), Some("100"));
    }

    #[test]
    fn test_failed_update_leaves_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).unwrap();
        store.set(keys::DARK_MODE, "false").unwrap();

        let result = store.update(keys::DARK_MODE, &mut |_| {
            Err(StorageError::Serialization("bad".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(store.get(keys::DARK_MODE).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corruption { .. }));
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "  \n").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(keys::DARK_MODE).unwrap(), None);
    }
}
