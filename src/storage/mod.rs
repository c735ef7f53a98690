//! Key-Value Storage
//!
//! The persisted side of the dashboard: a flat map of string keys to string
//! values, the same shape a browser's local storage has.
//!
//! - **memory**: In-process store for tests and throwaway sessions
//! - **file**: JSON file store that survives restarts
//! - **error**: Error types
//!
//! Multi-entry writes go through [`KeyValueStore::apply`], which is atomic:
//! after it returns, either every operation in the batch is visible or none is.
//! Read-modify-write of a single entry goes through [`KeyValueStore::update`],
//! which holds the store's write lock across the read and the write.
//!
//! # Example
//!
//! ```rust,no_run
//! use admin_dash::storage::{keys, FileStore, KeyValueStore, StoreOp};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::open("./admin-dash-store.json")?;
//!
//!     store.apply(vec![
//!         StoreOp::set(keys::TOKEN, "abc"),
//!         StoreOp::set(keys::USER, r#"{"id":1,"email":"user1@example.com"}"#),
//!     ])?;
//!
//!     assert_eq!(store.get(keys::TOKEN)?.as_deref(), Some("abc"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

/// Well-known entry names
pub mod keys {
    /// Session token (raw string)
    pub const TOKEN: &str = "token";
    /// Session profile, JSON `{id, email}`
    pub const USER: &str = "user";
    /// Theme preference, `"true"` or `"false"`
    pub const DARK_MODE: &str = "darkMode";
    /// Users whose remote create failed, JSON array
    pub const LOCAL_USERS: &str = "localUsers";
}

/// One mutation inside an atomic batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StoreOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        StoreOp::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        StoreOp::Remove { key: key.into() }
    }

    /// Apply this operation to an in-memory map
    pub(crate) fn apply_to(self, entries: &mut BTreeMap<String, String>) {
        match self {
            StoreOp::Set { key, value } => {
                entries.insert(key, value);
            }
            StoreOp::Remove { key } => {
                entries.remove(&key);
            }
        }
    }
}

/// String key-value storage with atomic batches
pub trait KeyValueStore: Send + Sync {
    /// Read one entry
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Apply every operation or none of them
    fn apply(&self, ops: Vec<StoreOp>) -> StorageResult<()>;

    /// Replace one entry with `f(current)`; `None` removes it
    ///
    /// No other writer (in this process or another) runs between the read
    /// and the write. If `f` fails nothing is written.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> StorageResult<Option<String>>,
    ) -> StorageResult<()>;

    /// Write one entry
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.apply(vec![StoreOp::set(key, value)])
    }

    /// Remove one entry (missing entries are fine)
    fn remove(&self, key: &str) -> StorageResult<()> {
        self.apply(vec![StoreOp::remove(key)])
    }
}
