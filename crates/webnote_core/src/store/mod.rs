//! Key-value store adapter.
//!
//! Notes live in a namespaced store where each key carries a value plus a
//! small opaque metadata blob. The repository only sees the
//! [`KvNamespace`] trait; persistence is provided by [`RedbStore`] and tests
//! use [`MemoryStore`].

mod memory;
mod redb_backend;
mod tables;

pub use memory::MemoryStore;
pub use redb_backend::{RedbNamespace, RedbStore};

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Value and attached metadata stored under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvEntry {
    pub value: String,
    pub metadata: Option<Vec<u8>>,
}

/// A single namespace of an eventually-consistent key-value store.
///
/// Implementations must be safe to share across async tasks.
#[async_trait::async_trait]
pub trait KvNamespace: Send + Sync + 'static {
    /// Fetch value and metadata for `key`; `Ok(None)` when missing.
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, AppError>;

    /// Store `value` and `metadata` under `key`, replacing both.
    async fn put(&self, key: &str, value: &str, metadata: Option<&[u8]>) -> Result<(), AppError>;

    /// Remove `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// List key names starting with `prefix`, in key order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, AppError>;
}

/// The two namespaces used by WebNote.
#[derive(Clone)]
pub struct Stores {
    /// Note path -> content with metadata.
    pub notes: Arc<dyn KvNamespace>,
    /// Share token -> note path.
    pub share: Arc<dyn KvNamespace>,
}

impl Stores {
    /// Bundle two namespace handles.
    pub fn new(notes: Arc<dyn KvNamespace>, share: Arc<dyn KvNamespace>) -> Self {
        Self { notes, share }
    }

    /// Fresh in-memory namespaces.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()), Arc::new(MemoryStore::default()))
    }

    /// Namespaces backed by one redb file.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn redb(path: &str) -> Result<Self, AppError> {
        let store = RedbStore::open(path)?;
        Ok(Self::new(Arc::new(store.notes()), Arc::new(store.share())))
    }
}
