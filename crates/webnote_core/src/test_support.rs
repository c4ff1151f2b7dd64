//! Shared test-only helpers for webnote_core.

use crate::error::AppError;
use crate::store::{KvEntry, KvNamespace, MemoryStore, Stores};
use crate::NoteRepository;
use std::collections::HashSet;
use std::sync::Arc;

pub(crate) const TEST_SALT: &str = "test-salt";

/// Namespace whose every operation fails.
pub(crate) struct FailingStore;

fn unavailable() -> AppError {
    AppError::StorageMessage("store unavailable".to_string())
}

#[async_trait::async_trait]
impl KvNamespace for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<KvEntry>, AppError> {
        Err(unavailable())
    }

    async fn put(&self, _key: &str, _value: &str, _meta: Option<&[u8]>) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn delete(&self, _key: &str) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn list(&self, _prefix: &str) -> Result<Vec<String>, AppError> {
        Err(unavailable())
    }
}

/// In-memory namespace that fails reads for selected keys.
#[derive(Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    broken: HashSet<String>,
}

impl FlakyStore {
    pub(crate) fn breaking(keys: &[&str]) -> Self {
        Self {
            inner: MemoryStore::default(),
            broken: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[async_trait::async_trait]
impl KvNamespace for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, AppError> {
        if self.broken.contains(key) {
            return Err(unavailable());
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str, meta: Option<&[u8]>) -> Result<(), AppError> {
        self.inner.put(key, value, meta).await
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.inner.delete(key).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        self.inner.list(prefix).await
    }
}

/// Repository over fresh in-memory namespaces.
pub(crate) fn memory_repository() -> NoteRepository {
    NoteRepository::new(Stores::memory(), TEST_SALT)
}

/// Repository whose notes namespace is `notes`.
pub(crate) fn repository_with_notes(notes: Arc<dyn KvNamespace>) -> NoteRepository {
    NoteRepository::new(
        Stores::new(notes, Arc::new(MemoryStore::default())),
        TEST_SALT,
    )
}

/// Repository whose share namespace is `share`.
pub(crate) fn repository_with_share(share: Arc<dyn KvNamespace>) -> NoteRepository {
    NoteRepository::new(
        Stores::new(Arc::new(MemoryStore::default()), share),
        TEST_SALT,
    )
}
