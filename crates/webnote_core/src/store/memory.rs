//! In-memory namespace.

use super::{KvEntry, KvNamespace};
use crate::error::AppError;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Namespace backed by an ordered map; contents live as long as the value.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, KvEntry>>,
}

#[async_trait::async_trait]
impl KvNamespace for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str, metadata: Option<&[u8]>) -> Result<(), AppError> {
        let entry = KvEntry {
            value: value.to_string(),
            metadata: metadata.map(<[u8]>::to_vec),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
