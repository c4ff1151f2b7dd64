//! Directory listing: key enumeration, per-key fan-out, and ordering.

use super::{decode_meta, NoteRepository};
use crate::models::NoteEntry;
use futures::future::join_all;

/// Order entries most recently updated first; unknown times go last.
pub fn sort_entries(entries: &mut [NoteEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

impl NoteRepository {
    /// List every note with its directory metadata.
    ///
    /// Never fails: an entry whose metadata cannot be read becomes a
    /// placeholder, and a failed key enumeration yields an empty list.
    pub async fn list(&self) -> Vec<NoteEntry> {
        let keys = match self.stores.notes.list("").await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::error!("Failed to enumerate notes: {}", err);
                return Vec::new();
            }
        };

        let rows = join_all(keys.iter().map(|key| self.list_entry(key))).await;
        let mut entries: Vec<NoteEntry> = rows.into_iter().flatten().collect();
        sort_entries(&mut entries);
        entries
    }

    async fn list_entry(&self, key: &str) -> Option<NoteEntry> {
        let entry = match self.stores.notes.get(key).await {
            Ok(Some(entry)) => entry,
            // Removed between enumeration and read.
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!("Failed to read metadata for '{}': {}", key, err);
                return Some(NoteEntry::placeholder(key));
            }
        };
        match decode_meta(entry.metadata.as_deref()) {
            Ok(meta) => Some(NoteEntry::new(key, &meta)),
            Err(err) => {
                tracing::warn!("Unreadable metadata for '{}': {}", key, err);
                Some(NoteEntry::placeholder(key))
            }
        }
    }
}
