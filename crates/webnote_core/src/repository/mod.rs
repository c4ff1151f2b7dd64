//! Note repository over the `NOTES` and `SHARE` namespaces.

mod list;


pub use list::sort_entries;

use crate::credentials::{hash_password, password_matches, share_token};
use crate::error::AppError;
use crate::models::{MetaPatch, Note, NoteMeta, Patch};
use crate::store::{KvEntry, Stores};
use chrono::Utc;

/// Result of a content save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Content was written with a fresh timestamp.
    Saved,
    /// Blank content removed the note.
    Deleted,
}

/// Reads and writes notes, their metadata, and share mappings.
#[derive(Clone)]
pub struct NoteRepository {
    stores: Stores,
    salt: String,
}

fn decode_meta(metadata: Option<&[u8]>) -> Result<NoteMeta, AppError> {
    match metadata {
        Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(bytes)?),
        _ => Ok(NoteMeta::default()),
    }
}

fn note_from_entry(path: &str, entry: Option<KvEntry>) -> Result<Note, AppError> {
    match entry {
        Some(entry) => Ok(Note {
            path: path.to_string(),
            meta: decode_meta(entry.metadata.as_deref())?,
            content: entry.value,
        }),
        None => Ok(Note::empty(path)),
    }
}

impl NoteRepository {
    /// Build a repository over `stores`, salting credentials with `salt`.
    pub fn new(stores: Stores, salt: impl Into<String>) -> Self {
        Self {
            stores,
            salt: salt.into(),
        }
    }

    /// Fetch a note, propagating store failures.
    ///
    /// # Returns
    /// The stored note, or an empty note with default metadata when missing.
    ///
    /// # Errors
    /// Returns an error when the store read or metadata decoding fails.
    pub async fn try_query(&self, path: &str) -> Result<Note, AppError> {
        let entry = self.stores.notes.get(path).await?;
        note_from_entry(path, entry)
    }

    /// Fetch a note; failures are logged and read as an empty note.
    pub async fn query(&self, path: &str) -> Note {
        match self.try_query(path).await {
            Ok(note) => note,
            Err(err) => {
                tracing::warn!("Failed to read note '{}': {}", path, err);
                Note::empty(path)
            }
        }
    }

    /// Persist `content` with the stored metadata merged with `patch`.
    ///
    /// # Returns
    /// The metadata that was written.
    ///
    /// # Errors
    /// Returns an error when reading current metadata or writing fails.
    pub async fn write(
        &self,
        path: &str,
        content: &str,
        patch: MetaPatch,
    ) -> Result<NoteMeta, AppError> {
        let current = self.try_query(path).await?;
        let meta = current.meta.merge(patch);
        let encoded = serde_json::to_vec(&meta)?;
        self.stores.notes.put(path, content, Some(&encoded)).await?;
        Ok(meta)
    }

    /// Merge `patch` into a note's metadata, keeping its content.
    ///
    /// # Errors
    /// Returns an error when the store read or write fails.
    pub async fn update_meta(&self, path: &str, patch: MetaPatch) -> Result<NoteMeta, AppError> {
        let current = self.try_query(path).await?;
        let meta = current.meta.merge(patch);
        let encoded = serde_json::to_vec(&meta)?;
        self.stores
            .notes
            .put(path, &current.content, Some(&encoded))
            .await?;
        Ok(meta)
    }

    /// Save submitted note content.
    ///
    /// Whitespace-only content deletes the note; anything else is stored
    /// verbatim with `updateAt` set to now.
    ///
    /// # Errors
    /// Returns an error when the store write or delete fails.
    pub async fn create_or_update(&self, path: &str, content: &str) -> Result<SaveOutcome, AppError> {
        if content.trim().is_empty() {
            self.delete(path).await?;
            return Ok(SaveOutcome::Deleted);
        }
        self.write(path, content, MetaPatch::touched_at(Utc::now().timestamp()))
            .await?;
        Ok(SaveOutcome::Saved)
    }

    /// Remove a note and any share mapping pointing at it.
    ///
    /// # Errors
    /// Returns an error when either delete fails.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.stores.notes.delete(path).await?;
        self.stores.share.delete(&self.share_token(path)).await?;
        Ok(())
    }

    /// Set (non-blank `plaintext`) or clear (blank) a note's password.
    ///
    /// # Returns
    /// `true` when a password is now set.
    ///
    /// # Errors
    /// Returns an error when the metadata write fails.
    pub async fn set_password(&self, path: &str, plaintext: &str) -> Result<bool, AppError> {
        let pw = if plaintext.trim().is_empty() {
            Patch::Unset
        } else {
            Patch::Set(hash_password(&self.salt, plaintext))
        };
        let meta = self
            .update_meta(
                path,
                MetaPatch {
                    pw,
                    ..MetaPatch::default()
                },
            )
            .await?;
        Ok(meta.has_password())
    }

    /// Check a submitted password against the note's stored hash.
    ///
    /// Notes without a password never match.
    ///
    /// # Errors
    /// Returns an error when the note cannot be read.
    pub async fn check_password(&self, path: &str, plaintext: &str) -> Result<bool, AppError> {
        let note = self.try_query(path).await?;
        Ok(note
            .meta
            .pw
            .as_deref()
            .is_some_and(|stored| password_matches(&self.salt, plaintext, stored)))
    }

    /// Apply display settings and maintain the share mapping.
    ///
    /// A blank `mode` clears the stored mode. When sharing is enabled the
    /// mapping is written before the flag, so a failed write never leaves a
    /// shared note without a mapping.
    ///
    /// # Returns
    /// The share token when `share` was set to `true`.
    ///
    /// # Errors
    /// Returns an error when the metadata or mapping write fails.
    pub async fn update_settings(
        &self,
        path: &str,
        mode: Option<String>,
        share: Option<bool>,
    ) -> Result<Option<String>, AppError> {
        let mode = match mode {
            Some(mode) if mode.trim().is_empty() => Patch::Unset,
            other => Patch::from_option(other),
        };
        let patch = MetaPatch {
            mode,
            share: Patch::from_option(share),
            ..MetaPatch::default()
        };
        let token = self.share_token(path);
        match share {
            Some(true) => {
                self.stores.share.put(&token, path, None).await?;
                if let Err(err) = self.update_meta(path, patch).await {
                    if let Err(cleanup) = self.stores.share.delete(&token).await {
                        tracing::warn!(
                            "Failed to drop share mapping for '{}': {}",
                            path,
                            cleanup
                        );
                    }
                    return Err(err);
                }
                Ok(Some(token))
            }
            Some(false) => {
                self.update_meta(path, patch).await?;
                self.stores.share.delete(&token).await?;
                Ok(None)
            }
            None => {
                self.update_meta(path, patch).await?;
                Ok(None)
            }
        }
    }

    /// Resolve a share token to the note it exposes.
    ///
    /// # Returns
    /// `Ok(None)` when the token is unknown or the note is no longer shared.
    ///
    /// # Errors
    /// Returns an error when a store read fails.
    pub async fn resolve_share(&self, token: &str) -> Result<Option<Note>, AppError> {
        let Some(mapping) = self.stores.share.get(token).await? else {
            return Ok(None);
        };
        let note = self.try_query(&mapping.value).await?;
        if !note.meta.share {
            tracing::debug!("Share token {} points at unshared note", token);
            return Ok(None);
        }
        Ok(Some(note))
    }

    /// Share token for `path` under this repository's salt.
    pub fn share_token(&self, path: &str) -> String {
        share_token(&self.salt, path)
    }
}
