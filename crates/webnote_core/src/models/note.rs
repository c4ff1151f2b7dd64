//! Note models and the metadata merge rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Metadata attached to a note key, stored as JSON next to the content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMeta {
    /// Salted password hash; `None` means the note is openly editable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pw: Option<String>,
    #[serde(default)]
    pub share: bool,
    /// Display mode (for example `md`); opaque to the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Unix seconds of the last content write.
    #[serde(
        rename = "updateAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub update_at: Option<i64>,
}

/// A single field change inside a [`MetaPatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value untouched.
    Keep,
    /// Replace the stored value.
    Set(T),
    /// Remove the stored value.
    Unset,
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Keep => current,
            Patch::Set(value) => Some(value),
            Patch::Unset => None,
        }
    }

    /// `Set` when `value` is present, otherwise `Keep`.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Patch::Keep, Patch::Set)
    }
}

/// Partial metadata update; unspecified fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaPatch {
    pub pw: Patch<String>,
    pub share: Patch<bool>,
    pub mode: Patch<String>,
    pub update_at: Patch<i64>,
}

impl MetaPatch {
    /// Patch touching only the update timestamp.
    pub fn touched_at(timestamp: i64) -> Self {
        Self {
            update_at: Patch::Set(timestamp),
            ..Self::default()
        }
    }
}

impl NoteMeta {
    /// Shallow-merge `patch` into `self`.
    ///
    /// `Unset` on `share` resets the flag to `false`.
    pub fn merge(self, patch: MetaPatch) -> Self {
        Self {
            pw: patch.pw.apply(self.pw),
            share: patch.share.apply(Some(self.share)).unwrap_or(false),
            mode: patch.mode.apply(self.mode),
            update_at: patch.update_at.apply(self.update_at),
        }
    }

    /// Whether a password gates this note.
    pub fn has_password(&self) -> bool {
        self.pw.is_some()
    }
}

/// A note as read from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub path: String,
    pub content: String,
    pub meta: NoteMeta,
}

impl Note {
    /// Empty note with default metadata, as returned for unknown paths.
    pub fn empty(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }
}

/// Last-update time of a listed note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTime {
    At(i64),
    Unknown,
}

impl UpdateTime {
    /// Resolve a stored timestamp; out-of-range values are `Unknown`.
    pub fn from_timestamp(timestamp: Option<i64>) -> Self {
        match timestamp {
            Some(secs) if DateTime::<Utc>::from_timestamp(secs, 0).is_some() => {
                UpdateTime::At(secs)
            }
            _ => UpdateTime::Unknown,
        }
    }

    /// Sort key; `None` for `Unknown`.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            UpdateTime::At(secs) => Some(*secs),
            UpdateTime::Unknown => None,
        }
    }

    /// Human-readable UTC time, or `Unknown`.
    pub fn display(&self) -> String {
        self.timestamp()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

impl Serialize for UpdateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

/// One row of the note directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEntry {
    /// Store key (the note path).
    pub key: String,
    /// Decoded display title.
    pub title: String,
    pub update_at: UpdateTime,
    /// Raw unix seconds, when known.
    pub timestamp: Option<i64>,
    pub has_password: bool,
    pub is_shared: bool,
}

impl NoteEntry {
    /// Build a directory row from a key and its metadata.
    pub fn new(key: &str, meta: &NoteMeta) -> Self {
        let update_at = UpdateTime::from_timestamp(meta.update_at);
        Self {
            key: key.to_string(),
            title: display_title(key),
            update_at,
            timestamp: update_at.timestamp(),
            has_password: meta.has_password(),
            is_shared: meta.share,
        }
    }

    /// Row used when an entry's metadata could not be processed.
    pub fn placeholder(key: &str) -> Self {
        Self {
            key: key.to_string(),
            title: display_title(key),
            update_at: UpdateTime::Unknown,
            timestamp: None,
            has_password: false,
            is_shared: false,
        }
    }
}

/// Percent-decode a key for display, keeping the raw key if decoding fails.
pub fn display_title(key: &str) -> String {
    urlencoding::decode(key)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| key.to_string())
}
