//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_NOTE_SIZE, DEFAULT_PORT, DEFAULT_SALT, REDB_FILE_NAME};
use rand::RngCore;
use std::env;
use std::path::PathBuf;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Persistent redb file at `db_path`.
    Redb,
    /// Process-local map; contents are lost on exit.
    Memory,
}

/// Runtime configuration for WebNote.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_note_size: usize,
    pub secret: Vec<u8>,
    /// `true` when `SECRET` was missing and a random key was generated.
    pub ephemeral_secret: bool,
    pub salt: String,
    /// Redirect `GET /` to a fresh note instead of rendering the directory.
    pub root_redirect: bool,
    pub store: StoreKind,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    for key in ["HOME", "USERPROFILE"] {
        if let Ok(home) = env::var(key) {
            if !home.trim().is_empty() {
                return Some(PathBuf::from(home));
            }
        }
    }
    env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("webnote")
        .join(REDB_FILE_NAME)
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn parse_store_kind(value: Option<String>) -> StoreKind {
    match value.as_deref().map(str::trim) {
        Some(kind) if kind.eq_ignore_ascii_case("memory") => StoreKind::Memory,
        Some(kind) if !kind.is_empty() && !kind.eq_ignore_ascii_case("redb") => {
            tracing::warn!("Unknown STORE='{}'; using redb", kind);
            StoreKind::Redb
        }
        _ => StoreKind::Redb,
    }
}

fn random_secret() -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Arguments
    /// - `lookup`: Returns the raw value for a variable name, if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| {
            lookup(name)
                .and_then(|value| parse_env_flag(&value))
                .unwrap_or(false)
        };
        let (secret, ephemeral_secret) = match lookup("SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => (secret.into_bytes(), false),
            None => (random_secret(), true),
        };

        Self {
            db_path: lookup("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(default_db_path),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_note_size: lookup("MAX_NOTE_SIZE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_NOTE_SIZE),
            secret,
            ephemeral_secret,
            salt: lookup("SALT")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SALT.to_string()),
            root_redirect: flag("ROOT_REDIRECT"),
            store: parse_store_kind(lookup("STORE")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, Config, StoreKind};
    use crate::constants::{DEFAULT_MAX_NOTE_SIZE, DEFAULT_PORT, DEFAULT_SALT};
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
    }

    #[test]
    fn defaults_apply_when_variables_are_missing() {
        let config = config_from(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_note_size, DEFAULT_MAX_NOTE_SIZE);
        assert_eq!(config.salt, DEFAULT_SALT);
        assert_eq!(config.store, StoreKind::Redb);
        assert!(!config.root_redirect);
        assert!(config.ephemeral_secret);
        assert_eq!(config.secret.len(), 32);
        assert!(config.db_path.ends_with("notes.redb"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("DB_PATH", "/tmp/webnote-test.redb"),
            ("PORT", "9000"),
            ("MAX_NOTE_SIZE", "2048"),
            ("SECRET", "s3cret"),
            ("SALT", "pepper"),
            ("ROOT_REDIRECT", "yes"),
            ("STORE", "Memory"),
        ]);
        assert_eq!(config.db_path, "/tmp/webnote-test.redb");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_note_size, 2048);
        assert_eq!(config.secret, b"s3cret".to_vec());
        assert!(!config.ephemeral_secret);
        assert_eq!(config.salt, "pepper");
        assert!(config.root_redirect);
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "eighty"), ("MAX_NOTE_SIZE", "-1")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_note_size, DEFAULT_MAX_NOTE_SIZE);
    }
}
