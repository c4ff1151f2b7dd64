//! Shared constants used across WebNote crates.

/// Default HTTP port for WebNote.
pub const DEFAULT_PORT: u16 = 38412;

/// Default maximum request body (and note content) size.
pub const DEFAULT_MAX_NOTE_SIZE: usize = 1024 * 1024;

/// Default salt mixed into password hashes and share tokens.
pub const DEFAULT_SALT: &str = "webnote-salt";

/// File name of the default redb database.
pub const REDB_FILE_NAME: &str = "notes.redb";

/// Length of identifiers produced by `GET /new`.
pub const RANDOM_NOTE_ID_LEN: usize = 3;

/// Number of hex characters kept from the share digest.
pub const SHARE_TOKEN_LEN: usize = 12;

/// Name of the cookie carrying the auth token.
pub const AUTH_COOKIE_NAME: &str = "auth";

/// Lifetime of an issued auth cookie, in days.
pub const AUTH_COOKIE_TTL_DAYS: i64 = 7;

/// How far in the past a cleared auth cookie expires, in days.
pub const AUTH_COOKIE_CLEAR_DAYS: i64 = 100;
