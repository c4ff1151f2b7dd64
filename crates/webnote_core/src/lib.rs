//! Core domain library for WebNote (config, storage, notes, credentials).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Password hashing and share-token digests.
pub mod credentials;
/// Application error types (storage/domain).
pub mod error;
/// Note and metadata models.
pub mod models;
/// Random note identifiers.
pub mod naming;
/// Note repository over the key-value store.
pub mod repository;
/// Key-value store adapter and backends.
pub mod store;
/// Signed auth tokens bound to a note path.
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use error::AppError;
pub use repository::NoteRepository;
pub use store::Stores;
pub use token::TokenService;
