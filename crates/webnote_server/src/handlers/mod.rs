//! HTTP request handlers.

/// Root, directory, random-note, and listing endpoints.
pub mod directory;
/// Per-note view, save, auth, password, and setting endpoints.
pub mod note;
/// Public read-only share endpoint.
pub mod share;

use crate::error::PageError;
use crate::i18n::Lang;
use axum::http::HeaderMap;

/// Render the 404 page for unmatched routes.
pub async fn not_found(headers: HeaderMap) -> PageError {
    PageError::NotFound(Lang::from_headers(&headers))
}
