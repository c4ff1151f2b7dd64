//! Public read-only share handler.

use crate::{
    error::{ApiError, ErrorCode, PageError},
    i18n::Lang,
    render, AppState,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Html,
};

/// Render the note behind a share token.
///
/// # Errors
/// Renders the 404 page for unknown tokens and the error page when the
/// store fails.
pub async fn view_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, PageError> {
    let lang = Lang::from_headers(&headers);
    match state.notes.resolve_share(&token).await {
        Ok(Some(note)) => Ok(render::share_page(lang, &note)),
        Ok(None) => Err(PageError::NotFound(lang)),
        Err(err) => Err(PageError::Internal(lang, err)),
    }
}

/// Non-GET requests to `/share/:token`.
///
/// `/share/auth`, `/share/pw` and `/share/setting` land here instead of the
/// per-note routes, so the caller gets the matching JSON error envelope.
pub async fn unsupported_method(Path(action): Path<String>) -> ApiError {
    let code = match action.as_str() {
        "auth" => ErrorCode::Auth,
        "pw" => ErrorCode::Password,
        "setting" => ErrorCode::Setting,
        _ => ErrorCode::Save,
    };
    tracing::debug!("Unsupported method on /share/{}", action);
    ApiError::new(code)
}
