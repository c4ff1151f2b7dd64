//! Directory and listing handlers.

use crate::{
    error::{ApiError, ErrorCode, OrCode, PageError},
    i18n::Lang,
    render, AppState,
};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use webnote_core::naming;

fn redirect_to_new_note() -> Redirect {
    Redirect::to(&format!("/{}", naming::generate_note_id()))
}

async fn directory_html(state: &AppState, lang: Lang) -> Result<Html<String>, PageError> {
    let entries = state.notes.list().await;
    render::directory_page(lang, &entries).map_err(|err| PageError::Internal(lang, err))
}

/// `GET /`: directory page, or a fresh note when `ROOT_REDIRECT` is set.
///
/// A failure building the directory falls back to the redirect.
pub async fn root(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.config.root_redirect {
        return redirect_to_new_note().into_response();
    }
    match directory_html(&state, Lang::from_headers(&headers)).await {
        Ok(page) => page.into_response(),
        Err(err) => {
            tracing::warn!("Directory unavailable, redirecting to a new note: {:?}", err);
            redirect_to_new_note().into_response()
        }
    }
}

/// `GET /directory`: directory page.
///
/// # Errors
/// Renders the generic error page when the directory cannot be built.
pub async fn directory(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, PageError> {
    directory_html(&state, Lang::from_headers(&headers)).await
}

/// `GET /new`: redirect to a random note id.
pub async fn new_note() -> Redirect {
    redirect_to_new_note()
}

/// `GET /api/notes`: listing as a JSON envelope.
///
/// # Errors
/// Returns code 10005 when the listing cannot be serialized.
pub async fn api_notes(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let entries = state.notes.list().await;
    let count = entries.len();
    let notes = serde_json::to_value(&entries)
        .map_err(webnote_core::AppError::from)
        .or_code(ErrorCode::List)?;
    Ok(Json(json!({ "code": 0, "notes": notes, "count": count })))
}
