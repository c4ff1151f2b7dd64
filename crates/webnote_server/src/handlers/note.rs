//! Note HTTP handlers.

use crate::{
    cookie::{auth_cookie, auth_cookie_values, cleared_auth_cookie, cookie_scope},
    error::{ApiError, ErrorCode, OrCode},
    i18n::Lang,
    render, AppState,
};
use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, OriginalUri, Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use webnote_core::models::Note;
use webnote_core::AppError;

/// Form body of `POST /:path`.
#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub t: String,
}

/// JSON body of `POST /:path/auth` and `POST /:path/pw`.
#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    #[serde(default)]
    pub passwd: String,
}

/// JSON body of `POST /:path/setting`.
#[derive(Debug, Deserialize)]
pub struct SettingRequest {
    pub mode: Option<String>,
    pub share: Option<bool>,
}

fn has_valid_cookie(state: &AppState, headers: &HeaderMap, path: &str) -> bool {
    auth_cookie_values(headers)
        .into_iter()
        .any(|token| state.tokens.verify(Some(token), path))
}

/// Authorized iff the note has no password or a cookie verifies for `path`.
fn is_authorized(state: &AppState, headers: &HeaderMap, note: &Note) -> bool {
    !note.meta.has_password() || has_valid_cookie(state, headers, &note.path)
}

/// Load `path` and reject the caller unless authorized for it.
async fn authorized_note(
    state: &AppState,
    headers: &HeaderMap,
    path: &str,
    code: ErrorCode,
) -> Result<Note, ApiError> {
    let note = state.notes.try_query(path).await.or_code(code)?;
    if is_authorized(state, headers, &note) {
        Ok(note)
    } else {
        Err(ApiError::auth_failed())
    }
}

fn rejected(code: ErrorCode, reason: impl std::fmt::Display) -> ApiError {
    ApiError::with_source(code, AppError::BadRequest(reason.to_string()))
}

fn with_cookie(cookie: String, body: serde_json::Value) -> Response {
    ([(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

/// `GET /:path`: editable view, or the password prompt for locked notes.
pub async fn view_note(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Html<String> {
    let lang = Lang::from_headers(&headers);
    let note = state.notes.query(&path).await;
    if is_authorized(&state, &headers, &note) {
        let token = note.meta.share.then(|| state.notes.share_token(&path));
        render::edit_page(lang, &note, token.as_deref())
    } else {
        render::need_password_page(lang, &path)
    }
}

/// `POST /:path`: save content from form field `t`; blank content deletes.
///
/// # Errors
/// Returns 10002 when unauthorized and 10001 when the save fails.
pub async fn save_note(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    form: Result<Form<SaveForm>, FormRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Form(form) = form.map_err(|rej| rejected(ErrorCode::Save, rej))?;
    authorized_note(&state, &headers, &path, ErrorCode::Save).await?;

    if form.t.len() > state.config.max_note_size {
        return Err(rejected(
            ErrorCode::Save,
            format!(
                "Note size exceeds maximum of {} bytes",
                state.config.max_note_size
            ),
        ));
    }

    let outcome = state
        .notes
        .create_or_update(&path, &form.t)
        .await
        .or_code(ErrorCode::Save)?;
    tracing::debug!("Saved note '{}': {:?}", path, outcome);
    Ok(Json(json!({ "code": 0 })))
}

/// `POST /:path/auth`: exchange the note password for an auth cookie.
///
/// # Errors
/// Returns 10002 for wrong passwords, notes without a password, and
/// store failures alike.
pub async fn auth(
    State(state): State<AppState>,
    Path(path): Path<String>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|rej| rejected(ErrorCode::Auth, rej))?;
    let matched = state
        .notes
        .check_password(&path, &req.passwd)
        .await
        .or_code(ErrorCode::Auth)?;
    if !matched {
        return Err(ApiError::auth_failed());
    }

    let token = state.tokens.issue(&path).or_code(ErrorCode::Auth)?;
    Ok(with_cookie(
        auth_cookie(&cookie_scope(uri.path(), "auth", &path), &token, Utc::now()),
        json!({ "code": 0, "refresh": true }),
    ))
}

/// `POST /:path/pw`: set (non-blank `passwd`) or remove the note password.
///
/// Setting a password expires the caller's cookie so the new password must
/// be entered; removing it issues a fresh cookie.
///
/// # Errors
/// Returns 10002 when unauthorized and 10003 when the update fails.
pub async fn set_password(
    State(state): State<AppState>,
    Path(path): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|rej| rejected(ErrorCode::Password, rej))?;
    authorized_note(&state, &headers, &path, ErrorCode::Password).await?;

    let has_password = state
        .notes
        .set_password(&path, &req.passwd)
        .await
        .or_code(ErrorCode::Password)?;
    let now = Utc::now();
    let scope = cookie_scope(uri.path(), "pw", &path);
    let cookie = if has_password {
        cleared_auth_cookie(&scope, now)
    } else {
        let token = state.tokens.issue(&path).or_code(ErrorCode::Password)?;
        auth_cookie(&scope, &token, now)
    };
    Ok(with_cookie(cookie, json!({ "code": 0 })))
}

/// `POST /:path/setting`: update display mode and sharing.
///
/// # Errors
/// Returns 10002 when unauthorized and 10004 when the update fails.
pub async fn update_setting(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<SettingRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = payload.map_err(|rej| rejected(ErrorCode::Setting, rej))?;
    authorized_note(&state, &headers, &path, ErrorCode::Setting).await?;

    let token = state
        .notes
        .update_settings(&path, req.mode, req.share)
        .await
        .or_code(ErrorCode::Setting)?;
    Ok(Json(match token {
        Some(token) => json!({ "code": 0, "data": token }),
        None => json!({ "code": 0 }),
    }))
}
