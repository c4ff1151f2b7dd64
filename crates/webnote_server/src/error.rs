//! Conversion of handler failures into JSON envelopes and fallback pages.
//!
//! JSON endpoints answer `{code, message}` with HTTP 200; the non-zero
//! `code` tells the client which operation failed. Page endpoints render
//! the 404 or generic error template instead.

use crate::i18n::Lang;
use crate::render;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use webnote_core::AppError;

/// Error codes carried in the JSON error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Saving or deleting note content failed.
    Save,
    /// Password or token check failed.
    Auth,
    /// Setting or clearing the password failed.
    Password,
    /// Updating mode/share settings failed.
    Setting,
    /// Building the note listing failed.
    List,
}

impl ErrorCode {
    /// Numeric code sent to clients.
    pub fn code(self) -> u32 {
        match self {
            ErrorCode::Save => 10001,
            ErrorCode::Auth => 10002,
            ErrorCode::Password => 10003,
            ErrorCode::Setting => 10004,
            ErrorCode::List => 10005,
        }
    }

    /// Client-facing message; never includes the underlying cause.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Save => "Note save failed!",
            ErrorCode::Auth => "Password auth failed!",
            ErrorCode::Password => "Password setting failed!",
            ErrorCode::Setting => "Setting update failed!",
            ErrorCode::List => "Note list failed!",
        }
    }
}

/// Failure of a JSON endpoint.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    source: Option<AppError>,
}

impl ApiError {
    /// Error with no underlying cause (for example a rejected password).
    pub fn new(code: ErrorCode) -> Self {
        Self { code, source: None }
    }

    /// Uniform authentication failure.
    pub fn auth_failed() -> Self {
        Self::new(ErrorCode::Auth)
    }

    /// Error caused by `source`.
    pub fn with_source(code: ErrorCode, source: AppError) -> Self {
        Self {
            code,
            source: Some(source),
        }
    }

    /// Code this error will report.
    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.source {
            Some(source) => tracing::error!(
                "{} ({}): {}",
                self.code.message(),
                self.code.code(),
                source
            ),
            None => tracing::debug!("{} ({})", self.code.message(), self.code.code()),
        }
        let body = Json(json!({
            "code": self.code.code(),
            "message": self.code.message(),
        }));
        (StatusCode::OK, body).into_response()
    }
}

/// Attach an [`ErrorCode`] to a fallible core operation.
pub trait OrCode<T> {
    /// Map the error into an [`ApiError`] reporting `code`.
    fn or_code(self, code: ErrorCode) -> Result<T, ApiError>;
}

impl<T> OrCode<T> for Result<T, AppError> {
    fn or_code(self, code: ErrorCode) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::with_source(code, err))
    }
}

/// Failure of an HTML endpoint.
#[derive(Debug)]
pub enum PageError {
    NotFound(Lang),
    Internal(Lang, AppError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(lang) => {
                (StatusCode::NOT_FOUND, render::not_found_page(lang)).into_response()
            }
            PageError::Internal(lang, err) => {
                tracing::error!("Page rendering failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, render::error_page(lang)).into_response()
            }
        }
    }
}
