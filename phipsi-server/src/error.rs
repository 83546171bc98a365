//! HTTP error mapping.
//!
//! JSON routes answer failures with `{"error": "<message>"}`; the HTML
//! routes wrap the same error in [`HtmlError`] and answer with a small HTML
//! page. Unavailable upstream data is reported as 404 whatever the upstream
//! status was.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use phipsi_core::PhipsiError;
use phipsi_plot::html::escape_html;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid identifier or missing entry.
    #[error("{0}")]
    NotFound(String),

    /// Upstream answered with an error status or could not be reached. The
    /// detail (which may name upstream URLs) is logged only.
    #[error("upstream unavailable")]
    Unavailable { detail: String },

    /// Request body could not be read as the expected JSON.
    #[error("invalid request body: {message}")]
    BadRequest { status: StatusCode, message: String },

    /// Upstream returned data that could not be parsed. The detail is logged
    /// and kept out of the response.
    #[error("failed to parse {what}")]
    Unparsable { what: &'static str, detail: String },

    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// Map an error raised while fetching or parsing a structure file.
    pub fn structure(err: PhipsiError) -> Self {
        match err {
            PhipsiError::Parse(detail) => ApiError::Unparsable {
                what: "structure",
                detail,
            },
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::Unavailable { .. } | ApiError::Unparsable { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::BadRequest { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            ApiError::NotFound(msg) => log::warn!("not found: {}", msg),
            ApiError::Unavailable { detail } => log::warn!("upstream unavailable: {}", detail),
            ApiError::BadRequest { message, .. } => log::warn!("rejected request body: {}", message),
            ApiError::Unparsable { what, detail } => log::error!("failed to parse {}: {}", what, detail),
            ApiError::Internal(msg) => log::error!("internal error: {}", msg),
        }
    }
}

impl From<PhipsiError> for ApiError {
    fn from(err: PhipsiError) -> Self {
        match err {
            PhipsiError::Fetch(detail) => ApiError::Unavailable { detail },
            PhipsiError::Parse(detail) => ApiError::Unparsable {
                what: "upstream response",
                detail,
            },
            e if e.is_unavailable() => ApiError::NotFound(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// [`ApiError`] rendered as an HTML page.
#[derive(Debug)]
pub struct HtmlError(pub ApiError);

impl From<ApiError> for HtmlError {
    fn from(err: ApiError) -> Self {
        HtmlError(err)
    }
}

impl From<PhipsiError> for HtmlError {
    fn from(err: PhipsiError) -> Self {
        HtmlError(err.into())
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        self.0.log();
        let status = self.0.status();
        let page = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n  <head><meta charset=\"utf-8\"><title>{code}</title></head>\n  <body><p>Error: {msg}</p></body>\n</html>\n",
            code = status,
            msg = escape_html(&self.0.to_string()),
        );
        (status, Html(page)).into_response()
    }
}
