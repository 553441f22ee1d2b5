//! API error taxonomy.
//!
//! Every client-visible failure maps to exactly one of these variants; the
//! wire body is always `{"ok":false,"error":<message>}`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The track reference cannot be resolved to a playable object.
    #[error("NotFound")]
    NotFound,

    /// Requested byte range lies outside `[0, total)`.
    #[error("Range unsatisfiable")]
    RangeNotSatisfiable { total: u64 },

    /// Disallowed absolute URL origin or a path escaping the audio root.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The storage backend failed to serve the object.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The storage backend did not answer within the configured timeout.
    #[error("Upstream timeout")]
    UpstreamTimeout,

    /// The catalog store errored while executing a query.
    #[error("{0}")]
    QueryFailed(String),

    /// Malformed or missing request parameters.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::QueryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "ok": false, "error": self.to_string() }));

        // 416 responses advertise the object size so clients can re-request.
        if let ApiError::RangeNotSatisfiable { total } = self {
            return (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{total}"))],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}
