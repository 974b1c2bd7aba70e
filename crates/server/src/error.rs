//! Error → HTTP response mapping.
//!
//! The core is presentation-agnostic; this is the one place its error enum
//! meets HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pagevault_core::Error;

/// Transport-edge wrapper for core errors.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) | Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Error::HttpError(_) | Error::FetchExhausted { .. } | Error::ReadFailure(_) => StatusCode::BAD_GATEWAY,
            Error::CacheInconsistency(_) => StatusCode::NOT_FOUND,
            Error::PersistFailure(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}
