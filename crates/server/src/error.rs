//! HTTP error mapping for the radar API.
//!
//! A missing hostname is a 404 with a fixed body. Every other failure is a
//! 500 carrying the route's context string and the underlying error message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use radar_core::Error;
use serde::Serialize;

pub const LIST_FAILED: &str = "Failed to retrieve websites";
pub const LOOKUP_FAILED: &str = "Failed to retrieve website";
pub const NOT_FOUND: &str = "Website not found";

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error returned from route handlers.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct ApiError {
    context: &'static str,
    #[source]
    source: Error,
}

impl ApiError {
    pub fn new(context: &'static str, source: Error) -> Self {
        Self { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self.source {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match &self.source {
            Error::NotFound(_) => ErrorBody { error: NOT_FOUND.to_string(), message: None },
            other => ErrorBody { error: self.context.to_string(), message: Some(other.to_string()) },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.source, context = self.context, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
