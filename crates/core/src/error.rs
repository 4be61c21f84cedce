//! Unified error types for radar.
//!
//! Variants are grouped by the pipeline stage or subsystem that raises them.
//! `Error` is `Clone` so one scrape outcome can be handed to every caller
//! waiting on it.

use std::sync::Arc;
use tokio_rusqlite::rusqlite;

/// Unified error types for the radar service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Source page answered with a non-success status.
    #[error("FETCH_FAILED: {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// Network-level failure (DNS, connect, timeout, body read).
    #[error("FETCH_FAILED: {0}")]
    Network(String),

    /// Embedded data literal not found in the page.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// Literal could not be parsed, strictly or leniently.
    #[error("DESERIALIZE_FAILED: {0}")]
    DeserializeFailed(String),

    /// Parsed data did not match the Website schema.
    #[error("VALIDATION_FAILED: {0}")]
    ValidationFailed(String),

    /// No website with the requested hostname.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(Arc<tokio_rusqlite::Error>),

    /// Cache file was written by a newer schema than this build understands.
    #[error("CACHE_ERROR: unsupported cache schema version {found} (expected at most {supported})")]
    UnsupportedSchema { found: i64, supported: i64 },

    /// Cached value could not be encoded.
    #[error("CACHE_ERROR: {0}")]
    CacheCodec(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Name of the scrape stage that produced this error, if any.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Error::HttpStatus { .. } | Error::Network(_) | Error::InvalidUrl(_) => Some("fetch"),
            Error::ExtractFailed(_) => Some("extract"),
            Error::DeserializeFailed(_) => Some("deserialize"),
            Error::ValidationFailed(_) => Some("validate"),
            _ => None,
        }
    }

    /// Whether this error came from the cache backend.
    pub fn is_cache(&self) -> bool {
        matches!(self, Error::Database(_) | Error::UnsupportedSchema { .. } | Error::CacheCodec(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(Arc::new(tokio_rusqlite::Error::ConnectionClosed)),
            tokio_rusqlite::Error::Close(c) => Error::Database(Arc::new(tokio_rusqlite::Error::Close(c))),
            _ => Error::Database(Arc::new(tokio_rusqlite::Error::ConnectionClosed)),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(Arc::new(err))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(Arc::new(tokio_rusqlite::Error::Error(err)))
    }
}
