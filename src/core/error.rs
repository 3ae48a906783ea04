//! Typed error handling for the dashboard service
//!
//! # Error Categories
//!
//! - [`StorageError`]: the record store failed a find, count, distinct or insert
//! - [`ConfigError`]: configuration could not be read or holds a bad value;
//!   returned by [`crate::config::AppConfig`] loading, before any request
//! - [`ImportError`]: the bulk importer could not read or map a source row
//!
//! Malformed query parameters are not errors: they are coerced when the
//! request is parsed (see [`crate::core::filter`]). Unknown sort keys and
//! orders fall back to defaults (see [`crate::core::sort`]).
//!
//! Over HTTP every failure becomes `{"success": false, "message": ...}` with a
//! 500 status. The public message is chosen per route; the underlying cause is
//! logged and never sent to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the dashboard service
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Record store failures
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Bulk import errors
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl DashboardError {
    /// Get the HTTP status code for this error
    ///
    /// Every kind the core can produce is a server-side failure.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Storage(_) => "STORAGE_ERROR",
            DashboardError::Import(_) => "IMPORT_ERROR",
        }
    }

    /// Attach the message the client will see
    pub fn with_public_message(self, message: &'static str) -> ApiError {
        ApiError {
            source: self,
            message,
        }
    }
}

/// Error envelope returned to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A failed request: the internal cause plus the message the client sees
#[derive(Debug)]
pub struct ApiError {
    pub source: DashboardError,
    pub message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(
            code = self.source.error_code(),
            error = %self.source,
            "{}",
            self.message
        );
        let status = self.source.status_code();
        (status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// A stored document could not be mapped to a record
    #[error("{backend} returned a malformed record: {message}")]
    DecodeError { backend: String, message: String },

    /// Backend not available in this build
    #[error("Storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },
}

impl StorageError {
    pub fn query(backend: &str, message: impl ToString) -> Self {
        StorageError::QueryError {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }

    pub fn decode(backend: &str, message: impl ToString) -> Self {
        StorageError::DecodeError {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read config file '{file}': {message}")]
    ReadError { file: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A value is present but unusable
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

// =============================================================================
// Import Errors
// =============================================================================

/// Errors related to the bulk importer
#[derive(Debug, Error)]
pub enum ImportError {
    /// The source could not be opened or read
    #[error("Failed to read import source '{source_name}': {message}")]
    ReadError {
        source_name: String,
        message: String,
    },

    /// A row could not be mapped to a record
    #[error("Invalid row at line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}
