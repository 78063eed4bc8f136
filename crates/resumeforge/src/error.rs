//! Error types for resumeforge.
//!
//! Errors fall into three classes that map onto HTTP responses: a missing
//! record (`NotFound`), persistence failures, and rendering/export failures.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// The main error type for resumeforge operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Lookup Errors ===
    /// The requested resume does not exist.
    #[error("resume {id} not found")]
    NotFound {
        /// Requested identifier.
        id: i64,
    },

    /// The resume id in the URL is not an integer.
    #[error("invalid resume id: {0}")]
    InvalidId(String),

    /// A resume was dereferenced without an existence check.
    #[error("resume {id} is missing; no record to render")]
    RecordMissing {
        /// Requested identifier.
        id: i64,
    },

    // === Render Errors ===
    /// A template failed to render.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// The document converter failed.
    #[error("document export failed: {message}")]
    Render {
        /// Description of what went wrong.
        message: String,
    },

    /// The stored photo for a resume could not be read.
    #[error("failed to read photo {path}: {source}")]
    PhotoRead {
        /// Path of the photo on disk.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Request Errors ===
    /// The submitted form could not be parsed.
    #[error("invalid form submission: {0}")]
    InvalidForm(String),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for resumeforge operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new document export error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the requested resume does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidId(_))
    }

    /// Check if this error came from the persistence layer.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. } | Self::DatabaseQuery(_) | Self::DatabaseMigration { .. }
        )
    }

    /// Check if this error came from template rendering or document export.
    #[must_use]
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            Self::Template(_) | Self::Render { .. } | Self::PhotoRead { .. }
        )
    }

    /// HTTP status this error is reported with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::InvalidId(_) => StatusCode::NOT_FOUND,
            Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Error::NotFound { id } => {
                tracing::debug!(resume_id = id, "Resume not found");
                (status, "Resume not found").into_response()
            }
            Error::InvalidId(reason) => {
                tracing::debug!(%reason, "Rejected resume id");
                (status, "Resume not found").into_response()
            }
            Error::InvalidForm(message) => {
                tracing::warn!(error = %self, "Rejected form submission");
                (status, message.clone()).into_response()
            }
            _ => {
                tracing::error!(
                    error = %self,
                    storage = self.is_storage_error(),
                    render = self.is_render_error(),
                    "Request failed"
                );
                (status, "Internal Server Error").into_response()
            }
        }
    }
}
