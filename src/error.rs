//! Error types shared by every route and service of the portal.
//!
//! Each variant maps onto one HTTP status through [`Error::status_code`], so route
//! handlers only decide which JSON key the message is reported under.

use axum::http::StatusCode;
use thiserror::Error;

/// The main error type for portal operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The request payload was missing, malformed, or failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A fetched resource answered with a non-success status.
    #[error("upstream fetch failed: {status} {reason}")]
    UpstreamFetch {
        /// Status returned by the remote server.
        status: u16,
        /// Canonical reason phrase for the status, if any.
        reason: String,
    },

    /// A fetched resource declared a content type we cannot handle.
    #[error("unexpected content type: {found}")]
    ContentType {
        /// The declared content type (empty when absent).
        found: String,
    },

    /// Bytes from an upstream resource could not be parsed.
    #[error("failed to parse upstream content: {0}")]
    UpstreamParse(String),

    /// A call to an upstream service (language model, OAuth provider) failed.
    #[error("upstream call failed: {0}")]
    Upstream(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A database query failed.
    #[error("database query failed: {0}")]
    Database(#[from] sqlx::Error),

    /// An outbound HTTP request failed before a response arrived.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for portal operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new upstream call error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Create a new upstream parse error.
    pub fn upstream_parse(message: impl Into<String>) -> Self {
        Self::UpstreamParse(message.into())
    }

    /// Create a new not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a fetch error from the status a remote server answered with.
    pub fn upstream_fetch(status: StatusCode) -> Self {
        Self::UpstreamFetch {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// The HTTP status this error is reported with at the route boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::ContentType { .. } => StatusCode::BAD_REQUEST,
            Self::UpstreamFetch { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamParse(_)
            | Self::Upstream(_)
            | Self::Config(_)
            | Self::Database(_)
            | Self::Http(_)
            | Self::Json(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
