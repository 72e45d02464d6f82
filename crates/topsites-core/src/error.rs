//! Error types for a Top Sites run.

use topsites_auth::AuthError;
use topsites_xml::XmlError;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum TopSitesError {
    /// The requested number of entries is zero.
    #[error("the number must be greater than 0")]
    InvalidCount,

    /// The page size is zero.
    #[error("page size must be greater than 0")]
    InvalidPageSize,

    /// A window offset does not fit in a `u32`.
    #[error("window starting at {start} overflows the rank range")]
    WindowOverflow {
        /// Start offset of the window that overflowed.
        start: u32,
    },

    /// Credentials or timestamp were rejected.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The HTTP request could not be assembled.
    #[error("invalid request: {0}")]
    Http(#[from] http::Error),

    /// The request could not be sent or its body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The response body is not a well-formed ranking.
    #[error("malformed response: {0}")]
    Xml(#[from] XmlError),

    /// Writing a snapshot or console output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the snapshot failed.
    #[error("snapshot serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for Top Sites operations.
pub type TopSitesResult<T> = Result<T, TopSitesError>;
