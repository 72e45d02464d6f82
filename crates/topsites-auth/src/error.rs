//! Error types for request signing.

/// Errors raised while preparing to sign a request.
///
/// Signing itself is infallible; these variants only guard the inputs.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The access key ID is empty.
    #[error("access key ID must not be empty")]
    EmptyAccessKey,

    /// The secret access key is empty.
    #[error("secret access key must not be empty")]
    EmptySecretKey,

    /// The timestamp is not in `YYYYMMDDTHHMMSSZ` form.
    #[error("invalid x-amz-date timestamp: {0}")]
    InvalidTimestamp(String),
}
