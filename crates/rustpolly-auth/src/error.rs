//! Error types for request signing.

/// Errors returned while producing a request signature.
///
/// A signing failure aborts the whole request; no partial or garbled
/// `Authorization` value is ever returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SigningError {
    /// A required signing input was empty.
    #[error("missing required signing input: {0}")]
    MissingInput(&'static str),

    /// The `x-amz-date` timestamp is not in `YYYYMMDDTHHMMSSZ` form.
    #[error("invalid x-amz-date timestamp: {0}")]
    InvalidTimestamp(String),
}
