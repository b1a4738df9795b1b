//! Error types for synthesis sessions.

use rustpolly_auth::SigningError;
use rustpolly_http::DecodeError;

use crate::transport::TransportError;

/// Errors surfaced by a synthesis session.
///
/// Every internal failure is returned to the immediate caller of
/// `synthesize`; nothing is retried or logged-and-dropped by this crate.
#[derive(Debug, thiserror::Error)]
pub enum SynthesizeError {
    /// A required input was missing or empty.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Request signing failed.
    #[error("request signing failed: {0}")]
    Signing(#[from] SigningError),

    /// The transport failed to connect, send, or receive.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The response violated HTTP/1.1 framing.
    #[error("malformed response: {0}")]
    Parse(#[from] DecodeError),

    /// The audio sink rejected a fragment; the session is aborted.
    #[error("audio sink rejected fragment: {0}")]
    Sink(#[source] std::io::Error),
}
