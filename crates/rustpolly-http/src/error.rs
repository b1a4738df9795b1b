//! Error types for response decoding.

/// Errors raised when a byte stream violates HTTP/1.1 response framing.
///
/// Every variant is terminal: after returning one, the decoder instance
/// refuses further input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The status line is not a valid HTTP/1.x response line.
    #[error("invalid status line: {0}")]
    InvalidStatusLine(String),

    /// A header line is malformed.
    #[error("invalid header line: {0}")]
    InvalidHeader(String),

    /// The `Content-Length` value is not a plain decimal integer.
    #[error("invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The `Transfer-Encoding` value names a coding other than `chunked`.
    #[error("invalid Transfer-Encoding: {0}")]
    InvalidTransferEncoding(String),

    /// Both `Transfer-Encoding: chunked` and `Content-Length` are present.
    #[error("conflicting framing: both Transfer-Encoding and Content-Length")]
    ConflictingFraming,

    /// A chunk-size line is not a hexadecimal number.
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(String),

    /// Chunk data is not terminated by CRLF.
    #[error("missing CRLF after chunk data")]
    InvalidChunkDelimiter,

    /// The decoder was used again after a parse failure.
    #[error("decoder reused after parse failure")]
    Poisoned,
}
