//! Incremental HTTP/1.1 response decoding for RustPolly.
//!
//! This crate provides [`ResponseDecoder`], a sans-I/O parser for HTTP/1.1
//! responses that is driven one buffer slice at a time. It is built for
//! streaming consumers: the caller reads from a socket into its own buffer,
//! offers the unconsumed range to the decoder, and receives either a parsed
//! event together with a consumed-byte count, or a request for more data.
//!
//! Body bytes are never copied. A decoded fragment is reported as a
//! [`FragmentView`] — an `(offset, len)` pair into the caller's buffer —
//! which the caller must copy or forward before it compacts the buffer.
//!
//! # Usage
//!
//! ```rust
//! use rustpolly_http::{ParseOutcome, ResponseDecoder};
//!
//! let mut decoder = ResponseDecoder::new();
//! let bytes = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nHELLO";
//!
//! let outcome = decoder.parse(bytes).unwrap();
//! let ParseOutcome::Status { code, consumed } = outcome else { panic!() };
//! assert_eq!(code, 200);
//!
//! let outcome = decoder.parse(&bytes[consumed..]).unwrap();
//! let ParseOutcome::Fragment { view, .. } = outcome else { panic!() };
//! assert_eq!(view.slice(&bytes[consumed..]), b"HELLO");
//! ```

pub mod decoder;
pub mod error;

pub use decoder::{FragmentView, ParseOutcome, ResponseDecoder};
pub use error::DecodeError;
