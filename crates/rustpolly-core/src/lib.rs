//! Blocking AWS Polly SynthesizeSpeech client.
//!
//! RustPolly issues one signed `SynthesizeSpeech` request per call and
//! streams the response body to a caller-supplied sink as it arrives, so a
//! multi-megabyte audio stream is never buffered in full. Everything is
//! synchronous and single-owner: one session exclusively owns its
//! connection, receive buffer, and decoder, and no locks are involved.
//!
//! # Overview
//!
//! A session runs in three stages:
//!
//! 1. build the JSON payload and sign the request (SigV4, via
//!    `rustpolly-auth`),
//! 2. send the assembled HTTP/1.1 request over a [`Transport`],
//! 3. loop: read into a doubling [`buffer::ReceiveBuffer`], feed the pending
//!    bytes to the incremental decoder (`rustpolly-http`), and forward each
//!    decoded fragment to the [`AudioSink`] in arrival order.
//!
//! Retry policy, connection pooling, and pipelining are deliberately out of
//! scope; callers own those decisions.
//!
//! # Usage
//!
//! ```no_run
//! use rustpolly_core::{SpeechClient, SpeechConfig, SynthesizeSpeech};
//!
//! let client = SpeechClient::new(SpeechConfig::from_env())?;
//! let params = SynthesizeSpeech::builder()
//!     .output_format("mp3")
//!     .voice_id("Amy")
//!     .text("Hello")
//!     .build();
//!
//! let mut file = std::fs::File::create("hello.mp3").map_err(
//!     rustpolly_core::SynthesizeError::Sink,
//! )?;
//! let status = client.synthesize(&params, &mut file)?;
//! # let _ = status;
//! # Ok::<(), rustpolly_core::SynthesizeError>(())
//! ```
//!
//! # Modules
//!
//! - [`buffer`] - Growable receive buffer
//! - [`client`] - The session driver
//! - [`config`] - Client configuration
//! - [`error`] - Session error taxonomy
//! - [`request`] - Parameters, payload, and request assembly
//! - [`sink`] - Audio delivery trait
//! - [`transport`] - Blocking TLS/TCP byte streams

pub mod buffer;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod sink;
pub mod transport;

pub use client::SpeechClient;
pub use config::SpeechConfig;
pub use error::SynthesizeError;
pub use request::SynthesizeSpeech;
pub use sink::AudioSink;
pub use transport::{TcpTransport, TlsTransport, Transport, TransportError};
