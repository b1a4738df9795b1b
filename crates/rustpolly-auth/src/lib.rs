//! AWS Signature Version 4 request signing for RustPolly.
//!
//! This crate implements the signing side of SigV4 for outgoing HTTP requests
//! to AWS services. Given a set of credentials and a description of the
//! request about to be sent, it produces the value of the `Authorization`
//! header.
//!
//! # Overview
//!
//! The implementation is deliberately narrowed to the request shape RustPolly
//! sends: exactly two signed headers (`host` and `x-amz-date`), in that
//! order. It is not a general-purpose SigV4 signer — callers must not add
//! other signed headers. Within that shape the output is byte-exact SigV4:
//! the same credentials, request, and timestamp always produce the same
//! `Authorization` value.
//!
//! # Usage
//!
//! ```rust
//! use rustpolly_auth::{Credentials, RequestDescriptor, sign_request};
//!
//! let credentials = Credentials {
//!     access_key: "AKIDEXAMPLE",
//!     secret_key: "secret",
//!     session_token: None,
//!     region: "us-east-1",
//!     service: "polly",
//! };
//! let descriptor = RequestDescriptor {
//!     method: "POST",
//!     path: Some("/v1/speech"),
//!     query: None,
//!     host: "polly.us-east-1.amazonaws.com",
//!     payload: b"{}",
//!     amz_date: "20230101T000000Z",
//! };
//!
//! let authorization = sign_request(&credentials, &descriptor).unwrap();
//! assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction per the SigV4 specification
//! - [`error`] - Signing error types
//! - [`sigv4`] - Key derivation, string to sign, and signature computation

pub mod canonical;
pub mod error;
pub mod sigv4;

pub use error::SigningError;
pub use sigv4::{
    Credentials, RequestDescriptor, credential_scope, format_amz_date, hash_payload, sign_request,
};
