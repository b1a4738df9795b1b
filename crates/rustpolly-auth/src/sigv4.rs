//! AWS Signature Version 4 signing.
//!
//! The signing pipeline, fixed to this client's request shape:
//!
//! ```text
//! CanonicalRequest  = METHOD \n PATH \n QUERY \n host:.. \n x-amz-date:.. \n\n
//!                     host;x-amz-date \n Hex(SHA256(payload))
//! StringToSign      = AWS4-HMAC-SHA256 \n timestamp \n scope \n
//!                     Hex(SHA256(CanonicalRequest))
//! SigningKey        = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region),
//!                     service), "aws4_request")
//! Signature         = Hex(HMAC(SigningKey, StringToSign))
//! ```
//!
//! Where `scope` is `date/region/service/aws4_request`. The scope is
//! recomputed for every request: it changes with the calendar date, and this
//! client is not expected to issue request volumes where caching it would
//! matter.

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::{SIGNED_HEADERS, build_canonical_request};
use crate::error::SigningError;

type HmacSha256 = Hmac<Sha256>;

/// The terminating component of every SigV4 credential scope.
const SCOPE_TERMINATOR: &str = "aws4_request";

/// Borrowed AWS credentials plus the scope they sign for.
///
/// Immutable for the lifetime of one signing operation; the signer borrows
/// them read-only and holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    /// Access key identifier (`AKIA...`).
    pub access_key: &'a str,
    /// Secret key material.
    pub secret_key: &'a str,
    /// Session token for temporary credentials. Not part of the signature;
    /// callers send it as an unsigned `x-amz-security-token` header.
    pub session_token: Option<&'a str>,
    /// Target region (e.g. `us-east-1`).
    pub region: &'a str,
    /// Target service name (e.g. `polly`).
    pub service: &'a str,
}

/// Description of the request about to be signed.
///
/// Constructed once per invocation; immutable.
#[derive(Debug, Clone, Copy)]
pub struct RequestDescriptor<'a> {
    /// HTTP method (e.g. `POST`).
    pub method: &'a str,
    /// Request path; `None` or empty signs as `/`.
    pub path: Option<&'a str>,
    /// Raw query string without the leading `?`; `None` signs as empty.
    pub query: Option<&'a str>,
    /// Value of the `host` header.
    pub host: &'a str,
    /// Request payload bytes.
    pub payload: &'a [u8],
    /// ISO 8601 basic timestamp, 16 characters: `YYYYMMDDTHHMMSSZ`.
    pub amz_date: &'a str,
}

/// Format a UTC instant as a SigV4 `x-amz-date` timestamp (`YYYYMMDDTHHMMSSZ`).
#[must_use]
pub fn format_amz_date(time: DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Compute the lowercase hex SHA-256 digest of a request payload.
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Build the credential scope: `date/region/service/aws4_request`.
#[must_use]
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/{SCOPE_TERMINATOR}")
}

/// Build the string to sign from the timestamp, scope, and canonical request hash.
#[must_use]
pub fn build_string_to_sign(amz_date: &str, scope: &str, canonical_hash: &str) -> String {
    format!("AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{canonical_hash}")
}

/// Derive the SigV4 signing key for one scope.
///
/// The chain is seeded with `"AWS4" + secret_key` and successively keyed over
/// the date, region, service, and the literal `aws4_request`.
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> [u8; 32] {
    let mut key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    key = hmac_sha256(&key, region.as_bytes());
    key = hmac_sha256(&key, service.as_bytes());
    key = hmac_sha256(&key, SCOPE_TERMINATOR.as_bytes());
    key
}

/// Compute the final hex-encoded signature of a string to sign.
#[must_use]
pub fn compute_signature(signing_key: &[u8; 32], string_to_sign: &str) -> String {
    hex::encode(hmac_sha256(signing_key, string_to_sign.as_bytes()))
}

/// Sign a request, producing the `Authorization` header value.
///
/// Deterministic and side-effect free: identical inputs, including the
/// timestamp, produce an identical value byte-for-byte.
///
/// # Errors
///
/// Returns a [`SigningError`] when a required input is empty or the
/// timestamp is malformed. No partial signature is ever returned.
pub fn sign_request(
    credentials: &Credentials<'_>,
    descriptor: &RequestDescriptor<'_>,
) -> Result<String, SigningError> {
    validate(credentials, descriptor)?;

    let date = &descriptor.amz_date[..8];
    let scope = credential_scope(date, credentials.region, credentials.service);

    let payload_hash = hash_payload(descriptor.payload);
    let canonical = build_canonical_request(
        descriptor.method,
        descriptor.path,
        descriptor.query,
        descriptor.host,
        descriptor.amz_date,
        &payload_hash,
    );
    let canonical_hash = hex::encode(Sha256::digest(canonical.as_bytes()));

    let string_to_sign = build_string_to_sign(descriptor.amz_date, &scope, &canonical_hash);

    debug!(scope = %scope, signed_headers = SIGNED_HEADERS, "signing request");

    let signing_key = derive_signing_key(
        credentials.secret_key,
        date,
        credentials.region,
        credentials.service,
    );
    let signature = compute_signature(&signing_key, &string_to_sign);

    Ok(format!(
        "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.access_key
    ))
}

/// One HMAC-SHA256 step of the key derivation chain.
fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept any key length");
    mac.update(message);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

fn validate(
    credentials: &Credentials<'_>,
    descriptor: &RequestDescriptor<'_>,
) -> Result<(), SigningError> {
    if credentials.access_key.is_empty() {
        return Err(SigningError::MissingInput("access key"));
    }
    if credentials.secret_key.is_empty() {
        return Err(SigningError::MissingInput("secret key"));
    }
    if credentials.region.is_empty() {
        return Err(SigningError::MissingInput("region"));
    }
    if credentials.service.is_empty() {
        return Err(SigningError::MissingInput("service"));
    }
    if descriptor.method.is_empty() {
        return Err(SigningError::MissingInput("method"));
    }
    if descriptor.host.is_empty() {
        return Err(SigningError::MissingInput("host"));
    }
    validate_amz_date(descriptor.amz_date)
}

/// Check the `YYYYMMDDTHHMMSSZ` shape; the date prefix is sliced into the
/// scope, so a malformed timestamp must be rejected up front.
fn validate_amz_date(amz_date: &str) -> Result<(), SigningError> {
    let bytes = amz_date.as_bytes();
    let well_formed = bytes.len() == 16
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'T'
        && bytes[9..15].iter().all(u8::is_ascii_digit)
        && bytes[15] == b'Z';

    if well_formed {
        Ok(())
    } else {
        Err(SigningError::InvalidTimestamp(amz_date.to_owned()))
    }
}
