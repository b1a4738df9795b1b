//! Client configuration.
//!
//! All values are plain data; there is no dynamic discovery. Configuration
//! can be loaded from the standard AWS environment variables via
//! [`SpeechConfig::from_env`] or assembled explicitly with the builder.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// The AWS service this client signs for.
pub const POLLY_SERVICE: &str = "polly";

/// Default send/receive timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Service-level configuration for a [`SpeechClient`](crate::SpeechClient).
///
/// # Examples
///
/// ```
/// use rustpolly_core::SpeechConfig;
///
/// let config = SpeechConfig::builder()
///     .access_key("AKIDEXAMPLE")
///     .secret_key("secret")
///     .region("eu-west-1")
///     .build();
/// assert_eq!(config.endpoint_host(), "polly.eu-west-1.amazonaws.com");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// AWS access key identifier.
    #[builder(setter(into))]
    pub access_key: String,

    /// AWS secret key.
    #[builder(setter(into))]
    pub secret_key: String,

    /// Session token for temporary credentials.
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_token: Option<String>,

    /// Target region.
    #[builder(default = String::from("us-east-1"), setter(into))]
    pub region: String,

    /// Endpoint host override. When unset, the regional Polly endpoint
    /// `polly.{region}.amazonaws.com` is used.
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,

    /// Send timeout in milliseconds; `0` disables the deadline.
    #[builder(default = DEFAULT_TIMEOUT_MS)]
    pub send_timeout_ms: u64,

    /// Receive timeout in milliseconds; `0` disables the deadline.
    #[builder(default = DEFAULT_TIMEOUT_MS)]
    pub recv_timeout_ms: u64,
}

impl SpeechConfig {
    /// Load configuration from the standard AWS environment variables
    /// (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`,
    /// `AWS_DEFAULT_REGION`) plus `POLLY_HOST` for an endpoint override.
    ///
    /// Missing credentials load as empty strings and are rejected when the
    /// client is constructed.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            access_key: std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_key: std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            session_token: std::env::var("AWS_SESSION_TOKEN").ok().filter(|t| !t.is_empty()),
            region: std::env::var("AWS_DEFAULT_REGION").unwrap_or_else(|_| "us-east-1".to_owned()),
            host: std::env::var("POLLY_HOST").ok().filter(|h| !h.is_empty()),
            send_timeout_ms: DEFAULT_TIMEOUT_MS,
            recv_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// The host this client connects to and signs for.
    #[must_use]
    pub fn endpoint_host(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| format!("{POLLY_SERVICE}.{}.amazonaws.com", self.region))
    }
}
