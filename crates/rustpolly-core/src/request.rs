//! SynthesizeSpeech parameters and request assembly.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::SynthesizeError;

/// Request path of the SynthesizeSpeech operation.
pub const SYNTHESIZE_SPEECH_PATH: &str = "/v1/speech";

/// Parameters of one SynthesizeSpeech invocation.
///
/// `output_format`, `voice_id`, and `text` are required; the remaining fields
/// are sent only when set.
///
/// The JSON payload is assembled by plain string formatting and performs no
/// escaping: callers must supply text that is already free of `"`, `\`, and
/// control characters. This mirrors the service contract rather than
/// silently rewriting caller input.
///
/// # Examples
///
/// ```
/// use rustpolly_core::SynthesizeSpeech;
///
/// let params = SynthesizeSpeech::builder()
///     .output_format("mp3")
///     .voice_id("Amy")
///     .text("Hello")
///     .build();
/// assert_eq!(
///     params.payload_json(),
///     r#"{"OutputFormat": "mp3","VoiceId": "Amy", "Text": "Hello"}"#
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "PascalCase")]
pub struct SynthesizeSpeech {
    /// Audio output format: `json`, `mp3`, `ogg_vorbis`, or `pcm`.
    #[builder(setter(into))]
    pub output_format: String,

    /// Voice to synthesize with (e.g. `Amy`).
    #[builder(setter(into))]
    pub voice_id: String,

    /// Text to synthesize. Must be pre-sanitized; see the type docs.
    #[builder(setter(into))]
    pub text: String,

    /// Synthesis engine (e.g. `neural`).
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub engine: Option<String>,

    /// Language code for bilingual voices.
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub language_code: Option<String>,

    /// Audio sample rate in Hz, as a string (e.g. `22050`).
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sample_rate: Option<String>,

    /// Whether `text` is plain text or SSML.
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_type: Option<String>,
}

impl SynthesizeSpeech {
    /// Check that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesizeError::InvalidParameter`] naming the first empty
    /// required field.
    pub fn validate(&self) -> Result<(), SynthesizeError> {
        if self.output_format.is_empty() {
            return Err(SynthesizeError::InvalidParameter("output format"));
        }
        if self.voice_id.is_empty() {
            return Err(SynthesizeError::InvalidParameter("voice id"));
        }
        if self.text.is_empty() {
            return Err(SynthesizeError::InvalidParameter("text"));
        }
        Ok(())
    }

    /// Build the JSON request payload.
    #[must_use]
    pub fn payload_json(&self) -> String {
        let mut payload = format!(
            "{{\"OutputFormat\": \"{}\",\"VoiceId\": \"{}\", \"Text\": \"{}\"",
            self.output_format, self.voice_id, self.text
        );

        let optional = [
            ("Engine", &self.engine),
            ("LanguageCode", &self.language_code),
            ("SampleRate", &self.sample_rate),
            ("TextType", &self.text_type),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                payload.push_str(&format!(",\"{name}\": \"{value}\""));
            }
        }

        payload.push('}');
        payload
    }
}

/// Assemble the full HTTP request text.
///
/// The layout is fixed: request line, `host`, `content-type`,
/// `content-length`, `authorization`, and `x-amz-date` headers, a blank line,
/// then the payload. When a session token is present it is appended as an
/// unsigned `x-amz-security-token` header; the signed header set is
/// unaffected.
#[must_use]
pub fn build_http_request(
    host: &str,
    payload: &str,
    authorization: &str,
    amz_date: &str,
    session_token: Option<&str>,
) -> String {
    let mut request = format!(
        "POST {SYNTHESIZE_SPEECH_PATH} HTTP/1.1\r\n\
         host: {host}\r\n\
         content-type: application/json\r\n\
         content-length: {}\r\n\
         authorization: {authorization}\r\n\
         x-amz-date: {amz_date}\r\n",
        payload.len()
    );
    if let Some(token) = session_token {
        request.push_str(&format!("x-amz-security-token: {token}\r\n"));
    }
    request.push_str("\r\n");
    request.push_str(payload);
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_params() -> SynthesizeSpeech {
        SynthesizeSpeech::builder()
            .output_format("mp3")
            .voice_id("Amy")
            .text("Hello")
            .build()
    }

    #[test]
    fn test_should_build_payload_with_exact_layout() {
        assert_eq!(
            minimal_params().payload_json(),
            "{\"OutputFormat\": \"mp3\",\"VoiceId\": \"Amy\", \"Text\": \"Hello\"}"
        );
    }

    #[test]
    fn test_should_append_optional_fields_when_set() {
        let params = SynthesizeSpeech::builder()
            .output_format("pcm")
            .voice_id("Joanna")
            .text("Hi")
            .engine("neural")
            .sample_rate("16000")
            .build();
        assert_eq!(
            params.payload_json(),
            "{\"OutputFormat\": \"pcm\",\"VoiceId\": \"Joanna\", \"Text\": \"Hi\"\
             ,\"Engine\": \"neural\",\"SampleRate\": \"16000\"}"
        );
    }

    #[test]
    fn test_should_produce_valid_json_for_plain_text() {
        let parsed: serde_json::Value =
            serde_json::from_str(&minimal_params().payload_json()).unwrap();
        assert_eq!(parsed["OutputFormat"], "mp3");
        assert_eq!(parsed["VoiceId"], "Amy");
        assert_eq!(parsed["Text"], "Hello");
    }

    #[test]
    fn test_should_reject_empty_required_fields() {
        let mut params = minimal_params();
        params.text = String::new();
        assert!(matches!(
            params.validate(),
            Err(SynthesizeError::InvalidParameter("text"))
        ));

        let mut params = minimal_params();
        params.voice_id = String::new();
        assert!(matches!(
            params.validate(),
            Err(SynthesizeError::InvalidParameter("voice id"))
        ));
    }

    #[test]
    fn test_should_assemble_request_with_exact_header_layout() {
        let request = build_http_request(
            "polly.us-east-1.amazonaws.com",
            "{}",
            "AWS4-HMAC-SHA256 Credential=...",
            "20230101T000000Z",
            None,
        );
        assert_eq!(
            request,
            "POST /v1/speech HTTP/1.1\r\n\
             host: polly.us-east-1.amazonaws.com\r\n\
             content-type: application/json\r\n\
             content-length: 2\r\n\
             authorization: AWS4-HMAC-SHA256 Credential=...\r\n\
             x-amz-date: 20230101T000000Z\r\n\
             \r\n\
             {}"
        );
    }

    #[test]
    fn test_should_append_session_token_header_after_date() {
        let request = build_http_request("h", "{}", "auth", "20230101T000000Z", Some("TOKEN"));
        assert!(request.contains(
            "x-amz-date: 20230101T000000Z\r\nx-amz-security-token: TOKEN\r\n\r\n{}"
        ));
    }
}
