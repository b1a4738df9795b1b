//! Canonical request construction for AWS Signature Version 4.
//!
//! This module implements the canonical request format as specified by AWS:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! The header section is fixed: RustPolly signs exactly two headers, `host`
//! and `x-amz-date`, which happen to already be in sorted order. Because the
//! set is fixed there is no header collection, sorting, or whitespace
//! normalization step — the canonical form is a single deterministic format.

/// The signed header list, fixed for every request this client sends.
pub const SIGNED_HEADERS: &str = "host;x-amz-date";

/// Build the full canonical request string.
///
/// `path` defaults to `/` when absent and `query` to the empty string. The
/// path and query are used verbatim: the request targets this client signs
/// are ASCII literals that need no percent-encoding normalization, and the
/// server canonicalizes the same raw bytes it receives.
///
/// # Examples
///
/// ```
/// use rustpolly_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "POST",
///     Some("/v1/speech"),
///     None,
///     "polly.us-east-1.amazonaws.com",
///     "20230101T000000Z",
///     "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
/// );
/// assert!(canonical.starts_with("POST\n/v1/speech\n\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    path: Option<&str>,
    query: Option<&str>,
    host: &str,
    amz_date: &str,
    payload_hash: &str,
) -> String {
    let path = match path {
        Some(p) if !p.is_empty() => p,
        _ => "/",
    };
    let query = query.unwrap_or("");

    format!(
        "{method}\n{path}\n{query}\nhost:{host}\nx-amz-date:{amz_date}\n\n{SIGNED_HEADERS}\n{payload_hash}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_canonical_request_with_fixed_headers() {
        let canonical = build_canonical_request(
            "POST",
            Some("/v1/speech"),
            None,
            "polly.us-east-1.amazonaws.com",
            "20230101T000000Z",
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
        );
        let expected = "POST\n\
                        /v1/speech\n\
                        \n\
                        host:polly.us-east-1.amazonaws.com\n\
                        x-amz-date:20230101T000000Z\n\
                        \n\
                        host;x-amz-date\n\
                        44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a";
        assert_eq!(canonical, expected);
    }

    #[test]
    fn test_should_default_missing_path_to_slash() {
        let canonical =
            build_canonical_request("GET", None, None, "example.com", "20230101T000000Z", "abc");
        assert!(canonical.starts_with("GET\n/\n\n"));

        let empty =
            build_canonical_request("GET", Some(""), None, "example.com", "20230101T000000Z", "abc");
        assert!(empty.starts_with("GET\n/\n\n"));
    }

    #[test]
    fn test_should_include_query_string_verbatim() {
        let canonical = build_canonical_request(
            "GET",
            Some("/v1/voices"),
            Some("Engine=neural"),
            "example.com",
            "20230101T000000Z",
            "abc",
        );
        assert!(canonical.contains("\nEngine=neural\n"));
    }
}
