//! Incremental HTTP/1.1 response parser.
//!
//! The decoder consumes successive calls of [`ResponseDecoder::parse`] over a
//! buffer that always starts at the first unconsumed byte of the logical
//! stream; the caller discards consumed bytes between calls. Internal state
//! advances only when a boundary (end of headers, end of a chunk's framing,
//! end of message) is reached. An attempt that runs out of input mid-token
//! reports [`ParseOutcome::NeedMoreData`], consumes nothing, and leaves the
//! decoder exactly as it was, so the same range can be re-offered once more
//! bytes have been appended. Re-parsing a partial token from its start trades
//! a little repeated scanning for not having to persist sub-token state.

use tracing::debug;

use crate::error::DecodeError;

/// A non-owning view of one decoded body fragment.
///
/// `offset` and `len` index into the buffer slice passed to the `parse` call
/// that produced the view. The view is only meaningful until the caller next
/// mutates or compacts that buffer: copy or forward the bytes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentView {
    /// Byte offset of the fragment within the parsed slice.
    pub offset: usize,
    /// Fragment length in bytes.
    pub len: usize,
}

impl FragmentView {
    /// Resolve the view against the buffer it was produced from.
    #[must_use]
    pub fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.offset..self.offset + self.len]
    }
}

/// Result of one parse attempt. Outcomes are mutually exclusive per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// No boundary reached in the supplied range; nothing was consumed.
    /// Append more bytes and call again with the same starting buffer.
    NeedMoreData,
    /// Status line and headers are fully parsed; `consumed` runs through the
    /// end of the blank line terminating the header section.
    Status {
        /// HTTP status code.
        code: u16,
        /// Bytes consumed by this call.
        consumed: usize,
    },
    /// One decoded body fragment is available; `consumed` runs through the
    /// end of the fragment's framing (for chunked bodies, the trailing CRLF).
    Fragment {
        /// Location of the decoded bytes within the parsed slice.
        view: FragmentView,
        /// Bytes consumed by this call.
        consumed: usize,
    },
    /// The message body is logically complete: terminal chunk and trailers
    /// consumed, declared length satisfied, or a status that has no body.
    Complete {
        /// Bytes consumed by this call (terminator framing, if any).
        consumed: usize,
    },
}

/// How the remainder of the message body is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the status line and header section.
    Head,
    /// Chunked body: at a chunk-size line.
    ChunkSize,
    /// Fixed-length body with `remaining` undelivered bytes.
    FixedBody { remaining: u64 },
    /// No framing headers: body runs until the peer closes the connection.
    UnframedBody,
    /// Message complete; any further bytes are ignored.
    Complete,
    /// A framing violation occurred; the decoder must not be reused.
    Failed,
}

/// Incremental HTTP/1.1 response decoder.
///
/// One instance owns exactly one in-progress parse session. After a
/// [`DecodeError`] the instance is poisoned and every further call fails.
#[derive(Debug)]
pub struct ResponseDecoder {
    phase: Phase,
    status: Option<u16>,
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDecoder {
    /// Create a decoder for a single response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Head,
            status: None,
        }
    }

    /// The status code, once the header section has been parsed.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// Whether the message body is logically complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Parse the next event out of `input`, which must start at the first
    /// unconsumed byte of the stream.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the stream violates HTTP/1.1 response
    /// framing. Errors are terminal: the decoder refuses further input.
    pub fn parse(&mut self, input: &[u8]) -> Result<ParseOutcome, DecodeError> {
        let result = match self.phase {
            Phase::Head => self.parse_head(input),
            Phase::ChunkSize => self.parse_chunk(input),
            Phase::FixedBody { remaining } => Ok(self.parse_fixed_body(input, remaining)),
            Phase::UnframedBody => Ok(Self::parse_unframed_body(input)),
            Phase::Complete => Ok(ParseOutcome::Complete { consumed: 0 }),
            Phase::Failed => Err(DecodeError::Poisoned),
        };

        if result.is_err() {
            self.phase = Phase::Failed;
        }
        result
    }

    /// Parse the status line and header section.
    fn parse_head(&mut self, input: &[u8]) -> Result<ParseOutcome, DecodeError> {
        let Some(head_len) = find(input, b"\r\n\r\n") else {
            // Even without the full header section, a complete first line
            // that is not an HTTP response line is a hard failure. This keeps
            // a garbage stream from buffering without bound.
            if let Some(line_len) = find(input, b"\r\n") {
                parse_status_line(&input[..line_len])?;
            }
            return Ok(ParseOutcome::NeedMoreData);
        };

        let head = std::str::from_utf8(&input[..head_len])
            .map_err(|_| DecodeError::InvalidHeader("non-UTF-8 header section".to_owned()))?;
        let mut lines = head.split("\r\n");

        let status_line = lines.next().unwrap_or("");
        let code = parse_status_line(status_line.as_bytes())?;

        let mut chunked = false;
        let mut content_length: Option<u64> = None;
        for line in lines {
            let (name, value) = parse_header_line(line)?;
            if name.eq_ignore_ascii_case("Transfer-Encoding") {
                parse_transfer_encoding(value)?;
                chunked = true;
            } else if name.eq_ignore_ascii_case("Content-Length") {
                let parsed = parse_content_length(value)?;
                if content_length.is_some_and(|prev| prev != parsed) {
                    return Err(DecodeError::InvalidContentLength(
                        "mismatched values".to_owned(),
                    ));
                }
                content_length = Some(parsed);
            }
        }

        if chunked && content_length.is_some() {
            return Err(DecodeError::ConflictingFraming);
        }

        self.status = Some(code);
        self.phase = if !status_has_body(code) {
            Phase::Complete
        } else if chunked {
            Phase::ChunkSize
        } else {
            match content_length {
                Some(0) => Phase::Complete,
                Some(len) => Phase::FixedBody { remaining: len },
                None => Phase::UnframedBody,
            }
        };

        debug!(code, chunked, content_length, "parsed response head");

        let consumed = head_len + 4;
        Ok(ParseOutcome::Status { code, consumed })
    }

    /// Parse one whole chunk, or the terminal chunk plus its trailer section.
    fn parse_chunk(&mut self, input: &[u8]) -> Result<ParseOutcome, DecodeError> {
        let Some(line_len) = find(input, b"\r\n") else {
            return Ok(ParseOutcome::NeedMoreData);
        };
        let size = parse_chunk_size(&input[..line_len])?;
        let data_start = line_len + 2;

        if size == 0 {
            // Skip trailer headers up to the blank line. Everything through
            // the terminator is consumed in one step, or not at all.
            let mut pos = data_start;
            loop {
                let Some(trailer_len) = find(&input[pos..], b"\r\n") else {
                    return Ok(ParseOutcome::NeedMoreData);
                };
                pos += trailer_len + 2;
                if trailer_len == 0 {
                    self.phase = Phase::Complete;
                    return Ok(ParseOutcome::Complete { consumed: pos });
                }
            }
        }

        // The chunk only becomes a fragment once its data and trailing CRLF
        // are fully present; a partial chunk is re-offered later.
        let frame_end = data_start
            .checked_add(size)
            .and_then(|end| end.checked_add(2))
            .ok_or_else(|| DecodeError::InvalidChunkSize(format!("{size:x}")))?;
        if input.len() < frame_end {
            return Ok(ParseOutcome::NeedMoreData);
        }
        if &input[frame_end - 2..frame_end] != b"\r\n" {
            return Err(DecodeError::InvalidChunkDelimiter);
        }

        Ok(ParseOutcome::Fragment {
            view: FragmentView {
                offset: data_start,
                len: size,
            },
            consumed: frame_end,
        })
    }

    /// Deliver available bytes of a Content-Length body.
    fn parse_fixed_body(&mut self, input: &[u8], remaining: u64) -> ParseOutcome {
        if input.is_empty() {
            return ParseOutcome::NeedMoreData;
        }
        let take = usize::try_from(remaining)
            .map_or(input.len(), |remaining| input.len().min(remaining));

        let left = remaining - take as u64;
        self.phase = if left == 0 {
            Phase::Complete
        } else {
            Phase::FixedBody { remaining: left }
        };

        ParseOutcome::Fragment {
            view: FragmentView {
                offset: 0,
                len: take,
            },
            consumed: take,
        }
    }

    /// Deliver available bytes of a read-until-close body.
    fn parse_unframed_body(input: &[u8]) -> ParseOutcome {
        if input.is_empty() {
            ParseOutcome::NeedMoreData
        } else {
            ParseOutcome::Fragment {
                view: FragmentView {
                    offset: 0,
                    len: input.len(),
                },
                consumed: input.len(),
            }
        }
    }
}

/// Find the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Parse `HTTP/1.x SP code ...`, returning the status code.
fn parse_status_line(line: &[u8]) -> Result<u16, DecodeError> {
    let invalid = || DecodeError::InvalidStatusLine(String::from_utf8_lossy(line).into_owned());

    let line = std::str::from_utf8(line).map_err(|_| invalid())?;
    if !line.starts_with("HTTP/1.") {
        return Err(invalid());
    }

    let mut parts = line.splitn(3, ' ');
    let _version = parts.next();
    let code_str = parts.next().ok_or_else(invalid)?;
    if code_str.len() != 3 {
        return Err(invalid());
    }
    let code: u16 = code_str.parse().map_err(|_| invalid())?;
    if code < 100 {
        return Err(invalid());
    }
    Ok(code)
}

/// Parse a `name: value` header line.
fn parse_header_line(line: &str) -> Result<(&str, &str), DecodeError> {
    let invalid = |reason: &str| DecodeError::InvalidHeader(format!("{reason}: {line}"));

    if line.starts_with(' ') || line.starts_with('\t') {
        return Err(invalid("obs-fold"));
    }
    let (name, value) = line.split_once(':').ok_or_else(|| invalid("missing colon"))?;
    if name.is_empty() || !name.bytes().all(is_token_char) {
        return Err(invalid("invalid name"));
    }
    Ok((name, value.trim()))
}

/// Reject any `Transfer-Encoding` coding other than `chunked`.
fn parse_transfer_encoding(value: &str) -> Result<(), DecodeError> {
    let mut tokens = 0;
    for token in value.split(',') {
        let token = token.trim();
        if token.is_empty() || !token.eq_ignore_ascii_case("chunked") {
            return Err(DecodeError::InvalidTransferEncoding(value.to_owned()));
        }
        tokens += 1;
    }
    if tokens == 0 {
        return Err(DecodeError::InvalidTransferEncoding(value.to_owned()));
    }
    Ok(())
}

fn parse_content_length(value: &str) -> Result<u64, DecodeError> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidContentLength(value.to_owned()));
    }
    value
        .parse()
        .map_err(|_| DecodeError::InvalidContentLength(value.to_owned()))
}

/// Parse a chunk-size line, ignoring chunk extensions.
fn parse_chunk_size(line: &[u8]) -> Result<usize, DecodeError> {
    let invalid = || DecodeError::InvalidChunkSize(String::from_utf8_lossy(line).into_owned());

    let line = std::str::from_utf8(line).map_err(|_| invalid())?;
    let size_str = line.split(';').next().unwrap_or(line).trim();
    usize::from_str_radix(size_str, 16).map_err(|_| invalid())
}

/// 1xx, 204, and 304 responses carry no body.
fn status_has_body(code: u16) -> bool {
    !((100..200).contains(&code) || code == 204 || code == 304)
}

fn is_token_char(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'0'..=b'9' | b'A'..=b'Z' | b'^' | b'_' | b'`' | b'a'..=b'z' | b'|' | b'~'
    )
}
