//! The synthesis session driver.

use chrono::Utc;
use rustpolly_auth::{Credentials, RequestDescriptor, format_amz_date, sign_request};
use rustpolly_http::{ParseOutcome, ResponseDecoder};
use std::time::Duration;
use tracing::{debug, trace};

use crate::buffer::ReceiveBuffer;
use crate::config::{POLLY_SERVICE, SpeechConfig};
use crate::error::SynthesizeError;
use crate::request::{SYNTHESIZE_SPEECH_PATH, SynthesizeSpeech, build_http_request};
use crate::sink::AudioSink;
use crate::transport::{TlsTransport, Transport, TransportError};

/// TLS port of the Polly endpoint.
const HTTPS_PORT: u16 = 443;

/// Blocking Polly SynthesizeSpeech client.
///
/// One call to [`synthesize`](Self::synthesize) owns its connection, buffer,
/// and decoder for its entire duration; the client itself holds only
/// configuration and can be shared freely.
///
/// # Examples
///
/// ```no_run
/// use rustpolly_core::{SpeechClient, SpeechConfig, SynthesizeSpeech};
///
/// let client = SpeechClient::new(SpeechConfig::from_env())?;
/// let params = SynthesizeSpeech::builder()
///     .output_format("mp3")
///     .voice_id("Amy")
///     .text("Hello from RustPolly")
///     .build();
///
/// let mut audio: Vec<u8> = Vec::new();
/// let status = client.synthesize(&params, &mut audio)?;
/// assert_eq!(status, 200);
/// # Ok::<(), rustpolly_core::SynthesizeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SpeechClient {
    config: SpeechConfig,
}

impl SpeechClient {
    /// Create a client, rejecting configuration with empty required fields.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesizeError::InvalidParameter`] naming the first
    /// missing field.
    pub fn new(config: SpeechConfig) -> Result<Self, SynthesizeError> {
        if config.access_key.is_empty() {
            return Err(SynthesizeError::InvalidParameter("access key"));
        }
        if config.secret_key.is_empty() {
            return Err(SynthesizeError::InvalidParameter("secret key"));
        }
        if config.region.is_empty() {
            return Err(SynthesizeError::InvalidParameter("region"));
        }
        Ok(Self { config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Synthesize speech over a fresh TLS connection to the configured
    /// endpoint, streaming decoded audio fragments into `sink`.
    ///
    /// Returns the HTTP status code of the response. Note that an error
    /// status (e.g. 403) is a successful exchange: the body delivered to the
    /// sink is then the service's error document, not audio.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesizeError`] when the parameters are invalid or when
    /// signing, the transport, response parsing, or the sink fails.
    pub fn synthesize<S: AudioSink>(
        &self,
        params: &SynthesizeSpeech,
        sink: &mut S,
    ) -> Result<u16, SynthesizeError> {
        let host = self.config.endpoint_host();
        let mut transport = TlsTransport::connect(
            &host,
            HTTPS_PORT,
            Duration::from_millis(self.config.send_timeout_ms),
            Duration::from_millis(self.config.recv_timeout_ms),
        )?;
        self.synthesize_over(&mut transport, params, sink)
    }

    /// Run one synthesis session over an already-connected transport.
    ///
    /// # Errors
    ///
    /// Same as [`synthesize`](Self::synthesize), minus connection errors.
    pub fn synthesize_over<T: Transport, S: AudioSink>(
        &self,
        transport: &mut T,
        params: &SynthesizeSpeech,
        sink: &mut S,
    ) -> Result<u16, SynthesizeError> {
        self.run_session(transport, params, sink, &format_amz_date(Utc::now()))
    }

    /// The session body, with the timestamp injected for determinism.
    fn run_session<T: Transport, S: AudioSink>(
        &self,
        transport: &mut T,
        params: &SynthesizeSpeech,
        sink: &mut S,
        amz_date: &str,
    ) -> Result<u16, SynthesizeError> {
        params.validate()?;

        let host = self.config.endpoint_host();
        let payload = params.payload_json();

        let credentials = Credentials {
            access_key: &self.config.access_key,
            secret_key: &self.config.secret_key,
            session_token: self.config.session_token.as_deref(),
            region: &self.config.region,
            service: POLLY_SERVICE,
        };
        let descriptor = RequestDescriptor {
            method: "POST",
            path: Some(SYNTHESIZE_SPEECH_PATH),
            query: None,
            host: &host,
            payload: payload.as_bytes(),
            amz_date,
        };
        let authorization = sign_request(&credentials, &descriptor)?;

        let request = build_http_request(
            &host,
            &payload,
            &authorization,
            amz_date,
            self.config.session_token.as_deref(),
        );

        debug!(host = %host, bytes = request.len(), "sending SynthesizeSpeech request");
        transport.send(request.as_bytes())?;

        Self::receive_response(transport, sink)
    }

    /// Loop-drive transport reads through the decoder, forwarding fragments
    /// to the sink in arrival order.
    fn receive_response<T: Transport, S: AudioSink>(
        transport: &mut T,
        sink: &mut S,
    ) -> Result<u16, SynthesizeError> {
        let mut decoder = ResponseDecoder::new();
        let mut buffer = ReceiveBuffer::new();
        let mut status: Option<u16> = None;

        'session: loop {
            // Drain every event already buffered before reading again. The
            // sink call must return before the next read is issued.
            loop {
                match decoder.parse(buffer.pending())? {
                    ParseOutcome::NeedMoreData => break,
                    ParseOutcome::Status { code, consumed } => {
                        debug!(code, "received response status");
                        status = Some(code);
                        buffer.consume(consumed);
                    }
                    ParseOutcome::Fragment { view, consumed } => {
                        trace!(len = view.len, "delivering audio fragment");
                        sink.on_fragment(view.slice(buffer.pending()))
                            .map_err(SynthesizeError::Sink)?;
                        buffer.consume(consumed);
                    }
                    ParseOutcome::Complete { consumed } => {
                        buffer.consume(consumed);
                        break 'session;
                    }
                }
            }

            let n = transport.receive(buffer.spare_mut())?;
            if n == 0 {
                // End-of-stream is normal completion once headers have been
                // seen (read-until-close bodies have no other terminator);
                // before that it is a transport failure, not an empty result.
                if status.is_some() {
                    break 'session;
                }
                return Err(TransportError::ClosedEarly.into());
            }
            buffer.advance(n);
        }

        debug!(status, "synthesis session complete");
        status.ok_or_else(|| TransportError::ClosedEarly.into())
    }
}
