//! Blocking byte-stream transports.
//!
//! The session loop consumes a [`Transport`] rather than a socket type so
//! that sessions can run over TLS in production and over plain TCP (or a
//! scripted fake) in tests. Implementations provide a reliable, ordered byte
//! stream; encryption, certificate validation, and timeouts live entirely
//! behind this seam.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};
use rustls_platform_verifier::ConfigVerifierExt;
use tracing::debug;

/// Errors raised by transport implementations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// TCP connection establishment failed.
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        /// Host that was dialed.
        host: String,
        /// Port that was dialed.
        port: u16,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// TLS configuration or handshake failure.
    #[error("TLS failure: {0}")]
    Tls(#[from] rustls::Error),

    /// The host is not a valid TLS server name.
    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    /// Applying a socket option failed.
    #[error("failed to configure socket: {0}")]
    Configure(#[source] std::io::Error),

    /// Writing the request failed. Sends are all-or-nothing: a short write
    /// surfaces as this error, never as partial success.
    #[error("send failed: {0}")]
    Send(#[source] std::io::Error),

    /// Reading from the peer failed.
    #[error("receive failed: {0}")]
    Receive(#[source] std::io::Error),

    /// The peer did not respond within the configured timeout.
    #[error("timed out waiting for the peer")]
    Timeout,

    /// The peer closed the connection before any response status arrived.
    #[error("connection closed before a response status was received")]
    ClosedEarly,
}

/// A reliable, ordered, blocking byte stream.
pub trait Transport {
    /// Send all of `bytes`, or fail. There is no partial-success return.
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Read available bytes into `buf`. Returns the number of bytes read;
    /// `0` means the peer closed the stream gracefully.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

/// TLS transport over a blocking TCP socket.
///
/// Certificate validation uses the platform trust store.
pub struct TlsTransport {
    stream: StreamOwned<ClientConnection, TcpStream>,
}

impl std::fmt::Debug for TlsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsTransport").finish_non_exhaustive()
    }
}

impl TlsTransport {
    /// Connect to `host:port` and prepare a TLS session.
    ///
    /// A zero timeout disables the corresponding socket deadline. The TLS
    /// handshake itself is driven lazily by the first send.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the TCP connection, socket
    /// configuration, or TLS setup fails.
    pub fn connect(
        host: &str,
        port: u16,
        send_timeout: Duration,
        recv_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let sock = TcpStream::connect((host, port)).map_err(|source| TransportError::Connect {
            host: host.to_owned(),
            port,
            source,
        })?;
        configure_timeouts(&sock, send_timeout, recv_timeout)?;

        let config = ClientConfig::with_platform_verifier()?;
        let server_name = ServerName::try_from(host.to_owned())
            .map_err(|_| TransportError::InvalidServerName(host.to_owned()))?;
        let conn = ClientConnection::new(Arc::new(config), server_name)?;

        debug!(host, port, "TLS transport connected");

        Ok(Self {
            stream: StreamOwned::new(conn, sock),
        })
    }
}

impl Transport for TlsTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(bytes).map_err(map_send_error)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        map_receive(self.stream.read(buf))
    }
}

/// Plain TCP transport, for endpoints that terminate TLS elsewhere and for
/// test servers.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the connection or socket
    /// configuration fails.
    pub fn connect(
        host: &str,
        port: u16,
        send_timeout: Duration,
        recv_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let stream = TcpStream::connect((host, port)).map_err(|source| TransportError::Connect {
            host: host.to_owned(),
            port,
            source,
        })?;
        configure_timeouts(&stream, send_timeout, recv_timeout)?;
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(bytes).map_err(map_send_error)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        map_receive(self.stream.read(buf))
    }
}

fn configure_timeouts(
    sock: &TcpStream,
    send_timeout: Duration,
    recv_timeout: Duration,
) -> Result<(), TransportError> {
    sock.set_write_timeout(non_zero(send_timeout))
        .map_err(TransportError::Configure)?;
    sock.set_read_timeout(non_zero(recv_timeout))
        .map_err(TransportError::Configure)?;
    Ok(())
}

fn non_zero(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

fn map_send_error(e: std::io::Error) -> TransportError {
    if is_timeout(&e) {
        TransportError::Timeout
    } else {
        TransportError::Send(e)
    }
}

fn map_receive(result: std::io::Result<usize>) -> Result<usize, TransportError> {
    match result {
        Ok(n) => Ok(n),
        // Peers commonly drop the connection without a TLS close_notify;
        // surface the truncated close as end-of-stream and let the session
        // layer decide whether the response was complete.
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(0),
        Err(e) if is_timeout(&e) => Err(TransportError::Timeout),
        Err(e) => Err(TransportError::Receive(e)),
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    )
}
