//! Integration tests for the RustPolly client.
//!
//! Each test spins up an in-process TCP server on an ephemeral port that
//! replays a canned HTTP/1.1 response — optionally in several delayed pieces
//! to force fragmented reads on the client side — and runs a full synthesis
//! session against it over a plain [`TcpTransport`].

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Once;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rustpolly_core::{SpeechClient, SpeechConfig, TcpTransport};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A one-shot test server and the request it captured.
#[derive(Debug)]
pub struct MockService {
    /// Port the server listens on.
    pub port: u16,
    /// Receives the raw request bytes once the server has read them.
    pub request: mpsc::Receiver<Vec<u8>>,
    handle: thread::JoinHandle<()>,
}

impl MockService {
    /// Wait for the server thread to finish and return the captured request.
    ///
    /// # Panics
    ///
    /// Panics if the server thread panicked or never captured a request.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.handle.join().expect("server thread panicked");
        self.request.recv().expect("no request captured")
    }
}

/// Spawn a server that accepts one connection, reads one full request, and
/// writes `pieces` back with a short pause between them before closing.
///
/// # Panics
///
/// Panics if the listener cannot bind to an ephemeral port.
#[must_use]
pub fn serve_once(pieces: Vec<Vec<u8>>) -> MockService {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("read timeout");

        let request = read_request(&mut stream);
        tx.send(request).ok();

        for piece in pieces {
            stream.write_all(&piece).expect("write response piece");
            stream.flush().ok();
            // Give the client a chance to drain between pieces so it really
            // sees fragmented reads.
            thread::sleep(Duration::from_millis(20));
        }
        // Dropping the stream closes the connection.
    });

    MockService {
        port,
        request: rx,
        handle,
    }
}

/// Read one HTTP request: headers through the blank line, then
/// `content-length` body bytes.
fn read_request(stream: &mut std::net::TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];

    let head_end = loop {
        let n = stream.read(&mut buf).expect("read request");
        assert!(n > 0, "client closed before sending a full request");
        request.extend_from_slice(&buf[..n]);
        if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
    let content_length: usize = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map(|v| v.trim().parse().expect("content-length"))
        .unwrap_or(0);

    while request.len() < head_end + content_length {
        let n = stream.read(&mut buf).expect("read request body");
        assert!(n > 0, "client closed mid-body");
        request.extend_from_slice(&buf[..n]);
    }

    request
}

/// A client configured with test credentials against `127.0.0.1`.
///
/// # Panics
///
/// Panics if the configuration is rejected.
#[must_use]
pub fn test_client() -> SpeechClient {
    SpeechClient::new(
        SpeechConfig::builder()
            .access_key("AKIDEXAMPLE")
            .secret_key("secret")
            .region("us-east-1")
            .host("127.0.0.1")
            .send_timeout_ms(5_000)
            .recv_timeout_ms(5_000)
            .build(),
    )
    .expect("test config")
}

/// Connect a plain TCP transport to the test server.
///
/// # Panics
///
/// Panics if the connection fails.
#[must_use]
pub fn connect(port: u16) -> TcpTransport {
    TcpTransport::connect(
        "127.0.0.1",
        port,
        Duration::from_millis(5_000),
        Duration::from_millis(5_000),
    )
    .expect("connect to mock server")
}

mod test_synthesize;
