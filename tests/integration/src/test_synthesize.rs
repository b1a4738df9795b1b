//! End-to-end synthesis sessions over real sockets.

#[cfg(test)]
mod tests {
    use rustpolly_core::{SynthesizeError, SynthesizeSpeech, TransportError};

    use crate::{connect, serve_once, test_client};

    fn params() -> SynthesizeSpeech {
        SynthesizeSpeech::builder()
            .output_format("mp3")
            .voice_id("Amy")
            .text("Hello from the integration tests")
            .build()
    }

    #[test]
    fn test_should_stream_chunked_response_across_fragmented_writes() {
        let response = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
                         5\r\nHEL"
            .to_vec();
        let rest = b"LO\r\n6\r\n WORLD\r\n0\r\n\r\n".to_vec();
        let service = serve_once(vec![response, rest]);

        let mut transport = connect(service.port);
        let mut audio: Vec<u8> = Vec::new();
        let status = test_client()
            .synthesize_over(&mut transport, &params(), &mut audio)
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(audio, b"HELLO WORLD");

        let request = String::from_utf8(service.finish()).unwrap();
        assert!(request.starts_with("POST /v1/speech HTTP/1.1\r\n"));
        assert!(request.contains("\r\nauthorization: AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(request.contains("SignedHeaders=host;x-amz-date,"));
        assert!(request.contains("\r\nhost: 127.0.0.1\r\n"));
        assert!(request.ends_with("\"Text\": \"Hello from the integration tests\"}"));
    }

    #[test]
    fn test_should_grow_receive_buffer_for_large_single_chunk() {
        // One 5000-byte chunk: the whole chunk must be buffered before it can
        // be delivered, forcing the 2048-byte receive buffer to double twice.
        let body: Vec<u8> = (0..5000u32).map(|i| b'a' + (i % 26) as u8).collect();
        let mut response =
            format!("HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n", body.len())
                .into_bytes();
        response.extend_from_slice(&body);
        response.extend_from_slice(b"\r\n0\r\n\r\n");

        // Serve in ~1500-byte pieces so no single read spans the chunk.
        let pieces: Vec<Vec<u8>> = response.chunks(1500).map(<[u8]>::to_vec).collect();
        let service = serve_once(pieces);

        let mut transport = connect(service.port);
        let mut audio: Vec<u8> = Vec::new();
        let status = test_client()
            .synthesize_over(&mut transport, &params(), &mut audio)
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(audio, body);
    }

    #[test]
    fn test_should_deliver_content_length_body() {
        let service = serve_once(vec![
            b"HTTP/1.1 200 OK\r\nContent-Length: 9\r\n\r\nAUDIODATA".to_vec(),
        ]);

        let mut transport = connect(service.port);
        let mut audio: Vec<u8> = Vec::new();
        let status = test_client()
            .synthesize_over(&mut transport, &params(), &mut audio)
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(audio, b"AUDIODATA");
    }

    #[test]
    fn test_should_return_error_status_with_error_document() {
        let service = serve_once(vec![
            b"HTTP/1.1 403 Forbidden\r\nContent-Length: 31\r\n\r\n\
              {\"message\":\"SignatureMismatch\"}"
                .to_vec(),
        ]);

        let mut transport = connect(service.port);
        let mut body: Vec<u8> = Vec::new();
        let status = test_client()
            .synthesize_over(&mut transport, &params(), &mut body)
            .unwrap();

        assert_eq!(status, 403);
        assert_eq!(body, b"{\"message\":\"SignatureMismatch\"}");
    }

    #[test]
    fn test_should_fail_when_server_closes_before_status() {
        let service = serve_once(vec![b"HTTP/1.1 20".to_vec()]);

        let mut transport = connect(service.port);
        let mut audio: Vec<u8> = Vec::new();
        let result = test_client().synthesize_over(&mut transport, &params(), &mut audio);

        assert!(matches!(
            result,
            Err(SynthesizeError::Transport(TransportError::ClosedEarly))
        ));
    }

    #[test]
    fn test_should_fail_on_malformed_response() {
        let service = serve_once(vec![b"220 smtp.example.com ESMTP ready\r\n".to_vec()]);

        let mut transport = connect(service.port);
        let mut audio: Vec<u8> = Vec::new();
        let result = test_client().synthesize_over(&mut transport, &params(), &mut audio);

        assert!(matches!(result, Err(SynthesizeError::Parse(_))));
    }

    #[test]
    fn test_should_complete_read_until_close_body_at_eof() {
        let service = serve_once(vec![
            b"HTTP/1.1 200 OK\r\n\r\n".to_vec(),
            b"UNFRAMED AUDIO".to_vec(),
        ]);

        let mut transport = connect(service.port);
        let mut audio: Vec<u8> = Vec::new();
        let status = test_client()
            .synthesize_over(&mut transport, &params(), &mut audio)
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(audio, b"UNFRAMED AUDIO");
    }
}
