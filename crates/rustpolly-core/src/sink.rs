//! Audio delivery sink.

use std::io;

/// Receiver for decoded audio fragments.
///
/// Fragments arrive strictly in the order their bytes were received, and the
/// session loop does not read further from the transport until the current
/// call returns. The byte slice is only valid for the duration of the call:
/// implementations that need the data later must copy it.
///
/// Returning an error aborts the session.
///
/// Every [`io::Write`] is an `AudioSink` that appends fragments, so a
/// `Vec<u8>`, a `File`, or a `BufWriter` can be passed directly.
pub trait AudioSink {
    /// Handle one decoded fragment of response body.
    ///
    /// # Errors
    ///
    /// Any error aborts the synthesis session and is surfaced to the caller.
    fn on_fragment(&mut self, data: &[u8]) -> io::Result<()>;
}

impl<W: io::Write> AudioSink for W {
    fn on_fragment(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data)
    }
}
