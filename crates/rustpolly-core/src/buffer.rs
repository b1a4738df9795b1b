//! Growable receive buffer for the session loop.

/// Initial capacity of a [`ReceiveBuffer`].
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 2048;

/// A contiguous byte region owned exclusively by the session loop.
///
/// The buffer grows by doubling whenever it is fully occupied and is
/// compacted (the unparsed tail moved to offset 0) after bytes have been
/// consumed by the decoder. Consumed bytes are never re-presented: the
/// pending range always starts at the first unconsumed byte of the stream.
#[derive(Debug)]
pub struct ReceiveBuffer {
    buf: Vec<u8>,
    filled: usize,
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiveBuffer {
    /// Create a buffer with the default initial capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RECV_BUFFER_SIZE)
    }

    /// Create a buffer with a specific initial capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a zero-sized buffer could never grow.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "receive buffer capacity must be non-zero");
        Self {
            buf: vec![0; capacity],
            filled: 0,
        }
    }

    /// Current capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The received-but-unparsed byte range.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// The writable spare region, doubling the capacity first when full.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        if self.filled == self.buf.len() {
            let doubled = self.buf.len() * 2;
            self.buf.resize(doubled, 0);
        }
        &mut self.buf[self.filled..]
    }

    /// Record `n` bytes written into the spare region.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the spare region.
    pub fn advance(&mut self, n: usize) {
        assert!(self.filled + n <= self.buf.len(), "advance past buffer end");
        self.filled += n;
    }

    /// Discard the first `n` pending bytes, moving the unparsed tail to
    /// offset 0.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the pending range.
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.filled, "consume past pending range");
        self.buf.copy_within(n..self.filled, 0);
        self.filled -= n;
    }
}
