/// Maximum accepted frame size in bytes. A frame that fills the buffer
/// without terminating is dropped as invalid.
pub const MAX_FRAME_SIZE: usize = 1024;

/// The accumulation slot for one direction of the bridge.
///
/// Bytes read from the input endpoint are appended at the write index until
/// the contents classify as something other than incomplete; the relay
/// engine then resolves the frame and resets the index. The buffer is
/// created once per monitored endpoint and only ever reset in place.
pub struct TransferBuffer {
    data: [u8; MAX_FRAME_SIZE],
    write_index: usize,
    valid_frames: u64,
    invalid_frames: u64,
    write_errors: u64,
}

/// Running counters for one direction of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkStats {
    /// Frames resolved as valid (handled locally or relayed).
    pub valid_frames: u64,
    /// Frames dropped as malformed.
    pub invalid_frames: u64,
    /// Relay or handshake-response writes that failed or came up short.
    pub write_errors: u64,
}

impl TransferBuffer {
    pub fn new() -> Self {
        Self {
            data: [0; MAX_FRAME_SIZE],
            write_index: 0,
            valid_frames: 0,
            invalid_frames: 0,
            write_errors: 0,
        }
    }

    /// Bytes accumulated since the last frame resolution.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.write_index]
    }

    /// The unfilled tail of the buffer, for the next read to fill.
    pub fn vacant_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.write_index..]
    }

    /// Record that `n` bytes were read into the vacant tail.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= MAX_FRAME_SIZE - self.write_index);
        self.write_index += n;
    }

    pub fn is_empty(&self) -> bool {
        self.write_index == 0
    }

    pub fn is_full(&self) -> bool {
        self.write_index == MAX_FRAME_SIZE
    }

    /// Resolve the current contents as a valid frame and reset.
    pub fn mark_valid(&mut self) {
        self.valid_frames += 1;
        self.write_index = 0;
    }

    /// Resolve the current contents as malformed and reset.
    pub fn mark_invalid(&mut self) {
        self.invalid_frames += 1;
        self.write_index = 0;
    }

    /// Record a failed or short write on this direction.
    pub fn record_write_error(&mut self) {
        self.write_errors += 1;
    }

    pub fn stats(&self) -> LinkStats {
        LinkStats {
            valid_frames: self.valid_frames,
            invalid_frames: self.invalid_frames,
            write_errors: self.write_errors,
        }
    }
}

impl Default for TransferBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransferBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferBuffer")
            .field("write_index", &self.write_index)
            .field("valid_frames", &self.valid_frames)
            .field("invalid_frames", &self.invalid_frames)
            .field("write_errors", &self.write_errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let buf = TransferBuffer::new();
        assert!(buf.is_empty());
        assert!(!buf.is_full());
        assert!(buf.bytes().is_empty());
        assert_eq!(buf.stats(), LinkStats::default());
    }

    #[test]
    fn advance_exposes_written_prefix() {
        let mut buf = TransferBuffer::new();
        buf.vacant_mut()[..3].copy_from_slice(&[0xFE, 0x0B, 0xFD]);
        buf.advance(3);

        assert_eq!(buf.bytes(), &[0xFE, 0x0B, 0xFD]);
        assert_eq!(buf.vacant_mut().len(), MAX_FRAME_SIZE - 3);
    }

    #[test]
    fn appending_preserves_earlier_bytes() {
        let mut buf = TransferBuffer::new();
        buf.vacant_mut()[0] = 0xFE;
        buf.advance(1);
        buf.vacant_mut()[0] = 0x0B;
        buf.advance(1);

        assert_eq!(buf.bytes(), &[0xFE, 0x0B]);
    }

    #[test]
    fn resolution_resets_index_but_not_counters() {
        let mut buf = TransferBuffer::new();
        buf.vacant_mut()[0] = 0xAA;
        buf.advance(1);
        buf.mark_invalid();

        assert!(buf.is_empty());

        buf.vacant_mut()[0] = 0xFE;
        buf.advance(1);
        buf.mark_valid();

        let stats = buf.stats();
        assert_eq!(stats.valid_frames, 1);
        assert_eq!(stats.invalid_frames, 1);
        assert_eq!(stats.write_errors, 0);
    }

    #[test]
    fn fills_to_capacity() {
        let mut buf = TransferBuffer::new();
        let n = buf.vacant_mut().len();
        buf.advance(n);
        assert!(buf.is_full());
        assert!(buf.vacant_mut().is_empty());
    }

    #[test]
    fn write_errors_accumulate_independently() {
        let mut buf = TransferBuffer::new();
        buf.record_write_error();
        buf.record_write_error();
        assert_eq!(buf.stats().write_errors, 2);
        assert_eq!(buf.stats().valid_frames, 0);
    }
}
