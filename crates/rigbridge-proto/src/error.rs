/// Errors that can occur while encoding or sending frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The encoded frame exceeds the maximum accepted frame size.
    #[error("frame too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while writing a frame.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
