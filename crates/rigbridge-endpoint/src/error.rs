use std::path::PathBuf;

/// Errors that can occur while setting up or using an endpoint.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// Failed to open or configure the serial device.
    #[error("failed to open serial device {path}: {source}")]
    SerialOpen {
        path: PathBuf,
        source: serialport::Error,
    },

    /// Failed to bind the listening socket.
    #[error("failed to bind to {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },

    /// Failed to connect to the remote peer.
    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: String, source: std::io::Error },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// A sysfs GPIO operation failed.
    #[error("gpio{pin} setup failed: {source}")]
    Gpio { pin: u32, source: std::io::Error },

    /// An I/O error occurred on an endpoint stream.
    #[error("endpoint I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EndpointError>;
