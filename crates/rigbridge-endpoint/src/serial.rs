use std::path::Path;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::info;

use crate::error::{EndpointError, Result};

/// Serial line parameters for the panel link.
///
/// The line always runs raw 8N1 without flow control; only the speed and
/// the read timeout vary. The timeout keeps bridge cycles bounded so an
/// idle line never blocks shutdown.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate. Default: 19200.
    pub baud: u32,
    /// Read timeout. Default: 500 ms.
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud: 19_200,
            read_timeout: Duration::from_millis(500),
        }
    }
}

/// Open the serial device in raw 8N1 mode.
///
/// Returns a cloneable duplex handle; the bridge clones it so one
/// direction reads while the other writes.
pub fn open_serial(path: impl AsRef<Path>, config: &SerialConfig) -> Result<Box<dyn SerialPort>> {
    let path = path.as_ref();
    let port = serialport::new(path.to_string_lossy(), config.baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.read_timeout)
        .open()
        .map_err(|source| EndpointError::SerialOpen {
            path: path.to_path_buf(),
            source,
        })?;

    info!(?path, baud = config.baud, "opened serial device");
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_raw_panel_link() {
        let config = SerialConfig::default();
        assert_eq!(config.baud, 19_200);
        assert_eq!(config.read_timeout, Duration::from_millis(500));
    }

    #[test]
    fn open_missing_device_reports_path() {
        let err = open_serial("/dev/nonexistent-rigbridge-tty", &SerialConfig::default())
            .unwrap_err();
        match err {
            EndpointError::SerialOpen { path, .. } => {
                assert_eq!(path.to_string_lossy(), "/dev/nonexistent-rigbridge-tty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
