//! Byte-stream endpoints for the rigbridge link.
//!
//! Thin, stateless setup wrappers around the OS resources the bridge
//! relays between: the panel-facing serial line, the remote-facing TCP
//! socket, and the sysfs GPIO pins used for the physical power key. No
//! protocol logic lives here; everything returned implements plain
//! `Read`/`Write` for the relay engine to drive.

pub mod error;
pub mod gpio;
pub mod serial;
pub mod tcp;

pub use error::{EndpointError, Result};
pub use gpio::{GpioOut, PowerKey};
pub use serial::{open_serial, SerialConfig};
pub use tcp::{connect, BridgeListener};
