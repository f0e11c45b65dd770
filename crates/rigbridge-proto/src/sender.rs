use std::io::Write;

use bytes::BytesMut;

use crate::error::Result;
use crate::packet::{encode_frame, KEEPALIVE_FRAME, TYPE_PWRKEY};

/// Send one keepalive frame (`FE 0B 00 FD`).
///
/// The panel side sends these periodically so the base side sees liveness;
/// the receiving engine answers them locally.
pub fn send_keepalive<W: Write>(out: &mut W) -> Result<()> {
    out.write_all(&KEEPALIVE_FRAME)?;
    out.flush()?;
    Ok(())
}

/// Send a power on/off frame (`FE A0 00|01 FD`) toward the peer.
pub fn send_power_message<W: Write>(out: &mut W, power_on: bool) -> Result<()> {
    let mut frame = BytesMut::with_capacity(4);
    encode_frame(TYPE_PWRKEY, &[u8::from(power_on)], &mut frame)?;
    out.write_all(&frame)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{FRAME_END, FRAME_START};

    #[test]
    fn keepalive_bytes_on_the_wire() {
        let mut out = Vec::new();
        send_keepalive(&mut out).unwrap();
        assert_eq!(out, KEEPALIVE_FRAME);
    }

    #[test]
    fn power_on_frame() {
        let mut out = Vec::new();
        send_power_message(&mut out, true).unwrap();
        assert_eq!(out, [FRAME_START, TYPE_PWRKEY, 0x01, FRAME_END]);
    }

    #[test]
    fn power_off_frame() {
        let mut out = Vec::new();
        send_power_message(&mut out, false).unwrap();
        assert_eq!(out, [FRAME_START, TYPE_PWRKEY, 0x00, FRAME_END]);
    }

    #[test]
    fn write_failure_propagates() {
        struct BrokenPipe;

        impl Write for BrokenPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = send_keepalive(&mut BrokenPipe).unwrap_err();
        assert!(matches!(err, crate::error::FrameError::Io(_)));
    }
}
