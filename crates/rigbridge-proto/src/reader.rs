use std::io::{ErrorKind, Read};

use tracing::warn;

use crate::buffer::TransferBuffer;
use crate::packet::{classify, PacketClass};

/// Perform one read from `input` into the buffer's vacant tail, then
/// classify the accumulated prefix.
///
/// Exactly one read per call; the caller drives this once per readiness
/// event. The buffer is never reset here — resolving a classification is
/// the relay engine's job.
///
/// A read that fails with `Interrupted`, `WouldBlock` or `TimedOut`
/// appended nothing and classifies as [`PacketClass::Incomplete`]: serial
/// handles carry read timeouts, and an idle line is not a transport
/// failure. [`PacketClass::ReadError`] is reserved for real I/O errors.
pub fn read_classified<R: Read>(input: &mut R, buf: &mut TransferBuffer) -> PacketClass {
    if buf.is_full() {
        // An unterminated frame filled the whole buffer; no further bytes
        // can be appended, so drop it rather than stall the link.
        warn!(
            len = buf.bytes().len(),
            "accumulation buffer full without terminator, dropping"
        );
        return PacketClass::Invalid;
    }

    match input.read(buf.vacant_mut()) {
        Ok(0) => PacketClass::EndOfFile,
        Ok(n) => {
            buf.advance(n);
            classify(buf.bytes())
        }
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
            ) =>
        {
            PacketClass::Incomplete
        }
        Err(err) => {
            warn!(error = %err, "read from input endpoint failed");
            PacketClass::ReadError
        }
    }
}
