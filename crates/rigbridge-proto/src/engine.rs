use std::io::{Read, Write};

use tracing::{debug, trace, warn};

use crate::buffer::{LinkStats, TransferBuffer};
use crate::packet::{
    type_name, PacketClass, INIT1_RESPONSE, INIT2_RESPONSE, TYPE_INIT1, TYPE_INIT2,
    TYPE_KEEPALIVE, TYPE_PWRKEY,
};
use crate::reader::read_classified;

/// Per-direction relay engine: one read, one classification, one policy
/// action per cycle.
///
/// Handshake (Init1/Init2) and keepalive frames are link-local: they are
/// answered on the *input* endpoint and never forwarded, so the far side
/// never sees spurious handshake traffic. Every other complete frame is
/// relayed verbatim to the output endpoint. Each bridge direction owns its
/// own engine; the two directions share no state.
pub struct RelayEngine {
    direction: &'static str,
    buffer: TransferBuffer,
}

impl RelayEngine {
    /// `direction` labels this engine's traffic in diagnostics, e.g.
    /// `"radio->remote"`.
    pub fn new(direction: &'static str) -> Self {
        Self {
            direction,
            buffer: TransferBuffer::new(),
        }
    }

    /// The direction label this engine was built with.
    pub fn direction(&self) -> &'static str {
        self.direction
    }

    /// Run one read + classify + resolve cycle.
    ///
    /// `input` is the endpoint that became readable (also the target of
    /// handshake responses); `output` is the paired endpoint on the other
    /// side of the bridge. Returns the cycle's classification so the
    /// caller can decide on link teardown for `EndOfFile`/`ReadError`.
    ///
    /// Failed or short writes bump the write-error counter and are not
    /// retried; no cycle outcome is fatal here.
    pub fn cycle<I, O>(&mut self, input: &mut I, output: &mut O) -> PacketClass
    where
        I: Read + Write,
        O: Write,
    {
        let class = read_classified(input, &mut self.buffer);

        match class {
            PacketClass::Incomplete => {
                // Strict prefix of an eventual frame; keep accumulating.
            }
            PacketClass::EndOfStream | PacketClass::Frame(TYPE_KEEPALIVE) => {
                // Liveness is emulated on this side of the link.
                trace!(direction = self.direction, "keepalive answered locally");
                self.buffer.mark_valid();
            }
            PacketClass::Frame(TYPE_INIT1) => {
                // First unit to power on; expects Init1 + Init2 back.
                self.respond(input, &INIT1_RESPONSE);
                self.respond(input, &INIT2_RESPONSE);
                self.buffer.mark_valid();
            }
            PacketClass::Frame(TYPE_INIT2) => {
                // Panel powered on while the radio is already up.
                self.respond(input, &INIT2_RESPONSE);
                self.buffer.mark_valid();
            }
            PacketClass::Frame(TYPE_PWRKEY) => {
                debug!(
                    direction = self.direction,
                    frame = %hex_dump(self.buffer.bytes()),
                    "power key frame"
                );
                self.buffer.mark_valid();
            }
            PacketClass::Invalid => {
                debug!(
                    direction = self.direction,
                    frame = %hex_dump(self.buffer.bytes()),
                    "dropping malformed frame"
                );
                self.buffer.mark_invalid();
            }
            PacketClass::Frame(other) => {
                trace!(
                    direction = self.direction,
                    type_code = other,
                    name = type_name(other),
                    len = self.buffer.bytes().len(),
                    "relaying frame"
                );
                self.forward(output);
                self.buffer.mark_valid();
            }
            PacketClass::EndOfFile | PacketClass::ReadError => {
                // The stream is going away, but bytes already accumulated
                // must still be flushed downstream rather than dropped.
                self.forward(output);
                self.buffer.mark_valid();
            }
        }

        class
    }

    /// Counters for this direction.
    pub fn stats(&self) -> LinkStats {
        self.buffer.stats()
    }

    /// Write a canned handshake response back onto the input endpoint.
    fn respond<W: Write>(&mut self, endpoint: &mut W, frame: &[u8]) {
        match endpoint.write(frame) {
            Ok(n) if n == frame.len() => {
                let _ = endpoint.flush();
            }
            Ok(n) => {
                warn!(
                    direction = self.direction,
                    wrote = n,
                    expected = frame.len(),
                    "short handshake response"
                );
                self.buffer.record_write_error();
            }
            Err(err) => {
                warn!(direction = self.direction, error = %err, "handshake response failed");
                self.buffer.record_write_error();
            }
        }
    }

    /// Relay the accumulated bytes verbatim to the output endpoint.
    fn forward<W: Write>(&mut self, output: &mut W) {
        let len = self.buffer.bytes().len();
        if len == 0 {
            return;
        }
        match output.write(self.buffer.bytes()) {
            Ok(n) if n == len => {
                let _ = output.flush();
            }
            Ok(n) => {
                warn!(
                    direction = self.direction,
                    wrote = n,
                    expected = len,
                    "short relay write"
                );
                self.buffer.record_write_error();
            }
            Err(err) => {
                warn!(direction = self.direction, error = %err, "relay write failed");
                self.buffer.record_write_error();
            }
        }
    }
}

fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{b:02X}"));
    }
    out
}
