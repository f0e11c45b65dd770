use bytes::{BufMut, BytesMut};

use crate::buffer::MAX_FRAME_SIZE;
use crate::error::{FrameError, Result};

/// First byte of every regular frame.
pub const FRAME_START: u8 = 0xFE;
/// Last byte of every regular frame.
pub const FRAME_END: u8 = 0xFD;
/// A lone 0x00 byte: peer-initiated graceful end of session.
pub const EOS_BYTE: u8 = 0x00;

/// Liveness check, answered locally and never relayed.
pub const TYPE_KEEPALIVE: u8 = 0x0B;
/// Power key press/release notification from the panel.
pub const TYPE_PWRKEY: u8 = 0xA0;
/// Sent by the first unit that is powered on.
pub const TYPE_INIT1: u8 = 0xF0;
/// Sent by the panel when the radio is already on.
pub const TYPE_INIT2: u8 = 0xF1;

/// Canned reply to an Init1 frame (followed by [`INIT2_RESPONSE`]).
pub const INIT1_RESPONSE: [u8; 3] = [FRAME_START, TYPE_INIT1, FRAME_END];
/// Canned reply to an Init2 frame.
pub const INIT2_RESPONSE: [u8; 3] = [FRAME_START, TYPE_INIT2, FRAME_END];
/// A complete keepalive frame as sent on the wire.
pub const KEEPALIVE_FRAME: [u8; 4] = [FRAME_START, TYPE_KEEPALIVE, 0x00, FRAME_END];

/// Outcome of inspecting the accumulation buffer after a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketClass {
    /// A valid frame prefix with no terminator yet (or an empty buffer).
    Incomplete,
    /// The peer signalled a graceful session end (lone 0x00 byte).
    EndOfStream,
    /// The buffer does not start with a frame marker, or holds a malformed
    /// end-of-stream sequence.
    Invalid,
    /// The underlying read returned zero bytes (stream closed).
    EndOfFile,
    /// The underlying read failed.
    ReadError,
    /// A complete frame; the payload is its type code.
    Frame(u8),
}

/// Classify the current buffer contents.
///
/// This is a pure function of the buffer prefix: the result does not depend
/// on how the bytes were chunked across reads. A complete frame requires at
/// least two bytes so that a lone start marker is never mistaken for a
/// terminated zero-payload frame.
pub fn classify(buf: &[u8]) -> PacketClass {
    match buf {
        [] | [FRAME_START] => PacketClass::Incomplete,
        [FRAME_START, .., FRAME_END] => PacketClass::Frame(buf[1]),
        [FRAME_START, ..] => PacketClass::Incomplete,
        [EOS_BYTE] => PacketClass::EndOfStream,
        _ => PacketClass::Invalid,
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬─────────────┬──────────────────┬────────────┐
/// │ Start (1B) │ Type (1B)   │ Payload          │ End (1B)   │
/// │ 0xFE       │             │ (0..N bytes)     │ 0xFD       │
/// └────────────┴─────────────┴──────────────────┴────────────┘
/// ```
pub fn encode_frame(type_code: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let size = payload.len() + 3;
    if size > MAX_FRAME_SIZE {
        return Err(FrameError::PayloadTooLarge {
            size,
            max: MAX_FRAME_SIZE,
        });
    }
    dst.reserve(size);
    dst.put_u8(FRAME_START);
    dst.put_u8(type_code);
    dst.put_slice(payload);
    dst.put_u8(FRAME_END);
    Ok(())
}

/// Returns a human-readable name for a frame type code.
pub fn type_name(type_code: u8) -> &'static str {
    match type_code {
        TYPE_KEEPALIVE => "KEEPALIVE",
        TYPE_PWRKEY => "PWRKEY",
        TYPE_INIT1 => "INIT1",
        TYPE_INIT2 => "INIT2",
        _ => "DATA",
    }
}
