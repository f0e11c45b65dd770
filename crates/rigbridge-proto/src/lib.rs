//! Packet de-framing and relay policy for the rigbridge control link.
//!
//! This is the core value-add layer of rigbridge. The link speaks a small
//! framed protocol:
//! - A 1-byte start marker (0xFE) and a 1-byte end marker (0xFD)
//! - A 1-byte type code right after the start marker
//! - A lone 0x00 byte as a graceful end-of-session signal
//!
//! Handshake and keepalive frames are answered locally and never cross the
//! bridge; everything else is relayed verbatim to the paired endpoint.

pub mod buffer;
pub mod engine;
pub mod error;
pub mod packet;
pub mod reader;
pub mod sender;

pub use buffer::{LinkStats, TransferBuffer, MAX_FRAME_SIZE};
pub use engine::RelayEngine;
pub use error::{FrameError, Result};
pub use packet::{
    classify, encode_frame, type_name, PacketClass, EOS_BYTE, FRAME_END, FRAME_START,
    INIT1_RESPONSE, INIT2_RESPONSE, KEEPALIVE_FRAME, TYPE_INIT1, TYPE_INIT2, TYPE_KEEPALIVE,
    TYPE_PWRKEY,
};
pub use reader::read_classified;
pub use sender::{send_keepalive, send_power_message};
