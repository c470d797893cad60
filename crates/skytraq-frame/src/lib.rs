//! SkyTraq binary frame codec and CRLF line framing.
//!
//! Every binary message on the wire is wrapped as:
//! - A 2-byte start marker `0xA0 0xA1`
//! - A 2-byte big-endian payload length
//! - The payload (first byte is the message id)
//! - A 1-byte XOR checksum over the payload
//! - A 2-byte end marker `0x0D 0x0A`
//!
//! The receiver interleaves these frames with NMEA text, and both end in
//! CRLF, so the stream is cut into lines first ([`LineReader`]) and each
//! line is then decoded on its own ([`decode_frame`]).

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    checksum, decode_frame, encode_frame, Frame, END_MARKER, FRAME_OVERHEAD, MAX_PAYLOAD,
    START_MARKER,
};
pub use error::{FrameError, Result};
pub use reader::{
    LineConfig, LineReader, TolerantLines, DEFAULT_MAX_LINE_LENGTH, DEFAULT_MAX_TIMEOUTS,
    LINE_SEPARATOR,
};
pub use writer::FrameWriter;
