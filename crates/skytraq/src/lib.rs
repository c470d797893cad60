//! Host-side toolkit for SkyTraq GPS receivers.
//!
//! SkyTraq receivers interleave NMEA sentences with a binary request /
//! response protocol on the same UART. This crate bundles the layers that
//! speak it.
//!
//! # Crate Structure
//!
//! - [`transport`]: byte transport abstraction, serial port and in-memory replay
//! - [`frame`]: binary frame codec and CRLF line framing
//! - [`message`]: field codec, message catalogue and registry
//! - [`receiver`]: interpretation, ACK correlation, baud-rate detection and
//!   receiver sessions (behind the default `receiver` feature)

/// Re-export transport types.
pub mod transport {
    pub use skytraq_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use skytraq_frame::*;
}

/// Re-export message types.
pub mod message {
    pub use skytraq_message::*;
}

/// Re-export receiver types (requires `receiver` feature).
#[cfg(feature = "receiver")]
pub mod receiver {
    pub use skytraq_receiver::*;
}
