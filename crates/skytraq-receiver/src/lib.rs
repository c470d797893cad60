//! Talking to a SkyTraq receiver over a byte transport.
//!
//! Builds on the frame and message layers:
//! - [`interpret`] turns a line sequence into typed [`Message`]s
//! - [`find_ack`] correlates a command with its ACK or NACK
//! - [`BaudRateDetector`] probes candidate rates until the receiver answers
//! - [`Receiver`] bundles an open transport with send / await-ACK helpers
//!
//! Everything is blocking and single-threaded. Every read has a deadline set
//! by the transport, and a stalled receiver shows up as a timeout error
//! rather than a hang.

pub mod ack;
pub mod baud;
pub mod error;
pub mod interpret;
pub mod receiver;

pub use ack::{find_ack, DEFAULT_ACK_LOOKAHEAD};
pub use baud::{BaudRateDetector, DetectConfig, DetectedBaudRate, PROBE_SOFTWARE_TYPE};
pub use error::{ReceiverError, Result};
pub use interpret::{interpret, interpret_frame, InterpretOptions, Interpreter, Message};
pub use receiver::{Messages, Receiver, ReceiverConfig};
