//! Byte transport abstraction for UART-attached SkyTraq receivers.
//!
//! Everything above this crate talks to the receiver through two small
//! traits:
//! - [`Transport`]: a blocking byte pipe whose reads return short (possibly
//!   empty) on timeout instead of blocking forever
//! - [`Connector`]: opens a scoped [`Transport`] session at a given baud rate
//!
//! Two implementations ship here: [`SerialStream`] over a real serial port
//! and [`MemoryStream`] for replaying captured bytes.

pub mod error;
pub mod memory;
pub mod serial;
pub mod traits;

pub use error::{Result, TransportError};
pub use memory::{MemoryConnector, MemoryStream};
pub use serial::{SerialConfig, SerialConnector, SerialStream, DEFAULT_READ_TIMEOUT};
pub use traits::{Connector, Transport};
