//! Typed field codec and message registry for the SkyTraq binary protocol.
//!
//! A message payload is a one-byte id followed by fixed-width big-endian
//! fields. This crate describes those fields ([`FieldType`]), the message
//! shapes built from them ([`MessageType`]), and the two id tables that
//! map wire ids to shapes ([`MessageRegistry`]):
//! - input messages travel host → receiver and are built from arguments
//! - output messages travel receiver → host and are parsed from payloads
//!
//! Reference data the fields are validated against (datums, ellipsoids,
//! baud-rate codes) lives in [`reference`].

pub mod catalog;
pub mod error;
pub mod field;
pub mod ids;
pub mod input;
pub mod nmea;
pub mod output;
pub mod reference;
pub mod registry;

pub use error::{MessageError, Result};
pub use field::{Domain, Field, FieldType, Render, Scale, Wire};
pub use input::InputMessage;
pub use nmea::NmeaSentence;
pub use output::OutputMessage;
pub use reference::{Datum, Ellipsoid, BAUD_RATES};
pub use registry::{Direction, Layout, MessageRegistry, MessageType};
