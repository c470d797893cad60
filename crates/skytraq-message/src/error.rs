use skytraq_frame::FrameError;

use crate::registry::Direction;

/// Errors that can occur while building or parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The value does not fit the field's wire type.
    #[error("{field}: value {value} outside {min}..={max}")]
    ValueOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The value fits the wire type but is not one of the admissible codes.
    #[error("{field}: value {value} not allowed (allowed: {allowed})")]
    ValueNotAllowed {
        field: &'static str,
        value: i64,
        allowed: String,
    },

    /// A scaled field was given NaN or an infinity.
    #[error("{field}: value is not a finite number")]
    NotFinite { field: &'static str },

    /// The byte slice handed to a field decoder has the wrong width.
    #[error("{field}: expected {expected} bytes, got {actual}")]
    FieldWidth {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The payload is empty, so there is no message id.
    #[error("empty payload")]
    EmptyPayload,

    /// No output message type is registered for this id.
    #[error("unsupported output message id {0:#04x}")]
    UnsupportedMessage(u8),

    /// The payload length disagrees with the message layout.
    #[error("message {id:#04x}: payload length should be {expected}, got {actual}")]
    PayloadLength {
        id: u8,
        expected: usize,
        actual: usize,
    },

    /// The payload id does not belong to the message type parsing it.
    #[error("wrong message type for payload: expected {expected:#04x}, got {actual:#04x}")]
    WrongMessageId { expected: u8, actual: u8 },

    /// The message type is registered but its body layout is not known.
    #[error("message {id:#04x} ({name}) has no known field layout")]
    NotInterpretable { id: u8, name: &'static str },

    /// A message type was used in the wrong direction.
    #[error("message {id:#04x} is not an {expected} message")]
    WrongDirection { id: u8, expected: Direction },

    /// The supplied fields do not match the message layout.
    #[error("message {id:#04x}: fields do not match the layout")]
    LayoutMismatch { id: u8 },

    /// No datum with this index exists in the reference table.
    #[error("unknown datum index {0}")]
    UnknownDatum(u16),

    /// The receiver has no code for this baud rate.
    #[error("unsupported baud rate {0} bps")]
    UnsupportedBaudRate(u32),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

pub type Result<T> = std::result::Result<T, MessageError>;
