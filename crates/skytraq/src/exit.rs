use std::fmt;
use std::io;

use skytraq_frame::FrameError;
use skytraq_message::MessageError;
use skytraq_receiver::ReceiverError;
use skytraq_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const REJECTED: i32 = 70;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => USAGE,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        err if err.is_timeout() => CliError::new(TIMEOUT, format!("{context}: {err}")),
        err if err.is_malformed() => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        FrameError::PayloadTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

/// Construction errors come from user-supplied values; parse errors from
/// receiver data.
pub fn message_error(context: &str, err: MessageError) -> CliError {
    match err {
        MessageError::Frame(err) => frame_error(context, err),
        MessageError::ValueOutOfRange { .. }
        | MessageError::ValueNotAllowed { .. }
        | MessageError::NotFinite { .. }
        | MessageError::UnknownDatum(_)
        | MessageError::UnsupportedBaudRate(_)
        | MessageError::LayoutMismatch { .. }
        | MessageError::NotInterpretable { .. }
        | MessageError::WrongDirection { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn receiver_error(context: &str, err: ReceiverError) -> CliError {
    match err {
        ReceiverError::Transport(err) => transport_error(context, err),
        ReceiverError::Frame(err) => frame_error(context, err),
        ReceiverError::Message(err) => message_error(context, err),
        ReceiverError::Rejected { .. } => CliError::new(REJECTED, format!("{context}: {err}")),
        ReceiverError::AckTimeout { .. }
        | ReceiverError::AckNotFound { .. }
        | ReceiverError::BaudRateNotDetected { .. } => {
            CliError::new(TIMEOUT, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_errors_map_to_distinct_codes() {
        let nack = receiver_error("set", ReceiverError::Rejected { id: 0x05 });
        assert_eq!(nack.code, REJECTED);

        let timeout = receiver_error("set", ReceiverError::AckTimeout { id: 0x05, limit: 5 });
        assert_eq!(timeout.code, TIMEOUT);

        let stalled = receiver_error(
            "set",
            ReceiverError::Frame(FrameError::TooManyTimeouts { count: 2 }),
        );
        assert_eq!(stalled.code, TIMEOUT);

        let closed = receiver_error("set", ReceiverError::Transport(TransportError::Closed));
        assert_eq!(closed.code, TRANSPORT_ERROR);
    }

    #[test]
    fn message_errors_split_usage_from_data() {
        assert_eq!(
            message_error("encode", MessageError::UnknownDatum(1)).code,
            USAGE
        );
        assert_eq!(
            message_error("decode", MessageError::UnsupportedMessage(0x85)).code,
            DATA_INVALID
        );
        assert_eq!(
            message_error("decode", MessageError::Frame(FrameError::InvalidStart)).code,
            DATA_INVALID
        );
    }

    #[test]
    fn error_message_carries_context() {
        let err = receiver_error(
            "detect failed",
            ReceiverError::BaudRateNotDetected { tried: vec![9600] },
        );
        assert!(err.to_string().starts_with("detect failed: "));
    }
}
