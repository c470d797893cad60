use skytraq_transport::TransportError;

/// Errors that can occur during frame encoding/decoding and line framing.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The input is shorter than an empty frame.
    #[error("malformed frame: {len} bytes is shorter than the 7-byte envelope")]
    Truncated { len: usize },

    /// The frame does not begin with `0xA0 0xA1`.
    #[error("malformed frame: start marker is wrong")]
    InvalidStart,

    /// The frame does not end with `0x0D 0x0A`.
    #[error("malformed frame: end marker is wrong")]
    InvalidEnd,

    /// The declared payload length disagrees with the input size.
    #[error("malformed frame: declared payload length {declared} does not fit {actual} bytes")]
    LengthMismatch { declared: usize, actual: usize },

    /// The XOR checksum does not match the payload.
    #[error("checksum mismatch: computed {expected:#04x}, frame carries {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// The payload does not fit the 16-bit length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A single read returned no bytes before its deadline.
    #[error("UART timeout")]
    Timeout,

    /// No line separator appeared within the configured length.
    #[error("UART line longer than {max} bytes; maybe the baud rate is wrong?")]
    LineTooLong { max: usize },

    /// The tolerated number of consecutive stalls was used up.
    #[error("maximum number of timeouts reached ({count})")]
    TooManyTimeouts { count: usize },

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FrameError {
    /// True for structural and checksum failures of a single captured frame.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::InvalidStart
                | Self::InvalidEnd
                | Self::LengthMismatch { .. }
                | Self::ChecksumMismatch { .. }
        )
    }

    /// True for stalls of the line source, whether tolerated or final.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::LineTooLong { .. } | Self::TooManyTimeouts { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
