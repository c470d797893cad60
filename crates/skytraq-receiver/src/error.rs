use skytraq_frame::FrameError;
use skytraq_message::MessageError;
use skytraq_transport::TransportError;

/// Errors that can occur while talking to a receiver.
#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame or line-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Message construction or parsing error.
    #[error("message error: {0}")]
    Message(#[from] MessageError),

    /// The receiver answered with a NACK.
    #[error("receiver rejected message {id:#04x} (NACK)")]
    Rejected { id: u8 },

    /// No matching ACK within the lookahead.
    #[error("no ACK for message {id:#04x} within {limit} messages")]
    AckTimeout { id: u8, limit: usize },

    /// The message sequence ended without a matching ACK.
    #[error("no ACK for message {id:#04x} found")]
    AckNotFound { id: u8 },

    /// Every candidate baud rate was probed without an answer.
    #[error("failed to determine baud rate (tried {tried:?})")]
    BaudRateNotDetected { tried: Vec<u32> },
}

impl ReceiverError {
    /// True for stalls: correlation timeouts and line-source timeouts.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::AckTimeout { .. } => true,
            Self::Frame(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// True when the receiver answered with a NACK.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// True when a probe got no usable answer, as opposed to failing to talk
    /// to the port at all.
    pub fn is_unanswered(&self) -> bool {
        self.is_timeout() || matches!(self, Self::Rejected { .. } | Self::AckNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReceiverError>;
