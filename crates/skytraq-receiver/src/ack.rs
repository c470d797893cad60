use tracing::debug;

use crate::error::{ReceiverError, Result};
use crate::interpret::Message;

/// Default number of messages scanned for an acknowledgement.
pub const DEFAULT_ACK_LOOKAHEAD: usize = 5;

/// Scan `messages` in arrival order for the ACK of input message `id`.
///
/// Returns the position of the matching ACK. Any NACK ends the scan with
/// [`ReceiverError::Rejected`], whichever id it carries. Once position
/// `limit` has been examined without a match the scan fails with
/// [`ReceiverError::AckTimeout`]; a sequence that ends earlier fails with
/// [`ReceiverError::AckNotFound`].
///
/// Per-message interpretation errors occupy a position and are skipped.
/// Errors from the underlying line source end the scan.
pub fn find_ack<I>(messages: I, id: u8, limit: usize) -> Result<usize>
where
    I: IntoIterator<Item = Result<Message>>,
{
    for (position, item) in messages.into_iter().enumerate() {
        match item {
            Ok(message) => {
                debug!(position, %message, "waiting for ACK");
                if let Some(output) = message.as_output() {
                    if output.is_nack() {
                        return Err(ReceiverError::Rejected {
                            id: output.acknowledged_id().unwrap_or(id),
                        });
                    }
                    if output.is_ack() && output.acknowledged_id() == Some(id) {
                        return Ok(position);
                    }
                }
            }
            Err(ReceiverError::Message(err)) => {
                debug!(position, error = %err, "skipping uninterpretable message");
            }
            Err(err) => return Err(err),
        }

        if position >= limit {
            return Err(ReceiverError::AckTimeout { id, limit });
        }
    }
    Err(ReceiverError::AckNotFound { id })
}

#[cfg(test)]
mod tests {
    use skytraq_frame::FrameError;
    use skytraq_message::{MessageError, NmeaSentence, OutputMessage};

    use super::*;

    fn output(payload: &[u8]) -> Result<Message> {
        Ok(Message::Output(OutputMessage::parse(payload.to_vec()).unwrap()))
    }

    fn nmea() -> Result<Message> {
        Ok(Message::Nmea(NmeaSentence::new(&b"$GPGSV,1,1,00*79\r\n"[..])))
    }

    fn ack(id: u8) -> Result<Message> {
        output(&[0x83, id])
    }

    fn nack(id: u8) -> Result<Message> {
        output(&[0x84, id])
    }

    #[test]
    fn returns_position_of_matching_ack() {
        let messages = vec![nmea(), nmea(), ack(0x02)];
        assert_eq!(find_ack(messages, 0x02, 5).unwrap(), 2);
    }

    #[test]
    fn ack_at_limit_is_found() {
        let mut messages: Vec<_> = (0..5).map(|_| nmea()).collect();
        messages.push(ack(0x0E));
        assert_eq!(find_ack(messages, 0x0E, 5).unwrap(), 5);
    }

    #[test]
    fn ack_for_other_id_is_ignored() {
        let messages = vec![ack(0x39), nmea(), ack(0x02)];
        assert_eq!(find_ack(messages, 0x02, 5).unwrap(), 2);
    }

    #[test]
    fn nack_after_unrelated_messages_is_rejection() {
        let mut messages: Vec<_> = (0..4).map(|_| nmea()).collect();
        messages.push(nack(0x05));
        let err = find_ack(messages, 0x05, 5).unwrap_err();
        assert!(matches!(err, ReceiverError::Rejected { id: 0x05 }));
        assert!(!err.is_timeout());
    }

    #[test]
    fn nack_for_any_id_is_rejection() {
        let messages = vec![nmea(), nack(0x39), ack(0x02)];
        assert!(matches!(
            find_ack(messages, 0x02, 5),
            Err(ReceiverError::Rejected { id: 0x39 })
        ));
    }

    #[test]
    fn lookahead_exhaustion_is_timeout() {
        let mut messages: Vec<_> = (0..6).map(|_| nmea()).collect();
        messages.push(ack(0x02));
        let err = find_ack(messages, 0x02, 5).unwrap_err();
        assert!(matches!(err, ReceiverError::AckTimeout { id: 0x02, limit: 5 }));
        assert!(err.is_timeout());
    }

    #[test]
    fn exhausted_sequence_is_not_found() {
        let messages = vec![nmea(), ack(0x39)];
        assert!(matches!(
            find_ack(messages, 0x02, 5),
            Err(ReceiverError::AckNotFound { id: 0x02 })
        ));
    }

    #[test]
    fn message_errors_take_a_position() {
        let messages = vec![
            Err(MessageError::UnsupportedMessage(0x85).into()),
            nmea(),
            ack(0x02),
        ];
        assert_eq!(find_ack(messages, 0x02, 5).unwrap(), 2);
    }

    #[test]
    fn line_source_failure_ends_scan() {
        let messages = vec![
            nmea(),
            Err(FrameError::TooManyTimeouts { count: 2 }.into()),
            ack(0x02),
        ];
        let err = find_ack(messages, 0x02, 5).unwrap_err();
        assert!(matches!(
            err,
            ReceiverError::Frame(FrameError::TooManyTimeouts { count: 2 })
        ));
        assert!(err.is_timeout());
    }

    #[test]
    fn scan_stops_at_first_match() {
        let mut consumed = 0;
        let messages = [nmea(), ack(0x02), nack(0x02)].into_iter().inspect(|_| consumed += 1);
        assert_eq!(find_ack(messages, 0x02, 5).unwrap(), 1);
        assert_eq!(consumed, 2);
    }
}
