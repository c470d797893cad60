use std::fmt;

use bytes::Bytes;
use skytraq_frame::{decode_frame, Frame};
use skytraq_message::{MessageError, MessageRegistry, NmeaSentence, OutputMessage};
use tracing::{debug, warn};

use crate::error::Result;

/// One interpreted line of receiver output.
#[derive(Debug, Clone)]
pub enum Message {
    /// NMEA text, passed through untouched.
    Nmea(NmeaSentence),
    /// A binary message parsed against its registered layout.
    Output(OutputMessage),
    /// A valid frame whose message type has no known layout.
    Frame(Frame),
}

impl Message {
    pub fn as_output(&self) -> Option<&OutputMessage> {
        match self {
            Message::Output(msg) => Some(msg),
            _ => None,
        }
    }

    /// Message id of binary messages.
    pub fn id(&self) -> Option<u8> {
        match self {
            Message::Nmea(_) => None,
            Message::Output(msg) => Some(msg.id()),
            Message::Frame(frame) => frame.message_id(),
        }
    }

    pub fn is_nack(&self) -> bool {
        self.as_output().is_some_and(OutputMessage::is_nack)
    }

    /// True for an ACK of the input message `id`.
    pub fn is_ack_for(&self, id: u8) -> bool {
        self.as_output()
            .is_some_and(|msg| msg.is_ack() && msg.acknowledged_id() == Some(id))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Nmea(sentence) => fmt::Display::fmt(sentence, f),
            Message::Output(msg) => fmt::Display::fmt(msg, f),
            Message::Frame(frame) => fmt::Display::fmt(frame, f),
        }
    }
}

/// Options for [`interpret`].
#[derive(Debug, Clone, Default)]
pub struct InterpretOptions {
    /// Drop NMEA lines instead of yielding them.
    pub skip_nmea: bool,
}

/// Turn raw lines into [`Message`]s.
///
/// Lines that fail frame decoding are logged and skipped. A frame whose id is
/// not registered, or whose fields do not validate, is yielded as a
/// [`ReceiverError::Message`](crate::ReceiverError::Message) item and the
/// sequence carries on. Errors from the line source are passed through.
pub fn interpret<I>(lines: I, options: InterpretOptions) -> Interpreter<I::IntoIter>
where
    I: IntoIterator<Item = skytraq_frame::Result<Bytes>>,
{
    Interpreter {
        lines: lines.into_iter(),
        options,
        registry: MessageRegistry::global(),
    }
}

/// Iterator returned by [`interpret`].
pub struct Interpreter<I> {
    lines: I,
    options: InterpretOptions,
    registry: &'static MessageRegistry,
}

impl<I> Interpreter<I> {
    /// Resolve output ids through `registry` instead of the built-in one.
    pub fn with_registry(mut self, registry: &'static MessageRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn into_inner(self) -> I {
        self.lines
    }
}

impl<I> Iterator for Interpreter<I>
where
    I: Iterator<Item = skytraq_frame::Result<Bytes>>,
{
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };

            if NmeaSentence::is_nmea(&line) {
                if self.options.skip_nmea {
                    continue;
                }
                return Some(Ok(Message::Nmea(NmeaSentence::new(line))));
            }

            let frame = match decode_frame(&line) {
                Ok(frame) => frame,
                Err(err) => {
                    warn!(error = %err, line = ?line, "failed to interpret line");
                    continue;
                }
            };

            return match interpret_frame_with(self.registry, frame) {
                Ok(message) => Some(Ok(message)),
                Err(err) => {
                    warn!(error = %err, "failed to interpret message");
                    Some(Err(err))
                }
            };
        }
    }
}

/// Interpret one decoded frame with the built-in registry.
///
/// Types without a field layout come back as [`Message::Frame`].
pub fn interpret_frame(frame: Frame) -> Result<Message> {
    interpret_frame_with(MessageRegistry::global(), frame)
}

fn interpret_frame_with(registry: &MessageRegistry, frame: Frame) -> Result<Message> {
    match OutputMessage::parse_with(registry, frame.payload.clone()) {
        Ok(msg) => Ok(Message::Output(msg)),
        Err(MessageError::NotInterpretable { id, name }) => {
            debug!(id, name, "no field layout, yielding raw frame");
            Ok(Message::Frame(frame))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use skytraq_frame::{FrameError, LineReader};
    use skytraq_transport::MemoryStream;

    use super::*;
    use crate::error::ReceiverError;

    const ACK_SOFTWARE_VERSION: [u8; 9] = [0xA0, 0xA1, 0x00, 0x02, 0x83, 0x02, 0x81, 0x0D, 0x0A];
    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N*47\r\n";

    fn lines(chunks: &[&[u8]]) -> Vec<skytraq_frame::Result<Bytes>> {
        chunks
            .iter()
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect()
    }

    #[test]
    fn yields_nmea_and_output_messages_in_order() {
        let messages: Vec<Message> = interpret(
            lines(&[GGA, &ACK_SOFTWARE_VERSION[..]]),
            InterpretOptions::default(),
        )
        .map(|m| m.unwrap())
        .collect();

        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], Message::Nmea(s) if s.sentence_id() == Some("GPGGA")));
        assert!(messages[1].is_ack_for(0x02));
        assert_eq!(
            messages[1].to_string(),
            "GPS acknowledges 'Query software version' (0x02)"
        );
    }

    #[test]
    fn skip_nmea_drops_sentences() {
        let messages: Vec<_> = interpret(
            lines(&[GGA, GGA, &ACK_SOFTWARE_VERSION[..]]),
            InterpretOptions { skip_nmea: true },
        )
        .collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].as_ref().unwrap().id(), Some(0x83));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let bad_checksum = [0xA0, 0xA1, 0x00, 0x02, 0x83, 0x02, 0x80, 0x0D, 0x0A];
        let messages: Vec<_> = interpret(
            lines(&[&b"garbage\r\n"[..], &bad_checksum[..], &ACK_SOFTWARE_VERSION[..]]),
            InterpretOptions::default(),
        )
        .collect();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].as_ref().unwrap().is_ack_for(0x02));
    }

    #[test]
    fn opaque_type_yields_raw_frame() {
        let pps = [0xA0, 0xA1, 0x00, 0x02, 0xB6, 0x01, 0xB7, 0x0D, 0x0A];
        let mut messages = interpret(lines(&[&pps[..]]), InterpretOptions::default());
        match messages.next() {
            Some(Ok(Message::Frame(frame))) => assert_eq!(frame.payload.as_ref(), &[0xB6, 0x01]),
            other => panic!("expected raw frame, got {other:?}"),
        }
        assert!(messages.next().is_none());
    }

    #[test]
    fn unsupported_id_is_reported_without_ending_sequence() {
        let unknown = [0xA0, 0xA1, 0x00, 0x02, 0x85, 0x01, 0x84, 0x0D, 0x0A];
        let messages: Vec<_> = interpret(
            lines(&[&unknown[..], &ACK_SOFTWARE_VERSION[..]]),
            InterpretOptions::default(),
        )
        .collect();
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            messages[0],
            Err(ReceiverError::Message(MessageError::UnsupportedMessage(0x85)))
        ));
        assert!(messages[1].as_ref().unwrap().is_ack_for(0x02));
    }

    #[test]
    fn interpret_frame_classifies_single_frames() {
        let ack = interpret_frame(Frame::new(vec![0x83, 0x3A])).unwrap();
        assert!(ack.is_ack_for(0x3A));

        let ephemeris = interpret_frame(Frame::new(vec![0xB1, 0x00])).unwrap();
        assert!(matches!(ephemeris, Message::Frame(_)));
        assert_eq!(ephemeris.id(), Some(0xB1));

        assert!(matches!(
            interpret_frame(Frame::new(vec![0x02, 0x01])),
            Err(ReceiverError::Message(MessageError::UnsupportedMessage(0x02)))
        ));
    }

    #[test]
    fn line_source_errors_pass_through() {
        let stream = MemoryStream::from_bytes(ACK_SOFTWARE_VERSION.to_vec());
        let mut messages = interpret(
            LineReader::new(stream).tolerant(),
            InterpretOptions::default(),
        );

        assert!(messages.next().unwrap().unwrap().is_ack_for(0x02));
        assert!(matches!(
            messages.next(),
            Some(Err(ReceiverError::Frame(FrameError::TooManyTimeouts { count: 2 })))
        ));
        assert!(messages.next().is_none());
    }
}
