use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use skytraq_frame::{FrameWriter, LineConfig, LineReader, TolerantLines};
use skytraq_message::InputMessage;
use skytraq_transport::{Connector, Transport};
use tracing::{debug, info};

use crate::ack::{find_ack, DEFAULT_ACK_LOOKAHEAD};
use crate::error::Result;
use crate::interpret::{interpret, InterpretOptions, Interpreter};

/// Configuration for a [`Receiver`] session.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Line framing for everything read from the receiver.
    pub line: LineConfig,
    /// Messages scanned for a command's ACK. Default: 5.
    pub ack_lookahead: usize,
    /// Drop NMEA sentences from [`Receiver::messages`]. Default: false.
    pub skip_nmea: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            line: LineConfig::default(),
            ack_lookahead: DEFAULT_ACK_LOOKAHEAD,
            skip_nmea: false,
        }
    }
}

/// Interpreted message sequence borrowed from a [`Receiver`].
pub type Messages<'a, T> = Interpreter<TolerantLines<&'a mut T>>;

/// An open session with a receiver.
///
/// Owns the transport for the length of a command sequence; dropping the
/// receiver releases it.
pub struct Receiver<T> {
    transport: T,
    config: ReceiverConfig,
}

impl<T: Transport> Receiver<T> {
    /// Create a session over `transport` with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ReceiverConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config(transport: T, config: ReceiverConfig) -> Self {
        Self { transport, config }
    }

    /// Open a session through `connector` at `baud_rate`.
    pub fn open<C>(connector: &C, baud_rate: u32, config: ReceiverConfig) -> Result<Self>
    where
        C: Connector<Stream = T>,
    {
        let transport = connector.open(baud_rate)?;
        info!(baud_rate, "receiver session opened");
        Ok(Self::with_config(transport, config))
    }

    /// Frame and write `message`.
    pub fn send(&mut self, message: &InputMessage) -> Result<()> {
        debug!(id = message.id(), name = message.name(), "sending message");
        FrameWriter::new(&mut self.transport).write_frame(&message.to_frame())?;
        Ok(())
    }

    /// Send `message` and wait for its ACK; returns the ACK's position.
    pub fn command(&mut self, message: &InputMessage) -> Result<usize> {
        self.send(message)?;
        let limit = self.config.ack_lookahead;
        let position = find_ack(self.messages(), message.id(), limit)?;
        info!(id = message.id(), position, "command acknowledged");
        Ok(position)
    }

    /// Interpreted, stall-tolerant message sequence.
    ///
    /// Ends after the configured number of consecutive stalls.
    pub fn messages(&mut self) -> Messages<'_, T> {
        let options = InterpretOptions {
            skip_nmea: self.config.skip_nmea,
        };
        let lines = LineReader::with_config(&mut self.transport, self.config.line.clone());
        interpret(lines.tolerant(), options)
    }

    /// Like [`messages`](Self::messages), but also ends cleanly once `stop`
    /// is raised.
    pub fn watch(&mut self, stop: Arc<AtomicBool>) -> Messages<'_, T> {
        let options = InterpretOptions {
            skip_nmea: self.config.skip_nmea,
        };
        let lines = LineReader::with_config(&mut self.transport, self.config.line.clone());
        interpret(lines.tolerant().with_stop(stop), options)
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
