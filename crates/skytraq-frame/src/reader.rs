use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use skytraq_transport::Transport;
use tracing::{debug, warn};

use crate::codec::END_MARKER;
use crate::error::{FrameError, Result};

/// Line separator shared by NMEA sentences and binary frames.
pub const LINE_SEPARATOR: [u8; 2] = END_MARKER;

/// Default maximum line length: 100 bytes.
///
/// NMEA sentences are at most 82 characters, so anything longer is almost
/// certainly garbage from a mismatched baud rate.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 100;

/// Default number of stalls tolerated by [`TolerantLines`].
pub const DEFAULT_MAX_TIMEOUTS: usize = 2;

/// Configuration for line framing.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Byte pair terminating every line. It is kept in the emitted line.
    pub separator: [u8; 2],
    /// Fail once a line grows past this many bytes. Default: 100.
    pub max_line_length: usize,
    /// Stalls tolerated before [`TolerantLines`] gives up. Default: 2.
    pub max_timeouts: usize,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            separator: LINE_SEPARATOR,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_timeouts: DEFAULT_MAX_TIMEOUTS,
        }
    }
}

/// Cuts a raw byte stream into separator-terminated lines.
///
/// Reads one byte at a time so that nothing past the separator is consumed.
/// Each call to [`read_line`](Self::read_line) starts from an empty
/// accumulator; a partial line left behind by a failure is discarded.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    config: LineConfig,
}

impl<T: Transport> LineReader<T> {
    /// Create a new line reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, LineConfig::default())
    }

    /// Create a new line reader with explicit configuration.
    pub fn with_config(inner: T, config: LineConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.max_line_length + 1),
            inner,
            config,
        }
    }

    /// Read the next complete line, separator included (blocking).
    ///
    /// Returns `Err(FrameError::Timeout)` when a read comes back empty and
    /// `Err(FrameError::LineTooLong)` when the separator does not show up
    /// within the configured length.
    pub fn read_line(&mut self) -> Result<Bytes> {
        self.buf.clear();
        loop {
            let byte = self.inner.read(1)?;
            if byte.is_empty() {
                return Err(FrameError::Timeout);
            }
            self.buf.extend_from_slice(&byte);

            if self.buf.len() > self.config.max_line_length {
                return Err(FrameError::LineTooLong {
                    max: self.config.max_line_length,
                });
            }

            if self.buf.ends_with(&self.config.separator) {
                return Ok(self.buf.split().freeze());
            }
        }
    }

    /// Wrap this reader in the stall-tolerant line sequence.
    pub fn tolerant(self) -> TolerantLines<T> {
        TolerantLines::new(self)
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current line reader configuration.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }
}

impl<T: Transport> Iterator for LineReader<T> {
    type Item = Result<Bytes>;

    /// Never returns `None`; every failure is reported and the next call
    /// starts a fresh line.
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.read_line())
    }
}

/// Line sequence that rides out a bounded number of stalls.
///
/// A timeout or an over-long line is logged and the inner reader restarted.
/// The counter resets whenever a line comes through; once it reaches
/// `max_timeouts` the sequence yields `FrameError::TooManyTimeouts` and ends.
/// Any other error is yielded once and also ends the sequence.
pub struct TolerantLines<T> {
    reader: LineReader<T>,
    timeouts: usize,
    stop: Option<Arc<AtomicBool>>,
    done: bool,
}

impl<T: Transport> TolerantLines<T> {
    /// Wrap a line reader, using its configured stall bound.
    pub fn new(reader: LineReader<T>) -> Self {
        Self {
            reader,
            timeouts: 0,
            stop: None,
            done: false,
        }
    }

    /// End the sequence cleanly once `stop` is raised.
    ///
    /// The flag is checked between reads, so an interrupt takes effect at the
    /// latest one read deadline later.
    pub fn with_stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Consume the sequence and return the inner line reader.
    pub fn into_inner(self) -> LineReader<T> {
        self.reader
    }

    fn stopped(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::SeqCst))
    }
}

impl<T: Transport> Iterator for TolerantLines<T> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if self.stopped() {
                debug!("line sequence stopped");
                self.done = true;
                return None;
            }

            match self.reader.read_line() {
                Ok(line) => {
                    self.timeouts = 0;
                    return Some(Ok(line));
                }
                Err(err @ (FrameError::Timeout | FrameError::LineTooLong { .. })) => {
                    self.timeouts += 1;
                    let max = self.reader.config.max_timeouts;
                    warn!(
                        count = self.timeouts,
                        max,
                        error = %err,
                        "timeout {} of {}",
                        self.timeouts,
                        max
                    );
                    if self.timeouts >= max {
                        self.done = true;
                        return Some(Err(FrameError::TooManyTimeouts {
                            count: self.timeouts,
                        }));
                    }
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
