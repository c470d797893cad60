use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use bytes::Bytes;
use tracing::debug;

use crate::error::Result;
use crate::traits::{Connector, Transport};

#[derive(Debug, Clone)]
enum Segment {
    Data(Bytes),
    Timeout,
}

/// In-memory transport that replays a scripted byte stream.
///
/// Reads hand out the queued bytes in order; a scripted timeout (or an
/// exhausted script) produces an empty read. Everything written is recorded.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    segments: VecDeque<Segment>,
    written: Vec<u8>,
}

impl MemoryStream {
    /// Create an empty stream; every read times out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stream that replays `data` and then times out.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::new().with_data(data)
    }

    /// Queue bytes to be returned by subsequent reads.
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        if !data.is_empty() {
            self.segments.push_back(Segment::Data(data));
        }
        self
    }

    /// Queue a single timed-out (empty) read.
    pub fn with_timeout(mut self) -> Self {
        self.segments.push_back(Segment::Timeout);
        self
    }

    /// Bytes written to this stream so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// True when every scripted segment has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Transport for MemoryStream {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        match self.segments.pop_front() {
            Some(Segment::Data(mut data)) => {
                let chunk = data.split_to(n.min(data.len()));
                if !data.is_empty() {
                    self.segments.push_front(Segment::Data(data));
                }
                Ok(chunk)
            }
            Some(Segment::Timeout) | None => Ok(Bytes::new()),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.written.extend_from_slice(data);
        Ok(())
    }
}

/// Connector handing out [`MemoryStream`]s keyed by baud rate.
///
/// Rates without a registered script open a silent stream.
#[derive(Debug, Default)]
pub struct MemoryConnector {
    streams: HashMap<u32, MemoryStream>,
    opened: RefCell<Vec<u32>>,
}

impl MemoryConnector {
    /// Create a connector where every rate is silent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the stream replayed for sessions at `baud_rate`.
    pub fn with_stream(mut self, baud_rate: u32, stream: MemoryStream) -> Self {
        self.streams.insert(baud_rate, stream);
        self
    }

    /// Baud rates opened so far, in order.
    pub fn opened(&self) -> Vec<u32> {
        self.opened.borrow().clone()
    }
}

impl Connector for MemoryConnector {
    type Stream = MemoryStream;

    fn open(&self, baud_rate: u32) -> Result<MemoryStream> {
        debug!(baud_rate, "opening memory stream");
        self.opened.borrow_mut().push(baud_rate);
        Ok(self.streams.get(&baud_rate).cloned().unwrap_or_default())
    }
}
