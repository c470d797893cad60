use bytes::Bytes;

use crate::error::Result;

/// A blocking byte pipe to the receiver.
///
/// `read` never blocks past the transport's configured deadline: when the
/// deadline expires it returns whatever arrived, which may be nothing.
/// An empty read is a timeout, not end-of-stream.
pub trait Transport {
    /// Read up to `n` bytes.
    fn read(&mut self, n: usize) -> Result<Bytes>;

    /// Write all of `data`.
    fn write(&mut self, data: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        (**self).read(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        (**self).read(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data)
    }
}

/// Opens transport sessions at a requested baud rate.
///
/// The returned stream is released when dropped, so a session is scoped to
/// the value's lifetime on every exit path.
pub trait Connector {
    /// The stream type produced by this connector.
    type Stream: Transport;

    /// Open a session at `baud_rate` bps.
    fn open(&self, baud_rate: u32) -> Result<Self::Stream>;
}

impl<C: Connector + ?Sized> Connector for &C {
    type Stream = C::Stream;

    fn open(&self, baud_rate: u32) -> Result<Self::Stream> {
        (**self).open(baud_rate)
    }
}
