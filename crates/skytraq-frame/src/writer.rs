use bytes::BytesMut;
use skytraq_transport::Transport;
use tracing::debug;

use crate::codec::{encode_frame, Frame, FRAME_OVERHEAD};
use crate::error::Result;

const INITIAL_BUFFER_CAPACITY: usize = 64;

/// Writes complete frames to any [`Transport`].
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Transport> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.payload.as_ref())
    }

    /// Frame and send a payload.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        self.buf.reserve(FRAME_OVERHEAD + payload.len());
        encode_frame(payload, &mut self.buf)?;
        self.inner.write(&self.buf)?;
        debug!(
            id = payload.first().copied().unwrap_or_default(),
            len = payload.len(),
            "sent frame"
        );
        Ok(())
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use skytraq_transport::MemoryStream;

    use super::*;
    use crate::codec::decode_frame;
    use crate::error::FrameError;

    #[test]
    fn send_writes_full_frame() {
        let mut writer = FrameWriter::new(MemoryStream::new());
        writer.send(&[0x39, 0x01]).unwrap();

        assert_eq!(
            writer.get_ref().written(),
            &[0xA0, 0xA1, 0x00, 0x02, 0x39, 0x01, 0x38, 0x0D, 0x0A]
        );
    }

    #[test]
    fn frames_are_concatenated() {
        let mut writer = FrameWriter::new(MemoryStream::new());
        writer.send(&[0x3A]).unwrap();
        writer
            .write_frame(&Frame::new(Bytes::from_static(&[0x10])))
            .unwrap();

        let written = writer.into_inner().written().to_vec();
        assert_eq!(written.len(), 16);
        assert_eq!(decode_frame(&written[..8]).unwrap().payload.as_ref(), &[0x3A]);
        assert_eq!(decode_frame(&written[8..]).unwrap().payload.as_ref(), &[0x10]);
    }

    #[test]
    fn writes_through_borrowed_transport() {
        let mut stream = MemoryStream::new();
        FrameWriter::new(&mut stream).send(&[0x2D]).unwrap();
        assert_eq!(stream.written().len(), 8);
    }

    #[test]
    fn oversized_payload_is_not_written() {
        let mut writer = FrameWriter::new(MemoryStream::new());
        let err = writer.send(&vec![0u8; 70_000]).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
        assert!(writer.get_ref().written().is_empty());
    }
}
