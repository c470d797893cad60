use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Start marker: `0xA0 0xA1`.
pub const START_MARKER: [u8; 2] = [0xA0, 0xA1];

/// End marker: CR LF.
pub const END_MARKER: [u8; 2] = [0x0D, 0x0A];

/// Envelope size: start (2) + length (2) + checksum (1) + end (2) = 7 bytes.
pub const FRAME_OVERHEAD: usize = 7;

/// Largest payload the 16-bit length field can describe.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// A validated binary frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame payload; the first byte is the message id.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The message id, or `None` for an empty payload.
    pub fn message_id(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// The payload after the message id.
    pub fn body(&self) -> &[u8] {
        self.payload.get(1..).unwrap_or_default()
    }

    /// The XOR checksum of the payload.
    pub fn checksum(&self) -> u8 {
        checksum(&self.payload)
    }

    /// The total wire size of this frame (envelope + payload).
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Serialize into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        encode_frame(&self.payload, &mut buf)?;
        Ok(buf.freeze())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message_id() {
            Some(id) => write!(f, "frame 0x{id:02x} ({} bytes):", self.payload.len())?,
            None => write!(f, "empty frame")?,
        }
        for byte in self.body() {
            write!(f, " {byte:02x}")?;
        }
        Ok(())
    }
}

/// XOR-fold every payload byte, starting from zero.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, byte| acc ^ byte)
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬────────────┬───────────────┬──────────┬───────────┐
/// │ Start     │ Length     │ Payload       │ Checksum │ End       │
/// │ 0xA0 0xA1 │ (2B BE)    │ (Length bytes)│ (1B XOR) │ 0x0D 0x0A │
/// └───────────┴────────────┴───────────────┴──────────┴───────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(FRAME_OVERHEAD + payload.len());
    dst.put_slice(&START_MARKER);
    dst.put_u16(payload.len() as u16);
    dst.put_slice(payload);
    dst.put_u8(checksum(payload));
    dst.put_slice(&END_MARKER);
    Ok(())
}

/// Decode one complete frame.
///
/// `src` must hold exactly one frame, as produced by line framing. Checks run
/// in order: start marker, end marker, declared length, checksum.
pub fn decode_frame(src: &[u8]) -> Result<Frame> {
    let len = src.len();
    if len < FRAME_OVERHEAD {
        return Err(FrameError::Truncated { len });
    }

    if src[..2] != START_MARKER {
        return Err(FrameError::InvalidStart);
    }

    if src[len - 2..] != END_MARKER {
        return Err(FrameError::InvalidEnd);
    }

    let declared = u16::from_be_bytes([src[2], src[3]]) as usize;
    if declared + FRAME_OVERHEAD != len {
        return Err(FrameError::LengthMismatch {
            declared,
            actual: len,
        });
    }

    let payload = &src[4..4 + declared];
    let expected = checksum(payload);
    let actual = src[len - 3];
    if expected != actual {
        return Err(FrameError::ChecksumMismatch { expected, actual });
    }

    Ok(Frame::new(Bytes::copy_from_slice(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(payload, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn test_query_software_version_wire_bytes() {
        assert_eq!(
            encode(&[0x02, 0x00]),
            vec![0xA0, 0xA1, 0x00, 0x02, 0x02, 0x00, 0x02, 0x0D, 0x0A]
        );
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let payload = [0x80, 0x01, 0x00, 0x01, 0x00, 0x01];
        let wire = encode(&payload);

        assert_eq!(wire.len(), FRAME_OVERHEAD + payload.len());

        let frame = decode_frame(&wire).unwrap();
        assert_eq!(frame.payload.as_ref(), &payload);
        assert_eq!(frame.message_id(), Some(0x80));
        assert_eq!(frame.body(), &payload[1..]);
    }

    #[test]
    fn test_empty_payload() {
        let wire = encode(&[]);
        assert_eq!(wire, vec![0xA0, 0xA1, 0x00, 0x00, 0x00, 0x0D, 0x0A]);

        let frame = decode_frame(&wire).unwrap();
        assert!(frame.payload.is_empty());
        assert_eq!(frame.message_id(), None);
        assert!(frame.body().is_empty());
    }

    #[test]
    fn test_max_payload_roundtrip() {
        let payload: Vec<u8> = (0..MAX_PAYLOAD).map(|i| (i % 251) as u8).collect();
        let wire = encode(&payload);
        assert_eq!(&wire[2..4], &[0xFF, 0xFF]);

        let frame = decode_frame(&wire).unwrap();
        assert_eq!(frame.payload.len(), MAX_PAYLOAD);
        assert_eq!(frame.checksum(), checksum(&payload));
    }

    #[test]
    fn test_payload_too_large() {
        let payload = vec![0u8; MAX_PAYLOAD + 1];
        let mut buf = BytesMut::new();
        let result = encode_frame(&payload, &mut buf);
        assert!(matches!(result, Err(FrameError::PayloadTooLarge { .. })));
    }

    #[test]
    fn test_checksum_is_xor_fold() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0x39, 0x01]), 0x38);
        assert_eq!(checksum(&[0xFF, 0x0F, 0xF0]), 0x00);
    }

    #[test]
    fn test_decode_truncated() {
        let result = decode_frame(&[0xA0, 0xA1, 0x00, 0x00, 0x0D, 0x0A]);
        assert!(matches!(result, Err(FrameError::Truncated { len: 6 })));
    }

    #[test]
    fn test_decode_invalid_start() {
        let mut wire = encode(&[0x83, 0x02]);
        wire[1] = 0xA2;
        assert!(matches!(decode_frame(&wire), Err(FrameError::InvalidStart)));
    }

    #[test]
    fn test_decode_invalid_end() {
        let mut wire = encode(&[0x83, 0x02]);
        let last = wire.len() - 1;
        wire[last] = 0x00;
        assert!(matches!(decode_frame(&wire), Err(FrameError::InvalidEnd)));
    }

    #[test]
    fn test_decode_length_mismatch() {
        let mut wire = encode(&[0x83, 0x02]);
        wire[3] = 0x03;
        assert!(matches!(
            decode_frame(&wire),
            Err(FrameError::LengthMismatch {
                declared: 3,
                actual: 9
            })
        ));
    }

    #[test]
    fn test_decode_checksum_mismatch_is_distinct() {
        let mut wire = encode(&[0x83, 0x02]);
        let cs = wire.len() - 3;
        wire[cs] ^= 0x40;

        let err = decode_frame(&wire).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ChecksumMismatch {
                expected: 0x81,
                actual: 0xC1
            }
        ));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_every_corrupted_checksum_is_rejected() {
        let payload = [0x86, 0x14];
        let wire = encode(&payload);
        let cs = wire.len() - 3;
        for flip in 1..=u8::MAX {
            let mut corrupted = wire.clone();
            corrupted[cs] ^= flip;
            assert!(matches!(
                decode_frame(&corrupted),
                Err(FrameError::ChecksumMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_frame_display_and_wire_size() {
        let frame = Frame::new(Bytes::from_static(&[0x83, 0x02]));
        assert_eq!(frame.wire_size(), FRAME_OVERHEAD + 2);
        assert_eq!(frame.to_string(), "frame 0x83 (2 bytes): 02");
        assert_eq!(
            frame.to_bytes().unwrap().as_ref(),
            &[0xA0, 0xA1, 0x00, 0x02, 0x83, 0x02, 0x81, 0x0D, 0x0A]
        );
    }
}
