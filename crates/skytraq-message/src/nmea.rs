use std::fmt;

use bytes::Bytes;

/// An NMEA sentence passed through from the receiver unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NmeaSentence {
    raw: Bytes,
}

impl NmeaSentence {
    pub fn new(raw: impl Into<Bytes>) -> Self {
        Self { raw: raw.into() }
    }

    /// Whether a line is an NMEA sentence rather than a binary frame.
    pub fn is_nmea(line: &[u8]) -> bool {
        line.first() == Some(&b'$')
    }

    /// The line as received, separator included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The sentence text without its trailing line separator.
    pub fn text(&self) -> String {
        let trimmed = self.raw.strip_suffix(b"\r\n").unwrap_or(&self.raw[..]);
        String::from_utf8_lossy(trimmed).into_owned()
    }

    /// Talker and sentence type, e.g. `GPGGA`.
    pub fn sentence_id(&self) -> Option<&str> {
        let rest = self.raw.strip_prefix(b"$")?;
        let end = rest.iter().position(|&b| b == b',' || b == b'*' || b == b'\r')?;
        std::str::from_utf8(&rest[..end]).ok()
    }
}

impl fmt::Display for NmeaSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    #[test]
    fn detects_nmea_lines() {
        assert!(NmeaSentence::is_nmea(GGA));
        assert!(!NmeaSentence::is_nmea(&[0xA0, 0xA1, 0x00]));
        assert!(!NmeaSentence::is_nmea(b""));
    }

    #[test]
    fn text_strips_separator() {
        let sentence = NmeaSentence::new(GGA);
        assert!(sentence.text().ends_with("*47"));
        assert_eq!(sentence.to_string(), sentence.text());
        assert_eq!(sentence.as_bytes(), GGA);
    }

    #[test]
    fn sentence_id() {
        assert_eq!(NmeaSentence::new(GGA).sentence_id(), Some("GPGGA"));
        assert_eq!(NmeaSentence::new(&b"$GPRMC*00\r\n"[..]).sentence_id(), Some("GPRMC"));
        assert_eq!(NmeaSentence::new(&b"GPRMC"[..]).sentence_id(), None);
    }
}
