use skytraq_frame::{FrameError, FrameWriter, LineConfig, LineReader};
use skytraq_message::{ids, reference, InputMessage, BAUD_RATES};
use skytraq_transport::Connector;
use tracing::{debug, info};

use crate::ack::{find_ack, DEFAULT_ACK_LOOKAHEAD};
use crate::error::{ReceiverError, Result};
use crate::interpret::{interpret, InterpretOptions};

/// Software type sent with the probe: system code.
pub const PROBE_SOFTWARE_TYPE: u8 = 1;

/// Configuration for baud-rate detection.
#[derive(Debug, Clone)]
pub struct DetectConfig {
    /// Rates to probe, in order. Default: every supported rate, slowest first.
    pub candidates: Vec<u32>,
    /// Messages scanned for the probe's ACK at each rate. Default: 5.
    pub ack_lookahead: usize,
    /// Line framing used while waiting for the ACK.
    pub line: LineConfig,
    /// Software type field of the probe. Default: system code.
    pub software_type: u8,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            candidates: BAUD_RATES.to_vec(),
            ack_lookahead: DEFAULT_ACK_LOOKAHEAD,
            line: LineConfig::default(),
            software_type: PROBE_SOFTWARE_TYPE,
        }
    }
}

/// Result of a successful detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedBaudRate {
    /// Position of the rate in the candidate list.
    pub index: usize,
    /// Rate in bps.
    pub rate: u32,
}

impl DetectedBaudRate {
    /// The receiver's baud-rate code for this rate, used by the serial-port
    /// configuration message. Independent of the candidate index.
    pub fn code(&self) -> Option<u8> {
        reference::baud_rate_code(self.rate)
    }
}

/// Finds the rate a receiver is currently talking at.
///
/// Each candidate gets its own session from the connector, released before
/// the next one is opened. A session that answers the software-version probe
/// with an ACK wins. Silence, garbage, a NACK, a failed read or an ACK
/// outside the lookahead moves on to the next candidate; failing to open or
/// write the port aborts.
pub struct BaudRateDetector<C> {
    connector: C,
    config: DetectConfig,
}

impl<C: Connector> BaudRateDetector<C> {
    /// Create a detector with default configuration.
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, DetectConfig::default())
    }

    /// Create a detector with explicit configuration.
    pub fn with_config(connector: C, config: DetectConfig) -> Self {
        Self { connector, config }
    }

    /// Probe every candidate in order until one answers.
    pub fn detect(&self) -> Result<DetectedBaudRate> {
        let probe = InputMessage::query_software_version(self.config.software_type)?;
        let mut tried = Vec::with_capacity(self.config.candidates.len());

        for (index, &rate) in self.config.candidates.iter().enumerate() {
            info!(rate, "trying baud rate");
            tried.push(rate);
            match self.probe(rate, &probe) {
                Ok(position) => {
                    info!(rate, index, position, "baud rate detected");
                    return Ok(DetectedBaudRate { index, rate });
                }
                Err(err @ ReceiverError::Transport(_)) => return Err(err),
                Err(err) => {
                    info!(rate, error = %err, "no answer at this rate");
                }
            }
        }

        Err(ReceiverError::BaudRateNotDetected { tried })
    }

    /// Send `probe` at `rate` and wait for its ACK; returns the ACK position.
    ///
    /// Failing to open the session or write the probe is a
    /// [`ReceiverError::Transport`]. Everything that goes wrong while waiting
    /// for the ACK, read failures included, comes back as a correlation error.
    pub fn probe(&self, rate: u32, probe: &InputMessage) -> Result<usize> {
        let mut session = self.connector.open(rate)?;

        debug!(rate, id = probe.id(), "sending probe");
        FrameWriter::new(&mut session)
            .write_frame(&probe.to_frame())
            .map_err(|err| match err {
                FrameError::Transport(err) => ReceiverError::Transport(err),
                other => ReceiverError::Frame(other),
            })?;

        let lines = LineReader::with_config(&mut session, self.config.line.clone()).tolerant();
        find_ack(
            interpret(lines, InterpretOptions::default()),
            ids::QUERY_SOFTWARE_VERSION,
            self.config.ack_lookahead,
        )
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    pub fn into_inner(self) -> C {
        self.connector
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    use bytes::Bytes;
    use skytraq_transport::{MemoryConnector, MemoryStream, Transport, TransportError};

    use super::*;

    const ACK_SOFTWARE_VERSION: [u8; 9] = [0xA0, 0xA1, 0x00, 0x02, 0x83, 0x02, 0x81, 0x0D, 0x0A];
    const NACK_SOFTWARE_VERSION: [u8; 9] = [0xA0, 0xA1, 0x00, 0x02, 0x84, 0x02, 0x86, 0x0D, 0x0A];

    fn answering() -> MemoryStream {
        MemoryStream::new()
            .with_data(&b"$GPGGA,,,,,,0,00,,,M,,M,,*66\r\n"[..])
            .with_data(ACK_SOFTWARE_VERSION.to_vec())
    }

    #[test]
    fn detects_only_answering_rate() {
        let connector = MemoryConnector::new().with_stream(115_200, answering());
        let detector = BaudRateDetector::new(&connector);

        let detected = detector.detect().unwrap();
        assert_eq!(detected, DetectedBaudRate { index: 5, rate: 115_200 });
        assert_eq!(detected.code(), Some(5));
        assert_eq!(connector.opened(), BAUD_RATES.to_vec());
    }

    #[test]
    fn garbage_and_nack_advance_to_next_candidate() {
        let garbage = MemoryStream::from_bytes(vec![0x55; 250]);
        let nack = MemoryStream::from_bytes(NACK_SOFTWARE_VERSION.to_vec());
        let connector = MemoryConnector::new()
            .with_stream(4800, garbage)
            .with_stream(9600, nack)
            .with_stream(38_400, answering());

        let detected = BaudRateDetector::new(&connector).detect().unwrap();
        assert_eq!(detected, DetectedBaudRate { index: 3, rate: 38_400 });
        assert_eq!(connector.opened(), vec![4800, 9600, 19_200, 38_400]);
    }

    #[test]
    fn candidate_index_follows_configured_list() {
        let connector = MemoryConnector::new().with_stream(57_600, answering());
        let config = DetectConfig {
            candidates: vec![115_200, 57_600],
            ..DetectConfig::default()
        };

        let detected = BaudRateDetector::with_config(&connector, config).detect().unwrap();
        assert_eq!(detected.index, 1);
        assert_eq!(detected.rate, 57_600);
        assert_eq!(detected.code(), Some(4));
    }

    #[test]
    fn silence_everywhere_exhausts_candidates() {
        let connector = MemoryConnector::new();
        let err = BaudRateDetector::new(&connector).detect().unwrap_err();
        match err {
            ReceiverError::BaudRateNotDetected { tried } => assert_eq!(tried, BAUD_RATES.to_vec()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ack_beyond_lookahead_advances() {
        let mut late = MemoryStream::new();
        for _ in 0..3 {
            late = late.with_data(&b"$GPGSA,A,1*1E\r\n"[..]);
        }
        late = late.with_data(ACK_SOFTWARE_VERSION.to_vec());
        let connector = MemoryConnector::new().with_stream(4800, late);
        let config = DetectConfig {
            candidates: vec![4800],
            ack_lookahead: 1,
            ..DetectConfig::default()
        };

        let err = BaudRateDetector::with_config(&connector, config).detect().unwrap_err();
        assert!(matches!(err, ReceiverError::BaudRateNotDetected { .. }));
    }

    #[test]
    fn probe_writes_software_version_query() {
        #[derive(Clone)]
        struct Tap {
            written: Rc<RefCell<Vec<u8>>>,
            replay: MemoryStream,
        }

        impl Transport for Tap {
            fn read(&mut self, n: usize) -> skytraq_transport::Result<Bytes> {
                self.replay.read(n)
            }

            fn write(&mut self, data: &[u8]) -> skytraq_transport::Result<()> {
                self.written.borrow_mut().extend_from_slice(data);
                Ok(())
            }
        }

        impl Connector for Tap {
            type Stream = Tap;

            fn open(&self, _baud_rate: u32) -> skytraq_transport::Result<Tap> {
                Ok(self.clone())
            }
        }

        let tap = Tap {
            written: Rc::default(),
            replay: answering(),
        };
        let detector = BaudRateDetector::new(tap.clone());
        let probe = InputMessage::query_software_version(PROBE_SOFTWARE_TYPE).unwrap();

        assert_eq!(detector.probe(115_200, &probe).unwrap(), 1);
        assert_eq!(
            tap.written.borrow().as_slice(),
            &[0xA0, 0xA1, 0x00, 0x02, 0x02, 0x01, 0x03, 0x0D, 0x0A]
        );
    }

    enum Line {
        Broken,
        Replay(MemoryStream),
    }

    impl Transport for Line {
        fn read(&mut self, n: usize) -> skytraq_transport::Result<Bytes> {
            match self {
                Line::Broken => Err(io::Error::other("framing error").into()),
                Line::Replay(stream) => stream.read(n),
            }
        }

        fn write(&mut self, _data: &[u8]) -> skytraq_transport::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_failure_advances_to_next_candidate() {
        struct Noisy;

        impl Connector for Noisy {
            type Stream = Line;

            fn open(&self, baud_rate: u32) -> skytraq_transport::Result<Line> {
                if baud_rate == 115_200 {
                    Ok(Line::Replay(answering()))
                } else {
                    Ok(Line::Broken)
                }
            }
        }

        let detected = BaudRateDetector::new(Noisy).detect().unwrap();
        assert_eq!(detected, DetectedBaudRate { index: 5, rate: 115_200 });
    }

    #[test]
    fn write_failure_aborts_detection() {
        struct ReadOnly;

        impl Transport for ReadOnly {
            fn read(&mut self, _n: usize) -> skytraq_transport::Result<Bytes> {
                Ok(Bytes::new())
            }

            fn write(&mut self, _data: &[u8]) -> skytraq_transport::Result<()> {
                Err(TransportError::Closed)
            }
        }

        struct Unwritable;

        impl Connector for Unwritable {
            type Stream = ReadOnly;

            fn open(&self, _baud_rate: u32) -> skytraq_transport::Result<ReadOnly> {
                Ok(ReadOnly)
            }
        }

        let err = BaudRateDetector::new(Unwritable).detect().unwrap_err();
        assert!(matches!(err, ReceiverError::Transport(TransportError::Closed)));
    }

    #[test]
    fn open_failure_aborts_detection() {
        struct Broken;

        impl Connector for Broken {
            type Stream = MemoryStream;

            fn open(&self, _baud_rate: u32) -> skytraq_transport::Result<MemoryStream> {
                Err(TransportError::Closed)
            }
        }

        let err = BaudRateDetector::new(Broken).detect().unwrap_err();
        assert!(matches!(err, ReceiverError::Transport(TransportError::Closed)));
    }
}
