use std::fs;

use bytes::Bytes;
use skytraq_frame::{decode_frame, FrameError, LineReader};
use skytraq_receiver::{interpret, interpret_frame, InterpretOptions, ReceiverError};
use skytraq_transport::MemoryStream;
use tracing::warn;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, receiver_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    match &args.file {
        Some(path) => {
            let data = fs::read(path).map_err(|err| {
                io_error(&format!("failed reading {}", path.display()), err)
            })?;
            replay(data, args.nmea, format)
        }
        None => {
            for input in &args.frames {
                let line = parse_hex(input)?;
                let frame = decode_frame(&line).map_err(|err| frame_error("decode failed", err))?;
                let message =
                    interpret_frame(frame).map_err(|err| receiver_error("decode failed", err))?;
                print_message(&message, format);
            }
            Ok(SUCCESS)
        }
    }
}

/// Run a raw capture through line framing and interpretation.
fn replay(data: Vec<u8>, nmea: bool, format: OutputFormat) -> CliResult<i32> {
    let mut reader = LineReader::new(MemoryStream::from_bytes(data));
    // An empty read only happens once the capture is used up.
    let lines = std::iter::from_fn(move || loop {
        match reader.read_line() {
            Ok(line) => return Some(Ok(line)),
            Err(FrameError::Timeout) => return None,
            Err(err @ FrameError::LineTooLong { .. }) => {
                warn!(error = %err, "skipping line");
            }
            Err(err) => return Some(Err(err)),
        }
    });

    let options = InterpretOptions { skip_nmea: !nmea };
    for item in interpret(lines, options) {
        match item {
            Ok(message) => print_message(&message, format),
            Err(ReceiverError::Message(err)) => warn!(error = %err, "skipping message"),
            Err(err) => return Err(receiver_error("replay failed", err)),
        }
    }
    Ok(SUCCESS)
}

fn parse_hex(input: &str) -> CliResult<Bytes> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits)
        .map(Bytes::from)
        .map_err(|err| CliError::new(USAGE, format!("invalid hex {input:?}: {err}")))
}
