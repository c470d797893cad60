use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use skytraq_message::InputMessage;
use skytraq_receiver::{Receiver, ReceiverConfig, DEFAULT_ACK_LOOKAHEAD};
use skytraq_transport::{SerialConfig, SerialConnector, SerialStream};

use crate::exit::{receiver_error, CliResult, SUCCESS};
use crate::output::{print_command, CommandOutput, OutputFormat};

pub mod decode;
pub mod detect;
pub mod encode;
pub mod query;
pub mod set_baud;
pub mod set_datum;
pub mod set_pinning;
pub mod set_update_rate;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send the status queries and print the answers.
    Query(QueryArgs),
    /// Print everything the receiver sends until interrupted, or until it
    /// stays silent for --max-idle periods.
    Watch(WatchArgs),
    /// Find the baud rate the receiver is talking at.
    Detect(DetectArgs),
    /// Change the receiver's baud rate.
    SetBaud(SetBaudArgs),
    /// Select the receiver's datum.
    SetDatum(SetDatumArgs),
    /// Change the position update rate.
    SetUpdateRate(SetUpdateRateArgs),
    /// Turn position pinning on or off.
    SetPinning(SetPinningArgs),
    /// Print the frame for an input message without a device.
    Encode(EncodeArgs),
    /// Parse and interpret frames offline.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Query(args) => query::run(args, format),
        Command::Watch(args) => watch::run(args, format),
        Command::Detect(args) => detect::run(args, format),
        Command::SetBaud(args) => set_baud::run(args, format),
        Command::SetDatum(args) => set_datum::run(args, format),
        Command::SetUpdateRate(args) => set_update_rate::run(args, format),
        Command::SetPinning(args) => set_pinning::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Serial device the receiver is attached to.
    #[arg(long, env = "SKYTRAQ_PORT", default_value = "/dev/ttyAMA0")]
    pub port: PathBuf,
    /// Baud rate of the serial line.
    #[arg(long, env = "SKYTRAQ_BAUD", default_value = "115200")]
    pub baud: u32,
    /// Per-read deadline (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub timeout: Duration,
}

impl DeviceArgs {
    pub fn connector(&self) -> SerialConnector {
        SerialConnector::with_config(
            self.port.clone(),
            SerialConfig {
                timeout: self.timeout,
            },
        )
    }

    pub fn open(&self, config: ReceiverConfig) -> CliResult<Receiver<SerialStream>> {
        Receiver::open(&self.connector(), self.baud, config)
            .map_err(|err| receiver_error("open failed", err))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Messages scanned for each query's ACK.
    #[arg(long, default_value_t = DEFAULT_ACK_LOOKAHEAD)]
    pub lookahead: usize,
    /// Messages scanned for each query's response after the ACK.
    #[arg(long, default_value_t = 10)]
    pub responses: usize,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Also print NMEA sentences.
    #[arg(long)]
    pub nmea: bool,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Give up after N silent periods in a row. Default: listen until
    /// interrupted.
    #[arg(long, value_name = "N")]
    pub max_idle: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Serial device the receiver is attached to.
    #[arg(long, env = "SKYTRAQ_PORT", default_value = "/dev/ttyAMA0")]
    pub port: PathBuf,
    /// Per-read deadline (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub timeout: Duration,
    /// Rates to try, in order (comma-separated). Default: all supported.
    #[arg(long, value_delimiter = ',')]
    pub candidates: Option<Vec<u32>>,
    /// Messages scanned for the probe's ACK at each rate.
    #[arg(long, default_value_t = DEFAULT_ACK_LOOKAHEAD)]
    pub lookahead: usize,
}

#[derive(Args, Debug)]
pub struct SetBaudArgs {
    /// New baud rate in bps.
    pub rate: u32,
    /// Also write the setting to flash.
    #[arg(long)]
    pub permanent: bool,
    /// Messages scanned for the ACK. The receiver keeps talking NMEA while
    /// it switches, so this is longer than usual.
    #[arg(long, default_value_t = 25)]
    pub lookahead: usize,
    #[command(flatten)]
    pub device: DeviceArgs,
}

#[derive(Args, Debug)]
pub struct SetDatumArgs {
    /// Datum index.
    pub index: u16,
    /// Also write the setting to flash.
    #[arg(long)]
    pub permanent: bool,
    #[command(flatten)]
    pub device: DeviceArgs,
}

#[derive(Args, Debug)]
pub struct SetUpdateRateArgs {
    /// Position updates per second (1, 2, 4, 5, 8, 10 or 20).
    pub rate: u8,
    /// Also write the setting to flash.
    #[arg(long)]
    pub permanent: bool,
    #[command(flatten)]
    pub device: DeviceArgs,
}

#[derive(Args, Debug)]
pub struct SetPinningArgs {
    #[arg(value_enum)]
    pub state: Switch,
    #[command(flatten)]
    pub device: DeviceArgs,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub message: encode::EncodeMessage,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frames as hex, one per argument. Whitespace is ignored.
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    pub frames: Vec<String>,
    /// Replay a raw capture of the serial line.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Include NMEA sentences from the capture.
    #[arg(long, requires = "file")]
    pub nmea: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Send `message`, wait for its ACK and print the outcome.
pub fn run_command(
    device: &DeviceArgs,
    message: &InputMessage,
    lookahead: usize,
    format: OutputFormat,
) -> CliResult<i32> {
    let mut receiver = device.open(ReceiverConfig {
        ack_lookahead: lookahead,
        ..ReceiverConfig::default()
    })?;
    let position = receiver
        .command(message)
        .map_err(|err| receiver_error(&format!("{} failed", message.name()), err))?;

    print_command(
        &CommandOutput {
            id: message.id(),
            name: message.name(),
            acknowledged: true,
            position,
        },
        format,
    );
    Ok(SUCCESS)
}

pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration value: {input}"))?;

    if value == 0 {
        return Err("duration must be greater than zero".to_string());
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn switch_maps_to_enable_flag() {
        assert!(Switch::On.enabled());
        assert!(!Switch::Off.enabled());
    }
}
