use clap::Subcommand;
use skytraq_message::{InputMessage, MessageRegistry};
use skytraq_receiver::PROBE_SOFTWARE_TYPE;

use crate::cmd::{EncodeArgs, Switch};
use crate::exit::{message_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum EncodeMessage {
    /// Query software version (0x02).
    QuerySoftwareVersion {
        /// Software type: 0 reserved, 1 system code.
        #[arg(long, default_value_t = PROBE_SOFTWARE_TYPE)]
        software_type: u8,
    },
    /// Query software CRC (0x03).
    QuerySoftwareCrc {
        /// Software type: 0 reserved, 1 system code.
        #[arg(long, default_value_t = PROBE_SOFTWARE_TYPE)]
        software_type: u8,
    },
    /// Configure serial port (0x05).
    ConfigureSerialPort {
        /// Baud rate in bps.
        rate: u32,
        #[arg(long)]
        permanent: bool,
    },
    /// Configure position update rate (0x0E).
    ConfigureUpdateRate {
        /// Updates per second.
        rate: u8,
        #[arg(long)]
        permanent: bool,
    },
    /// Configure datum (0x29).
    ConfigureDatum {
        /// Datum index.
        index: u16,
        #[arg(long)]
        permanent: bool,
    },
    /// Configure position pinning (0x39).
    ConfigurePinning {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Query position update rate (0x10).
    QueryUpdateRate,
    /// Query datum (0x2D).
    QueryDatum,
    /// Query WAAS status (0x38).
    QueryWaasStatus,
    /// Query position pinning (0x3A).
    QueryPinning,
    /// Query navigation mode (0x3D).
    QueryNavigationMode,
    /// Query PPS mode (0x3F).
    QueryPpsMode,
    /// Any input message with a field layout, by id and raw field values.
    Raw {
        /// Message id, decimal or 0x-prefixed hex.
        #[arg(value_parser = parse_id)]
        id: u8,
        /// Field values in layout order.
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let message = build(args.message).map_err(|err| message_error("encode failed", err))?;
    let wire = message
        .to_bytes()
        .map_err(|err| message_error("encode failed", err))?;
    print_encoded(&message, &wire, format);
    Ok(SUCCESS)
}

fn build(message: EncodeMessage) -> skytraq_message::Result<InputMessage> {
    match message {
        EncodeMessage::QuerySoftwareVersion { software_type } => {
            InputMessage::query_software_version(software_type)
        }
        EncodeMessage::QuerySoftwareCrc { software_type } => {
            InputMessage::query_software_crc(software_type)
        }
        EncodeMessage::ConfigureSerialPort { rate, permanent } => {
            InputMessage::configure_serial_port(rate, permanent)
        }
        EncodeMessage::ConfigureUpdateRate { rate, permanent } => {
            InputMessage::configure_position_update_rate(rate, permanent)
        }
        EncodeMessage::ConfigureDatum { index, permanent } => {
            InputMessage::configure_datum(index, permanent)
        }
        EncodeMessage::ConfigurePinning { state } => {
            InputMessage::configure_position_pinning(state.enabled())
        }
        EncodeMessage::QueryUpdateRate => Ok(InputMessage::query_position_update_rate()),
        EncodeMessage::QueryDatum => Ok(InputMessage::query_datum()),
        EncodeMessage::QueryWaasStatus => Ok(InputMessage::query_waas_status()),
        EncodeMessage::QueryPinning => Ok(InputMessage::query_position_pinning()),
        EncodeMessage::QueryNavigationMode => Ok(InputMessage::query_navigation_mode()),
        EncodeMessage::QueryPpsMode => Ok(InputMessage::query_pps_mode()),
        EncodeMessage::Raw { id, values } => {
            InputMessage::from_values(MessageRegistry::global().input(id), &values)
        }
    }
}

fn parse_id(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid message id: {input}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_hex_and_decimal() {
        assert_eq!(parse_id("0x29"), Ok(0x29));
        assert_eq!(parse_id("0X0e"), Ok(0x0E));
        assert_eq!(parse_id("16"), Ok(16));
        assert!(parse_id("0x100").is_err());
        assert!(parse_id("datum").is_err());
    }

    #[test]
    fn raw_matches_named_builder() {
        let raw = build(EncodeMessage::Raw {
            id: 0x0E,
            values: vec![10, 1],
        })
        .unwrap();
        let named = build(EncodeMessage::ConfigureUpdateRate {
            rate: 10,
            permanent: true,
        })
        .unwrap();
        assert_eq!(raw.to_bytes().unwrap(), named.to_bytes().unwrap());
    }

    #[test]
    fn raw_rejects_opaque_and_unknown_ids() {
        assert!(build(EncodeMessage::Raw {
            id: 0x01,
            values: vec![],
        })
        .is_err());
        assert!(build(EncodeMessage::Raw {
            id: 0x7F,
            values: vec![],
        })
        .is_err());
    }
}
