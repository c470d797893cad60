use skytraq_message::BAUD_RATES;
use skytraq_receiver::{BaudRateDetector, DetectConfig};
use skytraq_transport::{SerialConfig, SerialConnector};

use crate::cmd::DetectArgs;
use crate::exit::{receiver_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_detected, OutputFormat};

pub fn run(args: DetectArgs, format: OutputFormat) -> CliResult<i32> {
    let candidates = args.candidates.unwrap_or_else(|| BAUD_RATES.to_vec());
    if candidates.is_empty() {
        return Err(CliError::new(USAGE, "--candidates must name at least one rate"));
    }

    let connector = SerialConnector::with_config(
        args.port,
        SerialConfig {
            timeout: args.timeout,
        },
    );
    let detector = BaudRateDetector::with_config(
        connector,
        DetectConfig {
            candidates,
            ack_lookahead: args.lookahead,
            ..DetectConfig::default()
        },
    );

    let detected = detector
        .detect()
        .map_err(|err| receiver_error("detect failed", err))?;
    print_detected(detected, format);
    Ok(SUCCESS)
}
