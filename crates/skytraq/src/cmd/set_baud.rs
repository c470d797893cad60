use skytraq_message::InputMessage;
use skytraq_receiver::BaudRateDetector;
use tracing::info;

use crate::cmd::{run_command, DeviceArgs, SetBaudArgs};
use crate::exit::{message_error, receiver_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: SetBaudArgs, format: OutputFormat) -> CliResult<i32> {
    // Validate before touching the port.
    let message = InputMessage::configure_serial_port(args.rate, args.permanent)
        .map_err(|err| message_error("invalid baud rate", err))?;

    let current = BaudRateDetector::new(args.device.connector())
        .detect()
        .map_err(|err| receiver_error("detect failed", err))?;

    if current.rate == args.rate {
        info!(rate = args.rate, "baud rate already set");
        println!("Receiver already talks at {} bps", args.rate);
        return Ok(SUCCESS);
    }

    let device = DeviceArgs {
        baud: current.rate,
        ..args.device
    };
    run_command(&device, &message, args.lookahead, format)
}
