use skytraq_message::InputMessage;
use skytraq_receiver::DEFAULT_ACK_LOOKAHEAD;

use crate::cmd::{run_command, SetUpdateRateArgs};
use crate::exit::{message_error, CliResult};
use crate::output::OutputFormat;

pub fn run(args: SetUpdateRateArgs, format: OutputFormat) -> CliResult<i32> {
    let message = InputMessage::configure_position_update_rate(args.rate, args.permanent)
        .map_err(|err| message_error("invalid update rate", err))?;
    run_command(&args.device, &message, DEFAULT_ACK_LOOKAHEAD, format)
}
