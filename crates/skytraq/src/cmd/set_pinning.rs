use skytraq_message::InputMessage;
use skytraq_receiver::DEFAULT_ACK_LOOKAHEAD;

use crate::cmd::{run_command, SetPinningArgs};
use crate::exit::{message_error, CliResult};
use crate::output::OutputFormat;

pub fn run(args: SetPinningArgs, format: OutputFormat) -> CliResult<i32> {
    let message = InputMessage::configure_position_pinning(args.state.enabled())
        .map_err(|err| message_error("invalid pinning state", err))?;
    run_command(&args.device, &message, DEFAULT_ACK_LOOKAHEAD, format)
}
