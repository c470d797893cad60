use skytraq_message::InputMessage;
use skytraq_receiver::DEFAULT_ACK_LOOKAHEAD;

use crate::cmd::{run_command, SetDatumArgs};
use crate::exit::{message_error, CliResult};
use crate::output::OutputFormat;

pub fn run(args: SetDatumArgs, format: OutputFormat) -> CliResult<i32> {
    let message = InputMessage::configure_datum(args.index, args.permanent)
        .map_err(|err| message_error("invalid datum", err))?;
    run_command(&args.device, &message, DEFAULT_ACK_LOOKAHEAD, format)
}
