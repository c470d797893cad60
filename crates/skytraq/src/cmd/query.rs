use skytraq_message::{ids, InputMessage};
use skytraq_receiver::{Message, Receiver, ReceiverConfig, ReceiverError, PROBE_SOFTWARE_TYPE};
use skytraq_transport::Transport;
use tracing::{info, warn};

use crate::cmd::QueryArgs;
use crate::exit::{message_error, receiver_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_queries, OutputFormat, QueryOutput};

pub fn run(args: QueryArgs, format: OutputFormat) -> CliResult<i32> {
    let mut receiver = args.device.open(ReceiverConfig {
        ack_lookahead: args.lookahead,
        skip_nmea: true,
        ..ReceiverConfig::default()
    })?;

    let results = run_queries(&mut receiver, &status_queries()?, args.responses)?;
    print_queries(&results, format);

    if results.iter().all(|result| result.status == "ok") {
        Ok(SUCCESS)
    } else {
        Ok(FAILURE)
    }
}

/// Every query the receiver answers, paired with the id of its response.
fn status_queries() -> CliResult<Vec<(InputMessage, u8)>> {
    let software = |build: fn(u8) -> skytraq_message::Result<InputMessage>| {
        build(PROBE_SOFTWARE_TYPE).map_err(|err| message_error("query", err))
    };
    Ok(vec![
        (
            software(InputMessage::query_software_version)?,
            ids::SOFTWARE_VERSION,
        ),
        (software(InputMessage::query_software_crc)?, ids::SOFTWARE_CRC),
        (
            InputMessage::query_position_update_rate(),
            ids::POSITION_UPDATE_RATE,
        ),
        (InputMessage::query_datum(), ids::GPS_DATUM),
        (InputMessage::query_waas_status(), ids::WAAS_STATUS),
        (
            InputMessage::query_position_pinning(),
            ids::POSITION_PINNING_STATUS,
        ),
        (InputMessage::query_navigation_mode(), ids::NAVIGATION_MODE),
        (InputMessage::query_pps_mode(), ids::PPS_MODE),
    ])
}

/// Send each query in turn. A NACK or a missing answer is recorded and the
/// next query sent; a failing transport aborts.
fn run_queries<T: Transport>(
    receiver: &mut Receiver<T>,
    queries: &[(InputMessage, u8)],
    responses: usize,
) -> CliResult<Vec<QueryOutput>> {
    let mut results = Vec::with_capacity(queries.len());

    for (query, response_id) in queries {
        let mut result = QueryOutput {
            id: query.id(),
            name: query.name(),
            status: String::from("ok"),
            responses: Vec::new(),
        };

        match receiver.command(query) {
            Ok(_) => match await_response(receiver, *response_id, responses) {
                Ok(Some(message)) => result.responses.push(message.to_string()),
                Ok(None) => result.status = String::from("no response"),
                Err(err) => return Err(receiver_error("query failed", err)),
            },
            Err(err) if err.is_unanswered() => {
                warn!(id = query.id(), error = %err, "query unanswered");
                result.status = if err.is_rejected() {
                    String::from("rejected")
                } else {
                    String::from("no ack")
                };
            }
            Err(err) => return Err(receiver_error("query failed", err)),
        }

        info!(id = query.id(), status = %result.status, "query finished");
        results.push(result);
    }

    Ok(results)
}

fn await_response<T: Transport>(
    receiver: &mut Receiver<T>,
    id: u8,
    limit: usize,
) -> Result<Option<Message>, ReceiverError> {
    for item in receiver.messages().take(limit) {
        match item {
            Ok(message) if message.id() == Some(id) => return Ok(Some(message)),
            Ok(_) | Err(ReceiverError::Message(_)) => {}
            Err(err) if err.is_timeout() => return Ok(None),
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}
