use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use skytraq_receiver::{Message, Receiver, ReceiverConfig, ReceiverError};
use skytraq_transport::Transport;
use tracing::{info, warn};

use crate::cmd::WatchArgs;
use crate::exit::{receiver_error, CliError, CliResult, SUCCESS, TIMEOUT};
use crate::output::{print_message, OutputFormat};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let mut receiver = args.device.open(ReceiverConfig {
        skip_nmea: !args.nmea,
        ..ReceiverConfig::default()
    })?;

    let stop = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(stop.clone())?;

    let limits = WatchLimits {
        count: args.count,
        max_idle: args.max_idle,
    };
    watch_loop(&mut receiver, &stop, limits, |message| {
        print_message(message, format)
    })
}

#[derive(Debug, Clone, Copy, Default)]
struct WatchLimits {
    count: Option<usize>,
    max_idle: Option<usize>,
}

/// Hand every message to `emit` until `stop` is raised.
///
/// Each time the receiver stalls past the line framer's bound counts as one
/// idle period and listening starts over. With `max_idle` set, that many
/// idle periods in a row end the loop with a timeout.
fn watch_loop<T, F>(
    receiver: &mut Receiver<T>,
    stop: &Arc<AtomicBool>,
    limits: WatchLimits,
    mut emit: F,
) -> CliResult<i32>
where
    T: Transport,
    F: FnMut(&Message),
{
    let mut printed = 0usize;
    let mut idle = 0usize;

    while !stop.load(Ordering::SeqCst) {
        for item in receiver.watch(stop.clone()) {
            match item {
                Ok(message) => {
                    idle = 0;
                    emit(&message);
                    printed = printed.saturating_add(1);
                    if limits.count.is_some_and(|count| printed >= count) {
                        return Ok(SUCCESS);
                    }
                }
                Err(ReceiverError::Message(err)) => {
                    idle = 0;
                    warn!(error = %err, "skipping message");
                }
                Err(err) if err.is_timeout() => {
                    idle += 1;
                    if limits.max_idle.is_some_and(|max| idle >= max) {
                        return Err(CliError::new(
                            TIMEOUT,
                            format!("receiver silent for {idle} idle periods"),
                        ));
                    }
                    info!(idle, "receiver went quiet, listening again");
                }
                Err(err) => return Err(receiver_error("receive failed", err)),
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(stop: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use skytraq_transport::MemoryStream;

    use super::*;

    const UPDATE_RATE_5: [u8; 9] = [0xA0, 0xA1, 0x00, 0x02, 0x86, 0x05, 0x83, 0x0D, 0x0A];

    fn collect(
        stream: MemoryStream,
        limits: WatchLimits,
        stop: &Arc<AtomicBool>,
    ) -> (CliResult<i32>, Vec<String>) {
        let mut receiver = Receiver::new(stream);
        let mut seen = Vec::new();
        let result = watch_loop(&mut receiver, stop, limits, |message| {
            seen.push(message.to_string())
        });
        (result, seen)
    }

    #[test]
    fn silent_receiver_times_out_after_max_idle() {
        let limits = WatchLimits {
            count: None,
            max_idle: Some(2),
        };
        let stop = Arc::new(AtomicBool::new(false));
        let (result, seen) = collect(MemoryStream::new(), limits, &stop);

        assert_eq!(result.unwrap_err().code, TIMEOUT);
        assert!(seen.is_empty());
    }

    #[test]
    fn messages_reset_the_idle_count() {
        let stream = MemoryStream::new()
            .with_data(UPDATE_RATE_5.to_vec())
            .with_timeout()
            .with_timeout()
            .with_data(UPDATE_RATE_5.to_vec());
        let limits = WatchLimits {
            count: None,
            max_idle: Some(2),
        };
        let stop = Arc::new(AtomicBool::new(false));
        let (result, seen) = collect(stream, limits, &stop);

        assert_eq!(result.unwrap_err().code, TIMEOUT);
        assert_eq!(seen, vec!["GPS update rate is 5 Hz"; 2]);
    }

    #[test]
    fn count_ends_the_loop() {
        let stream = MemoryStream::new()
            .with_data(UPDATE_RATE_5.to_vec())
            .with_data(UPDATE_RATE_5.to_vec());
        let limits = WatchLimits {
            count: Some(1),
            max_idle: None,
        };
        let stop = Arc::new(AtomicBool::new(false));
        let (result, seen) = collect(stream, limits, &stop);

        assert_eq!(result.unwrap(), SUCCESS);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn raised_stop_ends_cleanly() {
        let stop = Arc::new(AtomicBool::new(true));
        let (result, seen) = collect(MemoryStream::new(), WatchLimits::default(), &stop);

        assert_eq!(result.unwrap(), SUCCESS);
        assert!(seen.is_empty());
    }
}
