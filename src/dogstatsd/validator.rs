use tracing::{debug, info, warn};

use crate::dogstatsd::constants::MESSAGE_SEPARATOR;
use crate::dogstatsd::dogstatsd::Datagram;
use crate::dogstatsd::errors::ParseError;
use crate::dogstatsd::message::Message;

/// Classification of one datagram.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    /// Every line parsed. Counts are per message kind.
    Valid {
        metrics: usize,
        events: usize,
        service_checks: usize,
    },
    /// `line` is the 1-based number of the first line that failed.
    Invalid { line: usize, reason: ParseError },
}

impl Outcome {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid { .. })
    }
}

/// Validate a whole datagram.
///
/// A datagram holds one or more newline separated messages, all of which must
/// be valid. Empty lines, like the trailing newline most clients append, are
/// skipped, but at least one message has to be present. No state is kept
/// between calls.
#[must_use]
pub fn validate(payload: &[u8]) -> Outcome {
    let text = match std::str::from_utf8(payload) {
        Ok(text) => text,
        Err(e) => {
            let line = payload[..e.valid_up_to()]
                .iter()
                .filter(|b| **b == b'\n')
                .count()
                + 1;
            return Outcome::Invalid {
                line,
                reason: ParseError::Raw("Payload is not valid utf8"),
            };
        }
    };

    let mut metrics = 0;
    let mut events = 0;
    let mut service_checks = 0;
    for (i, line) in text.split(MESSAGE_SEPARATOR).enumerate() {
        if line.is_empty() {
            continue;
        }
        match Message::parse(line) {
            Ok(Message::Metric(_)) => metrics += 1,
            Ok(Message::Event(_)) => events += 1,
            Ok(Message::ServiceCheck(_)) => service_checks += 1,
            Err(reason) => return Outcome::Invalid { line: i + 1, reason },
        }
    }

    if metrics + events + service_checks == 0 {
        return Outcome::Invalid {
            line: 1,
            reason: ParseError::Raw("Empty payload"),
        };
    }
    Outcome::Valid {
        metrics,
        events,
        service_checks,
    }
}

/// Validate a received datagram. One cut short by the receive buffer is
/// invalid whatever its prefix holds, the reported line is the one the cut
/// falls on.
#[must_use]
pub fn validate_datagram(datagram: &Datagram) -> Outcome {
    if datagram.truncated {
        let line = datagram.payload.iter().filter(|b| **b == b'\n').count() + 1;
        return Outcome::Invalid {
            line,
            reason: ParseError::Raw("Datagram exceeds buffer size"),
        };
    }
    validate(&datagram.payload)
}

/// Destination of the one diagnostic emitted per datagram.
pub trait Reporter: Send + Sync {
    fn report(&self, datagram: &Datagram, outcome: &Outcome);
}

/// Reports through `tracing`. Invalid datagrams are logged as warnings
/// carrying the `Invalid event` marker, valid ones stay below the default
/// level unless `log_received` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter {
    log_received: bool,
}

impl LogReporter {
    #[must_use]
    pub fn new(log_received: bool) -> Self {
        LogReporter { log_received }
    }
}

impl Reporter for LogReporter {
    fn report(&self, datagram: &Datagram, outcome: &Outcome) {
        // Debug formatting escapes newlines, one datagram stays one log line.
        let payload = String::from_utf8_lossy(&datagram.payload);
        match outcome {
            Outcome::Invalid { line, reason } => {
                warn!(
                    "DOGSTATSD | Invalid event from {}: {reason} (line {line}), payload: {payload:?}",
                    datagram.source
                );
            }
            Outcome::Valid {
                metrics,
                events,
                service_checks,
            } => {
                if self.log_received {
                    info!(
                        "DOGSTATSD | received message: {payload:?} from {} ({metrics} metrics, {events} events, {service_checks} service checks)",
                        datagram.source
                    );
                } else {
                    debug!(
                        "DOGSTATSD | received message: {payload:?} from {}",
                        datagram.source
                    );
                }
            }
        }
    }
}
