use crate::dogstatsd::constants::{EVENT_PREFIX, SERVICE_CHECK_PREFIX};
use crate::dogstatsd::errors::ParseError;
use crate::dogstatsd::event::Event;
use crate::dogstatsd::metric::Metric;
use crate::dogstatsd::service_check::ServiceCheck;

/// One line of a dogstatsd datagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message<'a> {
    Metric(Metric<'a>),
    Event(Event<'a>),
    ServiceCheck(ServiceCheck<'a>),
}

impl<'a> Message<'a> {
    /// Parse a single line, picking the shape from its prefix. Anything that
    /// is neither an event nor a service check has to be a metric.
    pub fn parse(line: &'a str) -> Result<Message<'a>, ParseError> {
        if line.starts_with(EVENT_PREFIX) {
            Event::parse(line).map(Message::Event)
        } else if line.starts_with(SERVICE_CHECK_PREFIX) {
            ServiceCheck::parse(line).map(Message::ServiceCheck)
        } else {
            Metric::parse(line).map(Message::Metric)
        }
    }
}
