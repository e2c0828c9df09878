use std::str::FromStr;

use crate::dogstatsd::constants::{EVENT_PREFIX, FIELD_SEPARATOR};
use crate::dogstatsd::errors::ParseError;
use crate::dogstatsd::fields;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Priority {
    #[default]
    Normal,
    Low,
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            _ => Err(ParseError::Raw("Invalid event priority")),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum AlertType {
    Error,
    Warning,
    #[default]
    Info,
    Success,
}

impl FromStr for AlertType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(AlertType::Error),
            "warning" => Ok(AlertType::Warning),
            "info" => Ok(AlertType::Info),
            "success" => Ok(AlertType::Success),
            _ => Err(ParseError::Raw("Invalid event alert type")),
        }
    }
}

/// A dogstatsd event, `_e{<TITLE_LEN>,<TEXT_LEN>}:<TITLE>|<TEXT>|...`
///
/// Lengths are in bytes. The text is kept escaped, a `\n` in the text is the
/// two characters `\` and `n` on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Event<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub timestamp: Option<u64>,
    pub hostname: Option<&'a str>,
    pub aggregation_key: Option<&'a str>,
    pub priority: Option<Priority>,
    pub source_type: Option<&'a str>,
    pub alert_type: Option<AlertType>,
    pub tags: Option<&'a str>,
    pub container_id: Option<&'a str>,
}

impl<'a> Event<'a> {
    /// Parse an event from a single line.
    ///
    /// # Errors
    ///
    /// Fails when the header is malformed, when the declared lengths do not
    /// match the title and text, or when an optional field is invalid.
    pub fn parse(input: &'a str) -> Result<Event<'a>, ParseError> {
        let rest = input
            .strip_prefix(EVENT_PREFIX)
            .ok_or(ParseError::Raw("Missing event header"))?;
        let (lengths, rest) = rest
            .split_once("}:")
            .ok_or(ParseError::Raw("Malformed event header"))?;
        let (title_len, text_len) = lengths
            .split_once(',')
            .ok_or(ParseError::Raw("Malformed event header"))?;
        let title_len = parse_length(title_len)?;
        let text_len = parse_length(text_len)?;
        if title_len == 0 {
            return Err(ParseError::Raw("Empty event title"));
        }

        // `get` refuses ranges that are out of bounds or split a character.
        let title = rest
            .get(..title_len)
            .ok_or(ParseError::Raw("Event title shorter than declared"))?;
        let rest = rest
            .get(title_len..)
            .and_then(|r| r.strip_prefix(FIELD_SEPARATOR))
            .ok_or(ParseError::Raw("Event title length mismatch"))?;
        let text = rest
            .get(..text_len)
            .ok_or(ParseError::Raw("Event text shorter than declared"))?;
        let rest = rest
            .get(text_len..)
            .ok_or(ParseError::Raw("Event text length mismatch"))?;

        let mut event = Event {
            title,
            text,
            timestamp: None,
            hostname: None,
            aggregation_key: None,
            priority: None,
            source_type: None,
            alert_type: None,
            tags: None,
            container_id: None,
        };
        if rest.is_empty() {
            return Ok(event);
        }
        let rest = rest
            .strip_prefix(FIELD_SEPARATOR)
            .ok_or(ParseError::Raw("Event text length mismatch"))?;
        for field in rest.split(FIELD_SEPARATOR) {
            event.parse_field(field)?;
        }
        Ok(event)
    }

    fn parse_field(&mut self, field: &'a str) -> Result<(), ParseError> {
        if let Some(ts) = field.strip_prefix("d:") {
            fields::set_once(&mut self.timestamp, fields::parse_timestamp(ts)?)
        } else if let Some(host) = field.strip_prefix("h:") {
            fields::set_once(
                &mut self.hostname,
                fields::parse_non_empty(host, "Empty event hostname")?,
            )
        } else if let Some(key) = field.strip_prefix("k:") {
            fields::set_once(
                &mut self.aggregation_key,
                fields::parse_non_empty(key, "Empty event aggregation key")?,
            )
        } else if let Some(priority) = field.strip_prefix("p:") {
            fields::set_once(&mut self.priority, priority.parse()?)
        } else if let Some(source) = field.strip_prefix("s:") {
            fields::set_once(
                &mut self.source_type,
                fields::parse_non_empty(source, "Empty event source type")?,
            )
        } else if let Some(alert) = field.strip_prefix("t:") {
            fields::set_once(&mut self.alert_type, alert.parse()?)
        } else if let Some(tags) = field.strip_prefix('#') {
            fields::set_once(&mut self.tags, fields::parse_tags(tags)?)
        } else if let Some(id) = field.strip_prefix("c:") {
            fields::set_once(
                &mut self.container_id,
                fields::parse_non_empty(id, "Empty container id")?,
            )
        } else if field.is_empty() {
            Err(ParseError::Raw("Empty event field"))
        } else {
            Err(ParseError::Raw("Unknown event field"))
        }
    }
}

fn parse_length(len: &str) -> Result<usize, ParseError> {
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::Raw("Invalid event length"));
    }
    len.parse::<usize>()
        .map_err(|_| ParseError::Raw("Invalid event length"))
}
