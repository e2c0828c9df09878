use std::str::FromStr;

use crate::dogstatsd::constants::{FIELD_SEPARATOR, SERVICE_CHECK_PREFIX};
use crate::dogstatsd::errors::ParseError;
use crate::dogstatsd::fields;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl FromStr for Status {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Status::Ok),
            "1" => Ok(Status::Warning),
            "2" => Ok(Status::Critical),
            "3" => Ok(Status::Unknown),
            _ => Err(ParseError::Raw("Invalid service check status")),
        }
    }
}

/// A dogstatsd service check, `_sc|<NAME>|<STATUS>|...|m:<MESSAGE>`
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ServiceCheck<'a> {
    pub name: &'a str,
    pub status: Status,
    pub timestamp: Option<u64>,
    pub hostname: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub container_id: Option<&'a str>,
    /// Always the last field, it runs to the end of the line and may
    /// contain '|'.
    pub message: Option<&'a str>,
}

impl<'a> ServiceCheck<'a> {
    /// Parse a service check from a single line.
    ///
    /// # Errors
    ///
    /// Fails on an empty name, an unknown status or an invalid optional field.
    pub fn parse(input: &'a str) -> Result<ServiceCheck<'a>, ParseError> {
        let rest = input
            .strip_prefix(SERVICE_CHECK_PREFIX)
            .ok_or(ParseError::Raw("Missing service check header"))?;
        let (rest, message) = match rest.split_once("|m:") {
            Some((rest, message)) => (rest, Some(message)),
            None => (rest, None),
        };

        let mut sections = rest.split(FIELD_SEPARATOR);
        let name = fields::parse_non_empty(
            sections.next().unwrap_or_default(),
            "Empty service check name",
        )?;
        let status = sections
            .next()
            .ok_or(ParseError::Raw("Missing service check status"))?
            .parse::<Status>()?;

        let mut check = ServiceCheck {
            name,
            status,
            timestamp: None,
            hostname: None,
            tags: None,
            container_id: None,
            message,
        };
        for field in sections {
            check.parse_field(field)?;
        }
        Ok(check)
    }

    fn parse_field(&mut self, field: &'a str) -> Result<(), ParseError> {
        if let Some(ts) = field.strip_prefix("d:") {
            fields::set_once(&mut self.timestamp, fields::parse_timestamp(ts)?)
        } else if let Some(host) = field.strip_prefix("h:") {
            fields::set_once(
                &mut self.hostname,
                fields::parse_non_empty(host, "Empty service check hostname")?,
            )
        } else if let Some(tags) = field.strip_prefix('#') {
            fields::set_once(&mut self.tags, fields::parse_tags(tags)?)
        } else if let Some(id) = field.strip_prefix("c:") {
            fields::set_once(
                &mut self.container_id,
                fields::parse_non_empty(id, "Empty container id")?,
            )
        } else if field.is_empty() {
            Err(ParseError::Raw("Empty service check field"))
        } else {
            Err(ParseError::Raw("Unknown service check field"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_service_check() {
        let check =
            ServiceCheck::parse("_sc|application.service_check|0").expect("valid service check");
        assert_eq!(check.name, "application.service_check");
        assert_eq!(check.status, Status::Ok);
        assert_eq!(check.message, None);
    }

    #[test]
    fn parse_service_check_with_all_fields() {
        let check = ServiceCheck::parse(
            "_sc|db.up|2|d:1656581400|h:db-1|#env:dev|c:abc|m:connection refused | retrying",
        )
        .expect("valid service check");
        assert_eq!(check.status, Status::Critical);
        assert_eq!(check.timestamp, Some(1_656_581_400));
        assert_eq!(check.hostname, Some("db-1"));
        assert_eq!(check.tags, Some("env:dev"));
        assert_eq!(check.container_id, Some("abc"));
        assert_eq!(check.message, Some("connection refused | retrying"));
    }

    #[test]
    fn parse_service_check_empty_message() {
        let check = ServiceCheck::parse("_sc|db.up|3|m:").expect("valid service check");
        assert_eq!(check.status, Status::Unknown);
        assert_eq!(check.message, Some(""));
    }

    #[test]
    fn parse_invalid_service_checks() {
        let cases = [
            ("_sc||0", "Empty service check name"),
            ("_sc|", "Empty service check name"),
            ("_sc|db.up", "Missing service check status"),
            ("_sc|db.up|", "Invalid service check status"),
            ("_sc|db.up|4", "Invalid service check status"),
            ("_sc|db.up|OK", "Invalid service check status"),
            ("_sc|db.up|0|", "Empty service check field"),
            ("_sc|db.up|0|h:", "Empty service check hostname"),
            ("_sc|db.up|0|d:soon", "Invalid timestamp"),
            ("_sc|db.up|0|#a,,b", "Empty tag"),
            ("_sc|db.up|0|p:low", "Unknown service check field"),
            ("_sc|db.up|0|h:a|h:b", "Duplicate field"),
        ];
        for (input, reason) in cases {
            assert_eq!(
                ServiceCheck::parse(input).expect_err(input),
                ParseError::Raw(reason),
                "{input}"
            );
        }
    }
}
