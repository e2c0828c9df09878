use std::str::FromStr;

use crate::dogstatsd::constants::FIELD_SEPARATOR;
use crate::dogstatsd::errors::ParseError;
use crate::dogstatsd::fields;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// Determine what kind/type of a metric has come in
pub enum Type {
    /// Dogstatsd 'count' metric type, monotonically increasing counter
    Count,
    /// Dogstatsd 'gauge' metric type, point-in-time value
    Gauge,
    /// Dogstatsd 'set' metric type, counts unique values
    Set,
    /// Dogstatsd 'histogram' metric type, aggregated agent side
    Histogram,
    /// Dogstatsd 'timer' metric type, a histogram of durations
    Timer,
    /// Dogstatsd 'distribution' metric type, aggregated server side
    Distribution,
}

impl FromStr for Type {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Type::Count),
            "g" => Ok(Type::Gauge),
            "s" => Ok(Type::Set),
            "h" => Ok(Type::Histogram),
            "ms" => Ok(Type::Timer),
            "d" => Ok(Type::Distribution),
            _ => Err(ParseError::Raw("Unsupported metric type")),
        }
    }
}

impl Type {
    /// Whether values of this type must be numbers. Set members are opaque
    /// strings.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        !matches!(self, Type::Set)
    }
}

/// Representation of a dogstatsd Metric
///
/// Borrows from the datagram it was parsed from, nothing is copied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metric<'a> {
    /// Name of the metric, never empty.
    name: &'a str,
    /// What kind/type of metric this is.
    kind: Type,
    /// Values of the metric. A single message may encode multiple values,
    /// separated by ':'. There is always at least one value and, for numeric
    /// types, every value is a finite float.
    ///
    /// Set values are kept whole, a set member may itself contain ':'.
    values: &'a str,
    sample_rate: Option<f64>,
    /// Tags of the metric, as sent. That is `a:1,b:2` is a different tagset
    /// from `b:2,a:1`.
    tags: Option<&'a str>,
    container_id: Option<&'a str>,
    timestamp: Option<u64>,
}

impl<'a> Metric<'a> {
    /// Parse a metric from given input.
    ///
    /// This function parses a passed `&str` into a `Metric`. We assume that
    /// DogStatsD metrics must be utf8 and are not ascii or some other encoding.
    ///
    /// # Errors
    ///
    /// This function will return with an error if any required section is
    /// missing or empty, a value does not match its declared type, or an
    /// optional section is malformed, unknown or repeated.
    /// example aj-test.increment:1|c|#user:aj-test
    pub fn parse(input: &'a str) -> Result<Metric<'a>, ParseError> {
        let mut sections = input.split(FIELD_SEPARATOR);

        let nv_section = sections
            .next()
            .ok_or(ParseError::Raw("Missing metric name and value"))?;

        let (name, values) = nv_section
            .split_once(':')
            .ok_or(ParseError::Raw("Missing name, value section"))?;
        if name.is_empty() {
            return Err(ParseError::Raw("Empty metric name"));
        }

        let kind = sections
            .next()
            .ok_or(ParseError::Raw("Missing metric type"))?
            .parse::<Type>()?;
        validate_values(kind, values)?;

        let mut sample_rate = None;
        let mut tags = None;
        let mut container_id = None;
        let mut timestamp = None;
        for section in sections {
            if let Some(rate) = section.strip_prefix('@') {
                fields::set_once(&mut sample_rate, parse_sample_rate(rate)?)?;
            } else if let Some(tags_section) = section.strip_prefix('#') {
                fields::set_once(&mut tags, fields::parse_tags(tags_section)?)?;
            } else if let Some(id) = section.strip_prefix("c:") {
                fields::set_once(
                    &mut container_id,
                    fields::parse_non_empty(id, "Empty container id")?,
                )?;
            } else if let Some(ts) = section.strip_prefix('T') {
                fields::set_once(&mut timestamp, fields::parse_timestamp(ts)?)?;
            } else if section.is_empty() {
                return Err(ParseError::Raw("Empty metric field"));
            } else {
                return Err(ParseError::Raw("Unknown metric field"));
            }
        }

        Ok(Metric {
            name,
            kind,
            values,
            sample_rate,
            tags,
            container_id,
            timestamp,
        })
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[must_use]
    pub fn kind(&self) -> Type {
        self.kind
    }

    /// Return an iterator over values. Only meaningful for numeric types.
    pub fn values(&self) -> impl Iterator<Item = Result<f64, std::num::ParseFloatError>> + 'a {
        self.values.split(':').map(str::parse::<f64>)
    }

    pub fn first_value(&self) -> Result<f64, ParseError> {
        match self.values().next() {
            Some(Ok(v)) => Ok(v),
            Some(Err(_e)) => Err(ParseError::Raw("Failed to parse value as float")),
            None => Err(ParseError::Raw("No value")),
        }
    }

    #[must_use]
    pub fn raw_values(&self) -> &'a str {
        self.values
    }

    #[must_use]
    pub fn sample_rate(&self) -> Option<f64> {
        self.sample_rate
    }

    pub fn tags(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> {
        self.tags.into_iter().flat_map(|tagset| fields::tags(tagset))
    }

    #[must_use]
    pub fn raw_tagset(&self) -> Option<&'a str> {
        self.tags
    }

    #[must_use]
    pub fn container_id(&self) -> Option<&'a str> {
        self.container_id
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }
}

fn validate_values(kind: Type, values: &str) -> Result<(), ParseError> {
    if values.is_empty() {
        return Err(ParseError::Raw("Missing metric value"));
    }
    if !kind.is_numeric() {
        return Ok(());
    }
    for value in values.split(':') {
        // `f64::from_str` also takes "inf" and "NaN", no client sends those.
        match value.parse::<f64>() {
            Ok(v) if v.is_finite() => {}
            Ok(_) => return Err(ParseError::Raw("Non-finite metric value")),
            Err(_) => return Err(ParseError::Raw("Failed to parse value as float")),
        }
    }
    Ok(())
}

fn parse_sample_rate(rate: &str) -> Result<f64, ParseError> {
    match rate.parse::<f64>() {
        Ok(r) if (0.0..=1.0).contains(&r) => Ok(r),
        Ok(_) => Err(ParseError::Raw("Sample rate out of range")),
        Err(_) => Err(ParseError::Raw("Failed to parse sample rate")),
    }
}

// <METRIC_NAME>:<VALUE>:<VALUE>:<VALUE>|<TYPE>|@<SAMPLE_RATE>|#<TAG_KEY_1>:<TAG_VALUE_1>,<TAG_2>|c:<CONTAINER_ID>|T<TIMESTAMP>
//
// Types:
//  * c -- COUNT, allows packed values
//  * g -- GAUGE, allows packed values, may be signed
//  * s -- SET, single opaque value
//  * h, ms, d -- HISTOGRAM, TIMER, DISTRIBUTION, allow packed values
