//! Parsers for the optional `|`-separated fields shared by metrics, events
//! and service checks.

use crate::dogstatsd::constants::TAG_SEPARATOR;
use crate::dogstatsd::errors::ParseError;

/// Validate a tag section, the text following `#`.
///
/// Tags are either `key:value` or bare strings. Their order is kept as sent,
/// `a:1,b:2` and `b:2,a:1` are both valid and are not normalized here.
pub fn parse_tags(section: &str) -> Result<&str, ParseError> {
    if section.is_empty() {
        return Err(ParseError::Raw("Empty tag section"));
    }
    for tag in section.split(TAG_SEPARATOR) {
        if tag.is_empty() {
            return Err(ParseError::Raw("Empty tag"));
        }
        if tag.starts_with(':') {
            return Err(ParseError::Raw("Tag with empty key"));
        }
    }
    Ok(section)
}

/// Iterate over the tags of a section previously accepted by [`parse_tags`].
pub fn tags(section: &str) -> impl Iterator<Item = (&str, Option<&str>)> {
    section.split(TAG_SEPARATOR).map(|tag| match tag.split_once(':') {
        Some((key, value)) => (key, Some(value)),
        None => (tag, None),
    })
}

/// Unix timestamp in seconds, as carried by `T`, and `d:` fields.
pub fn parse_timestamp(value: &str) -> Result<u64, ParseError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::Raw("Invalid timestamp"));
    }
    value
        .parse::<u64>()
        .map_err(|_| ParseError::Raw("Invalid timestamp"))
}

pub fn parse_non_empty<'a>(value: &'a str, err: &'static str) -> Result<&'a str, ParseError> {
    if value.is_empty() {
        Err(ParseError::Raw(err))
    } else {
        Ok(value)
    }
}

/// Store `value` in `slot`, refusing a second occurrence of the same field.
pub fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::Raw("Duplicate field"));
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_accepts_pairs_and_bare_tags() {
        assert_eq!(parse_tags("environment:dev"), Ok("environment:dev"));
        assert_eq!(parse_tags("a:1,b,c:3"), Ok("a:1,b,c:3"));
        // Only the first ':' separates key and value.
        assert_eq!(parse_tags("url:http://x"), Ok("url:http://x"));
        assert_eq!(parse_tags("empty_value:"), Ok("empty_value:"));
    }

    #[test]
    fn parse_tags_rejects_empty_tags() {
        assert_eq!(parse_tags(""), Err(ParseError::Raw("Empty tag section")));
        assert_eq!(parse_tags("a:1,,b:2"), Err(ParseError::Raw("Empty tag")));
        assert_eq!(parse_tags("a:1,"), Err(ParseError::Raw("Empty tag")));
        assert_eq!(parse_tags(":dev"), Err(ParseError::Raw("Tag with empty key")));
    }

    #[test]
    fn tags_keep_sent_order() {
        let parsed: Vec<_> = tags("b:2,a,c:3").collect();
        assert_eq!(parsed, vec![("b", Some("2")), ("a", None), ("c", Some("3"))]);
    }

    #[test]
    fn timestamps_are_unsigned_integers() {
        assert_eq!(parse_timestamp("1656581400"), Ok(1_656_581_400));
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("-1").is_err());
        assert!(parse_timestamp("+1").is_err());
        assert!(parse_timestamp("1.5").is_err());
        assert!(parse_timestamp("99999999999999999999999").is_err());
    }

    #[test]
    fn set_once_refuses_duplicates() {
        let mut slot = None;
        assert!(set_once(&mut slot, 1).is_ok());
        assert_eq!(set_once(&mut slot, 2), Err(ParseError::Raw("Duplicate field")));
        assert_eq!(slot, Some(1));
    }
}
