//! Compact duration notation used by query parameters and configuration
//!
//! Stations and dashboards express ages as a digit string with an optional
//! single-letter unit suffix: `"7200"` (seconds), `"120M"` (minutes),
//! `"2h"` (hours), `"7d"` (days), `"1y"` (365-day years).

use thiserror::Error;

/// Seconds in one minute
const MINUTE: u64 = 60;
/// Seconds in one hour
const HOUR: u64 = 3600;
/// Seconds in one day
const DAY: u64 = 86_400;
/// Seconds in one 365-day year. Fixed calendar approximation, leap years
/// are deliberately not accounted for.
const YEAR: u64 = 31_536_000;

/// Errors from [`parse_duration`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("unrecognized duration unit '{0}' (expected M, h, d, or y)")]
    UnknownUnit(char),

    #[error("invalid duration digits in '{0}'")]
    BadDigits(String),
}

/// Parse compact duration notation into a second count.
///
/// A string of only digits is seconds directly. Digits followed by exactly
/// one of `M`, `h`, `d`, or `y` mean minutes, hours, days, or 365-day years.
/// The unit letter is case-sensitive: `M` is minutes and no other case is
/// accepted, avoiding the `m`-for-month ambiguity. Anything else fails.
pub fn parse_duration(text: &str) -> Result<u64, DurationError> {
    if text.is_empty() {
        return Err(DurationError::Empty);
    }

    let (digits, multiplier) = match text.chars().last() {
        Some(c) if c.is_ascii_digit() => (text, 1),
        Some('M') => (&text[..text.len() - 1], MINUTE),
        Some('h') => (&text[..text.len() - 1], HOUR),
        Some('d') => (&text[..text.len() - 1], DAY),
        Some('y') => (&text[..text.len() - 1], YEAR),
        Some(c) => return Err(DurationError::UnknownUnit(c)),
        None => return Err(DurationError::Empty),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationError::BadDigits(text.to_string()));
    }

    let count: u64 = digits
        .parse()
        .map_err(|_| DurationError::BadDigits(text.to_string()))?;

    count
        .checked_mul(multiplier)
        .ok_or_else(|| DurationError::BadDigits(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_seconds() {
        assert_eq!(parse_duration("7200"), Ok(7200));
        assert_eq!(parse_duration("0"), Ok(0));
    }

    #[test]
    fn unit_suffixes() {
        assert_eq!(parse_duration("120M"), Ok(7200));
        assert_eq!(parse_duration("2h"), Ok(7200));
        assert_eq!(parse_duration("7d"), Ok(604_800));
        assert_eq!(parse_duration("1y"), Ok(31_536_000));
    }

    #[test]
    fn unknown_unit_rejected() {
        assert_eq!(parse_duration("90b"), Err(DurationError::UnknownUnit('b')));
        // Lowercase minutes alias is deliberately not defined
        assert_eq!(parse_duration("5m"), Err(DurationError::UnknownUnit('m')));
        assert_eq!(parse_duration("5H"), Err(DurationError::UnknownUnit('H')));
    }

    #[test]
    fn malformed_digits_rejected() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(
            parse_duration("h"),
            Err(DurationError::BadDigits("h".to_string()))
        );
        assert_eq!(
            parse_duration("1x2d"),
            Err(DurationError::BadDigits("1x2d".to_string()))
        );
        assert_eq!(
            parse_duration("-5d"),
            Err(DurationError::BadDigits("-5d".to_string()))
        );
    }

    #[test]
    fn overflow_rejected() {
        assert!(parse_duration("99999999999999999999y").is_err());
    }
}
