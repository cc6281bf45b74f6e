//! Registration payload validation
//!
//! Pure sanitation layer: checks required fields and value-range sanity,
//! strips double quotes, and produces a [`StationRecord`] skeleton. Never
//! touches the store and never has side effects. Length limits are the
//! store's concern, not this layer's.

use thiserror::Error;

use crate::station::{RawRegistration, StationRecord};

/// Latitude must fall in this range, inclusive
const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Longitude must fall in this range, inclusive
const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A rejected registration, with the reason reported verbatim to the caller
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationFailure {
    /// Wording is part of the v1 wire contract
    #[error("Missing parameter station_url")]
    MissingStationUrl,

    #[error("Bad parameter {field}: {value}")]
    BadNumber { field: &'static str, value: String },

    #[error("Parameter {field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Validate a raw payload into a record skeleton.
///
/// `last_addr` and `last_seen` are stamped by the admission gate, not here,
/// so the returned record carries placeholder values for both. Rejection is
/// wholesale: an out-of-range coordinate fails the entire registration.
pub fn validate(raw: &RawRegistration) -> Result<StationRecord, ValidationFailure> {
    let station_url = raw
        .station_url
        .as_deref()
        .map(strip_quotes)
        .filter(|url| !url.is_empty())
        .ok_or(ValidationFailure::MissingStationUrl)?;

    let latitude = parse_coordinate(raw.latitude.as_deref(), "latitude", LATITUDE_RANGE)?;
    let longitude = parse_coordinate(raw.longitude.as_deref(), "longitude", LONGITUDE_RANGE)?;

    Ok(StationRecord {
        station_url,
        description: sanitize(raw.description.as_deref()),
        latitude,
        longitude,
        station_type: sanitize(raw.station_type.as_deref()),
        station_model: sanitize(raw.station_model.as_deref()),
        weewx_info: sanitize(raw.weewx_info.as_deref()),
        python_info: sanitize(raw.python_info.as_deref()),
        platform_info: sanitize(raw.platform_info.as_deref()),
        config_path: sanitize(raw.config_path.as_deref()),
        entry_path: sanitize(raw.entry_path.as_deref()),
        last_addr: String::new(),
        last_seen: 0,
    })
}

fn strip_quotes(s: &str) -> String {
    s.replace('"', "")
}

fn sanitize(s: Option<&str>) -> Option<String> {
    s.map(strip_quotes)
}

fn parse_coordinate(
    value: Option<&str>,
    field: &'static str,
    range: (f64, f64),
) -> Result<Option<f64>, ValidationFailure> {
    let Some(text) = value else {
        return Ok(None);
    };
    let parsed: f64 = text.trim().parse().map_err(|_| ValidationFailure::BadNumber {
        field,
        value: text.to_string(),
    })?;
    if !parsed.is_finite() || parsed < range.0 || parsed > range.1 {
        return Err(ValidationFailure::OutOfRange {
            field,
            value: parsed,
        });
    }
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(url: &str) -> RawRegistration {
        RawRegistration {
            station_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_station_url_is_rejected() {
        let raw = RawRegistration::default();
        assert_eq!(validate(&raw), Err(ValidationFailure::MissingStationUrl));
    }

    #[test]
    fn quoted_empty_station_url_is_rejected() {
        // Quote stripping happens before the emptiness check
        let raw = minimal("\"\"");
        assert_eq!(validate(&raw), Err(ValidationFailure::MissingStationUrl));
    }

    #[test]
    fn quotes_are_stripped_from_all_fields() {
        let mut raw = minimal("\"http://example.com\"");
        raw.description = Some("a \"fine\" station".to_string());
        let record = validate(&raw).unwrap();
        assert_eq!(record.station_url, "http://example.com");
        assert_eq!(record.description.as_deref(), Some("a fine station"));
    }

    #[test]
    fn coordinates_in_range_accepted() {
        let mut raw = minimal("http://example.com");
        raw.latitude = Some("45.0".to_string());
        raw.longitude = Some("-122.0".to_string());
        let record = validate(&raw).unwrap();
        assert_eq!(record.latitude, Some(45.0));
        assert_eq!(record.longitude, Some(-122.0));
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let mut raw = minimal("http://example.com");
        raw.latitude = Some("95.0".to_string());
        assert_eq!(
            validate(&raw),
            Err(ValidationFailure::OutOfRange {
                field: "latitude",
                value: 95.0
            })
        );

        let mut raw = minimal("http://example.com");
        raw.longitude = Some("-200.0".to_string());
        assert_eq!(
            validate(&raw),
            Err(ValidationFailure::OutOfRange {
                field: "longitude",
                value: -200.0
            })
        );
    }

    #[test]
    fn unparsable_coordinate_rejected() {
        let mut raw = minimal("http://example.com");
        raw.latitude = Some("north".to_string());
        assert!(matches!(
            validate(&raw),
            Err(ValidationFailure::BadNumber { field: "latitude", .. })
        ));
    }

    #[test]
    fn nan_coordinate_rejected() {
        let mut raw = minimal("http://example.com");
        raw.latitude = Some("NaN".to_string());
        assert!(matches!(
            validate(&raw),
            Err(ValidationFailure::OutOfRange { .. })
        ));
    }
}
