//! Coordinate Codec
//!
//! Single home of the `"lat,lng"` string encoding used on core records.
//! Decode failure is a value, not a fatal condition: spatial queries
//! exclude records that fail to parse.

use crate::core::{Result, SyncError};

/// A decoded query/record position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, validating latitude/longitude ranges.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        validate(lat, lng).map_err(|reason| SyncError::InvalidCoordinate {
            raw: format!("{},{}", lat, lng),
            reason,
        })?;
        Ok(Self { lat, lng })
    }
}

/// Format a pair of decimal degrees as `"lat,lng"`.
pub fn encode(lat: f64, lng: f64) -> String {
    format!("{},{}", lat, lng)
}

/// Parse a `"lat,lng"` string.
///
/// Splits on the first comma, parses both halves as floats and validates
/// ranges. Callers must check for absence before calling; an empty string
/// is just another invalid encoding.
pub fn decode(raw: &str) -> Result<GeoPoint> {
    let invalid = |reason: String| SyncError::InvalidCoordinate {
        raw: raw.to_string(),
        reason,
    };

    let (lat_raw, lng_raw) = raw
        .split_once(',')
        .ok_or_else(|| invalid("missing comma separator".to_string()))?;

    let lat: f64 = lat_raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("latitude '{}' is not a number", lat_raw.trim())))?;
    let lng: f64 = lng_raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("longitude '{}' is not a number", lng_raw.trim())))?;

    validate(lat, lng).map_err(invalid)?;

    Ok(GeoPoint { lat, lng })
}

fn validate(lat: f64, lng: f64) -> std::result::Result<(), String> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err("coordinates must be finite".to_string());
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {} out of range -90..90", lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("longitude {} out of range -180..180", lng));
    }
    Ok(())
}
