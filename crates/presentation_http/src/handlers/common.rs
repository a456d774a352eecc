//! Shared handler helpers

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ApiError;

/// Validate that both coordinates were supplied
pub fn require_coords(lat: Option<f64>, lon: Option<f64>) -> Result<(f64, f64), ApiError> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(ApiError::BadRequest("lat and lon are required".to_string())),
    }
}

/// Parse an optional `time` query parameter
///
/// Accepts RFC 3339 (with offset) or a naive `YYYY-MM-DDTHH:MM[:SS]`
/// timestamp, which is interpreted as UTC.
pub fn parse_time_param(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(naive.and_utc()));
        }
    }

    Err(ApiError::BadRequest(format!("Invalid time format: {raw}")))
}
