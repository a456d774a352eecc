//! Arrival board handler

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use transit::Arrival;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::handlers::common::parse_time_param;
use crate::state::AppState;

/// Query parameters for the arrival board
#[derive(Debug, Deserialize, IntoParams)]
pub struct ArrivalsQuery {
    /// Station id (required), e.g. "8000107"
    pub station: Option<String>,
    /// Board start time, ISO-8601 (default: now)
    pub time: Option<String>,
    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Board window in minutes
    #[serde(default = "default_duration")]
    pub duration: u32,
}

const fn default_limit() -> usize {
    20
}

const fn default_duration() -> u32 {
    60
}

/// Response for the arrival board
#[derive(Debug, Serialize, ToSchema)]
pub struct ArrivalsResponse {
    pub station_id: String,
    pub count: usize,
    pub arrivals: Vec<Arrival>,
}

/// Arrivals for a station, ascending by scheduled time
#[utoipa::path(
    get,
    path = "/api/arrivals",
    tag = "boards",
    params(ArrivalsQuery),
    responses(
        (status = 200, description = "Arrival board", body = ArrivalsResponse),
        (status = 400, description = "Missing or invalid parameters", body = crate::error::ErrorResponse),
        (status = 502, description = "Upstream failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_arrivals(
    State(state): State<AppState>,
    Query(query): Query<ArrivalsQuery>,
) -> Result<Json<ArrivalsResponse>, ApiError> {
    let station = query
        .station
        .ok_or_else(|| ApiError::BadRequest("station is required".to_string()))?;
    let when = parse_time_param(query.time.as_deref())?;

    let arrivals = state
        .service
        .arrivals(&station, when, query.limit, query.duration)
        .await?;

    Ok(Json(ArrivalsResponse {
        station_id: station,
        count: arrivals.len(),
        arrivals,
    }))
}
