//! Departure board handler

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use transit::Departure;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::handlers::common::parse_time_param;
use crate::state::AppState;

/// Query parameters for the departure board
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeparturesQuery {
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

/// Response for the departure board
#[derive(Debug, Serialize, ToSchema)]
pub struct DeparturesResponse {
    pub station_id: String,
    pub count: usize,
    pub departures: Vec<Departure>,
}

/// Departures for a station, ascending by scheduled time
#[utoipa::path(
    get,
    path = "/api/departures",
    tag = "boards",
    params(DeparturesQuery),
    responses(
        (status = 200, description = "Departure board", body = DeparturesResponse),
        (status = 400, description = "Missing or invalid parameters", body = crate::error::ErrorResponse),
        (status = 502, description = "Upstream failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_departures(
    State(state): State<AppState>,
    Query(query): Query<DeparturesQuery>,
) -> Result<Json<DeparturesResponse>, ApiError> {
    let station = query
        .station
        .ok_or_else(|| ApiError::BadRequest("station is required".to_string()))?;
    let when = parse_time_param(query.time.as_deref())?;

    let departures = state
        .service
        .departures(&station, when, query.limit, query.duration)
        .await?;

    Ok(Json(DeparturesResponse {
        station_id: station,
        count: departures.len(),
        departures,
    }))
}
