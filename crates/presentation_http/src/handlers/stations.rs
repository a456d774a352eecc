//! Station query handlers
//!
//! Radius search, name search, and nearest-station resolution.

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use transit::Station;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::handlers::common::require_coords;
use crate::state::AppState;

/// Query parameters for the radius search
#[derive(Debug, Deserialize, IntoParams)]
pub struct StationsQuery {
    /// Latitude of the search center (required)
    pub lat: Option<f64>,
    /// Longitude of the search center (required)
    pub lon: Option<f64>,
    /// Search radius in meters
    #[serde(default = "default_radius")]
    pub radius: u32,
    /// Maximum number of results
    #[serde(default = "default_stations_limit")]
    pub limit: usize,
}

const fn default_radius() -> u32 {
    1000
}

const fn default_stations_limit() -> usize {
    50
}

/// The search center echoed back in the response
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// Response for the radius search
#[derive(Debug, Serialize, ToSchema)]
pub struct StationsResponse {
    pub count: usize,
    pub radius_meters: u32,
    pub center: Center,
    pub stations: Vec<Station>,
}

/// Stations within a radius of a point, nearest first
#[utoipa::path(
    get,
    path = "/api/stations",
    tag = "stations",
    params(StationsQuery),
    responses(
        (status = 200, description = "Stations nearest first", body = StationsResponse),
        (status = 400, description = "Missing or invalid parameters", body = crate::error::ErrorResponse),
        (status = 502, description = "Upstream failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_stations(
    State(state): State<AppState>,
    Query(query): Query<StationsQuery>,
) -> Result<Json<StationsResponse>, ApiError> {
    let (lat, lon) = require_coords(query.lat, query.lon)?;

    let stations = state
        .service
        .find_stations(lat, lon, query.radius, query.limit)
        .await?;

    Ok(Json(StationsResponse {
        count: stations.len(),
        radius_meters: query.radius,
        center: Center { lat, lon },
        stations,
    }))
}

/// Query parameters for the name search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Search term (required)
    pub q: Option<String>,
    /// Maximum number of results
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

const fn default_search_limit() -> usize {
    10
}

/// Response for the name search
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub stations: Vec<Station>,
}

/// Stations matching a name query
#[utoipa::path(
    get,
    path = "/api/stations/search",
    tag = "stations",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching stations", body = SearchResponse),
        (status = 400, description = "Missing search term", body = crate::error::ErrorResponse),
        (status = 502, description = "Upstream failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_stations(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let q = query
        .q
        .ok_or_else(|| ApiError::BadRequest("q (search term) is required".to_string()))?;

    let stations = state.service.search_stations(&q, query.limit).await?;

    Ok(Json(SearchResponse {
        query: q,
        count: stations.len(),
        stations,
    }))
}

/// Query parameters for the nearest-station lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct NearestQuery {
    /// Latitude (required)
    pub lat: Option<f64>,
    /// Longitude (required)
    pub lon: Option<f64>,
}

/// Response for the nearest-station lookup
#[derive(Debug, Serialize, ToSchema)]
pub struct NearestResponse {
    pub station: Station,
}

/// The single station closest to a point
#[utoipa::path(
    get,
    path = "/api/stations/nearest",
    tag = "stations",
    params(NearestQuery),
    responses(
        (status = 200, description = "Nearest station", body = NearestResponse),
        (status = 400, description = "Missing or invalid parameters", body = crate::error::ErrorResponse),
        (status = 404, description = "No station found", body = crate::error::ErrorResponse),
        (status = 502, description = "Upstream failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn nearest_station(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<NearestResponse>, ApiError> {
    let (lat, lon) = require_coords(query.lat, query.lon)?;

    let station = state.service.nearest_station(lat, lon).await?;

    Ok(Json(NearestResponse { station }))
}
