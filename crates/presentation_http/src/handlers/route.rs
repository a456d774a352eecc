//! Journey planning handler

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use transit::Route;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::handlers::common::parse_time_param;
use crate::state::AppState;

/// Query parameters for journey planning
#[derive(Debug, Deserialize, IntoParams)]
pub struct RouteQuery {
    /// Origin station id (required), e.g. "8000107"
    pub from: Option<String>,
    /// Destination station id (required)
    pub to: Option<String>,
    /// Departure time, ISO-8601 (default: now)
    pub time: Option<String>,
    /// Maximum number of route options
    #[serde(default = "default_limit")]
    pub limit: usize,
}

const fn default_limit() -> usize {
    5
}

/// Response for journey planning
#[derive(Debug, Serialize, ToSchema)]
pub struct RoutesResponse {
    pub origin: String,
    pub destination: String,
    pub count: usize,
    pub routes: Vec<Route>,
}

/// Route options between two stations, upstream ranking preserved
#[utoipa::path(
    get,
    path = "/api/route",
    tag = "routes",
    params(RouteQuery),
    responses(
        (status = 200, description = "Route options", body = RoutesResponse),
        (status = 400, description = "Missing or invalid parameters", body = crate::error::ErrorResponse),
        (status = 502, description = "Upstream failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn plan_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RoutesResponse>, ApiError> {
    let (Some(from), Some(to)) = (query.from, query.to) else {
        return Err(ApiError::BadRequest("from and to are required".to_string()));
    };
    let when = parse_time_param(query.time.as_deref())?;

    let routes = state
        .service
        .plan_route(&from, &to, when, query.limit)
        .await?;

    Ok(Json(RoutesResponse {
        origin: from,
        destination: to,
        count: routes.len(),
        routes,
    }))
}
