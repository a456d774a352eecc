//! Route definitions

use axum::{Router, routing::get};

use crate::{handlers, openapi, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and readiness
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/ready", get(handlers::health::readiness_check))
        // Station queries
        .route("/api/stations", get(handlers::stations::list_stations))
        .route(
            "/api/stations/search",
            get(handlers::stations::search_stations),
        )
        .route(
            "/api/stations/nearest",
            get(handlers::stations::nearest_station),
        )
        // Boards
        .route("/api/departures", get(handlers::departures::get_departures))
        .route("/api/arrivals", get(handlers::arrivals::get_arrivals))
        // Journey planning
        .route("/api/route", get(handlers::route::plan_route))
        // Interactive API docs
        .merge(openapi::docs_router())
        // Attach state
        .with_state(state)
}
