//! OpenAPI documentation module
//!
//! Provides OpenAPI 3.0 documentation with Swagger UI and ReDoc for
//! interactive API exploration.

use axum::Router;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{error, handlers, state::AppState};

/// OpenAPI documentation for the transit façade
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fahrplan API",
        version = "0.1.0",
        description = "Thin façade over the public db.transport.rest transit API: \
                       station search, departure/arrival boards, and journey planning",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Health check and readiness endpoints"),
        (name = "stations", description = "Station radius search, name search, nearest lookup"),
        (name = "boards", description = "Departure and arrival boards"),
        (name = "routes", description = "Journey planning")
    ),
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::stations::list_stations,
        handlers::stations::search_stations,
        handlers::stations::nearest_station,
        handlers::departures::get_departures,
        handlers::arrivals::get_arrivals,
        handlers::route::plan_route,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::health::HealthResponse,
        handlers::health::ReadinessResponse,
        handlers::health::UpstreamStatus,
        handlers::stations::StationsResponse,
        handlers::stations::SearchResponse,
        handlers::stations::NearestResponse,
        handlers::stations::Center,
        handlers::departures::DeparturesResponse,
        handlers::arrivals::ArrivalsResponse,
        handlers::route::RoutesResponse,
        transit::Station,
        transit::Departure,
        transit::Arrival,
        transit::Route,
        transit::RouteLeg,
        transit::LegKind,
    ))
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document and interactive docs
pub fn docs_router() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
}
