//! Upstream transit client for the transport.rest API
//!
//! One HTTP GET per operation against the public
//! [v6.db.transport.rest](https://v6.db.transport.rest) API. Raw HAFAS
//! payloads are deserialized into private `Raw*` structs and converted
//! into the crate's public models; any non-success status, network
//! failure, or malformed payload becomes a uniform upstream error.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::TransitConfig;
use crate::error::TransitError;
use crate::models::{Arrival, Departure, LegKind, Route, RouteLeg, Station};

/// Trait for upstream transit clients
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransitClient: Send + Sync {
    /// Stops within `radius_meters` of a coordinate pair, in upstream
    /// order, without computed distances
    async fn nearby_stops(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
        limit: usize,
    ) -> Result<Vec<Station>, TransitError>;

    /// Stops matching a name query, in upstream relevance order
    async fn search_stops(&self, query: &str, limit: usize) -> Result<Vec<Station>, TransitError>;

    /// Departure board for a station
    async fn departures(
        &self,
        station_id: &str,
        when: Option<DateTime<Utc>>,
        limit: usize,
        duration_minutes: u32,
    ) -> Result<Vec<Departure>, TransitError>;

    /// Arrival board for a station
    async fn arrivals(
        &self,
        station_id: &str,
        when: Option<DateTime<Utc>>,
        limit: usize,
        duration_minutes: u32,
    ) -> Result<Vec<Arrival>, TransitError>;

    /// Journey options between two stations, in upstream ranking order
    async fn journeys(
        &self,
        origin_id: &str,
        destination_id: &str,
        departure: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Route>, TransitError>;

    /// Whether the upstream API is reachable
    async fn is_healthy(&self) -> bool;
}

/// Production client for the db.transport.rest API
#[derive(Debug)]
pub struct DbRestClient {
    client: Client,
    config: TransitConfig,
}

impl DbRestClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &TransitConfig) -> Result<Self, TransitError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("fahrplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                TransitError::upstream(None, format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Product filter parameters for departure boards
    fn board_product_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("bus", bool_str(self.config.products_bus).to_string()),
            ("ferry", bool_str(self.config.products_ferry).to_string()),
            ("subway", bool_str(self.config.products_subway).to_string()),
            ("tram", bool_str(self.config.products_tram).to_string()),
            ("taxi", bool_str(self.config.products_taxi).to_string()),
        ]
    }

    /// Product filter parameters for journey planning
    fn journey_product_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("bus", bool_str(self.config.products_bus).to_string()),
            ("ferry", bool_str(self.config.products_ferry).to_string()),
            ("subway", bool_str(self.config.products_subway).to_string()),
            ("tram", bool_str(self.config.products_tram).to_string()),
        ]
    }

    /// Issue a GET request and return the response body
    async fn fetch(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<String, TransitError> {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));

        debug!(%url, "Requesting upstream");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransitError::upstream(
                Some(status.as_u16()),
                format!("upstream responded with HTTP {status}"),
            ));
        }

        response.text().await.map_err(|e| {
            TransitError::upstream(None, format!("failed to read upstream body: {e}"))
        })
    }

    /// Map a reqwest send failure into the uniform upstream error
    fn send_error(&self, e: &reqwest::Error) -> TransitError {
        if e.is_timeout() {
            TransitError::upstream(
                None,
                format!("request timed out after {}s", self.config.timeout_secs),
            )
        } else {
            TransitError::upstream(None, format!("connection failed: {e}"))
        }
    }

    /// Parse a locations response into stations, dropping entries that
    /// are neither stops nor stations (addresses, POIs)
    fn parse_locations(body: &str) -> Result<Vec<Station>, TransitError> {
        let raw: Vec<RawStop> = serde_json::from_str(body)
            .map_err(|e| TransitError::upstream(None, format!("malformed payload: {e}")))?;

        Ok(raw
            .into_iter()
            .filter(|s| matches!(s.kind.as_deref(), Some("stop" | "station")))
            .map(RawStop::into_station)
            .collect())
    }

    /// Parse a departure board, accepting both the wrapped object and
    /// the bare-array response shape
    fn parse_departures(body: &str) -> Result<Vec<Departure>, TransitError> {
        let raw: RawBoard = serde_json::from_str(body)
            .map_err(|e| TransitError::upstream(None, format!("malformed payload: {e}")))?;

        Ok(raw.into_rows().into_iter().map(convert_departure).collect())
    }

    /// Parse an arrival board, accepting both response shapes
    fn parse_arrivals(body: &str) -> Result<Vec<Arrival>, TransitError> {
        let raw: RawBoard = serde_json::from_str(body)
            .map_err(|e| TransitError::upstream(None, format!("malformed payload: {e}")))?;

        Ok(raw.into_rows().into_iter().map(convert_arrival).collect())
    }

    /// Parse a journeys response into routes
    fn parse_journeys(body: &str) -> Result<Vec<Route>, TransitError> {
        let raw: RawJourneysResponse = serde_json::from_str(body)
            .map_err(|e| TransitError::upstream(None, format!("malformed payload: {e}")))?;

        Ok(raw
            .journeys
            .into_iter()
            .map(|j| Route::from_legs(j.legs.into_iter().map(convert_leg).collect()))
            .collect())
    }
}

#[async_trait]
impl TransitClient for DbRestClient {
    #[instrument(skip(self))]
    async fn nearby_stops(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
        limit: usize,
    ) -> Result<Vec<Station>, TransitError> {
        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("distance", radius_meters.to_string()),
            ("results", limit.to_string()),
            ("stops", "true".to_string()),
            ("poi", "false".to_string()),
        ];

        let body = self.fetch("locations/nearby", &params).await?;
        let stations = Self::parse_locations(&body)?;
        debug!(count = stations.len(), "Nearby stops fetched");
        Ok(stations)
    }

    #[instrument(skip(self))]
    async fn search_stops(&self, query: &str, limit: usize) -> Result<Vec<Station>, TransitError> {
        let params = [
            ("query", query.to_string()),
            ("results", limit.to_string()),
            ("stops", "true".to_string()),
            ("addresses", "false".to_string()),
            ("poi", "false".to_string()),
            ("fuzzy", "true".to_string()),
        ];

        let body = self.fetch("locations", &params).await?;
        let stations = Self::parse_locations(&body)?;
        debug!(count = stations.len(), "Stops found by name");
        Ok(stations)
    }

    #[instrument(skip(self))]
    async fn departures(
        &self,
        station_id: &str,
        when: Option<DateTime<Utc>>,
        limit: usize,
        duration_minutes: u32,
    ) -> Result<Vec<Departure>, TransitError> {
        let mut params = vec![
            ("results", limit.to_string()),
            ("duration", duration_minutes.to_string()),
        ];
        if let Some(when) = when {
            params.push(("when", when.to_rfc3339()));
        }
        params.extend(self.board_product_params());

        let path = format!("stops/{station_id}/departures");
        let body = self.fetch(&path, &params).await?;
        Self::parse_departures(&body)
    }

    #[instrument(skip(self))]
    async fn arrivals(
        &self,
        station_id: &str,
        when: Option<DateTime<Utc>>,
        limit: usize,
        duration_minutes: u32,
    ) -> Result<Vec<Arrival>, TransitError> {
        let mut params = vec![
            ("results", limit.to_string()),
            ("duration", duration_minutes.to_string()),
        ];
        if let Some(when) = when {
            params.push(("when", when.to_rfc3339()));
        }

        let path = format!("stops/{station_id}/arrivals");
        let body = self.fetch(&path, &params).await?;
        Self::parse_arrivals(&body)
    }

    #[instrument(skip(self))]
    async fn journeys(
        &self,
        origin_id: &str,
        destination_id: &str,
        departure: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Route>, TransitError> {
        let mut params = vec![
            ("from", origin_id.to_string()),
            ("to", destination_id.to_string()),
            ("results", limit.to_string()),
            ("stopovers", "true".to_string()),
        ];
        if let Some(departure) = departure {
            params.push(("departure", departure.to_rfc3339()));
        }
        params.extend(self.journey_product_params());

        let body = self.fetch("journeys", &params).await?;
        let routes = Self::parse_journeys(&body)?;
        debug!(count = routes.len(), "Journeys fetched");
        Ok(routes)
    }

    async fn is_healthy(&self) -> bool {
        let params = [
            ("query", "hbf".to_string()),
            ("results", "1".to_string()),
        ];
        self.fetch("locations", &params).await.is_ok()
    }
}

/// Convert bool to "true"/"false" str for query params
const fn bool_str(val: bool) -> &'static str {
    if val { "true" } else { "false" }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStop {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<String>,
    name: Option<String>,
    location: Option<RawLocation>,
}

impl RawStop {
    fn into_station(self) -> Station {
        let (latitude, longitude) = self
            .location
            .map_or((None, None), |loc| (loc.latitude, loc.longitude));

        Station {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            latitude,
            longitude,
            distance_meters: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLine {
    name: Option<String>,
    product: Option<String>,
    mode: Option<String>,
}

impl RawLine {
    fn display_name(name: Option<String>) -> String {
        name.unwrap_or_else(|| "?".to_string())
    }

    /// Transport product with the `mode` field as fallback
    fn product_or_mode(product: Option<String>, mode: Option<String>) -> String {
        product.or(mode).unwrap_or_default()
    }
}

/// A row on a departure or arrival board
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStopover {
    when: Option<DateTime<Utc>>,
    planned_when: Option<DateTime<Utc>>,
    delay: Option<i64>,
    platform: Option<String>,
    direction: Option<String>,
    provenance: Option<String>,
    line: Option<RawLine>,
    destination: Option<RawStop>,
}

/// The upstream serves boards either as `{departures: [...]}` /
/// `{arrivals: [...]}` or as a bare array, depending on API version
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBoard {
    Wrapped {
        #[serde(default)]
        departures: Option<Vec<RawStopover>>,
        #[serde(default)]
        arrivals: Option<Vec<RawStopover>>,
    },
    Bare(Vec<RawStopover>),
}

impl RawBoard {
    fn into_rows(self) -> Vec<RawStopover> {
        match self {
            Self::Wrapped {
                departures,
                arrivals,
            } => departures.or(arrivals).unwrap_or_default(),
            Self::Bare(rows) => rows,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJourneysResponse {
    #[serde(default)]
    journeys: Vec<RawJourney>,
}

#[derive(Debug, Deserialize)]
struct RawJourney {
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeg {
    origin: Option<RawStop>,
    destination: Option<RawStop>,
    departure: Option<DateTime<Utc>>,
    arrival: Option<DateTime<Utc>>,
    direction: Option<String>,
    walking: Option<bool>,
    distance: Option<u32>,
    line: Option<RawLine>,
}

fn convert_departure(raw: RawStopover) -> Departure {
    let line = raw.line.unwrap_or_default();
    let scheduled = raw.planned_when;
    let destination = raw
        .destination
        .and_then(|d| d.name)
        .or_else(|| raw.direction.clone())
        .unwrap_or_else(|| "?".to_string());

    Departure {
        line: RawLine::display_name(line.name),
        direction: raw.direction.unwrap_or_default(),
        destination,
        mode: RawLine::product_or_mode(line.product, line.mode),
        scheduled_time: scheduled,
        estimated_time: raw.when.or(scheduled),
        delay_minutes: raw.delay.map(|secs| secs / 60),
        platform: raw.platform,
    }
}

fn convert_arrival(raw: RawStopover) -> Arrival {
    let line = raw.line.unwrap_or_default();
    let scheduled = raw.planned_when;

    Arrival {
        line: RawLine::display_name(line.name),
        origin: raw.provenance.unwrap_or_else(|| "?".to_string()),
        mode: RawLine::product_or_mode(line.product, line.mode),
        scheduled_time: scheduled,
        estimated_time: raw.when.or(scheduled),
        delay_minutes: raw.delay.map(|secs| secs / 60),
        platform: raw.platform,
    }
}

fn convert_leg(raw: RawLeg) -> RouteLeg {
    let origin = raw
        .origin
        .and_then(|s| s.name)
        .unwrap_or_else(|| "?".to_string());
    let destination = raw
        .destination
        .and_then(|s| s.name)
        .unwrap_or_else(|| "?".to_string());

    if raw.walking.unwrap_or(false) {
        return RouteLeg {
            kind: LegKind::Walk,
            line: None,
            direction: None,
            mode: None,
            origin,
            destination,
            departure_time: raw.departure,
            arrival_time: raw.arrival,
            distance_meters: raw.distance,
        };
    }

    let line = raw.line.unwrap_or_default();
    RouteLeg {
        kind: LegKind::Transit,
        line: Some(RawLine::display_name(line.name)),
        direction: raw.direction,
        mode: Some(RawLine::product_or_mode(line.product, line.mode)),
        origin,
        destination,
        departure_time: raw.departure,
        arrival_time: raw.arrival,
        distance_meters: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_str() {
        assert_eq!(bool_str(true), "true");
        assert_eq!(bool_str(false), "false");
    }

    #[test]
    fn test_parse_locations() {
        let json = r#"[
            {
                "type": "stop",
                "id": "8000107",
                "name": "Freiburg(Breisgau) Hbf",
                "location": { "latitude": 47.997696, "longitude": 7.841632 }
            },
            {
                "type": "station",
                "id": "8005135",
                "name": "Freiburg-Littenweiler",
                "location": { "latitude": 47.984862, "longitude": 7.890039 }
            }
        ]"#;

        let stations = DbRestClient::parse_locations(json).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "8000107");
        assert_eq!(stations[0].name, "Freiburg(Breisgau) Hbf");
        assert!((stations[0].latitude.unwrap() - 47.997696).abs() < 0.001);
        assert!(stations[0].distance_meters.is_none());
    }

    #[test]
    fn test_parse_locations_filters_non_stops() {
        let json = r#"[
            { "type": "stop", "id": "1", "name": "A" },
            { "type": "address", "id": "2", "name": "Some street" },
            { "type": "location", "id": "3", "name": "POI" },
            { "id": "4", "name": "untyped" }
        ]"#;

        let stations = DbRestClient::parse_locations(json).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "1");
    }

    #[test]
    fn test_parse_locations_missing_fields() {
        let json = r#"[{ "type": "stop" }]"#;
        let stations = DbRestClient::parse_locations(json).unwrap();
        assert_eq!(stations[0].id, "");
        assert_eq!(stations[0].name, "");
        assert!(stations[0].latitude.is_none());
    }

    #[test]
    fn test_parse_locations_invalid_json() {
        let result = DbRestClient::parse_locations("not json");
        assert!(matches!(
            result,
            Err(TransitError::Upstream { status: None, .. })
        ));
    }

    #[test]
    fn test_parse_departures_wrapped() {
        let json = r#"{
            "departures": [{
                "when": "2026-08-06T10:02:00+02:00",
                "plannedWhen": "2026-08-06T10:00:00+02:00",
                "delay": 120,
                "platform": "1",
                "direction": "Littenweiler",
                "line": { "name": "STR 1", "product": "tram", "mode": "train" },
                "destination": { "type": "stop", "id": "x", "name": "Lassbergstraße" }
            }]
        }"#;

        let departures = DbRestClient::parse_departures(json).unwrap();
        assert_eq!(departures.len(), 1);
        let dep = &departures[0];
        assert_eq!(dep.line, "STR 1");
        assert_eq!(dep.direction, "Littenweiler");
        assert_eq!(dep.destination, "Lassbergstraße");
        assert_eq!(dep.mode, "tram");
        assert_eq!(dep.delay_minutes, Some(2));
        assert_eq!(dep.platform.as_deref(), Some("1"));
        assert!(dep.scheduled_time.is_some());
        assert!(dep.estimated_time > dep.scheduled_time);
    }

    #[test]
    fn test_parse_departures_bare_array() {
        let json = r#"[{
            "plannedWhen": "2026-08-06T10:00:00+02:00",
            "direction": "Günterstal",
            "line": { "name": "STR 2", "product": "tram" }
        }]"#;

        let departures = DbRestClient::parse_departures(json).unwrap();
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].line, "STR 2");
    }

    #[test]
    fn test_parse_departures_null_line_and_delay() {
        let json = r#"{ "departures": [{ "line": null, "delay": null, "direction": "Somewhere" }] }"#;

        let departures = DbRestClient::parse_departures(json).unwrap();
        let dep = &departures[0];
        assert_eq!(dep.line, "?");
        assert_eq!(dep.mode, "");
        assert!(dep.delay_minutes.is_none());
        assert!(dep.scheduled_time.is_none());
        // destination falls back to the direction
        assert_eq!(dep.destination, "Somewhere");
    }

    #[test]
    fn test_parse_departures_mode_fallback() {
        let json = r#"{ "departures": [{ "line": { "name": "Bus 11", "mode": "bus" } }] }"#;
        let departures = DbRestClient::parse_departures(json).unwrap();
        assert_eq!(departures[0].mode, "bus");
    }

    #[test]
    fn test_parse_departures_estimated_falls_back_to_scheduled() {
        let json = r#"{ "departures": [{ "plannedWhen": "2026-08-06T10:00:00Z" }] }"#;
        let departures = DbRestClient::parse_departures(json).unwrap();
        assert_eq!(
            departures[0].estimated_time,
            departures[0].scheduled_time
        );
    }

    #[test]
    fn test_parse_arrivals() {
        let json = r#"{
            "arrivals": [{
                "when": "2026-08-06T11:05:00+02:00",
                "plannedWhen": "2026-08-06T11:00:00+02:00",
                "delay": 300,
                "provenance": "Offenburg",
                "line": { "name": "RE 7", "product": "regional" }
            }]
        }"#;

        let arrivals = DbRestClient::parse_arrivals(json).unwrap();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].line, "RE 7");
        assert_eq!(arrivals[0].origin, "Offenburg");
        assert_eq!(arrivals[0].delay_minutes, Some(5));
    }

    #[test]
    fn test_parse_arrivals_missing_provenance() {
        let json = r#"{ "arrivals": [{}] }"#;
        let arrivals = DbRestClient::parse_arrivals(json).unwrap();
        assert_eq!(arrivals[0].origin, "?");
        assert_eq!(arrivals[0].line, "?");
    }

    #[test]
    fn test_parse_journeys() {
        let json = r#"{
            "journeys": [{
                "legs": [
                    {
                        "origin": { "type": "stop", "name": "Freiburg(Breisgau) Hbf" },
                        "destination": { "type": "stop", "name": "Offenburg" },
                        "departure": "2026-08-06T10:00:00+02:00",
                        "arrival": "2026-08-06T10:40:00+02:00",
                        "direction": "Karlsruhe Hbf",
                        "line": { "name": "RE 7", "product": "regional", "mode": "train" }
                    },
                    {
                        "origin": { "name": "Offenburg" },
                        "destination": { "name": "Offenburg Busbahnhof" },
                        "departure": "2026-08-06T10:42:00+02:00",
                        "arrival": "2026-08-06T10:47:00+02:00",
                        "walking": true,
                        "distance": 320
                    }
                ]
            }]
        }"#;

        let routes = DbRestClient::parse_journeys(json).unwrap();
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.duration_minutes, Some(47));
        assert_eq!(route.num_transfers, 0);

        let transit = &route.legs[0];
        assert_eq!(transit.kind, LegKind::Transit);
        assert_eq!(transit.line.as_deref(), Some("RE 7"));
        assert_eq!(transit.direction.as_deref(), Some("Karlsruhe Hbf"));
        assert_eq!(transit.mode.as_deref(), Some("regional"));

        let walk = &route.legs[1];
        assert_eq!(walk.kind, LegKind::Walk);
        assert!(walk.line.is_none());
        assert_eq!(walk.distance_meters, Some(320));
    }

    #[test]
    fn test_parse_journeys_empty() {
        let routes = DbRestClient::parse_journeys(r#"{ "journeys": [] }"#).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_parse_journeys_missing_key() {
        let routes = DbRestClient::parse_journeys("{}").unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_product_params() {
        let config = TransitConfig::default();
        let client = DbRestClient::new(&config).unwrap();

        let board = client.board_product_params();
        assert!(board.contains(&("bus", "true".to_string())));
        assert!(board.contains(&("taxi", "false".to_string())));

        let journey = client.journey_product_params();
        assert!(journey.contains(&("tram", "true".to_string())));
        assert!(!journey.iter().any(|(k, _)| *k == "taxi"));
    }
}
