//! Transit service
//!
//! Owns the query contract on top of the upstream client: input
//! validation, local distance computation, ordering guarantees, and
//! result truncation. Both façades (REST and tool protocol) share one
//! instance so their payloads stay identical.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::client::TransitClient;
use crate::error::TransitError;
use crate::geo::GeoPoint;
use crate::models::{Arrival, Departure, Route, Station};

/// Search radius used when resolving the nearest station
const NEAREST_RADIUS_METERS: u32 = 5000;

/// Candidate pool for nearest-station resolution. The upstream does
/// not guarantee distance ordering, so the minimum is computed locally
/// over this many candidates.
const NEAREST_CANDIDATES: usize = 10;

/// Shared transit query service
#[derive(Clone)]
pub struct TransitService {
    client: Arc<dyn TransitClient>,
}

impl std::fmt::Debug for TransitService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitService")
            .field("client", &"<TransitClient>")
            .finish()
    }
}

impl TransitService {
    /// Create a service on top of an upstream client
    #[must_use]
    pub fn new(client: Arc<dyn TransitClient>) -> Self {
        Self { client }
    }

    /// Stations within `radius_meters` of a coordinate pair, nearest
    /// first, truncated to `limit`
    ///
    /// A `limit` of zero returns an empty list without touching the
    /// upstream API.
    #[instrument(skip(self))]
    pub async fn find_stations(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
        limit: usize,
    ) -> Result<Vec<Station>, TransitError> {
        let center = Self::query_point(latitude, longitude)?;
        if radius_meters == 0 {
            return Err(TransitError::validation("radius must be positive"));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut stations = self
            .client
            .nearby_stops(latitude, longitude, radius_meters, limit)
            .await?;

        for station in &mut stations {
            station.distance_meters = Self::distance_from(&center, station);
        }
        Self::sort_by_distance(&mut stations);
        stations.truncate(limit);

        Ok(stations)
    }

    /// Stations matching a name query, in upstream relevance order
    #[instrument(skip(self))]
    pub async fn search_stations(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Station>, TransitError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TransitError::validation("search query must not be empty"));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut stations = self.client.search_stops(query, limit).await?;
        stations.truncate(limit);
        Ok(stations)
    }

    /// The single station closest to a coordinate pair
    ///
    /// Distance is computed locally over a candidate pool; upstream
    /// ordering is not trusted.
    #[instrument(skip(self))]
    pub async fn nearest_station(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Station, TransitError> {
        let center = Self::query_point(latitude, longitude)?;

        let mut stations = self
            .client
            .nearby_stops(latitude, longitude, NEAREST_RADIUS_METERS, NEAREST_CANDIDATES)
            .await?;

        for station in &mut stations {
            station.distance_meters = Self::distance_from(&center, station);
        }

        stations
            .into_iter()
            .filter(|s| s.distance_meters.is_some())
            .min_by(|a, b| Self::cmp_distance(a.distance_meters, b.distance_meters))
            .ok_or_else(|| TransitError::not_found(format!("no station found near {center}")))
    }

    /// Departure board for a station, ascending by scheduled time
    #[instrument(skip(self))]
    pub async fn departures(
        &self,
        station_id: &str,
        when: Option<DateTime<Utc>>,
        limit: usize,
        duration_minutes: u32,
    ) -> Result<Vec<Departure>, TransitError> {
        let station_id = Self::require_id(station_id, "station")?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut departures = self
            .client
            .departures(station_id, when, limit, duration_minutes)
            .await?;

        departures.sort_by(|a, b| Self::cmp_time(a.scheduled_time, b.scheduled_time));
        departures.truncate(limit);
        Ok(departures)
    }

    /// Arrival board for a station, ascending by scheduled time
    #[instrument(skip(self))]
    pub async fn arrivals(
        &self,
        station_id: &str,
        when: Option<DateTime<Utc>>,
        limit: usize,
        duration_minutes: u32,
    ) -> Result<Vec<Arrival>, TransitError> {
        let station_id = Self::require_id(station_id, "station")?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut arrivals = self
            .client
            .arrivals(station_id, when, limit, duration_minutes)
            .await?;

        arrivals.sort_by(|a, b| Self::cmp_time(a.scheduled_time, b.scheduled_time));
        arrivals.truncate(limit);
        Ok(arrivals)
    }

    /// Journey options between two stations, upstream ranking
    /// preserved, truncated to `limit`
    #[instrument(skip(self))]
    pub async fn plan_route(
        &self,
        origin_id: &str,
        destination_id: &str,
        when: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Route>, TransitError> {
        let origin_id = Self::require_id(origin_id, "origin")?;
        let destination_id = Self::require_id(destination_id, "destination")?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut routes = self
            .client
            .journeys(origin_id, destination_id, when, limit)
            .await?;
        routes.truncate(limit);
        Ok(routes)
    }

    /// Whether the upstream API is reachable
    pub async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }

    fn query_point(latitude: f64, longitude: f64) -> Result<GeoPoint, TransitError> {
        GeoPoint::new(latitude, longitude).map_err(|e| TransitError::validation(e.to_string()))
    }

    fn require_id<'a>(id: &'a str, what: &str) -> Result<&'a str, TransitError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(TransitError::validation(format!(
                "{what} id must not be empty"
            )));
        }
        Ok(id)
    }

    /// Distance from the query point, rounded to 0.1m; None for
    /// stations without usable coordinates
    fn distance_from(center: &GeoPoint, station: &Station) -> Option<f64> {
        let point = GeoPoint::new(station.latitude?, station.longitude?).ok()?;
        Some((center.distance_meters_to(&point) * 10.0).round() / 10.0)
    }

    /// Nearest first; stations without a computable distance last
    fn sort_by_distance(stations: &mut [Station]) {
        stations.sort_by(|a, b| Self::cmp_distance(a.distance_meters, b.distance_meters));
    }

    fn cmp_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn cmp_time(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
        match (a, b) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
