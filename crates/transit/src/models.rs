//! Transit data models
//!
//! Typed projections of the upstream transport.rest JSON. Every entity
//! is a read-only, request-scoped view; nothing here is persisted.
//! Field names mirror the wire format the façades expose.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A transit station (stop)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Station {
    /// Upstream station identifier (e.g. "8000107")
    pub id: String,
    /// Human-readable station name
    pub name: String,
    /// Latitude, absent for degenerate upstream records
    #[serde(rename = "lat", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude, absent for degenerate upstream records
    #[serde(rename = "lon", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Distance from the query point in meters, filled by radius and
    /// nearest-station queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}

impl Station {
    /// Create a station without coordinates
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: None,
            longitude: None,
            distance_meters: None,
        }
    }

    /// Attach coordinates
    #[must_use]
    pub fn with_coords(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A departure from a station
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Departure {
    /// Line display name (e.g. "ICE 79", "Tram 1"), "?" when unknown
    pub line: String,
    /// Travel direction as announced
    pub direction: String,
    /// Destination station name, falls back to the direction
    pub destination: String,
    /// Transport product (e.g. "tram", "bus"), empty when unknown
    pub mode: String,
    /// Scheduled departure time
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Realtime departure estimate, falls back to the scheduled time
    pub estimated_time: Option<DateTime<Utc>>,
    /// Delay in whole minutes, None when the upstream reports no
    /// realtime data
    pub delay_minutes: Option<i64>,
    /// Platform, when announced
    pub platform: Option<String>,
}

/// An arrival at a station
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Arrival {
    /// Line display name, "?" when unknown
    pub line: String,
    /// Origin station name (provenance), "?" when unknown
    pub origin: String,
    /// Transport product, empty when unknown
    pub mode: String,
    /// Scheduled arrival time
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Realtime arrival estimate, falls back to the scheduled time
    pub estimated_time: Option<DateTime<Utc>>,
    /// Delay in whole minutes, None when unknown
    pub delay_minutes: Option<i64>,
    /// Platform, when announced
    pub platform: Option<String>,
}

/// Kind of a journey leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LegKind {
    /// Walking transfer
    Walk,
    /// Public transport segment
    Transit,
}

/// One segment of a planned journey
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RouteLeg {
    /// Walk or transit
    #[serde(rename = "type")]
    pub kind: LegKind,
    /// Line display name (transit legs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    /// Travel direction (transit legs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Transport product (transit legs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Origin stop name, "?" when unknown
    pub origin: String,
    /// Destination stop name, "?" when unknown
    pub destination: String,
    /// Departure time of this leg
    pub departure_time: Option<DateTime<Utc>>,
    /// Arrival time of this leg
    pub arrival_time: Option<DateTime<Utc>>,
    /// Walking distance in meters (walk legs only)
    #[serde(rename = "distance", skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u32>,
}

impl RouteLeg {
    /// Whether this is a transit (non-walking) leg
    #[must_use]
    pub const fn is_transit(&self) -> bool {
        matches!(self.kind, LegKind::Transit)
    }
}

/// A candidate journey from origin to destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Route {
    /// Departure time of the first leg
    pub departure_time: Option<DateTime<Utc>>,
    /// Arrival time of the last leg
    pub arrival_time: Option<DateTime<Utc>>,
    /// Total travel time in minutes, None when either endpoint time
    /// is unknown
    pub duration_minutes: Option<i64>,
    /// Number of transfers between transit legs
    pub num_transfers: u32,
    /// Ordered legs of the journey
    pub legs: Vec<RouteLeg>,
}

impl Route {
    /// Assemble a route from its legs, deriving endpoint times,
    /// duration, and transfer count
    #[must_use]
    pub fn from_legs(legs: Vec<RouteLeg>) -> Self {
        let departure_time = legs.first().and_then(|l| l.departure_time);
        let arrival_time = legs.last().and_then(|l| l.arrival_time);

        let duration_minutes = match (departure_time, arrival_time) {
            (Some(dep), Some(arr)) => Some((arr - dep).num_minutes()),
            _ => None,
        };

        let transit_legs = legs.iter().filter(|l| l.is_transit()).count();
        let num_transfers = u32::try_from(transit_legs.saturating_sub(1)).unwrap_or(0);

        Self {
            departure_time,
            arrival_time,
            duration_minutes,
            num_transfers,
            legs,
        }
    }
}
