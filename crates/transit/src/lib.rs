//! Shared transit service layer
//!
//! Wraps the public [transport.rest](https://v6.db.transport.rest) API
//! (HAFAS-based, covering all German public transit) behind a typed,
//! validated query interface: station radius search, name search,
//! nearest-station resolution, departure/arrival boards, and journey
//! planning.
//!
//! # Architecture
//!
//! [`TransitClient`] defines the upstream interface (one HTTP GET per
//! operation), implemented by [`DbRestClient`]. [`TransitService`] sits
//! on top and owns the query contract: input validation, local distance
//! computation, ordering guarantees, and result truncation. Both
//! presentation layers (REST and tool protocol) share one service
//! instance so their payloads stay identical.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use transit::{DbRestClient, TransitConfig, TransitService};
//!
//! let config = TransitConfig::default();
//! let client = DbRestClient::new(&config)?;
//! let service = TransitService::new(Arc::new(client));
//!
//! // Stations within 500m of Freiburg city center, nearest first
//! let stations = service.find_stations(47.9959, 7.8522, 500, 5).await?;
//! ```

mod client;
mod config;
mod error;
mod geo;
mod models;
mod service;

pub use client::{DbRestClient, TransitClient};
pub use config::TransitConfig;
pub use error::TransitError;
pub use geo::{GeoPoint, InvalidCoordinates};
pub use models::{Arrival, Departure, LegKind, Route, RouteLeg, Station};
pub use service::TransitService;
