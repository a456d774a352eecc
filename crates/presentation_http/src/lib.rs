//! HTTP presentation layer
//!
//! Maps query parameters onto the shared transit service and returns
//! JSON count envelopes. Stateless: one request in, one response out.

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use config::{AppConfig, ServerConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
