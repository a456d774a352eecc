//! Application state shared across handlers

use std::sync::Arc;

use transit::TransitService;

use crate::config::AppConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Shared transit query service
    pub service: Arc<TransitService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state from a service and configuration
    #[must_use]
    pub fn new(service: Arc<TransitService>, config: Arc<AppConfig>) -> Self {
        Self { service, config }
    }
}
