//! Transit service configuration

use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the upstream transit API (transport.rest / HAFAS)
#[allow(clippy::struct_excessive_bools)] // product filters are independent flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitConfig {
    /// Base URL for the transport.rest API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Include bus connections
    #[serde(default = "default_true")]
    pub products_bus: bool,

    /// Include ferry connections
    #[serde(default = "default_true")]
    pub products_ferry: bool,

    /// Include U-Bahn connections
    #[serde(default = "default_true")]
    pub products_subway: bool,

    /// Include tram connections
    #[serde(default = "default_true")]
    pub products_tram: bool,

    /// Include shared taxi connections
    #[serde(default = "default_false")]
    pub products_taxi: bool,
}

fn default_base_url() -> String {
    "https://v6.db.transport.rest".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

const fn default_false() -> bool {
    false
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            products_bus: true,
            products_ferry: true,
            products_subway: true,
            products_tram: true,
            products_taxi: false,
        }
    }
}

impl TransitConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute URL or the
    /// timeout is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("base_url is not a valid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
