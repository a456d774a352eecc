//! Transit error taxonomy

use thiserror::Error;

/// Errors produced by the transit service layer
///
/// Every failure collapses into one of three categories: bad input,
/// no matching entity, or an upstream failure. There is no retry
/// policy; upstream failures propagate immediately to the caller.
#[derive(Debug, Error)]
pub enum TransitError {
    /// Malformed or missing input (surfaced as a client error)
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Valid query, but no matching entity exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream API failure: non-success status, network error,
    /// timeout, or malformed payload
    #[error("Upstream transit API error: {message}")]
    Upstream {
        /// HTTP status returned by the upstream API, if the request
        /// got that far
        status: Option<u16>,
        /// Human-readable description of the failure
        message: String,
    },
}

impl TransitError {
    /// Build a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Build an upstream error
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// The upstream HTTP status, if this is an upstream error that
    /// received a response
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this error is the caller's fault
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}
