//! Error handling for the analytics engine
//!
//! Aggregations themselves never fail: malformed records are excluded and an
//! empty scope yields an empty result. Errors only come from the boundaries
//! (configuration loading, JSON payloads, role strings, strict scope checks).

use shared::UnknownRole;
use thiserror::Error;

/// Analytics error types
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] UnknownRole),

    #[error("Invalid region scope: {0}")]
    InvalidScope(String),
}

/// Result type alias for fallible analytics boundaries
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
