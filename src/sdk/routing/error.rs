use serde::Deserialize;
use thiserror::Error;

// Body OSRM sends alongside a refused route request (usually HTTP 400)
#[derive(Deserialize, Debug)]
pub struct OsrmErrorPayload {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("No result for \"{0}\"")]
    NotFound(String),

    // The routing service answered but refused (NoRoute, NoSegment, ...)
    #[error("Routing refused (code {code}): {message}")]
    Rejected { code: String, message: String },

    #[error("Provider answered with HTTP {status}")]
    Status { status: u16 },

    #[error("Underlying request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GeoError {
    /// True when the provider was reachable but had nothing to offer.
    /// Everything else counts as the service being unavailable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GeoError::NotFound(_) | GeoError::Rejected { .. })
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Start & End required ({found} waypoint(s) given)")]
    InsufficientWaypoints { found: usize },

    #[error("Unknown: {label}")]
    UnknownWaypoint {
        label: String,
        #[source]
        source: GeoError,
    },

    #[error("Route not found")]
    RouteNotFound {
        #[source]
        source: GeoError,
    },
}
