//! Error types for input validation and route providers.

use thiserror::Error;

use crate::stop::StopId;

/// Rejected planner input.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("stop {id} has invalid coordinates")]
    InvalidCoordinates { id: StopId },

    #[error("stop {0} is already part of the trip")]
    DuplicateStop(StopId),

    #[error("stop {0} is not part of the trip")]
    UnknownStop(StopId),

    #[error("invalid trip rules: {0}")]
    InvalidRules(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failure to obtain road geometry.
///
/// Never fatal to planning: callers fall back to straight-line legs.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service returned {code}: {message}")]
    Status { code: String, message: String },

    #[error("routing service found no route")]
    NoRoute,

    #[error("malformed route geometry: {0}")]
    MalformedGeometry(String),

    #[error("{count} waypoints exceed the provider limit of {max}")]
    TooManyWaypoints { count: usize, max: usize },
}
