//! Error types for providers and the planner.

use thiserror::Error;

/// Failures talking to a distance/fare provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("no route found ({code}): {message}")]
    NoRoute { code: i32, message: String },
}

/// Failures of the validate-and-price operation.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(
        "Invalid route: one or more points have less than {threshold}% availability"
    )]
    AvailabilityRejected {
        threshold: i64,
        /// Offending stops and their scores.
        below: Vec<(String, i64)>,
    },

    #[error("upstream provider failed: {0}")]
    Upstream(#[from] ProviderError),

    #[error("point `{0}` is not part of the distance matrix")]
    UnknownPoint(String),

    #[error("fare split is undefined: counterfactual fare for `{stop}` is zero")]
    DegenerateFare { stop: String },
}

impl PlannerError {
    /// Whether the caller caused this error (bad input or a gated route).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PlannerError::InvalidInput(_) | PlannerError::AvailabilityRejected { .. }
        )
    }

    /// HTTP-style status class for surfacing the error.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}
