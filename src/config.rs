//! Tunable reference values for availability scoring.

use serde::Deserialize;

/// Reference fare `M` used by the availability formula.
pub const DEFAULT_REFERENCE_FARE: f64 = 4800.0;

/// Reference rate `x`: distance per fare unit of the metered tariff.
pub const DEFAULT_REFERENCE_RATE: f64 = 100_000.0 / 131.0;

/// Minimum acceptable availability percentage (inclusive).
pub const DEFAULT_MIN_AVAILABILITY: i64 = 60;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub reference_fare: f64,
    pub reference_rate: f64,
    pub min_availability: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            reference_fare: DEFAULT_REFERENCE_FARE,
            reference_rate: DEFAULT_REFERENCE_RATE,
            min_availability: DEFAULT_MIN_AVAILABILITY,
        }
    }
}

impl PlannerConfig {
    /// The `3M / 4x` term shared by every percentage denominator.
    pub(crate) fn reference_slack(&self) -> f64 {
        3.0 * self.reference_fare / (4.0 * self.reference_rate)
    }
}
