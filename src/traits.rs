//! Core domain types and the provider capability.
//!
//! The planner never talks to a directions service directly. Anything that
//! can answer "how far, and how much, from here to there" implements
//! [`RouteSummaryProvider`] and can be plugged in.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// A named destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub name: String,
    pub coordinate: Coordinate,
}

impl Point {
    pub fn new(name: impl Into<String>, coordinate: impl Into<Coordinate>) -> Self {
        Self {
            name: name.into(),
            coordinate: coordinate.into(),
        }
    }
}

/// Fare breakdown for a single leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    pub taxi: f64,
    pub toll: f64,
}

impl Fare {
    pub fn total(&self) -> f64 {
        self.taxi + self.toll
    }
}

/// What a provider knows about driving from one coordinate to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    /// Travel distance in meters.
    pub distance: f64,
    pub fare: Fare,
}

/// Source of per-leg distances and fares.
///
/// Implementations must be `Sync`: the distance matrix fans its pair queries
/// out across threads.
pub trait RouteSummaryProvider: Sync {
    fn route_summary(&self, from: Coordinate, to: Coordinate)
    -> Result<RouteSummary, ProviderError>;

    /// Travel distance in meters.
    fn distance(&self, from: Coordinate, to: Coordinate) -> Result<f64, ProviderError> {
        self.route_summary(from, to).map(|summary| summary.distance)
    }

    /// Total fare (taxi plus toll).
    fn fare(&self, from: Coordinate, to: Coordinate) -> Result<f64, ProviderError> {
        self.route_summary(from, to).map(|summary| summary.fare.total())
    }
}

impl<P: RouteSummaryProvider + ?Sized> RouteSummaryProvider for &P {
    fn route_summary(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteSummary, ProviderError> {
        (**self).route_summary(from, to)
    }

    fn distance(&self, from: Coordinate, to: Coordinate) -> Result<f64, ProviderError> {
        (**self).distance(from, to)
    }

    fn fare(&self, from: Coordinate, to: Coordinate) -> Result<f64, ProviderError> {
        (**self).fare(from, to)
    }
}
