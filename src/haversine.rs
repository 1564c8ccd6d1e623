//! Haversine route summary provider (fallback when the directions API is unavailable).
//!
//! Uses great-circle distance and a metered taxi tariff to estimate fares.
//! Less accurate than a real directions service (ignores roads and tolls) but
//! always available.

use crate::error::ProviderError;
use crate::traits::{Coordinate, Fare, RouteSummary, RouteSummaryProvider};

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metered taxi tariff: flat fare for the first stretch, then a fixed
/// increment per distance unit (partial units are charged in full).
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    pub base_fare: f64,
    pub base_distance_m: f64,
    pub unit_fare: f64,
    pub unit_distance_m: f64,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            base_fare: 4800.0,
            base_distance_m: 1600.0,
            unit_fare: 100.0,
            unit_distance_m: 131.0,
        }
    }
}

impl Tariff {
    pub fn fare_for(&self, distance_m: f64) -> f64 {
        if distance_m <= 0.0 {
            return 0.0;
        }
        let metered = (distance_m - self.base_distance_m).max(0.0);
        let units = (metered / self.unit_distance_m).ceil();
        self.base_fare + units * self.unit_fare
    }
}

/// Haversine-based route summary provider.
#[derive(Debug, Clone)]
pub struct HaversineProvider {
    /// Multiplier from straight-line to driven distance.
    pub road_factor: f64,
    pub tariff: Tariff,
}

impl Default for HaversineProvider {
    fn default() -> Self {
        Self {
            road_factor: 1.3,
            tariff: Tariff::default(),
        }
    }
}

impl HaversineProvider {
    pub fn new(road_factor: f64, tariff: Tariff) -> Self {
        Self {
            road_factor,
            tariff,
        }
    }

    /// Calculate haversine distance between two points in meters.
    fn haversine_m(from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lon = (to.lon - from.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

impl RouteSummaryProvider for HaversineProvider {
    fn route_summary(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteSummary, ProviderError> {
        let distance = (Self::haversine_m(from, to) * self.road_factor).round();
        Ok(RouteSummary {
            distance,
            fare: Fare {
                taxi: self.tariff.fare_for(distance),
                toll: 0.0,
            },
        })
    }
}
