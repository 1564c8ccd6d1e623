//! Validate-and-price: the single inbound operation.
//!
//! matrix → optimal order → availability gate → fare split. A gated route
//! never reaches the fare provider calls.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::availability::{self, AvailabilityReport};
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::fare::{self, FareSplit};
use crate::matrix::{self, DistanceMatrix};
use crate::route::{self, MAX_DESTINATIONS};
use crate::traits::{Coordinate, Point, RouteSummaryProvider};

/// A start and its named destinations, in the caller's order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,
    #[serde(deserialize_with = "ordered_points")]
    pub points: Vec<Point>,
}

impl RouteRequest {
    pub fn new(start: impl Into<Coordinate>, points: Vec<Point>) -> Self {
        Self {
            start: start.into(),
            points,
        }
    }
}

/// Accepts a JSON object `{name: {lat, lon}}` and keeps its key order.
fn ordered_points<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PointsVisitor;

    impl<'de> Visitor<'de> for PointsVisitor {
        type Value = Vec<Point>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of point names to coordinates")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut points = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, coordinate)) = access.next_entry::<String, Coordinate>()? {
                points.push(Point { name, coordinate });
            }
            Ok(points)
        }
    }

    deserializer.deserialize_map(PointsVisitor)
}

/// The priced, accepted route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteQuote {
    pub best_route: Vec<String>,
    pub fares: FareSplit,
    pub total_distance: f64,
    pub availability: AvailabilityReport,
}

pub struct RoutePlanner<P> {
    provider: P,
    config: PlannerConfig,
}

impl<P: RouteSummaryProvider> RoutePlanner<P> {
    pub fn new(provider: P, config: PlannerConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Pick the shortest visiting order, gate it on availability, and split the fare.
    pub fn validate_route(&self, request: &RouteRequest) -> Result<RouteQuote, PlannerError> {
        matrix::validate_destinations(&request.points)?;
        if request.points.len() > MAX_DESTINATIONS {
            return Err(PlannerError::InvalidInput(format!(
                "At most {} destinations are supported",
                MAX_DESTINATIONS
            )));
        }

        let distances = DistanceMatrix::build(&self.provider, request.start, &request.points)?;
        let names: Vec<String> = request.points.iter().map(|p| p.name.clone()).collect();
        let choice = route::optimal_route(&names, &distances)?;

        let report = availability::score(&choice.stops, &distances, &self.config)?;
        let threshold = self.config.min_availability;
        let below = report.below(threshold);
        if !below.is_empty() {
            warn!(?below, threshold, "route rejected on availability");
            return Err(PlannerError::AvailabilityRejected { threshold, below });
        }

        let fares = fare::allocate(&self.provider, &choice.stops, request.start, &request.points)?;
        info!(route = ?choice.stops, total_fare = fares.total(), "route priced");

        Ok(RouteQuote {
            best_route: choice.stops,
            fares,
            total_distance: choice.total_distance,
            availability: report,
        })
    }
}
