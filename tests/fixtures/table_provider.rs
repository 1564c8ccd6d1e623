//! Table-driven provider: every leg's distance and fare is declared up front.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use carpool_planner::ProviderError;
use carpool_planner::traits::{Coordinate, Fare, RouteSummary, RouteSummaryProvider};

#[derive(Debug, Default)]
pub struct TableProvider {
    coords: Vec<(String, Coordinate)>,
    legs: HashMap<(String, String), (f64, f64)>,
    failing: Option<(String, String)>,
    calls: AtomicUsize,
}

impl TableProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point(mut self, name: &str, lat: f64, lon: f64) -> Self {
        self.coords.push((name.to_string(), Coordinate::new(lat, lon)));
        self
    }

    /// Same distance and fare in both directions.
    pub fn leg(self, a: &str, b: &str, distance: f64, fare: f64) -> Self {
        self.one_way(a, b, distance, fare).one_way(b, a, distance, fare)
    }

    pub fn one_way(mut self, from: &str, to: &str, distance: f64, fare: f64) -> Self {
        self.legs
            .insert((from.to_string(), to.to_string()), (distance, fare));
        self
    }

    /// Any query between `a` and `b` (either direction) fails.
    pub fn fail_between(mut self, a: &str, b: &str) -> Self {
        self.failing = Some((a.to_string(), b.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn coordinate(&self, name: &str) -> Coordinate {
        self.coords
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
            .unwrap_or_else(|| panic!("unknown fixture point {}", name))
    }

    fn name_of(&self, coord: Coordinate) -> Option<&str> {
        self.coords
            .iter()
            .find(|(_, c)| *c == coord)
            .map(|(n, _)| n.as_str())
    }
}

impl RouteSummaryProvider for TableProvider {
    fn route_summary(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteSummary, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (Some(from), Some(to)) = (self.name_of(from), self.name_of(to)) else {
            return Err(ProviderError::Api {
                status: 404,
                message: "unknown coordinate".to_string(),
            });
        };

        if let Some((a, b)) = &self.failing {
            if (a == from && b == to) || (a == to && b == from) {
                return Err(ProviderError::Api {
                    status: 503,
                    message: "service unavailable".to_string(),
                });
            }
        }

        let (distance, fare) = self
            .legs
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| ProviderError::NoRoute {
                code: 1,
                message: format!("no leg {} -> {}", from, to),
            })?;

        Ok(RouteSummary {
            distance,
            fare: Fare {
                taxi: fare,
                toll: 0.0,
            },
        })
    }
}
