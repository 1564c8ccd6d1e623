//! Request-scoped pairwise distance matrix over the start and every destination.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{PlannerError, ProviderError};
use crate::traits::{Coordinate, Point, RouteSummaryProvider};

/// Reserved name of the start point.
pub const START: &str = "start";

/// Minimum number of destinations a request must carry.
pub const MIN_DESTINATIONS: usize = 2;

/// Symmetric name-keyed distance table.
///
/// Every unordered pair is stored under both orderings, so lookups never
/// depend on argument order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceMatrix {
    distances: HashMap<(String, String), f64>,
}

impl DistanceMatrix {
    /// Query `provider` once per unordered pair of {start} ∪ destinations.
    ///
    /// Pair queries run in parallel. Once one fails, queries not yet started
    /// are skipped; the first failure in pair order is returned and no matrix
    /// is produced.
    pub fn build<P>(
        provider: &P,
        start: Coordinate,
        destinations: &[Point],
    ) -> Result<Self, PlannerError>
    where
        P: RouteSummaryProvider + ?Sized,
    {
        validate_destinations(destinations)?;

        let mut nodes: Vec<(&str, Coordinate)> = Vec::with_capacity(destinations.len() + 1);
        nodes.push((START, start));
        nodes.extend(destinations.iter().map(|p| (p.name.as_str(), p.coordinate)));

        let pairs: Vec<(usize, usize)> = (0..nodes.len())
            .flat_map(|i| (i + 1..nodes.len()).map(move |j| (i, j)))
            .collect();

        let failed = AtomicBool::new(false);
        let fetched: Vec<Option<Result<f64, ProviderError>>> = pairs
            .par_iter()
            .map(|&(i, j)| {
                if failed.load(Ordering::Relaxed) {
                    return None;
                }
                let (from_name, from) = nodes[i];
                let (to_name, to) = nodes[j];
                let result = provider.distance(from, to);
                debug!(from = from_name, to = to_name, ?result, "fetched pair distance");
                if result.is_err() {
                    failed.store(true, Ordering::Relaxed);
                }
                Some(result)
            })
            .collect();

        let mut matrix = Self::default();
        for (&(i, j), result) in pairs.iter().zip(fetched) {
            // Pairs are only skipped after a failure, which `?` reports below.
            let Some(result) = result else { continue };
            matrix.insert(nodes[i].0, nodes[j].0, result?);
        }
        Ok(matrix)
    }

    /// Build a matrix from known distances, e.g. for a precomputed table.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, f64)>,
    {
        let mut matrix = Self::default();
        for (a, b, distance) in pairs {
            matrix.insert(a, b, distance);
        }
        matrix
    }

    fn insert(&mut self, a: &str, b: &str, distance: f64) {
        self.distances
            .insert((a.to_string(), b.to_string()), distance);
        self.distances
            .insert((b.to_string(), a.to_string()), distance);
    }

    pub fn distance(&self, a: &str, b: &str) -> Result<f64, PlannerError> {
        if a == b {
            return if self.contains(a) {
                Ok(0.0)
            } else {
                Err(PlannerError::UnknownPoint(a.to_string()))
            };
        }
        self.distances
            .get(&(a.to_string(), b.to_string()))
            .copied()
            .ok_or_else(|| {
                let missing = if self.contains(a) { b } else { a };
                PlannerError::UnknownPoint(missing.to_string())
            })
    }

    fn contains(&self, name: &str) -> bool {
        self.distances.keys().any(|(a, _)| a == name)
    }

    /// Number of stored ordered entries.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Destination list checks shared by every entry point.
pub(crate) fn validate_destinations(destinations: &[Point]) -> Result<(), PlannerError> {
    if destinations.len() < MIN_DESTINATIONS {
        return Err(PlannerError::InvalidInput(
            "At least two destinations are required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for point in destinations {
        if point.name == START {
            return Err(PlannerError::InvalidInput(format!(
                "`{}` is reserved for the start point",
                START
            )));
        }
        if !seen.insert(point.name.as_str()) {
            return Err(PlannerError::InvalidInput(format!(
                "duplicate destination `{}`",
                point.name
            )));
        }
    }
    Ok(())
}
