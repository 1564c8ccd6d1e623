//! Shared-fare allocation along a chosen route.
//!
//! Every stop pays an amortized share of each leg up to its own drop-off
//! (earlier legs are spread across more riders), and the final cumulative
//! share is pooled and redistributed by benefit: how much cheaper the full
//! shared route is compared to the trip the others would have taken without
//! that stop.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info};

use crate::error::PlannerError;
use crate::traits::{Coordinate, Point, RouteSummaryProvider};

/// How the last stop's counterfactual trip is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counterfactual {
    /// Last stop benefits exactly 1: compared against the full route.
    FullRoute,
    /// Last stop is compared against the route that skips it.
    SkipStop,
}

/// Per-size constants of the split.
#[derive(Debug, Clone, Copy)]
struct SplitProfile {
    /// Divisor of the first leg; each later leg uses one less.
    first_divisor: f64,
    last_counterfactual: Counterfactual,
    round_first_share: bool,
}

fn profile_for(stops: usize) -> Option<SplitProfile> {
    match stops {
        2 => Some(SplitProfile {
            first_divisor: 4.0,
            last_counterfactual: Counterfactual::FullRoute,
            round_first_share: false,
        }),
        3 => Some(SplitProfile {
            first_divisor: 5.0,
            last_counterfactual: Counterfactual::FullRoute,
            round_first_share: false,
        }),
        4 => Some(SplitProfile {
            first_divisor: 5.0,
            last_counterfactual: Counterfactual::SkipStop,
            round_first_share: true,
        }),
        _ => None,
    }
}

/// Per-stop fare shares in route order.
#[derive(Debug, Clone, PartialEq)]
pub struct FareSplit {
    shares: Vec<(String, f64)>,
    base_costs: Vec<f64>,
    pool: f64,
}

impl FareSplit {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.shares
            .iter()
            .find(|(stop, _)| stop == name)
            .map(|(_, share)| *share)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.shares.iter().map(|(stop, share)| (stop.as_str(), *share))
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all shares.
    pub fn total(&self) -> f64 {
        self.shares.iter().map(|(_, share)| share).sum()
    }

    /// Cumulative amortized cost of each stop before pooling.
    pub fn base_costs(&self) -> &[f64] {
        &self.base_costs
    }

    /// The amount redistributed by benefit.
    pub fn pool(&self) -> f64 {
        self.pool
    }
}

impl Serialize for FareSplit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.shares.len()))?;
        for (stop, share) in &self.shares {
            map.serialize_entry(stop, share)?;
        }
        map.end()
    }
}

/// Directed leg fares for one route, fetched at most once each.
///
/// Node 0 is the start; node `i + 1` is the i-th stop of the route.
struct LegFares<'a, P: ?Sized> {
    provider: &'a P,
    nodes: Vec<Coordinate>,
    cache: HashMap<(usize, usize), f64>,
}

impl<'a, P> LegFares<'a, P>
where
    P: RouteSummaryProvider + ?Sized,
{
    fn fare(&mut self, from: usize, to: usize) -> Result<f64, PlannerError> {
        if let Some(fare) = self.cache.get(&(from, to)) {
            return Ok(*fare);
        }
        let fare = self.provider.fare(self.nodes[from], self.nodes[to])?;
        debug!(from, to, fare, "fetched leg fare");
        self.cache.insert((from, to), fare);
        Ok(fare)
    }

    /// Fare of driving from the start through `stops` (route indices) in order.
    fn path_fare(&mut self, stops: impl IntoIterator<Item = usize>) -> Result<f64, PlannerError> {
        let mut total = 0.0;
        let mut at = 0;
        for stop in stops {
            total += self.fare(at, stop + 1)?;
            at = stop + 1;
        }
        Ok(total)
    }
}

/// Split the shared fare of `route` among its stops.
///
/// `route` must be a 2 to 4 stop ordering of names found in `destinations`.
pub fn allocate<P, S>(
    provider: &P,
    route: &[S],
    start: Coordinate,
    destinations: &[Point],
) -> Result<FareSplit, PlannerError>
where
    P: RouteSummaryProvider + ?Sized,
    S: AsRef<str>,
{
    let profile = profile_for(route.len()).ok_or_else(|| {
        PlannerError::InvalidInput(format!(
            "fares can be split for 2 to 4 stops, got {}",
            route.len()
        ))
    })?;

    let mut nodes = Vec::with_capacity(route.len() + 1);
    nodes.push(start);
    for stop in route {
        let point = destinations
            .iter()
            .find(|p| p.name == stop.as_ref())
            .ok_or_else(|| PlannerError::UnknownPoint(stop.as_ref().to_string()))?;
        nodes.push(point.coordinate);
    }

    let mut legs = LegFares {
        provider,
        nodes,
        cache: HashMap::new(),
    };
    let stops = route.len();

    let mut base_costs: Vec<f64> = Vec::with_capacity(stops);
    for i in 0..stops {
        let leg = legs.fare(i, i + 1)?;
        let own = leg / (profile.first_divisor - i as f64);
        let cost = base_costs.iter().fold(own, |acc, prior| acc + prior);
        base_costs.push(cost);
    }
    let pool = base_costs[stops - 1];

    let full_route = legs.path_fare(0..stops)?;
    let mut counterfactuals = Vec::with_capacity(stops);
    for i in 0..stops {
        let q = if i == stops - 1 && profile.last_counterfactual == Counterfactual::FullRoute {
            full_route
        } else {
            legs.path_fare((0..stops).filter(|&j| j != i))?
        };
        if q == 0.0 {
            return Err(PlannerError::DegenerateFare {
                stop: route[i].as_ref().to_string(),
            });
        }
        counterfactuals.push(q);
    }

    let benefits: Vec<f64> = counterfactuals.iter().map(|q| full_route / q).collect();
    let total_benefit = benefits.iter().fold(0.0, |acc, b| acc + b);
    if total_benefit == 0.0 {
        return Err(PlannerError::DegenerateFare {
            stop: route[stops - 1].as_ref().to_string(),
        });
    }

    let shares = route
        .iter()
        .zip(base_costs.iter().zip(&benefits))
        .enumerate()
        .map(|(i, (stop, (base, benefit)))| {
            let mut share = base + pool * benefit / total_benefit;
            if i == 0 && profile.round_first_share {
                share = share.round_ties_even();
            }
            (stop.as_ref().to_string(), share)
        })
        .collect::<Vec<_>>();

    info!(?shares, pool, full_route, "allocated fares");
    Ok(FareSplit {
        shares,
        base_costs,
        pool,
    })
}
