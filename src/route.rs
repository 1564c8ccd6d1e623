//! Exhaustive visiting-order search over a handful of destinations.

use tracing::{debug, info};

use crate::error::PlannerError;
use crate::matrix::{DistanceMatrix, MIN_DESTINATIONS, START};

/// Hard cap on destinations; the search is factorial in this.
pub const MAX_DESTINATIONS: usize = 4;

/// The winning visiting order and its round-trip distance.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteChoice {
    pub stops: Vec<String>,
    pub total_distance: f64,
}

/// Round-trip distance start → stops… → start.
pub fn route_distance<S: AsRef<str>>(
    stops: &[S],
    matrix: &DistanceMatrix,
) -> Result<f64, PlannerError> {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Ok(0.0);
    };

    let mut total = matrix.distance(START, first.as_ref())?;
    for pair in stops.windows(2) {
        total += matrix.distance(pair[0].as_ref(), pair[1].as_ref())?;
    }
    total += matrix.distance(last.as_ref(), START)?;
    Ok(total)
}

/// Pick the permutation of `names` with the smallest round-trip distance.
///
/// Permutations are visited in lexicographic order of `names` positions and
/// only a strictly shorter route replaces the incumbent, so ties go to the
/// earliest enumerated order.
pub fn optimal_route(
    names: &[String],
    matrix: &DistanceMatrix,
) -> Result<RouteChoice, PlannerError> {
    if names.len() < MIN_DESTINATIONS || names.len() > MAX_DESTINATIONS {
        return Err(PlannerError::InvalidInput(format!(
            "between {} and {} destinations are required, got {}",
            MIN_DESTINATIONS,
            MAX_DESTINATIONS,
            names.len()
        )));
    }

    let mut best: Option<RouteChoice> = None;
    for order in permutations(names.len()) {
        let stops: Vec<&str> = order.iter().map(|&i| names[i].as_str()).collect();
        let distance = route_distance(&stops, matrix)?;
        debug!(?stops, distance, "evaluated visiting order");

        if best.as_ref().is_none_or(|b| distance < b.total_distance) {
            best = Some(RouteChoice {
                stops: stops.into_iter().map(str::to_string).collect(),
                total_distance: distance,
            });
        }
    }

    let best = best.ok_or_else(|| PlannerError::InvalidInput("no destinations".to_string()))?;
    info!(stops = ?best.stops, total_distance = best.total_distance, "selected route");
    Ok(best)
}

/// All permutations of `0..n` in lexicographic order.
fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn extend(prefix: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
        if prefix.len() == used.len() {
            out.push(prefix.clone());
            return;
        }
        for i in 0..used.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            prefix.push(i);
            extend(prefix, used, out);
            prefix.pop();
            used[i] = false;
        }
    }

    let mut out = Vec::new();
    extend(&mut Vec::with_capacity(n), &mut vec![false; n], &mut out);
    out
}
