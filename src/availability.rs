//! Detour availability scoring.
//!
//! Each of the first three stops gets a percentage expressing how much of a
//! direct trip's cost budget the shared route leaves intact: 100 means the
//! detour adds no burden. A fourth stop is always scored 0 and never gated.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::matrix::{DistanceMatrix, START};

/// Route positions that receive a computed score.
pub const SCORED_POSITIONS: usize = 3;

/// Distances feeding the percentage formula, in route-position terms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetourLegs {
    /// start → 1st stop
    pub a: f64,
    /// start → last stop
    pub b: f64,
    /// start → 2nd stop
    pub c: f64,
    /// start → 3rd stop, 0 when absent
    pub d: f64,
    /// 1st → 2nd
    pub k: f64,
    /// 2nd → 3rd, 0 when absent
    pub l: f64,
    /// 3rd → 4th, 0 when absent
    pub n: f64,
}

impl DetourLegs {
    pub fn from_route<S: AsRef<str>>(
        route: &[S],
        matrix: &DistanceMatrix,
    ) -> Result<Self, PlannerError> {
        if route.len() < 2 {
            return Err(PlannerError::InvalidInput(
                "At least two destinations are required".to_string(),
            ));
        }
        let from_start = |i: usize| matrix.distance(START, route[i].as_ref());
        let between = |i: usize, j: usize| -> Result<f64, PlannerError> {
            if j < route.len() {
                matrix.distance(route[i].as_ref(), route[j].as_ref())
            } else {
                Ok(0.0)
            }
        };

        Ok(Self {
            a: from_start(0)?,
            b: from_start(route.len() - 1)?,
            c: from_start(1)?,
            d: if route.len() > 2 { from_start(2)? } else { 0.0 },
            k: between(0, 1)?,
            l: between(1, 2)?,
            n: between(2, 3)?,
        })
    }

    /// Scores for positions 1, 2 and 3.
    pub fn percentages(&self, config: &PlannerConfig) -> [i64; SCORED_POSITIONS] {
        let t3 = self.a / 4.0 + self.k / 3.0;
        let t2 = t3 + self.l / 2.0;
        let t1 = t2 + self.n;

        [
            percentage(t1, self.b, config),
            percentage(t2, self.c, config),
            percentage(t3, self.d, config),
        ]
    }
}

/// `round((1 - (t - direct/4) / (3·direct/4 + 3M/4x)) · 100)`, half to even.
///
/// A zero denominator or non-finite result scores 0.
pub fn percentage(burden: f64, direct: f64, config: &PlannerConfig) -> i64 {
    let denominator = 3.0 * direct / 4.0 + config.reference_slack();
    if denominator == 0.0 {
        warn!(burden, direct, "zero availability denominator, scoring 0");
        return 0;
    }

    let value = ((1.0 - (burden - direct / 4.0) / denominator) * 100.0).round_ties_even();
    if value.is_finite() { value as i64 } else { 0 }
}

/// Per-stop scores in route order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityReport {
    scores: Vec<(String, i64)>,
}

impl AvailabilityReport {
    pub fn from_scores(scores: Vec<(String, i64)>) -> Self {
        Self { scores }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.scores
            .iter()
            .find(|(stop, _)| stop == name)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(stop, score)| (stop.as_str(), *score))
    }

    /// Stops with a non-zero score under `threshold`.
    ///
    /// Zero means exempt (4th stop) or degenerate and is never compared.
    pub fn below(&self, threshold: i64) -> Vec<(String, i64)> {
        self.scores
            .iter()
            .filter(|(_, score)| *score != 0 && *score < threshold)
            .cloned()
            .collect()
    }

    pub fn is_acceptable(&self, threshold: i64) -> bool {
        self.below(threshold).is_empty()
    }
}

impl Serialize for AvailabilityReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scores.len()))?;
        for (stop, score) in &self.scores {
            map.serialize_entry(stop, score)?;
        }
        map.end()
    }
}

/// Score every stop of `route`.
pub fn score<S: AsRef<str>>(
    route: &[S],
    matrix: &DistanceMatrix,
    config: &PlannerConfig,
) -> Result<AvailabilityReport, PlannerError> {
    let legs = DetourLegs::from_route(route, matrix)?;
    let percentages = legs.percentages(config);
    debug!(?legs, ?percentages, "computed availability");

    let scores = route
        .iter()
        .enumerate()
        .map(|(position, stop)| {
            let score = percentages.get(position).copied().unwrap_or(0);
            (stop.as_ref().to_string(), score)
        })
        .collect();

    Ok(AvailabilityReport { scores })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(scores: &[(&str, i64)]) -> AvailabilityReport {
        AvailabilityReport::from_scores(
            scores.iter().map(|(n, s)| (n.to_string(), *s)).collect(),
        )
    }

    #[test]
    fn test_gate_boundary_is_inclusive() {
        assert!(!report(&[("A", 59), ("B", 90)]).is_acceptable(60));
        assert!(report(&[("A", 60), ("B", 90)]).is_acceptable(60));
    }

    #[test]
    fn test_zero_scores_are_exempt() {
        assert!(report(&[("A", 80), ("B", 75), ("C", 70), ("D", 0)]).is_acceptable(60));
    }

    #[test]
    fn test_negative_score_rejects() {
        let r = report(&[("A", -12), ("B", 90)]);
        assert_eq!(r.below(60), vec![("A".to_string(), -12)]);
    }

    #[test]
    fn test_zero_denominator_scores_zero() {
        let config = PlannerConfig {
            reference_fare: 0.0,
            ..PlannerConfig::default()
        };
        assert_eq!(percentage(10.0, 0.0, &config), 0);
    }

    #[test]
    fn test_direct_trip_scores_hundred() {
        // Burden equal to a quarter of the direct distance leaves the budget intact.
        let config = PlannerConfig::default();
        assert_eq!(percentage(250.0, 1000.0, &config), 100);
    }

    #[test]
    fn test_scores_either_side_of_threshold() {
        // direct 1000: denominator = 750 + 4.716
        let config = PlannerConfig::default();
        // (1 - 0.408) * 100 = 59.2
        assert_eq!(percentage(250.0 + 0.408 * 754.716, 1000.0, &config), 59);
        // (1 - 0.398) * 100 = 60.2
        assert_eq!(percentage(250.0 + 0.398 * 754.716, 1000.0, &config), 60);
    }

    #[test]
    fn test_two_stop_route_scores() {
        let matrix = DistanceMatrix::from_pairs([
            (START, "A", 1000.0),
            (START, "B", 1200.0),
            ("A", "B", 600.0),
        ]);
        let config = PlannerConfig::default();
        let report = score(&["A", "B"], &matrix, &config).unwrap();

        // t = 250 + 200 = 450 for both positions; direct for both is start → B.
        let expected = percentage(450.0, 1200.0, &config);
        assert_eq!(report.get("A"), Some(expected));
        assert_eq!(report.get("B"), Some(expected));
    }

    #[test]
    fn test_three_stop_positions_use_own_burden_and_direct() {
        let matrix = DistanceMatrix::from_pairs([
            (START, "A", 1000.0),
            (START, "B", 1500.0),
            (START, "C", 2000.0),
            ("A", "B", 400.0),
            ("A", "C", 900.0),
            ("B", "C", 600.0),
        ]);
        let config = PlannerConfig::default();
        let report = score(&["A", "B", "C"], &matrix, &config).unwrap();

        // t3 = 250 + 400/3, t2 = t3 + 300, t1 = t2
        let t3 = 1000.0 / 4.0 + 400.0 / 3.0;
        let t2 = t3 + 600.0 / 2.0;
        assert_eq!(report.get("A"), Some(percentage(t2, 2000.0, &config)));
        assert_eq!(report.get("B"), Some(percentage(t2, 1500.0, &config)));
        assert_eq!(report.get("C"), Some(percentage(t3, 2000.0, &config)));
        assert_eq!(report.get("A"), Some(88));
        assert_eq!(report.get("B"), Some(73));
        assert_eq!(report.get("C"), Some(108));
    }

    #[test]
    fn test_four_stop_first_position_carries_last_leg() {
        let matrix = DistanceMatrix::from_pairs([
            (START, "A", 1000.0),
            (START, "B", 1500.0),
            (START, "C", 2000.0),
            (START, "D", 2500.0),
            ("A", "B", 400.0),
            ("A", "C", 900.0),
            ("A", "D", 1200.0),
            ("B", "C", 600.0),
            ("B", "D", 800.0),
            ("C", "D", 300.0),
        ]);
        let config = PlannerConfig::default();
        let report = score(&["A", "B", "C", "D"], &matrix, &config).unwrap();

        let t3 = 1000.0 / 4.0 + 400.0 / 3.0;
        let t2 = t3 + 600.0 / 2.0;
        let t1 = t2 + 300.0;
        assert_eq!(report.get("A"), Some(percentage(t1, 2500.0, &config)));
        assert_eq!(report.get("B"), Some(percentage(t2, 1500.0, &config)));
        assert_eq!(report.get("C"), Some(percentage(t3, 2000.0, &config)));
        assert_eq!(
            report.iter().collect::<Vec<_>>(),
            vec![("A", 81), ("B", 73), ("C", 108), ("D", 0)]
        );
    }

    #[test]
    fn test_fourth_stop_is_zero() {
        let matrix = DistanceMatrix::from_pairs([
            (START, "A", 100.0),
            (START, "B", 200.0),
            (START, "C", 300.0),
            (START, "D", 400.0),
            ("A", "B", 100.0),
            ("A", "C", 200.0),
            ("A", "D", 300.0),
            ("B", "C", 100.0),
            ("B", "D", 200.0),
            ("C", "D", 100.0),
        ]);
        let report = score(&["A", "B", "C", "D"], &matrix, &PlannerConfig::default()).unwrap();
        assert_eq!(report.get("D"), Some(0));
        assert_eq!(report.iter().count(), 4);
    }

    #[test]
    fn test_legs_for_three_stops() {
        let matrix = DistanceMatrix::from_pairs([
            (START, "A", 1.0),
            (START, "B", 2.0),
            (START, "C", 3.0),
            ("A", "B", 4.0),
            ("A", "C", 5.0),
            ("B", "C", 6.0),
        ]);
        let legs = DetourLegs::from_route(&["A", "B", "C"], &matrix).unwrap();
        assert_eq!(
            legs,
            DetourLegs {
                a: 1.0,
                b: 3.0,
                c: 2.0,
                d: 3.0,
                k: 4.0,
                l: 6.0,
                n: 0.0,
            }
        );
    }
}
