//! Stop-order optimizer.
//!
//! Greedy nearest-neighbor construction over the unlocked stops, with an
//! optional penalty for turning back on the previous heading. Locked
//! stops never move: the search only sees the unlocked subset and the
//! result is merged back around the locked positions afterwards.

use tracing::debug;

use crate::geo::{bearing, bearing_difference, Coordinates};
use crate::rules::TripRules;
use crate::stop::Stop;
use crate::traits::DistanceEstimator;

/// Unlocked stops needed before reordering is worthwhile.
pub const MIN_UNLOCKED_STOPS: usize = 3;

/// With an explicit origin the first hop is anchored, so two stops suffice.
pub const MIN_UNLOCKED_STOPS_WITH_ORIGIN: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderResult {
    pub stops: Vec<Stop>,
    /// False when the input was returned unchanged.
    pub optimized: bool,
}

/// Order `stops` for visiting, keeping locked stops at their index.
///
/// Without an origin the first unlocked stop is the fixed tour start.
pub fn optimize<E>(
    stops: &[Stop],
    rules: &TripRules,
    origin: Option<Coordinates>,
    estimator: &E,
) -> OrderResult
where
    E: DistanceEstimator,
{
    let unlocked: Vec<&Stop> = stops.iter().filter(|stop| !stop.locked).collect();
    let minimum = if origin.is_some() {
        MIN_UNLOCKED_STOPS_WITH_ORIGIN
    } else {
        MIN_UNLOCKED_STOPS
    };

    if unlocked.len() < minimum {
        debug!(unlocked = unlocked.len(), minimum, "too few stops to optimize");
        return OrderResult {
            stops: stops.to_vec(),
            optimized: false,
        };
    }

    let mut points = Vec::with_capacity(unlocked.len() + 1);
    points.extend(origin);
    let offset = points.len();
    points.extend(unlocked.iter().map(|stop| stop.coordinates));

    let path = nearest_neighbor_path(&points, offset, rules, estimator);
    let ordered = path
        .into_iter()
        .filter(|&point| point >= offset)
        .map(|point| unlocked[point - offset]);

    debug!(
        stops = stops.len(),
        locked = stops.len() - unlocked.len(),
        no_backtracking = rules.no_backtracking,
        "optimized stop order"
    );

    OrderResult {
        stops: merge_locked(stops, ordered),
        optimized: true,
    }
}

/// Visit order over `points`, as point indices.
///
/// Points before `offset` are the origin (already placed); the rest are
/// candidates. Ties keep the first candidate in input order.
fn nearest_neighbor_path<E>(
    points: &[Coordinates],
    offset: usize,
    rules: &TripRules,
    estimator: &E,
) -> Vec<usize>
where
    E: DistanceEstimator,
{
    let matrix = estimator.matrix_for(points);
    let weight = rules.heuristics.reversal_penalty_weight;

    let mut pool: Vec<usize> = (offset..points.len()).collect();
    let mut path: Vec<usize> = Vec::with_capacity(points.len());
    if offset > 0 {
        path.push(0);
    } else {
        path.push(pool.remove(0));
    }

    while !pool.is_empty() {
        let current = path[path.len() - 1];
        let heading = if rules.no_backtracking && path.len() >= 2 {
            Some(bearing(points[path[path.len() - 2]], points[current]))
        } else {
            None
        };

        let mut best: Option<(usize, f64)> = None;
        for (slot, &candidate) in pool.iter().enumerate() {
            let raw = matrix[current][candidate];
            let score = match heading {
                Some(heading) => {
                    let turn = bearing_difference(heading, bearing(points[current], points[candidate]));
                    raw + weight * (turn / 180.0) * raw
                }
                None => raw,
            };
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((slot, score));
            }
        }

        let Some((slot, _)) = best else { break };
        path.push(pool.remove(slot));
    }

    path
}

/// Put locked stops back at their original index, filling the remaining
/// slots with `ordered` in sequence.
fn merge_locked<'a>(original: &[Stop], ordered: impl IntoIterator<Item = &'a Stop>) -> Vec<Stop> {
    let mut fill = ordered.into_iter();
    original
        .iter()
        .filter_map(|stop| {
            if stop.locked {
                Some(stop.clone())
            } else {
                fill.next().cloned()
            }
        })
        .collect()
}
