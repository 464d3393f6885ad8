//! Haversine distance estimator (default when no road router is used).
//!
//! Uses great-circle distance, optionally scaled by a road coefficient.
//! Less accurate than a road router but always available.

use crate::geo::{great_circle_miles, Coordinates};
use crate::traits::DistanceEstimator;

/// Straight-line distance estimator.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Multiplier applied to the straight-line distance (1.0 = crow flies).
    pub road_coefficient: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            road_coefficient: 1.0,
        }
    }
}

impl HaversineEstimator {
    pub fn new(road_coefficient: f64) -> Self {
        Self { road_coefficient }
    }
}

impl DistanceEstimator for HaversineEstimator {
    fn miles(&self, from: Coordinates, to: Coordinates) -> f64 {
        great_circle_miles(from, to) * self.road_coefficient
    }
}
