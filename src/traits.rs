//! Collaborator seams for the trip planner.
//!
//! The planning engine never fetches data itself. Distances, road
//! geometry and seasonal closures are supplied through these traits so
//! apps can plug in their own providers.

use rayon::prelude::*;

use crate::error::RouteError;
use crate::geo::Coordinates;
use crate::legs::RouteGeometry;
use crate::stop::StopId;

/// Estimates the driving distance between two points.
pub trait DistanceEstimator: Sync {
    /// Distance in miles from `from` to `to`.
    fn miles(&self, from: Coordinates, to: Coordinates) -> f64;

    /// Full pairwise distance matrix, indexed by the provided point order.
    fn matrix_for(&self, points: &[Coordinates]) -> Vec<Vec<f64>> {
        points
            .par_iter()
            .map(|from| points.iter().map(|to| self.miles(*from, *to)).collect())
            .collect()
    }
}

/// Fetches a road route through an ordered list of points.
pub trait RouteGeometryProvider {
    /// Route through `points` in order (origin first, if any).
    fn fetch_route(&self, points: &[Coordinates]) -> Result<RouteGeometry, RouteError>;

    /// Largest number of waypoints a single request may carry.
    fn max_waypoints(&self) -> usize;
}

/// Answers whether a place is closed for the season in a given month.
pub trait ClosureCalendar {
    /// `month` is 1-12.
    fn is_closed(&self, stop: &StopId, month: u8) -> bool;
}
