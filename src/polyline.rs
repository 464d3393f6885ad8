//! Polyline representation for leg and route geometries.
//!
//! Stores decoded coordinates. Encoding to compact or GeoJSON formats
//! happens at the boundary, not within the planner core.

use serde::{Deserialize, Serialize};

use crate::geo::{great_circle_miles, Coordinates};

/// An ordered sequence of points along a drive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinates>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinates>) -> Self {
        Self { points }
    }

    /// Two-point fallback geometry between leg endpoints.
    pub fn straight(from: Coordinates, to: Coordinates) -> Self {
        Self {
            points: vec![from, to],
        }
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinates> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point closest to `target`, searching from `start` onwards.
    pub fn nearest_index_from(&self, target: Coordinates, start: usize) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .skip(start)
            .map(|(index, point)| (index, great_circle_miles(*point, target)))
            .fold(None, |best: Option<(usize, f64)>, (index, miles)| match best {
                Some((_, best_miles)) if best_miles <= miles => best,
                _ => Some((index, miles)),
            })
            .map(|(index, _)| index)
    }

    /// Points `start..=end` as a new polyline.
    pub fn slice(&self, start: usize, end: usize) -> Polyline {
        let end = end.min(self.points.len().saturating_sub(1));
        if self.points.is_empty() || start > end {
            return Polyline::default();
        }
        Polyline::new(self.points[start..=end].to_vec())
    }

    /// Length along the line in miles.
    pub fn length_miles(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| great_circle_miles(pair[0], pair[1]))
            .sum()
    }
}
