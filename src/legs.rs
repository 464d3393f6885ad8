//! Leg construction from an ordered stop sequence.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::{bearing, Coordinates};
use crate::polyline::Polyline;
use crate::rules::TripRules;
use crate::stop::{Stop, StopId};
use crate::traits::DistanceEstimator;

/// One directed drive between consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub from_id: StopId,
    pub to_id: StopId,
    pub from_name: String,
    pub to_name: String,
    pub from: Coordinates,
    pub to: Coordinates,
    pub miles: f64,
    pub hours: f64,
    pub geometry: Polyline,
}

impl Leg {
    pub fn minutes(&self) -> f64 {
        self.hours * 60.0
    }

    /// Compass heading from the leg start to its end.
    pub fn bearing(&self) -> f64 {
        bearing(self.from, self.to)
    }
}

/// Road route returned by a geometry provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteGeometry {
    pub polyline: Polyline,
    /// Drive time for the whole route, if the provider reported one.
    pub total_hours: Option<f64>,
    /// Per-leg drive times, in route order.
    pub leg_hours: Option<Vec<f64>>,
}

impl RouteGeometry {
    pub fn new(polyline: Polyline) -> Self {
        Self {
            polyline,
            total_hours: None,
            leg_hours: None,
        }
    }

    pub fn with_total_hours(mut self, hours: f64) -> Self {
        self.total_hours = Some(hours);
        self
    }

    pub fn with_leg_hours(mut self, hours: Vec<f64>) -> Self {
        self.leg_hours = Some(hours);
        self
    }
}

/// Turns stop sequences into legs using a distance estimator and an
/// average speed.
#[derive(Debug, Clone)]
pub struct LegBuilder<'a, E> {
    estimator: &'a E,
    speed_mph: f64,
}

impl<'a, E> LegBuilder<'a, E>
where
    E: DistanceEstimator,
{
    pub fn new(estimator: &'a E, speed_mph: f64) -> Self {
        Self {
            estimator,
            speed_mph,
        }
    }

    pub fn from_rules(estimator: &'a E, rules: &TripRules) -> Self {
        Self::new(estimator, rules.speed_mph)
    }

    /// Legs between consecutive stops, plus a closing leg back to the
    /// first stop when `round_trip` is set. Fewer than two stops yield none.
    pub fn build(&self, stops: &[Stop], round_trip: bool) -> Vec<Leg> {
        if stops.len() < 2 {
            return Vec::new();
        }

        let closing = if round_trip { stops.first() } else { None };
        let sequence: Vec<&Stop> = stops.iter().chain(closing).collect();

        let legs: Vec<Leg> = sequence
            .windows(2)
            .map(|pair| self.leg_between(pair[0], pair[1]))
            .collect();

        debug!(stops = stops.len(), legs = legs.len(), round_trip, "built legs");
        legs
    }

    fn leg_between(&self, from: &Stop, to: &Stop) -> Leg {
        let miles = self.estimator.miles(from.coordinates, to.coordinates);
        let hours = if self.speed_mph > 0.0 {
            miles / self.speed_mph
        } else {
            0.0
        };

        Leg {
            from_id: from.id.clone(),
            to_id: to.id.clone(),
            from_name: from.name.clone(),
            to_name: to.name.clone(),
            from: from.coordinates,
            to: to.coordinates,
            miles,
            hours,
            geometry: Polyline::straight(from.coordinates, to.coordinates),
        }
    }
}

/// Slice a full road route onto `legs`.
///
/// Each leg endpoint is matched to its nearest route point, searching
/// forward from the previous match, and the leg takes the route between
/// consecutive matches. Provider durations replace the speed estimate:
/// per-leg values when there is one per leg, otherwise the total shared
/// by each slice's length. Returns false, leaving `legs` untouched, when
/// the route has fewer than two points.
pub fn apply_route(legs: &mut [Leg], route: &RouteGeometry) -> bool {
    let polyline = &route.polyline;
    if legs.is_empty() || polyline.len() < 2 {
        return false;
    }

    let waypoints: Vec<Coordinates> = legs
        .first()
        .map(|leg| leg.from)
        .into_iter()
        .chain(legs.iter().map(|leg| leg.to))
        .collect();

    let mut anchors = Vec::with_capacity(waypoints.len());
    let mut cursor = 0;
    for waypoint in &waypoints {
        cursor = polyline.nearest_index_from(*waypoint, cursor).unwrap_or(cursor);
        anchors.push(cursor);
    }

    for (leg, bounds) in legs.iter_mut().zip(anchors.windows(2)) {
        let slice = polyline.slice(bounds[0], bounds[1]);
        leg.geometry = if slice.len() >= 2 {
            slice
        } else {
            Polyline::straight(leg.from, leg.to)
        };
    }

    match (&route.leg_hours, route.total_hours) {
        (Some(per_leg), _) if per_leg.len() == legs.len() => {
            for (leg, hours) in legs.iter_mut().zip(per_leg) {
                leg.hours = *hours;
            }
        }
        (_, Some(total)) => share_total_hours(legs, total),
        _ => {}
    }

    debug!(legs = legs.len(), points = polyline.len(), "applied route geometry");
    true
}

fn share_total_hours(legs: &mut [Leg], total: f64) {
    let lengths: Vec<f64> = legs.iter().map(|leg| leg.geometry.length_miles()).collect();
    let sum: f64 = lengths.iter().sum();
    let miles_sum: f64 = legs.iter().map(|leg| leg.miles).sum();

    for (leg, length) in legs.iter_mut().zip(lengths) {
        let share = if sum > 0.0 {
            length / sum
        } else if miles_sum > 0.0 {
            leg.miles / miles_sum
        } else {
            0.0
        };
        leg.hours = total * share;
    }
}
