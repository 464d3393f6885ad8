//! Planning session: the explicit context object for one trip.
//!
//! A session owns the current stops, rules and last realized plan. Each
//! call to [`PlanningSession::plan`] recomputes order, legs and
//! violations from scratch and issues a new route generation; a road
//! route response is only applied when its generation is still the
//! latest, so a superseded response is dropped silently.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{PlanError, RouteError};
use crate::geo::Coordinates;
use crate::legs::{self, Leg, LegBuilder, RouteGeometry};
use crate::optimizer::{optimize, OrderResult};
use crate::packer::{pack, DayPlanResult};
use crate::rules::TripRules;
use crate::stop::{must_see_index, Stop, StopId, ORIGIN_ID};
use crate::traits::{ClosureCalendar, DistanceEstimator, RouteGeometryProvider};
use crate::violations::{detect, Violation};

/// Generation id attached to a route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteTicket(u64);

impl RouteTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter. Issuing a ticket invalidates all
/// earlier ones.
#[derive(Debug, Default)]
pub struct RouteGenerations {
    latest: AtomicU64,
}

impl RouteGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RouteTicket {
        RouteTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> RouteTicket {
        RouteTicket(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, ticket: RouteTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Points to send to a route geometry provider for the current plan.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub ticket: RouteTicket,
    /// Origin first (if any), then every leg end in order.
    pub waypoints: Vec<Coordinates>,
}

/// Snapshot of the last realized route.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Plan {
    pub stops: Vec<Stop>,
    pub legs: Vec<Leg>,
    pub optimized: bool,
    pub violations: Vec<Violation>,
}

impl Plan {
    pub fn total_miles(&self) -> f64 {
        self.legs.iter().map(|leg| leg.miles).sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.legs.iter().map(|leg| leg.hours).sum()
    }
}

#[derive(Debug)]
pub struct PlanningSession {
    rules: TripRules,
    origin: Option<Coordinates>,
    stops: Vec<Stop>,
    plan: Plan,
    generations: Arc<RouteGenerations>,
}

impl PlanningSession {
    pub fn new(rules: TripRules) -> Result<Self, PlanError> {
        rules.validate()?;
        Ok(Self {
            rules,
            origin: None,
            stops: Vec::new(),
            plan: Plan::default(),
            generations: Arc::new(RouteGenerations::new()),
        })
    }

    pub fn with_origin(mut self, origin: Coordinates) -> Result<Self, PlanError> {
        self.set_origin(Some(origin))?;
        Ok(self)
    }

    pub fn rules(&self) -> &TripRules {
        &self.rules
    }

    pub fn origin(&self) -> Option<Coordinates> {
        self.origin
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn plan_snapshot(&self) -> &Plan {
        &self.plan
    }

    /// Shared handle for callers checking ticket freshness off-thread.
    pub fn generations(&self) -> Arc<RouteGenerations> {
        Arc::clone(&self.generations)
    }

    pub fn set_rules(&mut self, rules: TripRules) -> Result<(), PlanError> {
        rules.validate()?;
        self.rules = rules;
        Ok(())
    }

    pub fn set_origin(&mut self, origin: Option<Coordinates>) -> Result<(), PlanError> {
        if let Some(point) = origin {
            if !point.is_valid() {
                return Err(PlanError::InvalidCoordinates {
                    id: StopId::new(ORIGIN_ID),
                });
            }
        }
        self.origin = origin;
        Ok(())
    }

    pub fn add_stop(&mut self, stop: Stop) -> Result<(), PlanError> {
        if !stop.coordinates.is_valid() {
            return Err(PlanError::InvalidCoordinates { id: stop.id });
        }
        if stop.id.as_str() == ORIGIN_ID || self.position(&stop.id).is_some() {
            return Err(PlanError::DuplicateStop(stop.id));
        }
        self.stops.push(stop);
        Ok(())
    }

    pub fn remove_stop(&mut self, id: &StopId) -> Result<Stop, PlanError> {
        let index = self.require(id)?;
        Ok(self.stops.remove(index))
    }

    /// Move a stop to `index` (clamped to the end of the list).
    pub fn move_stop(&mut self, id: &StopId, index: usize) -> Result<(), PlanError> {
        let from = self.require(id)?;
        let stop = self.stops.remove(from);
        let to = index.min(self.stops.len());
        self.stops.insert(to, stop);
        Ok(())
    }

    pub fn set_locked(&mut self, id: &StopId, locked: bool) -> Result<(), PlanError> {
        let index = self.require(id)?;
        self.stops[index].locked = locked;
        Ok(())
    }

    pub fn set_must_see(&mut self, id: &StopId, must_see: bool) -> Result<(), PlanError> {
        let index = self.require(id)?;
        self.stops[index].must_see = must_see;
        Ok(())
    }

    /// Drop all stops and the realized plan. Pending route requests are invalidated.
    pub fn clear(&mut self) {
        self.stops.clear();
        self.plan = Plan::default();
        self.generations.issue();
    }

    /// Optimize (when enabled), build legs and detect violations.
    ///
    /// The resulting order becomes the session's stop order. Legs carry
    /// straight-line geometry until a route is applied with the returned
    /// request's ticket.
    pub fn plan<E, C>(&mut self, estimator: &E, closures: &C) -> RouteRequest
    where
        E: DistanceEstimator,
        C: ClosureCalendar + ?Sized,
    {
        let order = if self.rules.optimize_order {
            optimize(&self.stops, &self.rules, self.origin, estimator)
        } else {
            OrderResult {
                stops: self.stops.clone(),
                optimized: false,
            }
        };
        self.stops = order.stops;

        let sequence: Vec<Stop> = self
            .origin
            .map(Stop::origin)
            .into_iter()
            .chain(self.stops.iter().cloned())
            .collect();
        let legs = LegBuilder::from_rules(estimator, &self.rules).build(&sequence, self.rules.round_trip);
        let violations = detect(&legs, &self.rules, &self.stops, closures);

        let waypoints = waypoints_for(&legs);
        self.plan = Plan {
            stops: self.stops.clone(),
            legs,
            optimized: order.optimized,
            violations,
        };

        let ticket = self.generations.issue();
        debug!(
            generation = ticket.generation(),
            stops = self.plan.stops.len(),
            legs = self.plan.legs.len(),
            optimized = self.plan.optimized,
            violations = self.plan.violations.len(),
            "planned route"
        );

        RouteRequest { ticket, waypoints }
    }

    /// Apply a route provider response for `ticket`.
    ///
    /// Returns true only when road geometry was applied. Superseded
    /// tickets are ignored; failures keep the straight-line legs.
    pub fn apply_route<C>(
        &mut self,
        ticket: RouteTicket,
        response: Result<RouteGeometry, RouteError>,
        closures: &C,
    ) -> bool
    where
        C: ClosureCalendar + ?Sized,
    {
        if !self.generations.is_current(ticket) {
            debug!(generation = ticket.generation(), "dropping superseded route response");
            return false;
        }

        let geometry = match response {
            Ok(geometry) => geometry,
            Err(err) => {
                warn!(error = %err, "route geometry unavailable, keeping straight-line legs");
                return false;
            }
        };

        if !legs::apply_route(&mut self.plan.legs, &geometry) {
            warn!(points = geometry.polyline.len(), "malformed route geometry, keeping straight-line legs");
            return false;
        }

        self.plan.violations = detect(&self.plan.legs, &self.rules, &self.stops, closures);
        true
    }

    /// Fetch and apply road geometry for `request` synchronously.
    pub fn fetch_route<P, C>(&mut self, provider: &P, request: &RouteRequest, closures: &C) -> bool
    where
        P: RouteGeometryProvider + ?Sized,
        C: ClosureCalendar + ?Sized,
    {
        if request.waypoints.len() < 2 {
            return false;
        }
        let max = provider.max_waypoints();
        if request.waypoints.len() > max {
            warn!(
                waypoints = request.waypoints.len(),
                max, "too many waypoints for route provider, keeping straight-line legs"
            );
            return false;
        }

        let response = provider.fetch_route(&request.waypoints);
        self.apply_route(request.ticket, response, closures)
    }

    /// Pack the current legs into days.
    pub fn day_plan(&self) -> DayPlanResult {
        pack(&self.plan.legs, &self.rules, &must_see_index(&self.stops))
    }

    fn position(&self, id: &StopId) -> Option<usize> {
        self.stops.iter().position(|stop| &stop.id == id)
    }

    fn require(&self, id: &StopId) -> Result<usize, PlanError> {
        self.position(id).ok_or_else(|| PlanError::UnknownStop(id.clone()))
    }
}

fn waypoints_for(legs: &[Leg]) -> Vec<Coordinates> {
    legs.first()
        .map(|leg| leg.from)
        .into_iter()
        .chain(legs.iter().map(|leg| leg.to))
        .collect()
}
