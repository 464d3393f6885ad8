//! Day-plan packer.
//!
//! Splits the realized legs into driving days, first-fit and in route
//! order. A day always takes at least one leg, so an oversized leg gets a
//! day of its own. A leg that would overflow a non-empty day is skipped
//! when it only leads to an optional stop; otherwise it starts a new day.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::clock;
use crate::legs::Leg;
use crate::rules::TripRules;
use crate::stop::StopId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    /// 1-based day number.
    pub day: usize,
    /// Indices into the packed leg list, in driving order.
    pub leg_indices: Vec<usize>,
    pub miles: f64,
    pub drive_hours: f64,
    /// Minutes since midnight.
    pub start_minutes: u32,
    /// Minutes since midnight of the start day; may run past 1440.
    pub end_minutes: u32,
}

impl DayPlan {
    pub fn start_clock(&self) -> String {
        clock::format_clock_minutes(self.start_minutes)
    }

    pub fn end_clock(&self) -> String {
        clock::format_clock_minutes(self.end_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DayPlanResult {
    pub days: Vec<DayPlan>,
    /// Names of optional stops skipped to stay within the daily budget.
    pub dropped_optional: Vec<String>,
}

impl DayPlanResult {
    pub fn total_days(&self) -> usize {
        self.days.len()
    }
}

#[derive(Debug, Default)]
struct DayInProgress {
    leg_indices: Vec<usize>,
    minutes: f64,
    miles: f64,
}

/// Pack `legs` into days under the rules' driving budget.
///
/// Stops missing from `must_see` are treated as must-see.
pub fn pack(legs: &[Leg], rules: &TripRules, must_see: &HashMap<StopId, bool>) -> DayPlanResult {
    let budget = rules.drive_budget_minutes();
    let mut result = DayPlanResult::default();
    let mut current = DayInProgress::default();

    for (index, leg) in legs.iter().enumerate() {
        let minutes = leg.minutes();
        let fits = current.minutes + minutes <= budget;

        if !fits && !current.leg_indices.is_empty() {
            let optional = must_see.get(&leg.to_id).is_some_and(|flag| !flag);
            if optional {
                info!(stop = %leg.to_name, "dropping optional stop to stay within daily budget");
                result.dropped_optional.push(leg.to_name.clone());
                continue;
            }
            close_day(&mut result, std::mem::take(&mut current), rules);
        }

        current.leg_indices.push(index);
        current.minutes += minutes;
        current.miles += leg.miles;
    }

    if !current.leg_indices.is_empty() {
        close_day(&mut result, current, rules);
    }

    debug!(
        legs = legs.len(),
        days = result.days.len(),
        dropped = result.dropped_optional.len(),
        budget_minutes = budget,
        "packed day plan"
    );
    result
}

fn close_day(result: &mut DayPlanResult, day: DayInProgress, rules: &TripRules) {
    let start = rules.wake_minutes();
    let intermediate_stops = day.leg_indices.len().saturating_sub(1) as f64;
    let elapsed = day.minutes
        + intermediate_stops * rules.visit_minutes_per_park()
        + rules.break_minutes_per_day as f64;

    result.days.push(DayPlan {
        day: result.days.len() + 1,
        leg_indices: day.leg_indices,
        miles: day.miles,
        drive_hours: day.minutes / 60.0,
        start_minutes: start,
        end_minutes: start.saturating_add(elapsed.round() as u32),
    });
}
