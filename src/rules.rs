//! Trip rules supplied by the caller for one planning call.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::{self, MINUTES_PER_DAY};
use crate::error::PlanError;

/// Tunable constants of the ordering and advisory heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Consecutive legs turning by more than this many degrees count as backtracking.
    pub backtrack_threshold_deg: f64,
    /// Scale of the reversal penalty (1.0 = a full U-turn doubles the distance).
    pub reversal_penalty_weight: f64,
    /// Trips needing at least this many driving days get a length advisory.
    pub long_trip_days: u32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            backtrack_threshold_deg: 120.0,
            reversal_penalty_weight: 1.0,
            long_trip_days: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRules {
    pub max_drive_hours_per_day: f64,
    pub max_single_leg_hours: f64,
    pub break_minutes_per_day: u32,
    #[serde(with = "clock::hhmm")]
    pub wake_time: NaiveTime,
    #[serde(with = "clock::hhmm")]
    pub sleep_time: NaiveTime,
    /// Average effective speed used when no router duration is available.
    pub speed_mph: f64,
    /// Penalize direction reversals while ordering stops.
    pub no_backtracking: bool,
    /// Time spent at each intermediate stop of a day.
    pub visit_hours_per_park: f64,
    /// 1-12, used for seasonal closure checks.
    pub travel_month: Option<u8>,
    /// Close the route with a leg back to the first stop.
    pub round_trip: bool,
    /// Reorder unlocked stops before building legs.
    pub optimize_order: bool,
    pub heuristics: Heuristics,
}

impl Default for TripRules {
    fn default() -> Self {
        Self {
            max_drive_hours_per_day: 8.0,
            max_single_leg_hours: 6.0,
            break_minutes_per_day: 60,
            wake_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            sleep_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            speed_mph: 55.0,
            no_backtracking: false,
            visit_hours_per_park: 2.0,
            travel_month: None,
            round_trip: false,
            optimize_order: true,
            heuristics: Heuristics::default(),
        }
    }
}

impl TripRules {
    /// Parse and validate a JSON rules document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PlanError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.speed_mph.is_finite() && self.speed_mph > 0.0) {
            return Err(PlanError::InvalidRules(format!(
                "speed must be positive, got {}",
                self.speed_mph
            )));
        }
        let non_negative = [
            ("max drive hours per day", self.max_drive_hours_per_day),
            ("max single leg hours", self.max_single_leg_hours),
            ("visit hours per park", self.visit_hours_per_park),
            ("reversal penalty weight", self.heuristics.reversal_penalty_weight),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlanError::InvalidRules(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        let threshold = self.heuristics.backtrack_threshold_deg;
        if !(0.0..=180.0).contains(&threshold) {
            return Err(PlanError::InvalidRules(format!(
                "backtrack threshold must be within 0-180 degrees, got {}",
                threshold
            )));
        }
        if let Some(month) = self.travel_month {
            if !(1..=12).contains(&month) {
                return Err(PlanError::InvalidRules(format!(
                    "travel month must be 1-12, got {}",
                    month
                )));
            }
        }
        Ok(())
    }

    pub fn wake_minutes(&self) -> u32 {
        clock::minutes_since_midnight(self.wake_time)
    }

    /// Minutes between wake and sleep. A sleep time at or before wake crosses midnight.
    pub fn awake_minutes(&self) -> u32 {
        let wake = self.wake_minutes();
        let sleep = clock::minutes_since_midnight(self.sleep_time);
        if sleep > wake {
            sleep - wake
        } else {
            sleep + MINUTES_PER_DAY - wake
        }
    }

    /// Daily driving budget in minutes: the hour cap clamped by the
    /// awake window minus the break allowance.
    pub fn drive_budget_minutes(&self) -> f64 {
        let window = self.awake_minutes() as f64 - self.break_minutes_per_day as f64;
        (self.max_drive_hours_per_day * 60.0).min(window).max(0.0)
    }

    pub fn visit_minutes_per_park(&self) -> f64 {
        self.visit_hours_per_park * 60.0
    }
}
