//! Rule checks over a realized route.
//!
//! Every check runs on each call and contributes independently. Violations
//! are advisory and never block route construction.

use serde::Serialize;

use crate::geo::bearing_difference;
use crate::legs::Leg;
use crate::rules::TripRules;
use crate::stop::Stop;
use crate::traits::ClosureCalendar;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    LegTooLong,
    WindowExceeded,
    TripTooLong,
    Backtracking,
    SeasonalClosure,
    LockRoundtripConflict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, message: String) -> Self {
        Self { kind, message }
    }
}

pub fn detect<C>(legs: &[Leg], rules: &TripRules, stops: &[Stop], closures: &C) -> Vec<Violation>
where
    C: ClosureCalendar + ?Sized,
{
    let mut violations = Vec::new();
    let window_hours = rules.drive_budget_minutes() / 60.0;

    if let Some(longest) = longest_leg(legs) {
        if longest.hours > rules.max_single_leg_hours {
            violations.push(Violation::new(
                ViolationKind::LegTooLong,
                format!(
                    "{} to {} takes {:.1}h, over the {:.1}h single-leg limit",
                    longest.from_name, longest.to_name, longest.hours, rules.max_single_leg_hours
                ),
            ));
        }
        if longest.hours > window_hours {
            violations.push(Violation::new(
                ViolationKind::WindowExceeded,
                format!(
                    "{} to {} takes {:.1}h, longer than the {:.1}h daily driving window",
                    longest.from_name, longest.to_name, longest.hours, window_hours
                ),
            ));
        }
    }

    if window_hours > 0.0 {
        let total_hours: f64 = legs.iter().map(|leg| leg.hours).sum();
        let days = (total_hours / window_hours).ceil() as u32;
        if days >= rules.heuristics.long_trip_days {
            violations.push(Violation::new(
                ViolationKind::TripTooLong,
                format!(
                    "{:.1}h of driving needs about {} days at {:.1}h per day",
                    total_hours, days, window_hours
                ),
            ));
        }
    }

    let reversals = count_reversals(legs, rules.heuristics.backtrack_threshold_deg);
    if reversals > 0 {
        let subject = if reversals == 1 {
            "1 leg doubles back".to_string()
        } else {
            format!("{} legs double back", reversals)
        };
        let message = if rules.no_backtracking {
            format!("{} even with backtracking avoidance on", subject)
        } else {
            format!("{}; enable backtracking avoidance to reduce zig-zagging", subject)
        };
        violations.push(Violation::new(ViolationKind::Backtracking, message));
    }

    if let Some(month) = rules.travel_month {
        let month_name = MONTH_NAMES
            .get(usize::from(month).wrapping_sub(1))
            .copied()
            .unwrap_or("the travel month");
        for stop in stops.iter().filter(|stop| closures.is_closed(&stop.id, month)) {
            violations.push(Violation::new(
                ViolationKind::SeasonalClosure,
                format!("{} is seasonally closed in {}", stop.name, month_name),
            ));
        }
    }

    if rules.optimize_order && rules.round_trip && stops.iter().any(|stop| stop.locked) {
        violations.push(Violation::new(
            ViolationKind::LockRoundtripConflict,
            "Optimization, locked stops and round trip together over-constrain the route order"
                .to_string(),
        ));
    }

    violations
}

fn longest_leg(legs: &[Leg]) -> Option<&Leg> {
    legs.iter().fold(None, |longest: Option<&Leg>, leg| match longest {
        Some(current) if current.hours >= leg.hours => Some(current),
        _ => Some(leg),
    })
}

/// Consecutive leg pairs whose headings differ by more than `threshold_deg`.
fn count_reversals(legs: &[Leg], threshold_deg: f64) -> usize {
    legs.windows(2)
        .filter(|pair| bearing_difference(pair[0].bearing(), pair[1].bearing()) > threshold_deg)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closures::{NoClosures, SeasonalClosures};
    use crate::geo::Coordinates;
    use crate::polyline::Polyline;
    use crate::stop::StopId;

    fn leg(from: (f64, f64), to: (f64, f64), hours: f64) -> Leg {
        Leg {
            from_id: StopId::from("x"),
            to_id: StopId::from("y"),
            from_name: "X".to_string(),
            to_name: "Y".to_string(),
            from: from.into(),
            to: to.into(),
            miles: hours * 55.0,
            hours,
            geometry: Polyline::default(),
        }
    }

    fn kinds(violations: &[Violation]) -> Vec<ViolationKind> {
        violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_empty_legs_no_violations() {
        assert!(detect(&[], &TripRules::default(), &[], &NoClosures).is_empty());
    }

    #[test]
    fn test_long_leg_hits_leg_and_window() {
        let rules = TripRules {
            max_single_leg_hours: 10.0,
            ..TripRules::default()
        };
        let legs = vec![leg((0.0, 0.0), (10.0, 0.0), 12.0)];
        let violations = detect(&legs, &rules, &[], &NoClosures);
        assert_eq!(
            kinds(&violations),
            vec![ViolationKind::LegTooLong, ViolationKind::WindowExceeded]
        );
    }

    #[test]
    fn test_trip_length_advisory() {
        // 10 legs of 7.5h against an 8h window is 10 days
        let legs: Vec<Leg> = (0..10)
            .map(|i| leg((i as f64, 0.0), (i as f64 + 1.0, 0.0), 7.5))
            .collect();
        let rules = TripRules {
            max_single_leg_hours: 8.0,
            ..TripRules::default()
        };
        let violations = detect(&legs, &rules, &[], &NoClosures);
        assert_eq!(kinds(&violations), vec![ViolationKind::TripTooLong]);
    }

    #[test]
    fn test_backtracking_counted_regardless_of_switch() {
        let legs = vec![
            leg((0.0, 0.0), (1.0, 0.0), 1.0),
            leg((1.0, 0.0), (0.5, 0.0), 1.0),
            leg((0.5, 0.0), (2.0, 0.0), 1.0),
        ];
        let off = detect(&legs, &TripRules::default(), &[], &NoClosures);
        assert_eq!(kinds(&off), vec![ViolationKind::Backtracking]);
        assert!(off[0].message.starts_with("2 legs double back"));

        let rules = TripRules {
            no_backtracking: true,
            ..TripRules::default()
        };
        let on = detect(&legs, &rules, &[], &NoClosures);
        assert_eq!(kinds(&on), vec![ViolationKind::Backtracking]);
        assert_ne!(off[0].message, on[0].message);
    }

    #[test]
    fn test_right_angle_is_not_backtracking() {
        let legs = vec![
            leg((0.0, 0.0), (1.0, 0.0), 1.0),
            leg((1.0, 0.0), (1.0, 1.0), 1.0),
        ];
        assert!(detect(&legs, &TripRules::default(), &[], &NoClosures).is_empty());
    }

    #[test]
    fn test_seasonal_closure_per_stop() {
        let stops = vec![
            Stop::new("lassen", "Lassen", Coordinates::new(-121.5, 40.5)),
            Stop::new("zion", "Zion", Coordinates::new(-113.0, 37.3)),
            Stop::new("crater", "Crater Lake", Coordinates::new(-122.1, 42.9)),
        ];
        let mut closures = SeasonalClosures::new();
        closures.close("lassen", [12, 1, 2]);
        closures.close("crater", [1]);

        let rules = TripRules {
            travel_month: Some(1),
            ..TripRules::default()
        };
        let violations = detect(&[], &rules, &stops, &closures);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::SeasonalClosure));
        assert_eq!(violations[0].message, "Lassen is seasonally closed in January");

        let summer = TripRules {
            travel_month: Some(7),
            ..TripRules::default()
        };
        assert!(detect(&[], &summer, &stops, &closures).is_empty());
    }

    #[test]
    fn test_lock_roundtrip_conflict() {
        let stops = vec![
            Stop::new("a", "A", Coordinates::new(0.0, 0.0)),
            Stop::new("b", "B", Coordinates::new(1.0, 0.0)).locked(),
        ];
        let rules = TripRules {
            round_trip: true,
            ..TripRules::default()
        };
        let violations = detect(&[], &rules, &stops, &NoClosures);
        assert_eq!(kinds(&violations), vec![ViolationKind::LockRoundtripConflict]);

        let manual = TripRules {
            optimize_order: false,
            ..rules
        };
        assert!(detect(&[], &manual, &stops, &NoClosures).is_empty());
    }

    #[test]
    fn test_violation_serializes_type_tag() {
        let v = Violation::new(ViolationKind::LegTooLong, "x".to_string());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "leg-too-long");
    }
}
