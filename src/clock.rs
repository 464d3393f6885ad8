//! Clock-time helpers.
//!
//! The planner does its schedule arithmetic in whole minutes since
//! midnight. Times past midnight keep counting (1500 = 01:00 next day).

use chrono::{NaiveTime, Timelike};

use crate::error::PlanError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

/// Clock time for a minute count, wrapping at midnight.
pub fn time_from_minutes(minutes: u32) -> NaiveTime {
    let wrapped = minutes % MINUTES_PER_DAY;
    NaiveTime::from_hms_opt(wrapped / 60, wrapped % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Parse `"HH:MM"` or `"HH:MM:SS"`.
pub fn parse_clock(value: &str) -> Result<NaiveTime, PlanError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| PlanError::InvalidRules(format!("invalid clock time '{}'", value)))
}

/// Format a minute count as `"HH:MM"`, with a `+Nd` suffix past midnight.
pub fn format_clock_minutes(minutes: u32) -> String {
    let days = minutes / MINUTES_PER_DAY;
    let clock = time_from_minutes(minutes).format("%H:%M").to_string();
    if days == 0 {
        clock
    } else {
        format!("{} +{}d", clock, days)
    }
}

/// Format a duration as `"2h 05m"`, or `"45m"` under an hour.
pub fn format_duration_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let hours = total / 60;
    let mins = total % 60;
    if hours == 0 {
        format!("{}m", mins)
    } else {
        format!("{}h {:02}m", hours, mins)
    }
}

/// Serde adapter storing a `NaiveTime` as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_roundtrip() {
        let t = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        assert_eq!(minutes_since_midnight(t), 450);
        assert_eq!(time_from_minutes(450), t);
    }

    #[test]
    fn test_time_from_minutes_wraps() {
        assert_eq!(time_from_minutes(MINUTES_PER_DAY + 60), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_clock_formats() {
        assert_eq!(parse_clock("07:00").unwrap(), NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(parse_clock(" 22:15:00 ").unwrap(), NaiveTime::from_hms_opt(22, 15, 0).unwrap());
        assert!(parse_clock("25:00").is_err());
        assert!(parse_clock("noon").is_err());
    }

    #[test]
    fn test_format_clock_minutes() {
        assert_eq!(format_clock_minutes(7 * 60 + 5), "07:05");
        assert_eq!(format_clock_minutes(MINUTES_PER_DAY + 90), "01:30 +1d");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_minutes(45.0), "45m");
        assert_eq!(format_duration_minutes(125.0), "2h 05m");
        assert_eq!(format_duration_minutes(-3.0), "0m");
    }
}
