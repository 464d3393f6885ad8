//! Seasonal closure lookups.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::stop::StopId;
use crate::traits::ClosureCalendar;

/// Calendar with no closures at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClosures;

impl ClosureCalendar for NoClosures {
    fn is_closed(&self, _stop: &StopId, _month: u8) -> bool {
        false
    }
}

/// Closed months (1-12) per stop id.
///
/// Loads from JSON shaped like `{"lassen": [11, 12, 1, 2, 3]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonalClosures {
    months: HashMap<StopId, BTreeSet<u8>>,
}

impl SeasonalClosures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, PlanError> {
        let closures: Self = serde_json::from_str(json)?;
        if let Some((stop, month)) = closures
            .months
            .iter()
            .find_map(|(stop, months)| months.iter().find(|m| !(1..=12).contains(*m)).map(|m| (stop, *m)))
        {
            return Err(PlanError::InvalidRules(format!(
                "closure month {} for {} must be 1-12",
                month, stop
            )));
        }
        Ok(closures)
    }

    /// Mark `stop` closed in each of `months`.
    pub fn close(&mut self, stop: impl Into<String>, months: impl IntoIterator<Item = u8>) {
        self.months
            .entry(StopId::new(stop))
            .or_default()
            .extend(months);
    }

    pub fn closed_months(&self, stop: &StopId) -> Option<&BTreeSet<u8>> {
        self.months.get(stop)
    }
}

impl ClosureCalendar for SeasonalClosures {
    fn is_closed(&self, stop: &StopId, month: u8) -> bool {
        self.months
            .get(stop)
            .is_some_and(|months| months.contains(&month))
    }
}
