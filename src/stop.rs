//! Trip stops.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Opaque stop identifier, unique within a planning session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub String);

impl StopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StopId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Id given to the pseudo-stop standing in for the trip origin.
pub const ORIGIN_ID: &str = "origin";

/// A visitable destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub coordinates: Coordinates,
    /// Locked stops keep their position when the order is optimized.
    #[serde(default)]
    pub locked: bool,
    /// Optional stops (`false`) may be dropped by the day packer.
    #[serde(default = "default_must_see")]
    pub must_see: bool,
}

fn default_must_see() -> bool {
    true
}

impl Stop {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            id: StopId::new(id),
            name: name.into(),
            coordinates,
            locked: false,
            must_see: true,
        }
    }

    /// Pseudo-stop for a starting point that is not itself a destination.
    pub fn origin(coordinates: Coordinates) -> Self {
        Self::new(ORIGIN_ID, "Start", coordinates)
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.must_see = false;
        self
    }
}

/// Must-see flag per stop id, as read by the day packer.
pub fn must_see_index(stops: &[Stop]) -> HashMap<StopId, bool> {
    stops
        .iter()
        .map(|stop| (stop.id.clone(), stop.must_see))
        .collect()
}
