//! Real US Southwest park and town locations for realistic fixtures.
//!
//! Coordinates are visitor centers or town centers, approximate to a few
//! hundred meters.

use trip_planner::geo::Coordinates;
use trip_planner::stop::Stop;

/// A named place with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub id: &'static str,
    pub name: &'static str,
    pub lng: f64,
    pub lat: f64,
}

impl Place {
    pub const fn new(id: &'static str, name: &'static str, lng: f64, lat: f64) -> Self {
        Self { id, name, lng, lat }
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lng, self.lat)
    }

    pub fn stop(&self) -> Stop {
        Stop::new(self.id, self.name, self.coords())
    }
}

// ============================================================================
// Origin town
// ============================================================================

pub const LAS_VEGAS: Place = Place::new("las-vegas", "Las Vegas", -115.1398, 36.1699);

// ============================================================================
// Utah "Mighty 5" and neighbors
// ============================================================================

pub const ZION: Place = Place::new("zion", "Zion", -112.9866, 37.2002);
pub const BRYCE: Place = Place::new("bryce", "Bryce Canyon", -112.1871, 37.6405);
pub const CAPITOL_REEF: Place = Place::new("capitol-reef", "Capitol Reef", -111.2615, 38.2917);
pub const ARCHES: Place = Place::new("arches", "Arches", -109.5925, 38.7331);
pub const CANYONLANDS: Place = Place::new("canyonlands", "Canyonlands", -109.8210, 38.4598);
pub const GREAT_BASIN: Place = Place::new("great-basin", "Great Basin", -114.2634, 39.0054);

// ============================================================================
// Arizona / Four Corners
// ============================================================================

pub const GRAND_CANYON_SOUTH: Place =
    Place::new("grand-canyon-south", "Grand Canyon South Rim", -112.1401, 36.0544);
pub const GRAND_CANYON_NORTH: Place =
    Place::new("grand-canyon-north", "Grand Canyon North Rim", -112.0520, 36.2135);
pub const HORSESHOE_BEND: Place = Place::new("horseshoe-bend", "Horseshoe Bend", -111.5109, 36.8791);
pub const MONUMENT_VALLEY: Place = Place::new("monument-valley", "Monument Valley", -110.0985, 36.9980);
pub const MESA_VERDE: Place = Place::new("mesa-verde", "Mesa Verde", -108.4618, 37.2309);
pub const PETRIFIED_FOREST: Place =
    Place::new("petrified-forest", "Petrified Forest", -109.7820, 35.0658);

/// Stops for every place, in the given order.
pub fn stops(places: &[Place]) -> Vec<Stop> {
    places.iter().map(Place::stop).collect()
}

/// Ids of `stops`, in order.
pub fn ids(stops: &[Stop]) -> Vec<String> {
    stops.iter().map(|stop| stop.id.to_string()).collect()
}
