//! trip-planner core
//!
//! Orders road-trip stops, builds drive legs, packs them into days and
//! flags rule violations. Distances, road geometry and closures come in
//! through the collaborator traits.

pub mod traits;
pub mod error;
pub mod geo;
pub mod haversine;
pub mod clock;
pub mod rules;
pub mod stop;
pub mod optimizer;
pub mod polyline;
pub mod legs;
pub mod packer;
pub mod violations;
pub mod closures;
pub mod osrm;
pub mod session;
