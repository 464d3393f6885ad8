//! Test fixtures for trip-planner.
//!
//! Provides real park and town coordinates around the US Southwest and
//! helpers for turning them into stops.

pub mod southwest_parks;

pub use southwest_parks::*;
