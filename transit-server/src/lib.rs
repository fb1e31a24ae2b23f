//! Transit trip-planning server.
//!
//! Answers transit queries over a static GTFS dataset: stop search,
//! scheduled arrivals, and trip planning with up to one transfer,
//! respecting GTFS service calendars and after-midnight extended times.

pub mod domain;
pub mod geo;
pub mod planner;
pub mod resolver;
pub mod schedule;
pub mod store;
pub mod web;
