//! Domain types for the transit trip planner.
//!
//! This module contains the core domain model types that represent
//! validated GTFS data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod error;
mod gtfs_time;
mod ids;
mod itinerary;
mod service_day;

pub use error::DomainError;
pub use gtfs_time::{GtfsTime, TimeError};
pub use ids::{RouteId, ServiceId, StopId, TripId};
pub use itinerary::{Itinerary, StopRef, TransferMeta, TripLeg};
pub use service_day::{
    DEFAULT_END_TIME_SECONDS, LATE_NIGHT_THRESHOLD_HOUR, QueryWindow, ServiceContext,
};
