//! Itinerary search.
//!
//! Answers "how do I get from here to there" over the static GTFS
//! schedule: direct trips where one vehicle serves both stops, and
//! one-transfer trips joined at a same-stop, same-station, or
//! walking-distance transfer point. Everything is request-scoped; the
//! searches own no shared mutable state.

mod config;
mod direct;
mod plan;
mod transfer;

pub use config::PlannerConfig;
pub use direct::find_direct_itineraries;
pub use plan::{PlanRequest, PlanTripResult, StopResolutionInfo, TripPlanner};
pub use transfer::{
    InboundSegment, OutboundSegment, TransferPoint, find_transfer_itineraries,
    find_transfer_points,
};

use crate::domain::{DomainError, TimeError};
use crate::store::StoreError;

/// Error from the itinerary search.
///
/// These are the genuinely exceptional cases: storage failures and
/// malformed stored data. Empty results are not errors.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The store failed; fatal for this request
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored time string failed to parse
    #[error("malformed time in stored data: {0}")]
    MalformedTime(#[from] TimeError),

    /// Stored data produced an impossible leg or itinerary
    #[error("inconsistent stored data: {0}")]
    InconsistentData(#[from] DomainError),
}
