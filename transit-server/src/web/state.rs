//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::TripPlanner;
use crate::resolver::IndexStopResolver;
use crate::schedule::ScheduleService;

/// Shared application state.
///
/// Every service is constructed once at startup and injected here;
/// handlers reach nothing through globals.
#[derive(Clone)]
pub struct AppState {
    /// The trip planner, wired to the index-backed resolver.
    pub planner: Arc<TripPlanner<IndexStopResolver>>,

    /// Scheduled-arrivals lookups.
    pub schedule: Arc<ScheduleService>,

    /// Stop resolution, exposed directly for the resolve endpoint.
    pub resolver: Arc<IndexStopResolver>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        planner: TripPlanner<IndexStopResolver>,
        schedule: ScheduleService,
        resolver: IndexStopResolver,
    ) -> Self {
        Self {
            planner: Arc::new(planner),
            schedule: Arc::new(schedule),
            resolver: Arc::new(resolver),
        }
    }
}
