//! The trip-planning orchestrator.
//!
//! Resolves both endpoints through the fuzzy resolver, runs the direct
//! and transfer searches concurrently, and merges the results into one
//! ranked list. "No route found" and "couldn't resolve that stop" are
//! ordinary outcomes reported in the result, never errors.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::{GtfsTime, Itinerary, QueryWindow, StopId};
use crate::resolver::{MatchConfidence, ResolveError, StopResolution, StopResolver};
use crate::store::GtfsStore;

use super::config::PlannerConfig;
use super::direct::find_direct_itineraries;
use super::transfer::find_transfer_itineraries;
use super::PlanError;

/// A trip-planning request as it arrives from the caller.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Origin query: stop code, stop id, or free-text name.
    pub origin: String,

    /// Destination query, same forms as the origin.
    pub destination: String,

    /// Departure time; defaults to "now" when absent.
    pub departure_time: Option<GtfsTime>,

    /// Maximum itineraries to return.
    pub limit: usize,
}

/// How one endpoint query resolved. Carried in the result either way so
/// the caller can see what the search actually ran against.
#[derive(Debug, Clone, Serialize)]
pub struct StopResolutionInfo {
    pub query: String,
    pub stop_id: Option<StopId>,
    pub stop_name: Option<String>,
    pub confidence: Option<MatchConfidence>,
    pub resolved: bool,
    pub error: Option<String>,
}

impl StopResolutionInfo {
    fn from_outcome(query: &str, outcome: Result<StopResolution, ResolveError>) -> Self {
        match outcome {
            Ok(resolution) => match resolution.best_match() {
                Some(best) => Self {
                    query: query.to_string(),
                    stop_id: Some(best.stop_id.clone()),
                    stop_name: Some(best.stop_name.clone()),
                    confidence: Some(best.confidence),
                    resolved: resolution.resolved,
                    error: None,
                },
                None => Self {
                    query: query.to_string(),
                    stop_id: None,
                    stop_name: None,
                    confidence: None,
                    resolved: false,
                    error: Some("No matching stop found".to_string()),
                },
            },
            Err(e) => Self {
                query: query.to_string(),
                stop_id: None,
                stop_name: None,
                confidence: None,
                resolved: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// The complete outcome of a plan request.
#[derive(Debug, Clone)]
pub struct PlanTripResult {
    pub origin_resolution: StopResolutionInfo,
    pub destination_resolution: StopResolutionInfo,
    pub itineraries: Vec<Itinerary>,
    /// The GTFS service date the search ran against.
    pub service_date: NaiveDate,
    /// The departure time the search ran from, extended in late-night
    /// mode.
    pub query_time: GtfsTime,
    pub success: bool,
    pub error: Option<String>,
}

/// The trip planner, holding its collaborators by injection.
pub struct TripPlanner<R> {
    store: GtfsStore,
    resolver: R,
    config: PlannerConfig,
}

impl<R: StopResolver> TripPlanner<R> {
    pub fn new(store: GtfsStore, resolver: R, config: PlannerConfig) -> Self {
        Self {
            store,
            resolver,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a trip. `now` is passed in explicitly so callers (and
    /// tests) control the clock.
    ///
    /// The query window runs through the late-night resolver: a request
    /// at 1:30 AM searches yesterday's service day at 25:30, the same
    /// service day the arrivals path would use.
    pub async fn plan(
        &self,
        request: &PlanRequest,
        now: NaiveDateTime,
    ) -> Result<PlanTripResult, PlanError> {
        let limit = self.config.clamp_limit(request.limit);
        let window = QueryWindow::resolve(now, request.departure_time, None);

        let (origin_outcome, destination_outcome) = futures::join!(
            self.resolver.resolve(&request.origin, 1),
            self.resolver.resolve(&request.destination, 1),
        );
        let origin_resolution = StopResolutionInfo::from_outcome(&request.origin, origin_outcome);
        let destination_resolution =
            StopResolutionInfo::from_outcome(&request.destination, destination_outcome);

        let (origin_id, destination_id) = match (
            resolved_id(&origin_resolution),
            resolved_id(&destination_resolution),
        ) {
            (Some(origin), Some(destination)) => (origin.clone(), destination.clone()),
            _ => {
                tracing::info!(
                    origin = %request.origin,
                    destination = %request.destination,
                    "plan request with unresolvable endpoint"
                );
                return Ok(PlanTripResult {
                    origin_resolution,
                    destination_resolution,
                    itineraries: Vec::new(),
                    service_date: window.service_date,
                    query_time: window.start,
                    success: false,
                    error: Some("Could not resolve origin or destination stop".to_string()),
                });
            }
        };

        // The two searches are independent reads of the same static
        // dataset; run them concurrently.
        let (direct, transfers) = futures::join!(
            find_direct_itineraries(
                &self.store,
                &self.config,
                &origin_id,
                &destination_id,
                window.start,
                window.service_date,
                limit,
            ),
            find_transfer_itineraries(
                &self.store,
                &self.config,
                &origin_id,
                &destination_id,
                window.start,
                window.service_date,
                limit,
            ),
        );

        let mut itineraries = direct?;
        itineraries.extend(transfers?);
        itineraries.sort_by_key(Itinerary::total_duration_minutes);
        itineraries.truncate(limit);

        tracing::info!(
            origin = %origin_id,
            destination = %destination_id,
            service_date = %window.service_date,
            found = itineraries.len(),
            "planned trip"
        );

        let success = !itineraries.is_empty();
        Ok(PlanTripResult {
            origin_resolution,
            destination_resolution,
            itineraries,
            service_date: window.service_date,
            query_time: window.start,
            success,
            error: if success {
                None
            } else {
                Some("No routes found".to_string())
            },
        })
    }
}

/// The stop id to search with, but only when the match is trustworthy.
fn resolved_id(info: &StopResolutionInfo) -> Option<&StopId> {
    if info.resolved { info.stop_id.as_ref() } else { None }
}
