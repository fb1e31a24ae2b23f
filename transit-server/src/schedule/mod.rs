//! Scheduled arrivals at a stop.
//!
//! Static-schedule lookups: which trips are timetabled to arrive at a
//! stop within a window. The window runs through the late-night
//! resolver, so a 1:30 AM query reads yesterday's service day at 25:30
//! and still sees the night buses.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{
    GtfsTime, QueryWindow, RouteId, StopId, StopRef, TimeError, TripId,
};
use crate::store::{GtfsStore, StoreError};

/// Hard cap on arrivals per request.
const MAX_ARRIVALS: usize = 100;

/// Error from the arrivals lookup.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The requested stop does not exist
    #[error("stop not found: {0}")]
    StopNotFound(StopId),

    /// The store failed; fatal for this request
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored time string failed to parse
    #[error("malformed time in stored data: {0}")]
    MalformedTime(#[from] TimeError),
}

/// An arrivals request.
#[derive(Debug, Clone)]
pub struct ArrivalsRequest {
    pub stop_id: StopId,

    /// Restrict to one route.
    pub route_id: Option<RouteId>,

    /// Window start; defaults to "now".
    pub start_time: Option<GtfsTime>,

    /// Window end; defaults to 28:00:00.
    pub end_time: Option<GtfsTime>,

    pub limit: usize,
}

/// One timetabled arrival.
#[derive(Debug, Clone)]
pub struct ScheduledArrival {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub route_short_name: Option<String>,
    pub route_type: i64,
    pub trip_headsign: Option<String>,
    pub arrival_time: GtfsTime,
    /// Minutes from the window start; negative for already-departed
    /// trips inside an explicit window.
    pub minutes_until: i64,
}

/// Arrivals at a stop for one query window.
#[derive(Debug, Clone)]
pub struct ScheduledArrivalsResult {
    pub stop: StopRef,
    pub arrivals: Vec<ScheduledArrival>,
    pub service_date: NaiveDate,
    pub query_time: GtfsTime,
}

/// Static-schedule arrivals lookups over the store.
#[derive(Clone)]
pub struct ScheduleService {
    store: GtfsStore,
}

impl ScheduleService {
    pub fn new(store: GtfsStore) -> Self {
        Self { store }
    }

    /// Scheduled arrivals at a stop. An unknown stop is an error; a
    /// date with no active services is a valid empty result.
    pub async fn scheduled_arrivals(
        &self,
        request: &ArrivalsRequest,
        now: NaiveDateTime,
    ) -> Result<ScheduledArrivalsResult, ScheduleError> {
        let limit = request.limit.clamp(1, MAX_ARRIVALS);
        let window = QueryWindow::resolve(now, request.start_time, request.end_time);

        let stop = match self.store.stop_info(&request.stop_id).await? {
            Some(info) => StopRef {
                id: request.stop_id.clone(),
                name: info.stop_name,
                code: info.stop_code,
            },
            None => return Err(ScheduleError::StopNotFound(request.stop_id.clone())),
        };

        let active = self.store.active_service_ids(window.service_date).await?;
        if active.is_empty() {
            return Ok(ScheduledArrivalsResult {
                stop,
                arrivals: Vec::new(),
                service_date: window.service_date,
                query_time: window.start,
            });
        }

        let rows = self
            .store
            .scheduled_arrivals(
                &request.stop_id,
                request.route_id.as_ref(),
                &active,
                window.start,
                window.end,
                limit as i64,
            )
            .await?;

        let arrivals = rows
            .into_iter()
            .map(|row| {
                let arrival_time = GtfsTime::parse(&row.arrival_time)?;
                Ok(ScheduledArrival {
                    trip_id: TripId::new(row.trip_id),
                    route_id: RouteId::new(row.route_id),
                    route_short_name: row.route_short_name,
                    route_type: row.route_type,
                    trip_headsign: row.trip_headsign,
                    arrival_time,
                    minutes_until: arrival_time.minutes_until(window.start),
                })
            })
            .collect::<Result<Vec<_>, TimeError>>()?;

        tracing::debug!(
            stop = %request.stop_id,
            service_date = %window.service_date,
            count = arrivals.len(),
            "scheduled arrivals"
        );

        Ok(ScheduledArrivalsResult {
            stop,
            arrivals,
            service_date: window.service_date,
            query_time: window.start,
        })
    }
}
