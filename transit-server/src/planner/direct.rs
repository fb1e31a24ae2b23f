//! Direct-itinerary search.
//!
//! Finds trips that visit the origin and then the destination on the
//! same vehicle, departing within the search window.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::{GtfsTime, Itinerary, RouteId, StopId, StopRef, TripId, TripLeg};
use crate::store::GtfsStore;

use super::config::PlannerConfig;
use super::PlanError;

/// Look up a stop's display name and code, falling back to the raw id
/// for stops missing from the feed.
pub(crate) async fn stop_ref(store: &GtfsStore, stop: &StopId) -> Result<StopRef, PlanError> {
    match store.stop_info(stop).await? {
        Some(info) => Ok(StopRef {
            id: stop.clone(),
            name: info.stop_name,
            code: info.stop_code,
        }),
        None => Ok(StopRef::unnamed(stop.clone())),
    }
}

/// Find up to `limit` direct itineraries from `origin` to
/// `destination`, departing within the configured window after
/// `departure`.
///
/// Results come back ordered by departure time and deduplicated by
/// (route, departure): on a frequent route the rider cares about the
/// next few distinct departures, not every physical trip.
pub async fn find_direct_itineraries(
    store: &GtfsStore,
    config: &PlannerConfig,
    origin: &StopId,
    destination: &StopId,
    departure: GtfsTime,
    service_date: NaiveDate,
    limit: usize,
) -> Result<Vec<Itinerary>, PlanError> {
    let active = store.active_service_ids(service_date).await?;
    if active.is_empty() {
        return Ok(Vec::new());
    }

    let window_end = departure.plus_seconds(config.time_window_seconds());

    let origin_ref = stop_ref(store, origin).await?;
    let destination_ref = stop_ref(store, destination).await?;

    // Over-fetch so post-query deduplication can still fill the limit.
    let rows = store
        .direct_trips(
            origin,
            destination,
            &active,
            departure,
            window_end,
            (limit * 2) as i64,
        )
        .await?;

    tracing::debug!(
        origin = %origin,
        destination = %destination,
        candidates = rows.len(),
        "direct trip candidates"
    );

    let mut itineraries = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for row in rows {
        if !seen.insert((row.route_id.clone(), row.origin_departure.clone())) {
            continue;
        }

        let departure = GtfsTime::parse(&row.origin_departure)?;
        let arrival = GtfsTime::parse(&row.dest_arrival)?;

        let leg = TripLeg::new(
            RouteId::new(row.route_id),
            row.route_short_name,
            row.route_type,
            TripId::new(row.trip_id),
            row.trip_headsign,
            origin_ref.clone(),
            destination_ref.clone(),
            departure,
            arrival,
            row.dest_seq - row.origin_seq + 1,
        )?;

        itineraries.push(Itinerary::direct(leg));
        if itineraries.len() >= limit {
            break;
        }
    }

    Ok(itineraries)
}
