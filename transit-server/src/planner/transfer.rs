//! One-transfer itinerary search.
//!
//! The search works outward from both endpoints: every (trip,
//! downstream stop) pair leaving the origin is a candidate first leg,
//! every (trip, upstream stop) pair reaching the destination is a
//! candidate second leg, and the two sets are joined at compatible
//! transfer points. Three matching strategies apply in priority order:
//! same stop, same parent station, and walking proximity. Each later
//! strategy only considers stops the earlier ones did not match.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::domain::{
    GtfsTime, Itinerary, RouteId, StopId, TimeError, TransferMeta, TripId, TripLeg,
};
use crate::geo::haversine_distance;
use crate::store::{GtfsStore, InboundSegmentRow, OutboundSegmentRow, StopLocation, StoreError};

use super::config::PlannerConfig;
use super::direct::stop_ref;
use super::PlanError;

/// One trip's traversal from the origin to a downstream stop where the
/// rider could alight and transfer.
#[derive(Debug, Clone)]
pub struct OutboundSegment {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub route_short_name: Option<String>,
    pub route_type: i64,
    pub trip_headsign: Option<String>,
    pub origin_departure: GtfsTime,
    pub origin_seq: i64,
    pub transfer_stop_id: StopId,
    pub transfer_arrival: GtfsTime,
    pub transfer_seq: i64,
}

impl TryFrom<OutboundSegmentRow> for OutboundSegment {
    type Error = TimeError;

    fn try_from(row: OutboundSegmentRow) -> Result<Self, TimeError> {
        Ok(Self {
            trip_id: TripId::new(row.trip_id),
            route_id: RouteId::new(row.route_id),
            route_short_name: row.route_short_name,
            route_type: row.route_type,
            trip_headsign: row.trip_headsign,
            origin_departure: GtfsTime::parse(&row.origin_departure)?,
            origin_seq: row.origin_seq,
            transfer_stop_id: StopId::new(row.transfer_stop_id),
            transfer_arrival: GtfsTime::parse(&row.transfer_arrival)?,
            transfer_seq: row.transfer_seq,
        })
    }
}

/// The mirror image: one trip's traversal from an upstream boarding
/// stop to the destination.
#[derive(Debug, Clone)]
pub struct InboundSegment {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub route_short_name: Option<String>,
    pub route_type: i64,
    pub trip_headsign: Option<String>,
    pub transfer_stop_id: StopId,
    pub transfer_departure: GtfsTime,
    pub transfer_seq: i64,
    pub dest_arrival: GtfsTime,
    pub dest_seq: i64,
}

impl TryFrom<InboundSegmentRow> for InboundSegment {
    type Error = TimeError;

    fn try_from(row: InboundSegmentRow) -> Result<Self, TimeError> {
        Ok(Self {
            trip_id: TripId::new(row.trip_id),
            route_id: RouteId::new(row.route_id),
            route_short_name: row.route_short_name,
            route_type: row.route_type,
            trip_headsign: row.trip_headsign,
            transfer_stop_id: StopId::new(row.transfer_stop_id),
            transfer_departure: GtfsTime::parse(&row.transfer_departure)?,
            transfer_seq: row.transfer_seq,
            dest_arrival: GtfsTime::parse(&row.dest_arrival)?,
            dest_seq: row.dest_seq,
        })
    }
}

/// A compatible (outbound, inbound) pairing.
///
/// Invariants, enforced by construction in the matcher: the two legs
/// ride different routes, and the effective wait (inclusive of walk or
/// platform buffers) lies within the configured transfer bounds.
#[derive(Debug, Clone)]
pub struct TransferPoint {
    pub outbound: OutboundSegment,
    pub inbound: InboundSegment,
    pub wait_minutes: i64,
    pub walk_meters: f64,
    pub walk_minutes: i64,
}

impl TransferPoint {
    /// Riding-plus-waiting time from origin departure to destination
    /// arrival, in minutes. The ranking key.
    fn total_duration_minutes(&self) -> i64 {
        self.inbound
            .dest_arrival
            .minutes_until(self.outbound.origin_departure)
    }
}

/// Request-scoped memo of stop locations, so the three strategies never
/// fetch the same stop twice.
struct LocationCache {
    entries: HashMap<StopId, Option<StopLocation>>,
}

impl LocationCache {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    async fn get(
        &mut self,
        store: &GtfsStore,
        stop: &StopId,
    ) -> Result<Option<&StopLocation>, StoreError> {
        if !self.entries.contains_key(stop) {
            let location = store.stop_location(stop).await?;
            self.entries.insert(stop.clone(), location);
        }
        Ok(self.entries.get(stop).and_then(|loc| loc.as_ref()))
    }
}

/// Minutes from an effective arrival (in seconds) until a departure.
fn wait_from(effective_arrival_seconds: i64, departure: GtfsTime) -> i64 {
    (i64::from(departure.total_seconds()) - effective_arrival_seconds) / 60
}

/// Match outbound and inbound segments into valid transfer points.
pub async fn find_transfer_points(
    store: &GtfsStore,
    config: &PlannerConfig,
    outbound_segments: &[OutboundSegment],
    inbound_segments: &[InboundSegment],
) -> Result<Vec<TransferPoint>, PlanError> {
    let mut transfer_points = Vec::new();
    let mut locations = LocationCache::new();

    let mut inbound_by_stop: HashMap<&StopId, Vec<&InboundSegment>> = HashMap::new();
    for seg in inbound_segments {
        inbound_by_stop.entry(&seg.transfer_stop_id).or_default().push(seg);
    }
    let mut outbound_by_stop: HashMap<&StopId, Vec<&OutboundSegment>> = HashMap::new();
    for seg in outbound_segments {
        outbound_by_stop.entry(&seg.transfer_stop_id).or_default().push(seg);
    }

    let outbound_stops: HashSet<&StopId> = outbound_by_stop.keys().copied().collect();
    let inbound_stops: HashSet<&StopId> = inbound_by_stop.keys().copied().collect();

    // Strategy 1: same stop.
    let common_stops: HashSet<&StopId> = outbound_stops
        .intersection(&inbound_stops)
        .copied()
        .collect();

    for out_seg in outbound_segments {
        if !common_stops.contains(&out_seg.transfer_stop_id) {
            continue;
        }
        let arrival_seconds = i64::from(out_seg.transfer_arrival.total_seconds());

        for in_seg in inbound_by_stop
            .get(&out_seg.transfer_stop_id)
            .map_or(&[][..], Vec::as_slice)
        {
            // Staying on the same route is not a transfer.
            if out_seg.route_id == in_seg.route_id {
                continue;
            }
            let wait = wait_from(arrival_seconds, in_seg.transfer_departure);
            if (config.min_transfer_mins..=config.max_transfer_mins).contains(&wait) {
                transfer_points.push(TransferPoint {
                    outbound: out_seg.clone(),
                    inbound: (*in_seg).clone(),
                    wait_minutes: wait,
                    walk_meters: 0.0,
                    walk_minutes: 0,
                });
            }
        }
    }

    // Strategy 2: different platforms of the same parent station, with
    // a fixed buffer for the walk between them.
    let mut outbound_by_parent: HashMap<String, Vec<&StopId>> = HashMap::new();
    for stop in outbound_stops.iter().copied() {
        if let Some(location) = locations.get(store, stop).await? {
            if let Some(parent) = location.parent_station.clone() {
                outbound_by_parent.entry(parent).or_default().push(stop);
            }
        }
    }

    let mut station_matched_outbound: HashSet<StopId> = HashSet::new();
    let mut station_matched_inbound: HashSet<StopId> = HashSet::new();

    for in_stop in inbound_stops.iter().copied() {
        if common_stops.contains(in_stop) {
            continue;
        }
        let Some(parent) = locations
            .get(store, in_stop)
            .await?
            .and_then(|loc| loc.parent_station.clone())
        else {
            continue;
        };
        let Some(out_stops) = outbound_by_parent.get(&parent) else {
            continue;
        };

        for out_stop in out_stops.iter().copied() {
            for out_seg in outbound_by_stop.get(out_stop).map_or(&[][..], Vec::as_slice) {
                let effective_arrival = i64::from(out_seg.transfer_arrival.total_seconds())
                    + config.platform_buffer_seconds();

                for in_seg in inbound_by_stop.get(in_stop).map_or(&[][..], Vec::as_slice) {
                    if out_seg.route_id == in_seg.route_id {
                        continue;
                    }
                    let wait = wait_from(effective_arrival, in_seg.transfer_departure);
                    if (config.min_transfer_mins..=config.max_transfer_mins).contains(&wait) {
                        transfer_points.push(TransferPoint {
                            outbound: (*out_seg).clone(),
                            inbound: (*in_seg).clone(),
                            wait_minutes: wait,
                            walk_meters: 0.0,
                            walk_minutes: config.platform_buffer_mins,
                        });
                        station_matched_outbound.insert(out_stop.clone());
                        station_matched_inbound.insert(in_stop.clone());
                    }
                }
            }
        }
    }

    // Strategy 3: walking proximity, for stop pairs no earlier strategy
    // claimed.
    let unmatched_outbound: Vec<&StopId> = outbound_stops
        .iter()
        .filter(|s| !common_stops.contains(*s) && !station_matched_outbound.contains(**s))
        .copied()
        .collect();
    let unmatched_inbound: Vec<&StopId> = inbound_stops
        .iter()
        .filter(|s| !common_stops.contains(*s) && !station_matched_inbound.contains(**s))
        .copied()
        .collect();

    for out_stop in unmatched_outbound.iter().copied() {
        let Some(out_loc) = locations.get(store, out_stop).await?.cloned() else {
            continue;
        };

        for in_stop in unmatched_inbound.iter().copied() {
            let Some(in_loc) = locations.get(store, in_stop).await? else {
                continue;
            };

            let distance =
                haversine_distance(out_loc.lat, out_loc.lon, in_loc.lat, in_loc.lon);
            if distance > config.max_walking_meters {
                continue;
            }
            let walk_minutes = config.walk_minutes(distance);

            for out_seg in outbound_by_stop.get(out_stop).map_or(&[][..], Vec::as_slice) {
                let effective_arrival = i64::from(out_seg.transfer_arrival.total_seconds())
                    + walk_minutes * 60;

                for in_seg in inbound_by_stop.get(in_stop).map_or(&[][..], Vec::as_slice) {
                    if out_seg.route_id == in_seg.route_id {
                        continue;
                    }
                    let wait = wait_from(effective_arrival, in_seg.transfer_departure);
                    if (config.min_transfer_mins..=config.max_transfer_mins).contains(&wait) {
                        transfer_points.push(TransferPoint {
                            outbound: (*out_seg).clone(),
                            inbound: (*in_seg).clone(),
                            wait_minutes: wait,
                            walk_meters: distance,
                            walk_minutes,
                        });
                    }
                }
            }
        }
    }

    Ok(transfer_points)
}

/// Build the two-leg itinerary for a transfer point, resolving stop
/// names for all four endpoints.
async fn build_transfer_itinerary(
    store: &GtfsStore,
    transfer: &TransferPoint,
    origin: &StopId,
    destination: &StopId,
) -> Result<Itinerary, PlanError> {
    let origin_ref = stop_ref(store, origin).await?;
    let alight_ref = stop_ref(store, &transfer.outbound.transfer_stop_id).await?;
    let board_ref = stop_ref(store, &transfer.inbound.transfer_stop_id).await?;
    let destination_ref = stop_ref(store, destination).await?;

    let out = &transfer.outbound;
    let first = TripLeg::new(
        out.route_id.clone(),
        out.route_short_name.clone(),
        out.route_type,
        out.trip_id.clone(),
        out.trip_headsign.clone(),
        origin_ref,
        alight_ref,
        out.origin_departure,
        out.transfer_arrival,
        out.transfer_seq - out.origin_seq + 1,
    )?;

    let inb = &transfer.inbound;
    let second = TripLeg::new(
        inb.route_id.clone(),
        inb.route_short_name.clone(),
        inb.route_type,
        inb.trip_id.clone(),
        inb.trip_headsign.clone(),
        board_ref,
        destination_ref,
        inb.transfer_departure,
        inb.dest_arrival,
        inb.dest_seq - inb.transfer_seq + 1,
    )?;

    let itinerary = Itinerary::with_transfer(
        first,
        second,
        TransferMeta {
            wait_minutes: transfer.wait_minutes,
            walk_meters: transfer.walk_meters,
            walk_minutes: transfer.walk_minutes,
        },
    )?;
    Ok(itinerary)
}

/// Find up to `limit` one-transfer itineraries from `origin` to
/// `destination`.
pub async fn find_transfer_itineraries(
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

    // Step 1: candidate first legs.
    let outbound_rows = store
        .outbound_segments(origin, &active, departure, window_end)
        .await?;
    let outbound_segments: Vec<OutboundSegment> = outbound_rows
        .into_iter()
        .map(OutboundSegment::try_from)
        .collect::<Result<_, _>>()?;
    if outbound_segments.is_empty() {
        return Ok(Vec::new());
    }

    // Step 2: the latest any feasible connection could depart. Bounds
    // the inbound scan instead of reading arbitrarily far ahead.
    let max_outbound_arrival = outbound_segments
        .iter()
        .map(|seg| seg.transfer_arrival)
        .max()
        .unwrap_or(window_end);
    let latest_transfer_departure =
        max_outbound_arrival.plus_seconds(config.max_transfer_seconds());

    // Step 3: candidate second legs.
    let inbound_rows = store
        .inbound_segments(destination, &active, latest_transfer_departure)
        .await?;
    let inbound_segments: Vec<InboundSegment> = inbound_rows
        .into_iter()
        .map(InboundSegment::try_from)
        .collect::<Result<_, _>>()?;
    if inbound_segments.is_empty() {
        return Ok(Vec::new());
    }

    // Step 4: join them at valid transfer points.
    let mut transfer_points =
        find_transfer_points(store, config, &outbound_segments, &inbound_segments).await?;
    if transfer_points.is_empty() {
        return Ok(Vec::new());
    }

    tracing::debug!(
        origin = %origin,
        destination = %destination,
        outbound = outbound_segments.len(),
        inbound = inbound_segments.len(),
        points = transfer_points.len(),
        "transfer search candidates"
    );

    // Step 5: rank by total travel time and keep distinct
    // (departure, route pair) combinations for variety.
    transfer_points.sort_by(|a, b| {
        a.total_duration_minutes()
            .cmp(&b.total_duration_minutes())
            .then_with(|| a.outbound.origin_departure.cmp(&b.outbound.origin_departure))
            .then_with(|| a.outbound.route_id.cmp(&b.outbound.route_id))
            .then_with(|| a.inbound.route_id.cmp(&b.inbound.route_id))
    });

    let mut itineraries = Vec::new();
    let mut seen: HashSet<(GtfsTime, RouteId, RouteId)> = HashSet::new();

    for transfer in &transfer_points {
        let key = (
            transfer.outbound.origin_departure,
            transfer.outbound.route_id.clone(),
            transfer.inbound.route_id.clone(),
        );
        if !seen.insert(key) {
            continue;
        }

        itineraries.push(build_transfer_itinerary(store, transfer, origin, destination).await?);
        if itineraries.len() >= limit {
            break;
        }
    }

    Ok(itineraries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::*;

    fn t(s: &str) -> GtfsTime {
        GtfsTime::parse(s).unwrap()
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()
    }

    async fn base_fixture() -> GtfsStore {
        let store = fixture_store().await;
        insert_calendar(&store, "WEEKDAY", [1, 1, 1, 1, 1, 0, 0], "20240101", "20261231").await;
        insert_stop(&store, "A", None, "Origin", 45.500, -73.570, None, 0).await;
        insert_stop(&store, "B", None, "Destination", 45.530, -73.540, None, 0).await;
        insert_stop(&store, "X", None, "Crossing", 45.510, -73.560, None, 0).await;
        insert_route(&store, "24", "24", 3).await;
        insert_route(&store, "55", "55", 3).await;
        store
    }

    /// Route 24 from A through X, route 55 from X to B.
    async fn connecting_fixture(inbound_departure: &str, inbound_arrival: &str) -> GtfsStore {
        let store = base_fixture().await;

        insert_trip(&store, "OUT1", "24", "WEEKDAY", "East").await;
        insert_stop_time(&store, "OUT1", "08:00:00", "08:00:00", "A", 1).await;
        insert_stop_time(&store, "OUT1", "08:10:00", "08:10:00", "X", 2).await;

        insert_trip(&store, "IN1", "55", "WEEKDAY", "North").await;
        insert_stop_time(&store, "IN1", inbound_departure, inbound_departure, "X", 1).await;
        insert_stop_time(&store, "IN1", inbound_arrival, inbound_arrival, "B", 2).await;

        store
    }

    async fn same_stop_fixture(inbound_departure: &str) -> GtfsStore {
        let arrival = GtfsTime::parse(inbound_departure)
            .unwrap()
            .plus_seconds(15 * 60)
            .to_string();
        connecting_fixture(inbound_departure, &arrival).await
    }

    #[tokio::test]
    async fn same_stop_transfer_within_bounds() {
        let store = same_stop_fixture("08:15:00").await;
        let config = PlannerConfig::default();

        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            3,
        )
        .await
        .unwrap();

        assert_eq!(itineraries.len(), 1);
        let it = &itineraries[0];
        assert_eq!(it.num_transfers(), 1);
        assert_eq!(it.departure(), t("08:00:00"));
        assert_eq!(it.arrival(), t("08:30:00"));
        assert_eq!(it.total_duration_minutes(), 30);

        let meta = it.transfer().unwrap();
        assert_eq!(meta.wait_minutes, 5);
        assert_eq!(meta.walk_meters, 0.0);
        assert_eq!(meta.walk_minutes, 0);

        assert_eq!(it.legs()[0].route_id().as_str(), "24");
        assert_eq!(it.legs()[1].route_id().as_str(), "55");
        assert_eq!(it.legs()[0].to().name, "Crossing");
        assert_eq!(it.legs()[1].from().name, "Crossing");
    }

    #[tokio::test]
    async fn same_route_pairing_is_not_a_transfer() {
        let store = base_fixture().await;

        insert_trip(&store, "OUT1", "24", "WEEKDAY", "East").await;
        insert_stop_time(&store, "OUT1", "08:00:00", "08:00:00", "A", 1).await;
        insert_stop_time(&store, "OUT1", "08:10:00", "08:10:00", "X", 2).await;

        // The continuation is another route-24 trip: never a transfer.
        insert_trip(&store, "IN24", "24", "WEEKDAY", "East").await;
        insert_stop_time(&store, "IN24", "08:15:00", "08:15:00", "X", 1).await;
        insert_stop_time(&store, "IN24", "08:30:00", "08:30:00", "B", 2).await;

        let config = PlannerConfig::default();
        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            3,
        )
        .await
        .unwrap();

        assert!(itineraries.is_empty());
    }

    #[tokio::test]
    async fn too_tight_wait_is_rejected() {
        // Arrives 08:10, departs 08:11: one minute is below the floor.
        let store = same_stop_fixture("08:11:00").await;
        let config = PlannerConfig::default();

        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            3,
        )
        .await
        .unwrap();
        assert!(itineraries.is_empty());
    }

    #[tokio::test]
    async fn too_long_wait_is_rejected() {
        // Arrives 08:10, departs 08:55: a 45-minute wait is over the cap.
        let store = same_stop_fixture("08:55:00").await;
        let config = PlannerConfig::default();

        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            3,
        )
        .await
        .unwrap();
        assert!(itineraries.is_empty());
    }

    #[tokio::test]
    async fn wait_bounds_are_inclusive() {
        for (departure, expect_found) in [("08:13:00", true), ("08:40:00", true)] {
            let store = same_stop_fixture(departure).await;
            let config = PlannerConfig::default();
            let itineraries = find_transfer_itineraries(
                &store,
                &config,
                &StopId::new("A"),
                &StopId::new("B"),
                t("08:00:00"),
                wednesday(),
                3,
            )
            .await
            .unwrap();
            assert_eq!(!itineraries.is_empty(), expect_found, "departure {departure}");
        }
    }

    #[tokio::test]
    async fn same_station_transfer_adds_platform_buffer() {
        let store = fixture_store().await;
        insert_calendar(&store, "WEEKDAY", [1, 1, 1, 1, 1, 0, 0], "20240101", "20261231").await;
        insert_stop(&store, "A", None, "Origin", 45.500, -73.570, None, 0).await;
        insert_stop(&store, "B", None, "Destination", 45.530, -73.540, None, 0).await;
        // Two platforms under one parent station.
        insert_stop(&store, "STA-1", None, "Hub platform 1", 45.510, -73.560, Some("STA"), 0).await;
        insert_stop(&store, "STA-2", None, "Hub platform 2", 45.5101, -73.5601, Some("STA"), 0)
            .await;
        insert_route(&store, "1", "Green", 1).await;
        insert_route(&store, "2", "Orange", 1).await;

        insert_trip(&store, "OUT1", "1", "WEEKDAY", "West").await;
        insert_stop_time(&store, "OUT1", "08:00:00", "08:00:00", "A", 1).await;
        insert_stop_time(&store, "OUT1", "08:10:00", "08:10:00", "STA-1", 2).await;

        insert_trip(&store, "IN1", "2", "WEEKDAY", "North").await;
        insert_stop_time(&store, "IN1", "08:17:00", "08:17:00", "STA-2", 1).await;
        insert_stop_time(&store, "IN1", "08:30:00", "08:30:00", "B", 2).await;

        let config = PlannerConfig::default();
        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            3,
        )
        .await
        .unwrap();

        assert_eq!(itineraries.len(), 1);
        let meta = itineraries[0].transfer().unwrap();
        // Effective arrival 08:12 after the 2-minute platform walk.
        assert_eq!(meta.wait_minutes, 5);
        assert_eq!(meta.walk_minutes, 2);
        assert_eq!(meta.walk_meters, 0.0);
    }

    #[tokio::test]
    async fn proximity_transfer_within_walking_distance() {
        let store = fixture_store().await;
        insert_calendar(&store, "WEEKDAY", [1, 1, 1, 1, 1, 0, 0], "20240101", "20261231").await;
        insert_stop(&store, "A", None, "Origin", 45.500, -73.570, None, 0).await;
        insert_stop(&store, "B", None, "Destination", 45.530, -73.540, None, 0).await;
        // P2 is ~190 m north of P1 (0.0017 degrees of latitude).
        insert_stop(&store, "P1", None, "Near / North", 45.5100, -73.5600, None, 0).await;
        insert_stop(&store, "P2", None, "Near / South", 45.5117, -73.5600, None, 0).await;
        insert_route(&store, "24", "24", 3).await;
        insert_route(&store, "55", "55", 3).await;

        insert_trip(&store, "OUT1", "24", "WEEKDAY", "East").await;
        insert_stop_time(&store, "OUT1", "08:00:00", "08:00:00", "A", 1).await;
        insert_stop_time(&store, "OUT1", "08:10:00", "08:10:00", "P1", 2).await;

        insert_trip(&store, "IN1", "55", "WEEKDAY", "North").await;
        insert_stop_time(&store, "IN1", "08:20:00", "08:20:00", "P2", 1).await;
        insert_stop_time(&store, "IN1", "08:35:00", "08:35:00", "B", 2).await;

        let config = PlannerConfig::default();
        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            3,
        )
        .await
        .unwrap();

        assert_eq!(itineraries.len(), 1);
        let meta = itineraries[0].transfer().unwrap();
        // ~190 m at 80 m/min floors to 2, plus the 1-minute buffer.
        assert_eq!(meta.walk_minutes, 3);
        assert!(meta.walk_meters > 150.0 && meta.walk_meters < 250.0);
        // Arrive 08:10, walk until 08:13, depart 08:20.
        assert_eq!(meta.wait_minutes, 7);
    }

    #[tokio::test]
    async fn distant_stops_are_not_walkable() {
        let store = fixture_store().await;
        insert_calendar(&store, "WEEKDAY", [1, 1, 1, 1, 1, 0, 0], "20240101", "20261231").await;
        insert_stop(&store, "A", None, "Origin", 45.500, -73.570, None, 0).await;
        insert_stop(&store, "B", None, "Destination", 45.530, -73.540, None, 0).await;
        // ~1.1 km apart: beyond the 400 m cap.
        insert_stop(&store, "P1", None, "Far / West", 45.5100, -73.5600, None, 0).await;
        insert_stop(&store, "P2", None, "Far / East", 45.5200, -73.5600, None, 0).await;
        insert_route(&store, "24", "24", 3).await;
        insert_route(&store, "55", "55", 3).await;

        insert_trip(&store, "OUT1", "24", "WEEKDAY", "East").await;
        insert_stop_time(&store, "OUT1", "08:00:00", "08:00:00", "A", 1).await;
        insert_stop_time(&store, "OUT1", "08:10:00", "08:10:00", "P1", 2).await;

        insert_trip(&store, "IN1", "55", "WEEKDAY", "North").await;
        insert_stop_time(&store, "IN1", "08:20:00", "08:20:00", "P2", 1).await;
        insert_stop_time(&store, "IN1", "08:35:00", "08:35:00", "B", 2).await;

        let config = PlannerConfig::default();
        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            3,
        )
        .await
        .unwrap();
        assert!(itineraries.is_empty());
    }

    #[tokio::test]
    async fn results_rank_by_total_duration() {
        let store = base_fixture().await;
        insert_route(&store, "80", "80", 3).await;

        insert_trip(&store, "OUT1", "24", "WEEKDAY", "East").await;
        insert_stop_time(&store, "OUT1", "08:00:00", "08:00:00", "A", 1).await;
        insert_stop_time(&store, "OUT1", "08:10:00", "08:10:00", "X", 2).await;

        // Slow connection: arrives B at 09:00.
        insert_trip(&store, "IN-SLOW", "55", "WEEKDAY", "North").await;
        insert_stop_time(&store, "IN-SLOW", "08:15:00", "08:15:00", "X", 1).await;
        insert_stop_time(&store, "IN-SLOW", "09:00:00", "09:00:00", "B", 2).await;

        // Fast connection: departs later but arrives B at 08:40.
        insert_trip(&store, "IN-FAST", "80", "WEEKDAY", "Express").await;
        insert_stop_time(&store, "IN-FAST", "08:20:00", "08:20:00", "X", 1).await;
        insert_stop_time(&store, "IN-FAST", "08:40:00", "08:40:00", "B", 2).await;

        let config = PlannerConfig::default();
        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            5,
        )
        .await
        .unwrap();

        assert_eq!(itineraries.len(), 2);
        assert_eq!(itineraries[0].legs()[1].route_id().as_str(), "80");
        assert!(
            itineraries[0].total_duration_minutes() <= itineraries[1].total_duration_minutes()
        );
    }

    #[tokio::test]
    async fn duplicate_route_pairs_are_collapsed() {
        let store = same_stop_fixture("08:15:00").await;
        // A second 55 trip from the same transfer stop a few minutes
        // later: same (departure, 24, 55) key once built, different
        // inbound. Key includes the outbound departure so both share it.
        insert_trip(&store, "IN2", "55", "WEEKDAY", "North").await;
        insert_stop_time(&store, "IN2", "08:25:00", "08:25:00", "X", 1).await;
        insert_stop_time(&store, "IN2", "08:40:00", "08:40:00", "B", 2).await;

        let config = PlannerConfig::default();
        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            wednesday(),
            5,
        )
        .await
        .unwrap();

        // Both pairings are valid transfers, but they share
        // (outbound departure, route 24, route 55): only the faster
        // survives.
        assert_eq!(itineraries.len(), 1);
        assert_eq!(itineraries[0].arrival(), t("08:30:00"));
    }

    #[tokio::test]
    async fn all_transfer_points_satisfy_invariants() {
        let store = same_stop_fixture("08:15:00").await;
        let config = PlannerConfig::default();

        let active = store.active_service_ids(wednesday()).await.unwrap();
        let outbound: Vec<OutboundSegment> = store
            .outbound_segments(&StopId::new("A"), &active, t("08:00:00"), t("10:00:00"))
            .await
            .unwrap()
            .into_iter()
            .map(|r| OutboundSegment::try_from(r).unwrap())
            .collect();
        let inbound: Vec<InboundSegment> = store
            .inbound_segments(&StopId::new("B"), &active, t("10:00:00"))
            .await
            .unwrap()
            .into_iter()
            .map(|r| InboundSegment::try_from(r).unwrap())
            .collect();

        let points = find_transfer_points(&store, &config, &outbound, &inbound)
            .await
            .unwrap();

        assert!(!points.is_empty());
        for point in &points {
            assert_ne!(point.outbound.route_id, point.inbound.route_id);
            assert!(point.wait_minutes >= config.min_transfer_mins);
            assert!(point.wait_minutes <= config.max_transfer_mins);
        }
    }

    #[tokio::test]
    async fn no_active_services_is_an_empty_result() {
        let store = same_stop_fixture("08:15:00").await;
        let config = PlannerConfig::default();

        // Saturday: WEEKDAY service is off.
        let itineraries = find_transfer_itineraries(
            &store,
            &config,
            &StopId::new("A"),
            &StopId::new("B"),
            t("08:00:00"),
            NaiveDate::from_ymd_opt(2025, 1, 11).unwrap(),
            3,
        )
        .await
        .unwrap();
        assert!(itineraries.is_empty());
    }
}
