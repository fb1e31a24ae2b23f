//! Planner and schedule queries.
//!
//! Time-window comparisons happen in SQL on the raw GTFS time strings;
//! that is sound because the stored format is fixed-width HH:MM:SS, so
//! lexicographic order is chronological order (extended hours included).

use std::collections::HashSet;

use sqlx::{QueryBuilder, Sqlite};

use crate::domain::{GtfsTime, RouteId, ServiceId, StopId};

use super::rows::{
    ArrivalRow, DirectTripRow, IndexedStopRow, InboundSegmentRow, OutboundSegmentRow,
    StopInfoRow, StopLocation, StopLocationRow,
};
use super::{GtfsStore, StoreError};

/// Append `IN (?, ?, ...)` for a set of service ids.
fn push_service_filter(qb: &mut QueryBuilder<'_, Sqlite>, services: &HashSet<ServiceId>) {
    qb.push(" AND t.service_id IN (");
    let mut sep = qb.separated(", ");
    for service in services {
        sep.push_bind(service.as_str().to_string());
    }
    qb.push(")");
}

impl GtfsStore {
    /// Name and code for a stop, if it exists.
    pub async fn stop_info(&self, stop: &StopId) -> Result<Option<StopInfoRow>, StoreError> {
        let row = sqlx::query_as::<_, StopInfoRow>(
            "SELECT stop_name, stop_code FROM stops WHERE stop_id = ?",
        )
        .bind(stop.as_str())
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Coordinates and parent station for a stop. `None` when the stop
    /// is unknown or has no coordinates.
    pub async fn stop_location(&self, stop: &StopId) -> Result<Option<StopLocation>, StoreError> {
        let row = sqlx::query_as::<_, StopLocationRow>(
            "SELECT stop_lat, stop_lon, parent_station FROM stops WHERE stop_id = ?",
        )
        .bind(stop.as_str())
        .fetch_optional(self.pool())
        .await?;
        Ok(row.and_then(StopLocationRow::into_location))
    }

    /// Trips that visit `origin` and later `destination`, departing the
    /// origin within `[window_start, window_end]` on an active service.
    /// Ordered by origin departure; capped at `fetch_limit` rows.
    pub async fn direct_trips(
        &self,
        origin: &StopId,
        destination: &StopId,
        services: &HashSet<ServiceId>,
        window_start: GtfsTime,
        window_end: GtfsTime,
        fetch_limit: i64,
    ) -> Result<Vec<DirectTripRow>, StoreError> {
        if services.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT \
                 o.trip_id, \
                 o.departure_time AS origin_departure, \
                 o.stop_sequence AS origin_seq, \
                 d.arrival_time AS dest_arrival, \
                 d.stop_sequence AS dest_seq, \
                 t.route_id, \
                 t.trip_headsign, \
                 r.route_short_name, \
                 r.route_type \
             FROM stop_times o \
             JOIN stop_times d ON o.trip_id = d.trip_id \
             JOIN trips t ON o.trip_id = t.trip_id \
             JOIN routes r ON t.route_id = r.route_id \
             WHERE o.stop_id = ",
        );
        qb.push_bind(origin.as_str().to_string());
        qb.push(" AND d.stop_id = ");
        qb.push_bind(destination.as_str().to_string());
        push_service_filter(&mut qb, services);
        qb.push(" AND o.departure_time >= ");
        qb.push_bind(window_start.to_string());
        qb.push(" AND o.departure_time <= ");
        qb.push_bind(window_end.to_string());
        qb.push(" AND d.stop_sequence > o.stop_sequence ORDER BY o.departure_time LIMIT ");
        qb.push_bind(fetch_limit);

        let rows = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(rows)
    }

    /// Every (trip, downstream stop) pair for trips leaving `origin`
    /// within the window: the candidate first legs of a transfer
    /// itinerary.
    pub async fn outbound_segments(
        &self,
        origin: &StopId,
        services: &HashSet<ServiceId>,
        window_start: GtfsTime,
        window_end: GtfsTime,
    ) -> Result<Vec<OutboundSegmentRow>, StoreError> {
        if services.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "WITH origin_trips AS ( \
                 SELECT st.trip_id, st.departure_time AS origin_departure, \
                        st.stop_sequence AS origin_seq, t.route_id, t.trip_headsign \
                 FROM stop_times st \
                 JOIN trips t ON st.trip_id = t.trip_id \
                 WHERE st.stop_id = ",
        );
        qb.push_bind(origin.as_str().to_string());
        push_service_filter(&mut qb, services);
        qb.push(" AND st.departure_time >= ");
        qb.push_bind(window_start.to_string());
        qb.push(" AND st.departure_time <= ");
        qb.push_bind(window_end.to_string());
        qb.push(
            ") \
             SELECT ot.trip_id, ot.route_id, r.route_short_name, r.route_type, \
                    ot.trip_headsign, ot.origin_departure, ot.origin_seq, \
                    st.stop_id AS transfer_stop_id, \
                    st.arrival_time AS transfer_arrival, \
                    st.stop_sequence AS transfer_seq \
             FROM origin_trips ot \
             JOIN stop_times st ON ot.trip_id = st.trip_id AND st.stop_sequence > ot.origin_seq \
             JOIN routes r ON ot.route_id = r.route_id \
             ORDER BY ot.origin_departure, st.stop_sequence",
        );

        let rows = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(rows)
    }

    /// Every (trip, upstream stop) pair for trips reaching
    /// `destination`, restricted to upstream departures at or before
    /// `latest_departure`: the candidate second legs of a transfer
    /// itinerary.
    pub async fn inbound_segments(
        &self,
        destination: &StopId,
        services: &HashSet<ServiceId>,
        latest_departure: GtfsTime,
    ) -> Result<Vec<InboundSegmentRow>, StoreError> {
        if services.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "WITH dest_trips AS ( \
                 SELECT st.trip_id, st.arrival_time AS dest_arrival, \
                        st.stop_sequence AS dest_seq, t.route_id, t.trip_headsign \
                 FROM stop_times st \
                 JOIN trips t ON st.trip_id = t.trip_id \
                 WHERE st.stop_id = ",
        );
        qb.push_bind(destination.as_str().to_string());
        push_service_filter(&mut qb, services);
        qb.push(
            ") \
             SELECT dt.trip_id, dt.route_id, r.route_short_name, r.route_type, \
                    dt.trip_headsign, \
                    st.stop_id AS transfer_stop_id, \
                    st.departure_time AS transfer_departure, \
                    st.stop_sequence AS transfer_seq, \
                    dt.dest_arrival, dt.dest_seq \
             FROM dest_trips dt \
             JOIN stop_times st ON dt.trip_id = st.trip_id AND st.stop_sequence < dt.dest_seq \
             JOIN routes r ON dt.route_id = r.route_id \
             WHERE st.departure_time <= ",
        );
        qb.push_bind(latest_departure.to_string());
        qb.push(" ORDER BY dt.dest_arrival, st.stop_sequence DESC");

        let rows = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(rows)
    }

    /// Scheduled arrivals at a stop within the window, optionally
    /// filtered to one route, ordered by arrival time.
    pub async fn scheduled_arrivals(
        &self,
        stop: &StopId,
        route: Option<&RouteId>,
        services: &HashSet<ServiceId>,
        window_start: GtfsTime,
        window_end: GtfsTime,
        limit: i64,
    ) -> Result<Vec<ArrivalRow>, StoreError> {
        if services.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT st.trip_id, st.arrival_time, t.route_id, t.trip_headsign, \
                    r.route_short_name, r.route_type \
             FROM stop_times st \
             JOIN trips t ON st.trip_id = t.trip_id \
             JOIN routes r ON t.route_id = r.route_id \
             WHERE st.stop_id = ",
        );
        qb.push_bind(stop.as_str().to_string());
        push_service_filter(&mut qb, services);
        qb.push(" AND st.arrival_time >= ");
        qb.push_bind(window_start.to_string());
        qb.push(" AND st.arrival_time <= ");
        qb.push_bind(window_end.to_string());
        if let Some(route) = route {
            qb.push(" AND t.route_id = ");
            qb.push_bind(route.as_str().to_string());
        }
        qb.push(" ORDER BY st.arrival_time LIMIT ");
        qb.push_bind(limit);

        let rows = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(rows)
    }

    /// All stops, for the resolver index.
    pub async fn all_stops(&self) -> Result<Vec<IndexedStopRow>, StoreError> {
        let rows = sqlx::query_as::<_, IndexedStopRow>(
            "SELECT stop_id, stop_code, stop_name, stop_lat, stop_lon FROM stops ORDER BY stop_id",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
