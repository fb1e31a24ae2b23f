//! Row-to-entity mapping structs for every query shape.
//!
//! Time columns stay as the raw GTFS strings here; the finders parse
//! them at their own boundary so a malformed stored value surfaces as a
//! hard error in the operation that read it.

/// Name and rider-facing code for a stop.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StopInfoRow {
    pub stop_name: String,
    pub stop_code: Option<String>,
}

/// Location metadata for transfer matching. Only produced for stops
/// that actually carry coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct StopLocation {
    pub lat: f64,
    pub lon: f64,
    pub parent_station: Option<String>,
}

/// Raw location row; `lat`/`lon` may be missing in the feed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct StopLocationRow {
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    pub parent_station: Option<String>,
}

impl StopLocationRow {
    pub(crate) fn into_location(self) -> Option<StopLocation> {
        match (self.stop_lat, self.stop_lon) {
            (Some(lat), Some(lon)) => Some(StopLocation {
                lat,
                lon,
                parent_station: self.parent_station.filter(|p| !p.is_empty()),
            }),
            _ => None,
        }
    }
}

/// One trip visiting the origin and then the destination, in order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DirectTripRow {
    pub trip_id: String,
    pub origin_departure: String,
    pub origin_seq: i64,
    pub dest_arrival: String,
    pub dest_seq: i64,
    pub route_id: String,
    pub trip_headsign: Option<String>,
    pub route_short_name: Option<String>,
    pub route_type: i64,
}

/// One (trip, downstream stop) pair leaving the origin.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutboundSegmentRow {
    pub trip_id: String,
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_type: i64,
    pub trip_headsign: Option<String>,
    pub origin_departure: String,
    pub origin_seq: i64,
    pub transfer_stop_id: String,
    pub transfer_arrival: String,
    pub transfer_seq: i64,
}

/// One (trip, upstream stop) pair arriving at the destination.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InboundSegmentRow {
    pub trip_id: String,
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_type: i64,
    pub trip_headsign: Option<String>,
    pub transfer_stop_id: String,
    pub transfer_departure: String,
    pub transfer_seq: i64,
    pub dest_arrival: String,
    pub dest_seq: i64,
}

/// One scheduled arrival at a stop.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArrivalRow {
    pub trip_id: String,
    pub arrival_time: String,
    pub route_id: String,
    pub trip_headsign: Option<String>,
    pub route_short_name: Option<String>,
    pub route_type: i64,
}

/// One stop for the resolver's search index.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IndexedStopRow {
    pub stop_id: String,
    pub stop_code: Option<String>,
    pub stop_name: String,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
}

/// One calendar-date exception.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ExceptionRow {
    pub service_id: String,
    pub exception_type: i64,
}
