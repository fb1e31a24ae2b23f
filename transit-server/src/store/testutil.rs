//! Shared SQLite fixtures for store-backed tests.

use super::GtfsStore;

/// An in-memory store with the GTFS schema applied.
pub(crate) async fn fixture_store() -> GtfsStore {
    let store = GtfsStore::connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    store.apply_schema().await.expect("schema");
    store
}

pub(crate) async fn insert_stop(
    store: &GtfsStore,
    stop_id: &str,
    stop_code: Option<&str>,
    stop_name: &str,
    lat: f64,
    lon: f64,
    parent_station: Option<&str>,
    location_type: i64,
) {
    sqlx::query(
        "INSERT INTO stops (stop_id, stop_code, stop_name, stop_lat, stop_lon, location_type, parent_station) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(stop_id)
    .bind(stop_code)
    .bind(stop_name)
    .bind(lat)
    .bind(lon)
    .bind(location_type)
    .bind(parent_station)
    .execute(store.pool())
    .await
    .expect("insert stop");
}

pub(crate) async fn insert_route(
    store: &GtfsStore,
    route_id: &str,
    short_name: &str,
    route_type: i64,
) {
    sqlx::query("INSERT INTO routes (route_id, route_short_name, route_type) VALUES (?, ?, ?)")
        .bind(route_id)
        .bind(short_name)
        .bind(route_type)
        .execute(store.pool())
        .await
        .expect("insert route");
}

pub(crate) async fn insert_trip(
    store: &GtfsStore,
    trip_id: &str,
    route_id: &str,
    service_id: &str,
    headsign: &str,
) {
    sqlx::query(
        "INSERT INTO trips (trip_id, route_id, service_id, trip_headsign) VALUES (?, ?, ?, ?)",
    )
    .bind(trip_id)
    .bind(route_id)
    .bind(service_id)
    .bind(headsign)
    .execute(store.pool())
    .await
    .expect("insert trip");
}

pub(crate) async fn insert_stop_time(
    store: &GtfsStore,
    trip_id: &str,
    arrival: &str,
    departure: &str,
    stop_id: &str,
    seq: i64,
) {
    sqlx::query(
        "INSERT INTO stop_times (trip_id, arrival_time, departure_time, stop_id, stop_sequence) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(trip_id)
    .bind(arrival)
    .bind(departure)
    .bind(stop_id)
    .bind(seq)
    .execute(store.pool())
    .await
    .expect("insert stop_time");
}

pub(crate) async fn insert_calendar(
    store: &GtfsStore,
    service_id: &str,
    days: [i64; 7],
    start_date: &str,
    end_date: &str,
) {
    sqlx::query(
        "INSERT INTO calendar \
         (service_id, monday, tuesday, wednesday, thursday, friday, saturday, sunday, start_date, end_date) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(service_id)
    .bind(days[0])
    .bind(days[1])
    .bind(days[2])
    .bind(days[3])
    .bind(days[4])
    .bind(days[5])
    .bind(days[6])
    .bind(start_date)
    .bind(end_date)
    .execute(store.pool())
    .await
    .expect("insert calendar");
}

pub(crate) async fn insert_calendar_date(
    store: &GtfsStore,
    service_id: &str,
    date: &str,
    exception_type: i64,
) {
    sqlx::query(
        "INSERT INTO calendar_dates (service_id, date, exception_type) VALUES (?, ?, ?)",
    )
    .bind(service_id)
    .bind(date)
    .bind(exception_type)
    .execute(store.pool())
    .await
    .expect("insert calendar_date");
}
