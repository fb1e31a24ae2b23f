//! Read access to the GTFS relational store.
//!
//! The store is a SQLite database produced by the (external) GTFS
//! ingester; its schema is a fixed given. Every query here decodes into
//! an explicit row struct so the rest of the crate never touches
//! untyped rows. The dataset is immutable for the duration of a query,
//! so everything is a plain read with no locking.

mod calendar;
mod queries;
mod rows;

#[cfg(test)]
pub(crate) mod testutil;

pub use rows::{
    ArrivalRow, DirectTripRow, IndexedStopRow, InboundSegmentRow, OutboundSegmentRow,
    StopInfoRow, StopLocation,
};

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Error from the storage layer.
///
/// Store failures are fatal for the request that hit them; retry and
/// backoff, if any, belong to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database file does not exist
    #[error("GTFS database not found at {0}; run the ingester first")]
    NotFound(PathBuf),

    /// Any underlying database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handle on the GTFS database.
#[derive(Clone)]
pub struct GtfsStore {
    pool: SqlitePool,
}

impl GtfsStore {
    /// Open an existing GTFS database file, failing fast if it is
    /// missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let options = SqliteConnectOptions::new().filename(path);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Connect by URL with a single pooled connection.
    ///
    /// Intended for tests and tooling; `sqlite::memory:` databases live
    /// and die with their one connection.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the GTFS tables and indices on a fresh database.
    ///
    /// The ingester that populates them is a separate concern; this
    /// exists so tests and new deployments start from the right shape.
    pub async fn apply_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

/// The fixed GTFS schema this crate queries against.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS stops (
    stop_id TEXT PRIMARY KEY,
    stop_code TEXT,
    stop_name TEXT NOT NULL,
    stop_lat REAL,
    stop_lon REAL,
    location_type INTEGER,
    parent_station TEXT,
    wheelchair_boarding INTEGER
);

CREATE TABLE IF NOT EXISTS routes (
    route_id TEXT PRIMARY KEY,
    route_short_name TEXT,
    route_long_name TEXT,
    route_type INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS trips (
    trip_id TEXT PRIMARY KEY,
    route_id TEXT NOT NULL,
    service_id TEXT NOT NULL,
    trip_headsign TEXT,
    direction_id INTEGER
);

CREATE TABLE IF NOT EXISTS stop_times (
    trip_id TEXT NOT NULL,
    arrival_time TEXT NOT NULL,
    departure_time TEXT NOT NULL,
    stop_id TEXT NOT NULL,
    stop_sequence INTEGER NOT NULL,
    PRIMARY KEY (trip_id, stop_sequence)
);

CREATE TABLE IF NOT EXISTS calendar (
    service_id TEXT PRIMARY KEY,
    monday INTEGER NOT NULL,
    tuesday INTEGER NOT NULL,
    wednesday INTEGER NOT NULL,
    thursday INTEGER NOT NULL,
    friday INTEGER NOT NULL,
    saturday INTEGER NOT NULL,
    sunday INTEGER NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS calendar_dates (
    service_id TEXT NOT NULL,
    date TEXT NOT NULL,
    exception_type INTEGER NOT NULL,
    PRIMARY KEY (service_id, date)
);

CREATE INDEX IF NOT EXISTS idx_stop_times_stop ON stop_times (stop_id, departure_time);
CREATE INDEX IF NOT EXISTS idx_stop_times_trip ON stop_times (trip_id, stop_sequence);
CREATE INDEX IF NOT EXISTS idx_trips_service ON trips (service_id);
CREATE INDEX IF NOT EXISTS idx_calendar_dates_date ON calendar_dates (date);
"#;
