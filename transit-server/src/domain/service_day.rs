//! Service-day resolution for late-night queries.
//!
//! A GTFS service day does not end at midnight: a trip that leaves
//! Monday evening and is still running at 1:30 AM Tuesday belongs to
//! Monday's service, timetabled at "25:30:00". Queries made between
//! midnight and the late-night threshold must therefore be evaluated
//! against the previous calendar day's active services, with the query
//! time expressed in extended form.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use super::gtfs_time::GtfsTime;

/// Wall-clock hour before which "now" still belongs to yesterday's
/// service day.
pub const LATE_NIGHT_THRESHOLD_HOUR: u32 = 4;

/// Default end of a query window: 4 AM the following day, covering
/// typical last-night-bus service.
pub const DEFAULT_END_TIME_SECONDS: u32 = 28 * 3600;

/// Which service day a wall-clock instant belongs to.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use transit_server::domain::ServiceContext;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
///
/// // 1:30 AM belongs to yesterday's service day, at 25:30.
/// let ctx = ServiceContext::from_instant(date.and_time(NaiveTime::from_hms_opt(1, 30, 0).unwrap()));
/// assert_eq!(ctx.service_date, NaiveDate::from_ymd_opt(2025, 1, 7).unwrap());
/// assert_eq!(ctx.query_time.to_string(), "25:30:00");
/// assert!(ctx.late_night);
///
/// // 8:00 AM is an ordinary same-day query.
/// let ctx = ServiceContext::from_instant(date.and_time(NaiveTime::from_hms_opt(8, 0, 0).unwrap()));
/// assert_eq!(ctx.service_date, date);
/// assert_eq!(ctx.query_time.to_string(), "08:00:00");
/// assert!(!ctx.late_night);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceContext {
    /// The GTFS service date the instant belongs to.
    pub service_date: NaiveDate,

    /// The instant's time of day, extended past 24:00 when the service
    /// date is the previous calendar day.
    pub query_time: GtfsTime,

    /// Set when the instant falls before the late-night threshold.
    pub late_night: bool,
}

impl ServiceContext {
    /// Resolve which service day `now` belongs to.
    pub fn from_instant(now: NaiveDateTime) -> Self {
        let time = GtfsTime::from_time(now.time());

        if now.hour() < LATE_NIGHT_THRESHOLD_HOUR {
            Self {
                service_date: now.date() - Duration::days(1),
                query_time: time.to_extended(),
                late_night: true,
            }
        } else {
            Self {
                service_date: now.date(),
                query_time: time,
                late_night: false,
            }
        }
    }
}

/// A resolved query window: service date plus start/end times expressed
/// relative to that service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    /// The GTFS service date the window is evaluated against.
    pub service_date: NaiveDate,

    /// Window start, extended when operating in late-night mode.
    pub start: GtfsTime,

    /// Window end. Defaults to 28:00:00 when the caller gives none.
    pub end: GtfsTime,

    /// Whether the window is expressed against yesterday's service day.
    pub late_night: bool,
}

impl QueryWindow {
    /// Derive the window for a query made at `now` with optional
    /// explicit start and end times.
    ///
    /// An explicitly extended `start` (>= 24:00:00) requests the
    /// previous calendar day's service outright, regardless of the
    /// current wall-clock hour. A start before the late-night threshold
    /// continues the current late-night session if there is one, and
    /// otherwise means today's early morning. In late-night mode an end
    /// that lags the start is assumed to wrap past midnight and is
    /// extended; outside it, an inverted window is left alone and will
    /// simply match nothing.
    pub fn resolve(
        now: NaiveDateTime,
        start: Option<GtfsTime>,
        end: Option<GtfsTime>,
    ) -> Self {
        let mut end = end.unwrap_or(GtfsTime::from_seconds(DEFAULT_END_TIME_SECONDS));

        let (service_date, start, late_night) = match start {
            Some(s) if s.is_extended() => (now.date() - Duration::days(1), s, true),
            Some(s) if s.hours() < LATE_NIGHT_THRESHOLD_HOUR => {
                let ctx = ServiceContext::from_instant(now);
                if ctx.late_night {
                    // Same late-night session: keep yesterday's service
                    // day and lift the start past 24:00 with it.
                    (ctx.service_date, s.to_extended(), true)
                } else {
                    (now.date(), s, false)
                }
            }
            Some(s) => (now.date(), s, false),
            None => {
                let ctx = ServiceContext::from_instant(now);
                (ctx.service_date, ctx.query_time, ctx.late_night)
            }
        };

        if late_night {
            if !end.is_extended() && end.hours() < LATE_NIGHT_THRESHOLD_HOUR {
                end = end.to_extended();
            }
            if start > end && !end.is_extended() {
                end = end.to_extended();
            }
        }

        Self {
            service_date,
            start,
            end,
            late_night,
        }
    }
}
