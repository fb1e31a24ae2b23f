//! GTFS time handling.
//!
//! GTFS encodes times of day as "HH:MM:SS" strings where the hour may
//! exceed 23: a trip that leaves at 23:50 and arrives at 01:30 the next
//! morning records the arrival as "25:30:00", keeping the whole trip on
//! one service day. This module provides a value type for working with
//! these times without losing the extension.

use chrono::{NaiveTime, Timelike};
use std::fmt;

/// Error returned when parsing an invalid GTFS time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid GTFS time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A GTFS time of day, measured in seconds since service-day midnight.
///
/// Hours may exceed 23 for service that continues past midnight, so two
/// values can name the same clock moment with different extensions
/// ("02:10:00" vs "26:10:00"). Callers must track which service day a
/// value is relative to; comparisons are only meaningful within one
/// service day.
///
/// # Examples
///
/// ```
/// use transit_server::domain::GtfsTime;
///
/// let t = GtfsTime::parse("25:30:00").unwrap();
/// assert_eq!(t.hours(), 25);
/// assert_eq!(t.to_string(), "25:30:00");
/// assert_eq!(t.format_display(), "1:30 AM (+1)");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GtfsTime {
    secs: u32,
}

impl GtfsTime {
    /// Create a time from hour/minute/second components.
    ///
    /// Hours are unbounded above (extended times); minutes and seconds
    /// must be 0-59.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if minutes > 59 || seconds > 59 {
            return None;
        }
        Some(Self {
            secs: hours * 3600 + minutes * 60 + seconds,
        })
    }

    /// Create a time from total seconds since service-day midnight.
    pub fn from_seconds(secs: u32) -> Self {
        Self { secs }
    }

    /// Convert a wall-clock time of day to an (unextended) GTFS time.
    pub fn from_time(time: NaiveTime) -> Self {
        Self {
            secs: time.num_seconds_from_midnight(),
        }
    }

    /// Parse a GTFS "HH:MM:SS" string.
    ///
    /// Exactly three colon-separated integer components are required.
    /// The hour may be >= 24; minutes and seconds must be 0-59.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::GtfsTime;
    ///
    /// assert!(GtfsTime::parse("08:30:00").is_ok());
    /// assert!(GtfsTime::parse("27:15:30").is_ok());
    ///
    /// assert!(GtfsTime::parse("08:30").is_err());
    /// assert!(GtfsTime::parse("8h30m00s").is_err());
    /// assert!(GtfsTime::parse("08:61:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(':');

        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::new(s, "expected HH:MM:SS"));
        };

        let hours: u32 = h
            .parse()
            .map_err(|_| TimeError::new(s, "invalid hour digits"))?;
        let minutes: u32 = m
            .parse()
            .map_err(|_| TimeError::new(s, "invalid minute digits"))?;
        let seconds: u32 = sec
            .parse()
            .map_err(|_| TimeError::new(s, "invalid second digits"))?;

        Self::from_hms(hours, minutes, seconds)
            .ok_or_else(|| TimeError::new(s, "minute and second must be 0-59"))
    }

    /// Parse a GTFS time, returning `None` on malformed input.
    ///
    /// Used where a malformed stored value should drop one record rather
    /// than abort a batch operation.
    pub fn parse_opt(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }

    /// Total seconds since service-day midnight (may exceed 86400).
    pub fn total_seconds(&self) -> u32 {
        self.secs
    }

    /// The hour component (may be >= 24 for extended times).
    pub fn hours(&self) -> u32 {
        self.secs / 3600
    }

    /// The minute component (0-59).
    pub fn minutes(&self) -> u32 {
        (self.secs % 3600) / 60
    }

    /// The second component (0-59).
    pub fn seconds(&self) -> u32 {
        self.secs % 60
    }

    /// Whether this time is in extended form (hour >= 24).
    pub fn is_extended(&self) -> bool {
        self.hours() >= 24
    }

    /// Convert to extended form by adding 24 hours if not already
    /// extended. Idempotent.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::GtfsTime;
    ///
    /// let t = GtfsTime::parse("02:10:00").unwrap();
    /// assert_eq!(t.to_extended().to_string(), "26:10:00");
    /// assert_eq!(t.to_extended().to_extended(), t.to_extended());
    /// ```
    pub fn to_extended(&self) -> Self {
        if self.is_extended() {
            *self
        } else {
            Self {
                secs: self.secs + 24 * 3600,
            }
        }
    }

    /// Apply a delay in seconds, preserving any extension past 24:00.
    ///
    /// Returns `None` if the delayed time would be negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::GtfsTime;
    ///
    /// let t = GtfsTime::parse("08:25:00").unwrap();
    /// assert_eq!(t.apply_delay(180).unwrap().to_string(), "08:28:00");
    /// assert_eq!(t.apply_delay(-120).unwrap().to_string(), "08:23:00");
    /// assert_eq!(t.apply_delay(0).unwrap(), t);
    ///
    /// let late = GtfsTime::parse("23:58:00").unwrap();
    /// assert_eq!(late.apply_delay(300).unwrap().to_string(), "24:03:00");
    /// ```
    pub fn apply_delay(&self, delay_seconds: i64) -> Option<Self> {
        let delayed = i64::from(self.secs) + delay_seconds;
        u32::try_from(delayed).ok().map(|secs| Self { secs })
    }

    /// Whole minutes from `reference` until `self`, truncated toward
    /// zero. Negative when `self` is before `reference`.
    pub fn minutes_until(&self, reference: Self) -> i64 {
        (i64::from(self.secs) - i64::from(reference.secs)) / 60
    }

    /// Advance by a number of seconds. Unlike [`apply_delay`] this takes
    /// an unsigned offset and cannot fail.
    ///
    /// [`apply_delay`]: GtfsTime::apply_delay
    pub fn plus_seconds(&self, seconds: u32) -> Self {
        Self {
            secs: self.secs + seconds,
        }
    }

    /// Format for human display: 12-hour clock with AM/PM, and a "(+1)"
    /// marker for times past midnight on the following day.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::GtfsTime;
    ///
    /// assert_eq!(GtfsTime::parse("00:00:00").unwrap().format_display(), "12:00 AM");
    /// assert_eq!(GtfsTime::parse("12:00:00").unwrap().format_display(), "12:00 PM");
    /// assert_eq!(GtfsTime::parse("14:30:00").unwrap().format_display(), "2:30 PM");
    /// assert_eq!(GtfsTime::parse("25:30:00").unwrap().format_display(), "1:30 AM (+1)");
    /// ```
    pub fn format_display(&self) -> String {
        let mut hours = self.hours();
        let next_day = if hours >= 24 {
            hours -= 24;
            " (+1)"
        } else {
            ""
        };

        let (display_hour, period) = match hours {
            0 => (12, "AM"),
            h if h < 12 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };

        format!("{}:{:02} {}{}", display_hour, self.minutes(), period, next_day)
    }
}

impl fmt::Display for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl fmt::Debug for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GtfsTime({})", self)
    }
}
