//! Configuration for the itinerary search.

/// Tunable parameters for the direct and transfer searches.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// How far past the requested departure to search (hours).
    pub time_window_hours: i64,

    /// Minimum feasible wait at a transfer point (minutes).
    /// Tighter connections are rejected as unmakeable.
    pub min_transfer_mins: i64,

    /// Maximum acceptable wait at a transfer point (minutes).
    /// Longer waits are rejected as unreasonable itineraries.
    pub max_transfer_mins: i64,

    /// Maximum walking distance between transfer stops (meters).
    pub max_walking_meters: f64,

    /// Fixed walking buffer between platforms of the same station
    /// (minutes).
    pub platform_buffer_mins: i64,

    /// Assumed walking speed for proximity transfers (meters per
    /// minute).
    pub walking_speed_m_per_min: f64,

    /// Maximum number of itineraries a request may ask for.
    pub max_results: usize,
}

impl PlannerConfig {
    /// The search window as seconds.
    pub fn time_window_seconds(&self) -> u32 {
        (self.time_window_hours * 3600) as u32
    }

    /// The platform buffer as seconds.
    pub fn platform_buffer_seconds(&self) -> i64 {
        self.platform_buffer_mins * 60
    }

    /// The maximum transfer wait as seconds.
    pub fn max_transfer_seconds(&self) -> u32 {
        (self.max_transfer_mins * 60) as u32
    }

    /// Minutes needed to walk `meters`, rounded down plus a one-minute
    /// buffer.
    pub fn walk_minutes(&self, meters: f64) -> i64 {
        (meters / self.walking_speed_m_per_min) as i64 + 1
    }

    /// Clamp a caller-supplied result limit into the supported range.
    pub fn clamp_limit(&self, limit: usize) -> usize {
        limit.clamp(1, self.max_results)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            time_window_hours: 2,
            min_transfer_mins: 3,
            max_transfer_mins: 30,
            max_walking_meters: 400.0,
            platform_buffer_mins: 2,
            walking_speed_m_per_min: 80.0,
            max_results: 5,
        }
    }
}
