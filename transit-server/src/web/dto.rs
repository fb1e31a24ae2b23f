//! Data transfer objects for web requests and responses.
//!
//! Domain times are serialized twice: the raw GTFS string for machine
//! use and a 12-hour rendering for display.

use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, TripLeg};
use crate::planner::{PlanTripResult, StopResolutionInfo};
use crate::schedule::{ScheduledArrival, ScheduledArrivalsResult};

/// Query parameters for stop resolution.
#[derive(Debug, Deserialize)]
pub struct ResolveStopsRequest {
    /// The search text
    pub q: String,

    /// Maximum matches to return (default 5)
    pub limit: Option<usize>,
}

/// Query parameters for scheduled arrivals.
#[derive(Debug, Deserialize)]
pub struct ArrivalsRequestDto {
    pub stop_id: String,

    /// Optional route filter
    pub route_id: Option<String>,

    /// Window start "HH:MM:SS" (default: now)
    pub start_time: Option<String>,

    /// Window end "HH:MM:SS" (default: 28:00:00)
    pub end_time: Option<String>,

    /// Maximum arrivals (default 20)
    pub limit: Option<usize>,
}

/// Query parameters for trip planning.
#[derive(Debug, Deserialize)]
pub struct PlanTripRequestDto {
    /// Origin stop code, id, or name
    pub origin: String,

    /// Destination stop code, id, or name
    pub destination: String,

    /// Departure "HH:MM:SS" (default: now)
    pub departure_time: Option<String>,

    /// Maximum itineraries (default 3)
    pub limit: Option<usize>,
}

/// A stop in a response.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_code: Option<String>,
}

/// One scheduled arrival.
#[derive(Debug, Serialize)]
pub struct ArrivalResult {
    pub trip_id: String,
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_type: i64,
    pub trip_headsign: Option<String>,
    pub arrival_time: String,
    pub arrival_time_formatted: String,
    pub minutes_until: i64,
}

impl ArrivalResult {
    fn from_arrival(arrival: &ScheduledArrival) -> Self {
        Self {
            trip_id: arrival.trip_id.to_string(),
            route_id: arrival.route_id.to_string(),
            route_short_name: arrival.route_short_name.clone(),
            route_type: arrival.route_type,
            trip_headsign: arrival.trip_headsign.clone(),
            arrival_time: arrival.arrival_time.to_string(),
            arrival_time_formatted: arrival.arrival_time.format_display(),
            minutes_until: arrival.minutes_until,
        }
    }
}

/// Response for the arrivals endpoint.
#[derive(Debug, Serialize)]
pub struct ArrivalsResponse {
    pub stop: StopResult,
    pub arrivals: Vec<ArrivalResult>,
    pub service_date: String,
    pub query_time: String,
    pub count: usize,
}

impl ArrivalsResponse {
    pub fn from_result(result: &ScheduledArrivalsResult) -> Self {
        let arrivals: Vec<ArrivalResult> = result
            .arrivals
            .iter()
            .map(ArrivalResult::from_arrival)
            .collect();
        Self {
            stop: StopResult {
                stop_id: result.stop.id.to_string(),
                stop_name: result.stop.name.clone(),
                stop_code: result.stop.code.clone(),
            },
            count: arrivals.len(),
            arrivals,
            service_date: result.service_date.to_string(),
            query_time: result.query_time.to_string(),
        }
    }
}

/// One leg of an itinerary.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_type: i64,
    pub trip_id: String,
    pub trip_headsign: Option<String>,
    pub from_stop_id: String,
    pub from_stop_name: String,
    pub from_stop_code: Option<String>,
    pub to_stop_id: String,
    pub to_stop_name: String,
    pub to_stop_code: Option<String>,
    pub departure_time: String,
    pub departure_time_formatted: String,
    pub arrival_time: String,
    pub arrival_time_formatted: String,
    pub duration_minutes: i64,
    pub num_stops: i64,
}

impl LegResult {
    fn from_leg(leg: &TripLeg) -> Self {
        Self {
            route_id: leg.route_id().to_string(),
            route_short_name: leg.route_short_name().map(str::to_string),
            route_type: leg.route_type(),
            trip_id: leg.trip_id().to_string(),
            trip_headsign: leg.trip_headsign().map(str::to_string),
            from_stop_id: leg.from().id.to_string(),
            from_stop_name: leg.from().name.clone(),
            from_stop_code: leg.from().code.clone(),
            to_stop_id: leg.to().id.to_string(),
            to_stop_name: leg.to().name.clone(),
            to_stop_code: leg.to().code.clone(),
            departure_time: leg.departure().to_string(),
            departure_time_formatted: leg.departure().format_display(),
            arrival_time: leg.arrival().to_string(),
            arrival_time_formatted: leg.arrival().format_display(),
            duration_minutes: leg.duration_minutes(),
            num_stops: leg.num_stops(),
        }
    }
}

/// One itinerary option.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    pub legs: Vec<LegResult>,
    pub departure_time: String,
    pub departure_time_formatted: String,
    pub arrival_time: String,
    pub arrival_time_formatted: String,
    pub total_duration_minutes: i64,
    pub num_transfers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_wait_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_walk_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_walk_minutes: Option<i64>,
}

impl ItineraryResult {
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        let transfer = itinerary.transfer();
        Self {
            legs: itinerary.legs().iter().map(LegResult::from_leg).collect(),
            departure_time: itinerary.departure().to_string(),
            departure_time_formatted: itinerary.departure().format_display(),
            arrival_time: itinerary.arrival().to_string(),
            arrival_time_formatted: itinerary.arrival().format_display(),
            total_duration_minutes: itinerary.total_duration_minutes(),
            num_transfers: itinerary.num_transfers(),
            transfer_wait_minutes: transfer.map(|t| t.wait_minutes),
            transfer_walk_meters: transfer
                .map(|t| t.walk_meters)
                .filter(|&meters| meters > 0.0),
            transfer_walk_minutes: transfer
                .map(|t| t.walk_minutes)
                .filter(|&mins| mins > 0),
        }
    }
}

/// Response for the trip-planning endpoint.
#[derive(Debug, Serialize)]
pub struct PlanTripResponse {
    pub origin_resolution: StopResolutionInfo,
    pub destination_resolution: StopResolutionInfo,
    pub itineraries: Vec<ItineraryResult>,
    pub service_date: String,
    pub query_time: String,
    pub count: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlanTripResponse {
    pub fn from_result(result: PlanTripResult) -> Self {
        let itineraries: Vec<ItineraryResult> = result
            .itineraries
            .iter()
            .map(ItineraryResult::from_itinerary)
            .collect();
        Self {
            origin_resolution: result.origin_resolution,
            destination_resolution: result.destination_resolution,
            count: itineraries.len(),
            itineraries,
            service_date: result.service_date.to_string(),
            query_time: result.query_time.to_string(),
            success: result.success,
            error: result.error,
        }
    }
}

/// Error payload for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
