//! Itineraries and their legs.
//!
//! An itinerary is one or two vehicle legs from an origin stop to a
//! destination stop, built once by the finders and immutable afterwards.

use super::error::DomainError;
use super::gtfs_time::GtfsTime;
use super::ids::{RouteId, StopId, TripId};

/// A stop as referenced from a leg: id plus the resolved display name
/// and rider-facing code.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRef {
    pub id: StopId,
    pub name: String,
    pub code: Option<String>,
}

impl StopRef {
    /// Reference a stop by id alone, using the id as its display name.
    /// Used when the stop row is missing from the store.
    pub fn unnamed(id: StopId) -> Self {
        let name = id.as_str().to_string();
        Self {
            id,
            name,
            code: None,
        }
    }
}

/// One vehicle leg: a single trip ridden from one stop to another.
#[derive(Debug, Clone, PartialEq)]
pub struct TripLeg {
    route_id: RouteId,
    route_short_name: Option<String>,
    route_type: i64,
    trip_id: TripId,
    trip_headsign: Option<String>,
    from: StopRef,
    to: StopRef,
    departure: GtfsTime,
    arrival: GtfsTime,
    num_stops: i64,
}

impl TripLeg {
    /// Build a leg, validating that it arrives no earlier than it
    /// departs and serves at least its two endpoint stops.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        route_id: RouteId,
        route_short_name: Option<String>,
        route_type: i64,
        trip_id: TripId,
        trip_headsign: Option<String>,
        from: StopRef,
        to: StopRef,
        departure: GtfsTime,
        arrival: GtfsTime,
        num_stops: i64,
    ) -> Result<Self, DomainError> {
        if arrival < departure {
            return Err(DomainError::InvalidLeg("arrives before it departs"));
        }
        if num_stops < 2 {
            return Err(DomainError::InvalidLeg("fewer than two stops"));
        }
        Ok(Self {
            route_id,
            route_short_name,
            route_type,
            trip_id,
            trip_headsign,
            from,
            to,
            departure,
            arrival,
            num_stops,
        })
    }

    pub fn route_id(&self) -> &RouteId {
        &self.route_id
    }

    pub fn route_short_name(&self) -> Option<&str> {
        self.route_short_name.as_deref()
    }

    pub fn route_type(&self) -> i64 {
        self.route_type
    }

    pub fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    pub fn trip_headsign(&self) -> Option<&str> {
        self.trip_headsign.as_deref()
    }

    pub fn from(&self) -> &StopRef {
        &self.from
    }

    pub fn to(&self) -> &StopRef {
        &self.to
    }

    pub fn departure(&self) -> GtfsTime {
        self.departure
    }

    pub fn arrival(&self) -> GtfsTime {
        self.arrival
    }

    /// Riding time in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.arrival.minutes_until(self.departure)
    }

    /// Number of stops served including both endpoints.
    pub fn num_stops(&self) -> i64 {
        self.num_stops
    }
}

/// Wait and walk metadata for a one-transfer itinerary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferMeta {
    /// Minutes spent at the transfer point, inclusive of any walk or
    /// platform-change buffer.
    pub wait_minutes: i64,

    /// Walking distance in meters; 0 for same-stop and same-station
    /// transfers.
    pub walk_meters: f64,

    /// Minutes of the wait spent walking.
    pub walk_minutes: i64,
}

/// A complete journey option: one or two legs, ranked by total
/// duration. Constructed once; never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    legs: Vec<TripLeg>,
    transfer: Option<TransferMeta>,
}

impl Itinerary {
    /// A direct, single-leg itinerary.
    pub fn direct(leg: TripLeg) -> Self {
        Self {
            legs: vec![leg],
            transfer: None,
        }
    }

    /// A two-leg itinerary through one transfer point.
    ///
    /// The second leg must not depart before the first arrives.
    pub fn with_transfer(
        first: TripLeg,
        second: TripLeg,
        transfer: TransferMeta,
    ) -> Result<Self, DomainError> {
        if second.departure() < first.arrival() {
            return Err(DomainError::InvalidItinerary(
                "second leg departs before the first arrives",
            ));
        }
        Ok(Self {
            legs: vec![first, second],
            transfer: Some(transfer),
        })
    }

    pub fn legs(&self) -> &[TripLeg] {
        &self.legs
    }

    /// Departure time from the origin stop.
    pub fn departure(&self) -> GtfsTime {
        self.legs[0].departure()
    }

    /// Arrival time at the destination stop.
    pub fn arrival(&self) -> GtfsTime {
        self.legs[self.legs.len() - 1].arrival()
    }

    /// End-to-end duration in minutes, including transfer wait and walk.
    pub fn total_duration_minutes(&self) -> i64 {
        self.arrival().minutes_until(self.departure())
    }

    pub fn num_transfers(&self) -> usize {
        self.legs.len() - 1
    }

    pub fn transfer(&self) -> Option<&TransferMeta> {
        self.transfer.as_ref()
    }
}
