//! Domain error types.
//!
//! Validation failures in the domain layer, distinct from store/IO
//! errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A leg's times or sequence numbers are inconsistent
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// An itinerary's legs do not fit together
    #[error("invalid itinerary: {0}")]
    InvalidItinerary(&'static str),
}
