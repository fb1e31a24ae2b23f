//! Web layer for the transit trip planner.
//!
//! Provides HTTP endpoints for resolving stops, listing scheduled
//! arrivals, and planning trips.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
