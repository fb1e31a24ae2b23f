//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Local;
use tower_http::trace::TraceLayer;

use crate::domain::{GtfsTime, RouteId, StopId};
use crate::planner::{PlanError, PlanRequest};
use crate::resolver::{ResolveError, StopResolver};
use crate::schedule::{ArrivalsRequest, ScheduleError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stops/resolve", get(resolve_stops))
        .route("/arrivals", get(arrivals))
        .route("/trip/plan", get(plan_trip))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Resolve a free-text stop query to candidate stops.
async fn resolve_stops(
    State(state): State<AppState>,
    Query(req): Query<ResolveStopsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let limit = req.limit.unwrap_or(5).min(20);
    let resolution = state.resolver.resolve(&req.q, limit).await?;
    Ok(Json(resolution))
}

/// Scheduled arrivals at a stop.
async fn arrivals(
    State(state): State<AppState>,
    Query(req): Query<ArrivalsRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let request = ArrivalsRequest {
        stop_id: StopId::new(req.stop_id),
        route_id: req.route_id.map(RouteId::new),
        start_time: parse_time_param(req.start_time.as_deref(), "start_time")?,
        end_time: parse_time_param(req.end_time.as_deref(), "end_time")?,
        limit: req.limit.unwrap_or(20),
    };

    let now = Local::now().naive_local();
    let result = state.schedule.scheduled_arrivals(&request, now).await?;
    Ok(Json(ArrivalsResponse::from_result(&result)))
}

/// Plan a trip between two fuzzy endpoints.
async fn plan_trip(
    State(state): State<AppState>,
    Query(req): Query<PlanTripRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let request = PlanRequest {
        origin: req.origin,
        destination: req.destination,
        departure_time: parse_time_param(req.departure_time.as_deref(), "departure_time")?,
        limit: req.limit.unwrap_or(3),
    };

    let now = Local::now().naive_local();
    let result = state.planner.plan(&request, now).await?;
    Ok(Json(PlanTripResponse::from_result(result)))
}

/// Parse an optional caller-supplied GTFS time, rejecting garbage as a
/// bad request rather than guessing.
fn parse_time_param(value: Option<&str>, name: &str) -> Result<Option<GtfsTime>, AppError> {
    value
        .map(|s| {
            GtfsTime::parse(s).map_err(|e| AppError::BadRequest {
                message: format!("invalid {name}: {e}"),
            })
        })
        .transpose()
}

/// Web-layer error with an HTTP status.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::StopNotFound(stop) => AppError::NotFound {
                message: format!("stop not found: {stop}"),
            },
            other => AppError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            tracing::error!(%status, message, "request failed");
        } else {
            tracing::warn!(%status, message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
