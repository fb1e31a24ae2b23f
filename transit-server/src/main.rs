use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use transit_server::planner::{PlannerConfig, TripPlanner};
use transit_server::resolver::{IndexStopResolver, StopIndexCache};
use transit_server::schedule::ScheduleService;
use transit_server::store::GtfsStore;
use transit_server::web::{AppState, create_router};

/// Default database location, matching the ingester's output path.
const DEFAULT_DB_PATH: &str = "data/gtfs.db";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transit_server=info,tower_http=info")),
        )
        .init();

    let db_path =
        std::env::var("TRANSIT_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let bind_addr =
        std::env::var("TRANSIT_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    // Fail fast: without the database there is nothing to serve.
    let store = GtfsStore::open(&db_path)
        .await
        .expect("failed to open GTFS database");
    tracing::info!(db_path, "opened GTFS database");

    // Warm the stop index so the first query doesn't pay for the load.
    let index_cache = StopIndexCache::new(store.clone());
    let index = index_cache
        .get()
        .await
        .expect("failed to load stop index");
    tracing::info!(stops = index.len(), "stop index ready");

    let resolver = IndexStopResolver::new(index_cache);
    let planner = TripPlanner::new(store.clone(), resolver.clone(), PlannerConfig::default());
    let schedule = ScheduleService::new(store);

    let state = AppState::new(planner, schedule, resolver);
    let app = create_router(state);

    let addr: SocketAddr = bind_addr.parse().expect("invalid TRANSIT_BIND_ADDR");
    tracing::info!(%addr, "transit server listening");
    println!("Transit server listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET /health        - Health check");
    println!("  GET /stops/resolve - Resolve a stop query");
    println!("  GET /arrivals      - Scheduled arrivals at a stop");
    println!("  GET /trip/plan     - Plan a trip");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app).await.expect("server error");
}
