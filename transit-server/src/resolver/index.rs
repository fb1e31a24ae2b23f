//! In-memory stop index for resolution.
//!
//! Built from the store's stops table and cached with a TTL so the
//! matcher never hits SQL per query. The cache is an explicitly
//! constructed service injected where needed, with no global state; a
//! fresh one per test gives deterministic behavior.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::StopId;
use crate::store::GtfsStore;

use super::ResolveError;
use super::normalize::normalize_text;

/// One stop prepared for matching.
#[derive(Debug, Clone)]
pub struct IndexedStop {
    pub stop_id: StopId,
    pub stop_code: Option<String>,
    pub stop_name: String,
    pub normalized_name: String,
}

/// All stops, indexed for the matcher's strategies.
#[derive(Debug)]
pub struct StopIndex {
    stops: Vec<IndexedStop>,
    by_code: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl StopIndex {
    /// Build an index from raw stop rows.
    pub fn build(rows: Vec<crate::store::IndexedStopRow>) -> Self {
        let stops: Vec<IndexedStop> = rows
            .into_iter()
            .map(|row| IndexedStop {
                normalized_name: normalize_text(&row.stop_name),
                stop_id: StopId::new(row.stop_id),
                stop_code: row.stop_code,
                stop_name: row.stop_name,
            })
            .collect();

        let mut by_code = HashMap::new();
        let mut by_id = HashMap::new();
        for (idx, stop) in stops.iter().enumerate() {
            if let Some(code) = &stop.stop_code {
                by_code.entry(code.clone()).or_insert(idx);
            }
            by_id.entry(stop.stop_id.as_str().to_string()).or_insert(idx);
        }

        Self {
            stops,
            by_code,
            by_id,
        }
    }

    pub fn stops(&self) -> &[IndexedStop] {
        &self.stops
    }

    pub fn by_code(&self, code: &str) -> Option<&IndexedStop> {
        self.by_code.get(code).map(|&idx| &self.stops[idx])
    }

    pub fn by_id(&self, id: &str) -> Option<&IndexedStop> {
        self.by_id.get(id).map(|&idx| &self.stops[idx])
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// How long a loaded index stays fresh. The static feed changes at most
/// a few times a year; six hours keeps restarts unnecessary.
const INDEX_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// TTL-cached loader for the stop index.
#[derive(Clone)]
pub struct StopIndexCache {
    store: GtfsStore,
    cache: MokaCache<(), Arc<StopIndex>>,
}

impl StopIndexCache {
    /// Create a cache over the given store.
    pub fn new(store: GtfsStore) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(INDEX_TTL)
            .max_capacity(1)
            .build();
        Self { store, cache }
    }

    /// The current index, loading it from the store on first use or
    /// after expiry.
    pub async fn get(&self) -> Result<Arc<StopIndex>, ResolveError> {
        if let Some(index) = self.cache.get(&()).await {
            return Ok(index);
        }

        let rows = self.store.all_stops().await?;
        let index = Arc::new(StopIndex::build(rows));
        tracing::info!(stops = index.len(), "loaded stop index");
        self.cache.insert((), index.clone()).await;
        Ok(index)
    }

    /// Drop the cached index so the next lookup reloads.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}
