//! Fuzzy stop resolution.
//!
//! Turns free-text queries ("berri uqam", "51001", "Sherbrooke /
//! Saint-Denis") into stop ids with a confidence grade. The planner only
//! auto-uses a match when the confidence is Exact or High; anything
//! weaker is reported back to the caller instead of being guessed at.

mod index;
mod matcher;
mod normalize;

pub use index::{IndexedStop, StopIndex, StopIndexCache};
pub use matcher::IndexStopResolver;
pub use normalize::{normalize_text, parse_cross_street};

use serde::Serialize;

use crate::domain::StopId;
use crate::store::StoreError;

/// Error from the resolution layer.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The stop index could not be loaded from the store
    #[error("failed to load stop index: {0}")]
    IndexLoad(#[from] StoreError),
}

/// How sure the matcher is about a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    Low,
    Medium,
    High,
    /// An exact stop-code or stop-id hit.
    Exact,
}

impl MatchConfidence {
    /// Grade a fuzzy score: >= 85 is High, >= 70 Medium, below that Low.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::High
        } else if score >= 70.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Whether a match of this confidence is safe to act on without
    /// asking the caller.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Exact | Self::High)
    }
}

/// A stop matched against a query.
#[derive(Debug, Clone, Serialize)]
pub struct StopMatch {
    pub stop_id: StopId,
    pub stop_code: Option<String>,
    pub stop_name: String,
    /// Match score, 0-100.
    pub score: f64,
    pub confidence: MatchConfidence,
}

/// The outcome of resolving one query: ranked matches plus whether the
/// best one is trustworthy. Always returned by value, never thrown.
#[derive(Debug, Clone, Serialize)]
pub struct StopResolution {
    pub query: String,
    pub matches: Vec<StopMatch>,
    /// True when the best match has Exact or High confidence.
    pub resolved: bool,
}

impl StopResolution {
    /// The top-ranked match, if any.
    pub fn best_match(&self) -> Option<&StopMatch> {
        self.matches.first()
    }

    pub(crate) fn empty(query: &str) -> Self {
        Self {
            query: query.to_string(),
            matches: Vec::new(),
            resolved: false,
        }
    }
}

/// The seam between the planner and stop resolution, so the planner can
/// be tested against a canned resolver.
pub trait StopResolver {
    /// Resolve a query to at most `limit` ranked matches.
    fn resolve(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<StopResolution, ResolveError>> + Send;
}
