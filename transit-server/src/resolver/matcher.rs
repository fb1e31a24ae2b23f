//! The stop matcher.
//!
//! Strategies in priority order: exact stop-code, exact stop-id,
//! cross-street pattern, fuzzy name. Exact hits grade Exact; everything
//! else grades off its score.

use std::collections::HashSet;

use super::index::{IndexedStop, StopIndexCache};
use super::normalize::{normalize_text, parse_cross_street};
use super::{MatchConfidence, ResolveError, StopMatch, StopResolution, StopResolver};

/// Matches scoring below this are dropped.
const MIN_SCORE: f64 = 60.0;

/// Fixed score when both cross streets appear in a stop name. Kept
/// below 100 so exact code/id matches always outrank it.
const CROSS_STREET_SCORE: f64 = 85.0;

/// Fixed score when only one of the two cross streets appears.
const CROSS_STREET_PARTIAL_SCORE: f64 = 70.0;

/// Resolver backed by the cached in-memory stop index.
#[derive(Clone)]
pub struct IndexStopResolver {
    index: StopIndexCache,
}

impl IndexStopResolver {
    pub fn new(index: StopIndexCache) -> Self {
        Self { index }
    }
}

impl StopResolver for IndexStopResolver {
    async fn resolve(&self, query: &str, limit: usize) -> Result<StopResolution, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(StopResolution::empty(query));
        }

        let index = self.index.get().await?;
        let mut matches: Vec<StopMatch> = Vec::new();

        // 1. Exact stop-code match.
        if let Some(stop) = index.by_code(query) {
            matches.push(to_match(stop, 100.0, MatchConfidence::Exact));
        }

        // 2. Exact stop-id match, only when the code missed.
        if matches.is_empty() {
            if let Some(stop) = index.by_id(query) {
                matches.push(to_match(stop, 100.0, MatchConfidence::Exact));
            }
        }

        // 3. Cross-street pattern: stops naming both streets score as a
        // confident hit, one street as a weak one.
        if let Some((street1, street2)) = parse_cross_street(query) {
            for stop in index.stops() {
                if matches.iter().any(|m| m.stop_id == stop.stop_id) {
                    continue;
                }
                let name = &stop.normalized_name;
                let score = match (name.contains(&street1), name.contains(&street2)) {
                    (true, true) => CROSS_STREET_SCORE,
                    (true, false) | (false, true) => CROSS_STREET_PARTIAL_SCORE,
                    (false, false) => continue,
                };
                if score >= MIN_SCORE {
                    matches.push(to_match(stop, score, MatchConfidence::from_score(score)));
                }
            }
        }

        // 4. Fuzzy name matching over everything not already matched.
        let query_normalized = normalize_text(query);
        for stop in index.stops() {
            if matches.iter().any(|m| m.stop_id == stop.stop_id) {
                continue;
            }
            let score = fuzzy_score(&query_normalized, &stop.normalized_name);
            if score >= MIN_SCORE {
                matches.push(to_match(stop, score, MatchConfidence::from_score(score)));
            }
        }

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(limit);

        let resolved = matches
            .first()
            .is_some_and(|best| best.confidence.is_resolved());

        tracing::debug!(
            query,
            matches = matches.len(),
            resolved,
            "resolved stop query"
        );

        Ok(StopResolution {
            query: query.to_string(),
            matches,
            resolved,
        })
    }
}

fn to_match(stop: &IndexedStop, score: f64, confidence: MatchConfidence) -> StopMatch {
    StopMatch {
        stop_id: stop.stop_id.clone(),
        stop_code: stop.stop_code.clone(),
        stop_name: stop.stop_name.clone(),
        score,
        confidence,
    }
}

/// Score two normalized names, 0-100.
///
/// Token overlap carries most of the weight (word order and extra words
/// in the stop name should not hurt), with a containment component for
/// substring queries.
fn fuzzy_score(query: &str, target: &str) -> f64 {
    if query == target {
        return 100.0;
    }

    let query_tokens: HashSet<&str> = tokens(query).collect();
    let target_tokens: HashSet<&str> = tokens(target).collect();
    if query_tokens.is_empty() || target_tokens.is_empty() {
        return 0.0;
    }

    let common = query_tokens.intersection(&target_tokens).count() as f64;
    let coverage = f64::max(
        common / query_tokens.len() as f64,
        common / target_tokens.len() as f64,
    );
    let token_score = 100.0 * coverage;

    let partial_score = if target.contains(query) || query.contains(target) {
        100.0
    } else {
        token_score
    };

    token_score * 0.7 + partial_score * 0.3
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}
