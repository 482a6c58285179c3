//! Blending full-text relevance with neighborhood rating signal.
//!
//! ## Algorithm
//! 1. Optionally drop candidates the querying user already rated
//! 2. A user with no rating history gets plain relevance ordering
//! 3. Collect the neighbor set: every user who rated any surviving
//!    candidate, excluding the querying user
//! 4. Compute one similarity score per neighbor
//! 5. `boosted` = relevance plus the sum of `boost(sim, neighbor rating)`
//!    terms per candidate
//! 6. Stable descending sort on the boosted score
//!
//! The boost factor is large so that among near-tied relevance scores the
//! neighborhood signal decides the order.

use crate::candidate::{Candidate, DisplayMode, RankedCandidate};
use crate::error::Result;
use rating_store::{NEUTRAL_RATING, RatingStore, UserId};
use similarity::Similarity;
use std::collections::BTreeSet;
use tracing::debug;

/// Default weight of one neighbor's rating signal relative to relevance.
pub const DEFAULT_BOOST_FACTOR: f64 = 1e6;

/// Reorders candidate lists by relevance plus neighborhood boost.
#[derive(Debug, Clone, Copy)]
pub struct Reranker {
    boost_factor: f64,
}

impl Reranker {
    pub fn new() -> Self {
        Self {
            boost_factor: DEFAULT_BOOST_FACTOR,
        }
    }

    /// Configure the boost factor (default: 1e6).
    pub fn with_boost_factor(mut self, factor: f64) -> Self {
        self.boost_factor = factor;
        self
    }

    /// Rerank `candidates` for `user`.
    ///
    /// # Arguments
    /// * `candidates` - Hits from the external engine, in any order
    /// * `user` - The querying user
    /// * `store` - Rating history backing the neighborhood signal
    /// * `similarity` - Direct metric or a precomputed matrix
    /// * `mode` - Whether the user's own rated items stay in the list
    ///
    /// # Returns
    /// * `Ok(Vec<RankedCandidate>)` - Descending by boosted score
    /// * `Err` - A memoized similarity source was missing a needed pair
    pub fn rerank<S: Similarity>(
        &self,
        candidates: &[Candidate],
        user: UserId,
        store: &RatingStore,
        similarity: &S,
        mode: DisplayMode,
    ) -> Result<Vec<RankedCandidate>> {
        let survivors: Vec<Candidate> = candidates
            .iter()
            .copied()
            .filter(|candidate| match mode {
                DisplayMode::ShowRated => true,
                DisplayMode::HideRated => !store.contains(user, candidate.item_id),
            })
            .collect();

        // Without a rating history there is no neighborhood signal; hand
        // back plain relevance order.
        if !store.has_ratings(user) {
            return Ok(Self::ranked_by_relevance(survivors));
        }

        // Neighbor set: everyone who rated a surviving candidate. BTreeSet
        // keeps iteration order deterministic, so repeated queries sum the
        // boost terms identically.
        let mut neighbors: BTreeSet<UserId> = BTreeSet::new();
        for candidate in &survivors {
            neighbors.extend(store.users_for_item(candidate.item_id));
        }
        neighbors.remove(&user);

        let mut neighbor_sims = Vec::with_capacity(neighbors.len());
        for &neighbor in &neighbors {
            neighbor_sims.push((neighbor, similarity.sim(user, neighbor)?));
        }
        debug!(
            user,
            candidates = survivors.len(),
            neighbors = neighbor_sims.len(),
            "boosting candidates"
        );

        let mut ranked: Vec<RankedCandidate> = survivors
            .iter()
            .map(|candidate| {
                let mut boosted = candidate.relevance;
                for &(neighbor, sim) in &neighbor_sims {
                    boosted += self.boost(sim, store.get(neighbor, candidate.item_id));
                }
                debug_assert!(!boosted.is_nan());
                RankedCandidate {
                    item_id: candidate.item_id,
                    relevance: candidate.relevance,
                    boosted,
                }
            })
            .collect();

        ranked.sort_by(|x, y| y.boosted.total_cmp(&x.boosted));
        Ok(ranked)
    }

    /// One neighbor's additive adjustment for one item.
    ///
    /// A zero similarity or a neutral rating contributes nothing; returning
    /// early also keeps an infinite similarity from turning `Infinity * 0`
    /// into NaN. Unrated pairs read [`NEUTRAL_RATING`] from the store, so an
    /// unrated neighbor never moves a candidate.
    fn boost(&self, sim: f64, rating: f64) -> f64 {
        let delta = rating - NEUTRAL_RATING;
        if sim == 0.0 || delta == 0.0 {
            return 0.0;
        }
        self.boost_factor * sim * delta
    }

    fn ranked_by_relevance(survivors: Vec<Candidate>) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = survivors
            .into_iter()
            .map(|candidate| RankedCandidate {
                item_id: candidate.item_id,
                relevance: candidate.relevance,
                boosted: candidate.relevance,
            })
            .collect();
        ranked.sort_by(|x, y| y.boosted.total_cmp(&x.boosted));
        ranked
    }
}

impl Default for Reranker {
    fn default() -> Self {
        Self::new()
    }
}
