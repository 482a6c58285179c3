//! Per-session context: the rating store plus the configured similarity and
//! boost settings.
//!
//! There is no process-wide current user or shared matrix; everything a
//! query needs travels through an explicit `Session` value, so embedding a
//! second independent session is just constructing another one.

use crate::candidate::{Candidate, DisplayMode, RankedCandidate};
use crate::error::Result;
use crate::rerank::Reranker;
use rating_store::{ItemId, RatingStore, UserId};
use similarity::{CosineSimilarity, Form, Metric, SimilarityMatrix};

/// Owns the store and the knobs a caller would otherwise thread through
/// every `rate`/`rerank` call.
#[derive(Debug)]
pub struct Session {
    store: RatingStore,
    metric: Metric,
    form: Form,
    reranker: Reranker,
}

impl Session {
    /// Session over a loaded store: symmetric Euclidean similarity and the
    /// default boost factor.
    pub fn new(store: RatingStore) -> Self {
        Self {
            store,
            metric: Metric::Euclidean,
            form: Form::Symmetric,
            reranker: Reranker::new(),
        }
    }

    /// Configure the element metric (default: Euclidean).
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Configure the similarity form (default: symmetric).
    pub fn with_form(mut self, form: Form) -> Self {
        self.form = form;
        self
    }

    /// Configure the reranker (default: boost factor 1e6).
    pub fn with_reranker(mut self, reranker: Reranker) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    // Mutation API

    /// Record a raw rating, e.g. from a star-click in the embedding UI.
    pub fn rate(&mut self, user: UserId, item: ItemId, raw: f64) {
        self.store.upsert(user, item, raw);
    }

    /// Withdraw a rating. No-op if absent.
    pub fn unrate(&mut self, user: UserId, item: ItemId) {
        self.store.remove(user, item);
    }

    /// Drop every rating the user has made.
    pub fn reset_user(&mut self, user: UserId) {
        self.store.reset_user(user);
    }

    // Query API

    /// Rerank candidates for a user with the configured metric computed
    /// directly against the store.
    pub fn rerank(
        &self,
        candidates: &[Candidate],
        user: UserId,
        mode: DisplayMode,
    ) -> Result<Vec<RankedCandidate>> {
        let cosine = CosineSimilarity::new(&self.store, self.metric, self.form);
        self.reranker
            .rerank(candidates, user, &self.store, &cosine, mode)
    }

    /// Rerank against any similarity source, e.g. a precomputed matrix.
    pub fn rerank_with<S: similarity::Similarity>(
        &self,
        candidates: &[Candidate],
        user: UserId,
        similarity: &S,
        mode: DisplayMode,
    ) -> Result<Vec<RankedCandidate>> {
        self.reranker
            .rerank(candidates, user, &self.store, similarity, mode)
    }

    /// Precompute the full pairwise matrix for every user in the store.
    ///
    /// The matrix snapshots the store as it is now; ratings recorded later
    /// are not reflected until the caller rebuilds it.
    pub fn precompute_matrix(&self) -> Result<SimilarityMatrix> {
        let users: Vec<UserId> = self.store.all_user_ids().collect();
        let cosine = CosineSimilarity::new(&self.store, self.metric, self.form);
        let matrix =
            SimilarityMatrix::precompute(&cosine, &users, self.form == Form::Symmetric)?;
        Ok(matrix)
    }
}
