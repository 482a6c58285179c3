//! Memoized pairwise similarity matrix.
//!
//! Precomputing pairwise scores keeps repeated queries from re-walking the
//! rating store. Entries go stale when the underlying ratings change: the
//! matrix never auto-invalidates, callers rebuild the affected rows (or
//! accept the staleness) after mutating the store.

use crate::error::{Result, SimilarityError};
use crate::traits::Similarity;
use rating_store::UserId;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Matrix of user-to-user similarity scores.
///
/// When `symmetric` is set, a pair is normalized to `(min, max)` before
/// storage, so only the upper triangle is kept and `sim(a, b)` resolves to
/// the same entry regardless of argument order.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    /// row user -> column user -> score, rows/columns normalized when symmetric.
    scores: HashMap<UserId, HashMap<UserId, f64>>,
    symmetric: bool,
}

impl SimilarityMatrix {
    /// Creates an empty matrix; fill it with [`SimilarityMatrix::insert`] or
    /// [`SimilarityMatrix::insert_row`].
    pub fn empty(symmetric: bool) -> Self {
        Self {
            scores: HashMap::new(),
            symmetric,
        }
    }

    /// Precompute scores between all pairs of `users`.
    ///
    /// Rows are computed in parallel. With `symmetric` set, only pairs with
    /// `a <= b` are computed and stored.
    pub fn precompute<S: Similarity>(
        similarity: &S,
        users: &[UserId],
        symmetric: bool,
    ) -> Result<Self> {
        let rows: Vec<(UserId, HashMap<UserId, f64>)> = users
            .par_iter()
            .map(|&a| {
                let mut row = HashMap::new();
                for &b in users {
                    if !symmetric || a <= b {
                        row.insert(b, similarity.sim(a, b)?);
                    }
                }
                Ok((a, row))
            })
            .collect::<Result<_>>()?;

        let matrix = Self {
            scores: rows.into_iter().collect(),
            symmetric,
        };
        debug!(
            users = users.len(),
            pairs = matrix.len(),
            symmetric,
            "precomputed similarity matrix"
        );
        Ok(matrix)
    }

    /// Precompute one row: `user` against each of `others`.
    ///
    /// Cheaper than the full matrix when a single querying user is compared
    /// against a neighbor set.
    pub fn for_user<S: Similarity>(
        similarity: &S,
        user: UserId,
        others: impl IntoIterator<Item = UserId>,
        symmetric: bool,
    ) -> Result<Self> {
        let mut matrix = Self::empty(symmetric);
        matrix.insert_row(similarity, user, others)?;
        Ok(matrix)
    }

    /// Compute and store `sim(user, other)` for each of `others`.
    pub fn insert_row<S: Similarity>(
        &mut self,
        similarity: &S,
        user: UserId,
        others: impl IntoIterator<Item = UserId>,
    ) -> Result<()> {
        for other in others {
            let score = similarity.sim(user, other)?;
            self.insert(user, other, score);
        }
        Ok(())
    }

    /// Insert or update a single pair without rebuilding anything else.
    pub fn insert(&mut self, a: UserId, b: UserId, score: f64) {
        let (row, col) = self.key(a, b);
        self.scores.entry(row).or_default().insert(col, score);
    }

    /// Pure lookup; never recomputes. A missing pair is a usage error,
    /// reported as [`SimilarityError::UndefinedPair`].
    pub fn get(&self, a: UserId, b: UserId) -> Result<f64> {
        let (row, col) = self.key(a, b);
        self.scores
            .get(&row)
            .and_then(|r| r.get(&col))
            .copied()
            .ok_or(SimilarityError::UndefinedPair { a, b })
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.scores.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn key(&self, a: UserId, b: UserId) -> (UserId, UserId) {
        if self.symmetric && a > b { (b, a) } else { (a, b) }
    }
}

impl Similarity for SimilarityMatrix {
    fn sim(&self, a: UserId, b: UserId) -> Result<f64> {
        self.get(a, b)
    }
}
