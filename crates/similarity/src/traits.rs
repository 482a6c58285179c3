//! Core trait for pairwise user similarity.

use crate::error::Result;
use rating_store::UserId;

/// A source of pairwise similarity scores between users.
///
/// Direct metrics are total functions and always return `Ok`; memoized
/// sources fail with [`crate::SimilarityError::UndefinedPair`] on pairs they
/// never stored, which callers must treat differently from a score of
/// exactly zero.
///
/// ## Design Note
/// `Send + Sync` allows similarity sources to be shared across the parallel
/// matrix precompute and any embedding service.
pub trait Similarity: Send + Sync {
    /// Similarity score between users `a` and `b`.
    fn sim(&self, a: UserId, b: UserId) -> Result<f64>;
}
