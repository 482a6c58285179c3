//! Error types for similarity lookups.

use rating_store::UserId;
use thiserror::Error;

/// Errors from similarity sources.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityError {
    /// A memoized matrix was asked for a pair it never stored.
    ///
    /// Distinct from a score of exactly zero: zero means "no shared signal",
    /// this means "nobody ever computed it". Callers either precompute the
    /// pair or fall back to the direct metric.
    #[error("similarity between users {a} and {b} was never computed")]
    UndefinedPair { a: UserId, b: UserId },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SimilarityError>;
