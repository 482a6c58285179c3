//! Error types for reranking.

use similarity::SimilarityError;
use thiserror::Error;

/// Errors that can occur while reranking a candidate list.
#[derive(Error, Debug)]
pub enum RerankError {
    /// The injected similarity source failed, e.g. a memoized matrix was
    /// missing a (user, neighbor) pair.
    #[error("similarity lookup failed: {0}")]
    Similarity(#[from] SimilarityError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RerankError>;
