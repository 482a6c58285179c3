//! # Similarity Crate
//!
//! Pairwise user similarity over a sparse [`rating_store::RatingStore`].
//!
//! ## Components
//!
//! ### CosineSimilarity
//! Direct metric over the store:
//! - Sparse dot product via a single ascending merge-scan
//! - Pluggable element metric (Euclidean, Manhattan, custom)
//! - Symmetric and asymmetric forms
//!
//! ### SimilarityMatrix
//! Memoization layer over any [`Similarity`] source:
//! - Full-matrix precompute (triangular when symmetric), rayon-parallel
//! - Single-row precompute for one querying user
//! - Pure lookups; a missing pair is an error, never a silent recompute
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{CosineSimilarity, Similarity, SimilarityMatrix};
//!
//! let cosine = CosineSimilarity::euclidean(&store);
//! let score = cosine.score(1, 2);
//!
//! let users: Vec<_> = store.all_user_ids().collect();
//! let matrix = SimilarityMatrix::precompute(&cosine, &users, true)?;
//! assert_eq!(matrix.sim(2, 1)?, score);
//! ```

// Public modules
pub mod cosine;
pub mod error;
pub mod matrix;
pub mod metric;
pub mod traits;

// Re-export commonly used types
pub use cosine::{CosineSimilarity, Form};
pub use error::{Result, SimilarityError};
pub use matrix::SimilarityMatrix;
pub use metric::Metric;
pub use traits::Similarity;
