//! # Reranker Crate
//!
//! Takes the candidate list an external full-text engine produced and
//! reorders it by blending the base relevance with collaborative signal
//! from the rating store.
//!
//! ## Architecture
//! A query flows through three stages:
//! 1. Display filtering (optionally hide items the user already rated)
//! 2. Neighborhood boosting via a [`similarity::Similarity`] source
//! 3. A stable descending sort on the boosted score
//!
//! ## Example Usage
//! ```ignore
//! use reranker::{Candidate, DisplayMode, Session};
//!
//! let mut session = Session::new(store);
//! session.rate(user_id, item_id, 5.0);
//!
//! let ranked = session.rerank(&candidates, user_id, DisplayMode::HideRated)?;
//! ```

pub mod candidate;
pub mod error;
pub mod rerank;
pub mod session;

// Re-export main types
pub use candidate::{Candidate, DisplayMode, RankedCandidate};
pub use error::{RerankError, Result};
pub use rerank::{DEFAULT_BOOST_FACTOR, Reranker};
pub use session::Session;
