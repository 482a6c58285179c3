//! Candidate types exchanged with the external search engine.

use rating_store::ItemId;
use serde::{Deserialize, Serialize};

/// One hit from the external full-text engine.
///
/// The engine owns the text fields; the core only needs the item id and the
/// base relevance score. Input order carries no meaning - the reranker never
/// assumes the list arrives sorted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub item_id: ItemId,
    pub relevance: f64,
}

impl Candidate {
    pub fn new(item_id: ItemId, relevance: f64) -> Self {
        Self { item_id, relevance }
    }
}

/// A candidate with its final blended score attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub item_id: ItemId,
    /// The base relevance the external engine reported.
    pub relevance: f64,
    /// Relevance plus the accumulated neighborhood boost; the sort key.
    pub boosted: f64,
}

/// Whether items the querying user already rated stay in the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Keep the user's own rated items in the list.
    ShowRated,
    /// Drop them; the user is searching for something new.
    #[default]
    HideRated,
}
