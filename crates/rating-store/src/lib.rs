//! # Rating Store Crate
//!
//! Sparse user x item rating matrix with bidirectional indices, plus the
//! loader that feeds it from an external ratings file.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (UserId, ItemId, RatingScale, RatingRecord)
//! - **store**: The sparse bidirectional matrix itself
//! - **loader**: Parse and validate the JSON ratings file
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use rating_store::{RatingScale, RatingStore};
//! use std::path::Path;
//!
//! let store = RatingStore::load_from_file(Path::new("ratings.json"), RatingScale::default())?;
//!
//! let rating = store.get(1, 42);
//! let raters: Vec<_> = store.users_for_item(42).collect();
//! ```
//!
//! Ratings are centered on insert (`scale * raw + shift`, default shift -3 on
//! the 1-5 scale) so a neutral rating reads as 0.0 and unrated pairs report
//! the same neutral value.

// Public modules
pub mod error;
pub mod loader;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use loader::parse_ratings;
pub use store::RatingStore;
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    // Core types
    RatingRecord,
    RatingScale,
    // Constants
    ANONYMOUS_USER,
    MAX_RAW_RATING,
    MIN_RAW_RATING,
    NEUTRAL_RATING,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = RatingStore::new();
        assert_eq!(store.counts(), (0, 0, 0));
        assert_eq!(store.all_user_ids().count(), 0);
        assert_eq!(store.users_for_item(1).count(), 0);
    }

    #[test]
    fn test_records_round_trip_through_store() {
        let records = [
            RatingRecord {
                user_id: 1,
                item_id: 10,
                rating: 5,
            },
            RatingRecord {
                user_id: 2,
                item_id: 10,
                rating: 1,
            },
        ];

        let mut store = RatingStore::new();
        for record in &records {
            store.upsert(record.user_id, record.item_id, record.rating as f64);
        }

        assert_eq!(store.get(1, 10), 2.0);
        assert_eq!(store.get(2, 10), -2.0);
        assert_eq!(store.counts(), (2, 1, 2));
    }
}
