//! Core domain types for the rating store.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user ids with item ids

/// Unique identifier for a user. Real users start at 1.
pub type UserId = u32;

/// Unique identifier for an item (a book, in the shipped dataset).
pub type ItemId = u32;

// =============================================================================
// Constants
// =============================================================================

/// Reserved id for the anonymous session user. Never appears in loaded data;
/// the loader rejects records carrying it.
pub const ANONYMOUS_USER: UserId = 0;

/// The centered rating value meaning "no opinion". This is also what
/// `RatingStore::get` reports for pairs that were never rated, so arithmetic
/// consumers can treat unrated and neutral identically.
pub const NEUTRAL_RATING: f64 = 0.0;

/// Lowest raw rating accepted by the loader.
pub const MIN_RAW_RATING: i64 = 1;

/// Highest raw rating accepted by the loader.
pub const MAX_RAW_RATING: i64 = 5;

// =============================================================================
// Rating centering
// =============================================================================

/// Affine transform applied to raw ratings on insert: `scale * raw + shift`.
///
/// Centering maps the neutral raw rating to 0.0 so that liked and disliked
/// items carry opposite signs, which sign-sensitive similarity scores rely on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub scale: f64,
    pub shift: f64,
}

impl RatingScale {
    /// A scale that stores raw values untouched.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            shift: 0.0,
        }
    }

    /// Center a raw rating.
    pub fn center(&self, raw: f64) -> f64 {
        self.scale * raw + self.shift
    }
}

impl Default for RatingScale {
    /// The 1-5 star scale with 3 as the neutral midpoint.
    fn default() -> Self {
        Self {
            scale: 1.0,
            shift: -3.0,
        }
    }
}

// =============================================================================
// Loader record
// =============================================================================

/// One `{user_id, item_id, rating}` triple as it appears in the ratings file.
///
/// The rating is the raw integer value; centering happens when the record is
/// inserted into a [`crate::RatingStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_centers_midpoint() {
        let scale = RatingScale::default();
        assert_eq!(scale.center(3.0), 0.0);
        assert_eq!(scale.center(5.0), 2.0);
        assert_eq!(scale.center(1.0), -2.0);
    }

    #[test]
    fn test_identity_scale() {
        let scale = RatingScale::identity();
        assert_eq!(scale.center(4.0), 4.0);
    }
}
