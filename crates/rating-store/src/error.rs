//! Error types for the rating-store crate.

use crate::types::{ItemId, UserId};
use thiserror::Error;

/// Errors that can occur while loading the ratings file.
///
/// The loader is fail-fast: any malformed record aborts the whole load, since
/// a half-populated matrix would silently skew every similarity computed
/// from it.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Ratings file could not be found or opened
    #[error("failed to open ratings file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid JSON array of rating records
    #[error("malformed ratings file: {0}")]
    Json(#[from] serde_json::Error),

    /// A record's rating falls outside the raw 1-5 scale
    #[error("rating {value} by user {user_id} on item {item_id} is outside the raw rating scale")]
    RatingOutOfRange {
        user_id: UserId,
        item_id: ItemId,
        value: i64,
    },

    /// A record uses the id reserved for the anonymous session user
    #[error("user id 0 is reserved for the anonymous user (rating on item {item_id})")]
    ReservedUserId { item_id: ItemId },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
