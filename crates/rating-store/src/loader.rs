//! Loader for the external ratings file.
//!
//! Rating history lives outside the core: a JSON array of
//! `{user_id, item_id, rating}` records produced by whatever system owns
//! persistence. This module parses and validates those records and feeds
//! them into a [`RatingStore`] through repeated upserts.

use crate::error::{DataLoadError, Result};
use crate::store::RatingStore;
use crate::types::{ANONYMOUS_USER, MAX_RAW_RATING, MIN_RAW_RATING, RatingRecord, RatingScale};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Parse and validate ratings from any reader.
///
/// Validation is fail-fast: the first out-of-range rating or reserved user
/// id aborts the load.
pub fn parse_ratings<R: Read>(reader: R) -> Result<Vec<RatingRecord>> {
    let records: Vec<RatingRecord> = serde_json::from_reader(reader)?;
    for record in &records {
        validate_record(record)?;
    }
    Ok(records)
}

fn validate_record(record: &RatingRecord) -> Result<()> {
    if record.user_id == ANONYMOUS_USER {
        return Err(DataLoadError::ReservedUserId {
            item_id: record.item_id,
        });
    }
    if !(MIN_RAW_RATING..=MAX_RAW_RATING).contains(&record.rating) {
        return Err(DataLoadError::RatingOutOfRange {
            user_id: record.user_id,
            item_id: record.item_id,
            value: record.rating,
        });
    }
    Ok(())
}

impl RatingStore {
    /// Load a ratings file into a fresh store with the given centering.
    pub fn load_from_file(path: &Path, scale: RatingScale) -> Result<Self> {
        let file = File::open(path).map_err(|_| DataLoadError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let records = parse_ratings(BufReader::new(file))?;

        let mut store = RatingStore::with_scale(scale);
        for record in &records {
            store.upsert(record.user_id, record.item_id, record.rating as f64);
        }

        let (users, items, ratings) = store.counts();
        info!(users, items, ratings, "loaded ratings file");
        Ok(store)
    }
}
