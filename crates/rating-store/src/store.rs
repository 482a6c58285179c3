//! The sparse user x item rating matrix.
//!
//! Internal representation is map-based since the matrix is very sparse in
//! practice: each user maps to an ordered (by item id) map of centered
//! ratings, and each item maps back to the set of users who rated it.
//!
//! ## Invariant
//! The two indices always describe the same set of (user, item) pairs.
//! Every mutation updates both sides, and empty per-user maps and per-item
//! sets are pruned rather than left behind.

use crate::types::{ItemId, NEUTRAL_RATING, RatingScale, UserId};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Sparse, bidirectionally indexed user x item rating matrix.
///
/// Ratings are centered on insert via the store's [`RatingScale`]; all reads
/// report centered values. The store is not thread-safe: embedders that share
/// it across threads add their own locking or hand out immutable snapshots.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    scale: RatingScale,
    /// user -> item -> centered rating, ascending by item id.
    user_items: HashMap<UserId, BTreeMap<ItemId, f64>>,
    /// item -> users who rated it. Mirrors `user_items` exactly.
    item_users: HashMap<ItemId, HashSet<UserId>>,
}

impl RatingStore {
    /// Creates an empty store with the default 1-5 centering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with a custom centering.
    pub fn with_scale(scale: RatingScale) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// The centering applied to raw ratings on insert.
    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    // Mutators

    /// Insert or overwrite the rating for a (user, item) pair.
    ///
    /// `raw` is the uncentered value; the store applies its scale before
    /// storing. Creates the per-user map and per-item set on first use.
    pub fn upsert(&mut self, user: UserId, item: ItemId, raw: f64) {
        let centered = self.scale.center(raw);
        self.user_items
            .entry(user)
            .or_default()
            .insert(item, centered);
        self.item_users.entry(item).or_default().insert(user);
    }

    /// Remove the rating for a (user, item) pair. No-op if absent.
    pub fn remove(&mut self, user: UserId, item: ItemId) {
        let Some(items) = self.user_items.get_mut(&user) else {
            return;
        };
        if items.remove(&item).is_none() {
            return;
        }
        if items.is_empty() {
            self.user_items.remove(&user);
        }
        self.unindex_item_user(item, user);
    }

    /// Remove every rating made by a user. No-op for unknown users.
    pub fn reset_user(&mut self, user: UserId) {
        let Some(items) = self.user_items.remove(&user) else {
            return;
        };
        for item in items.into_keys() {
            self.unindex_item_user(item, user);
        }
    }

    fn unindex_item_user(&mut self, item: ItemId, user: UserId) {
        if let Some(users) = self.item_users.get_mut(&item) {
            users.remove(&user);
            if users.is_empty() {
                self.item_users.remove(&item);
            }
        }
    }

    // Accessors

    /// The centered rating for a (user, item) pair, or [`NEUTRAL_RATING`]
    /// when the pair was never rated.
    pub fn get(&self, user: UserId, item: ItemId) -> f64 {
        self.user_items
            .get(&user)
            .and_then(|items| items.get(&item))
            .copied()
            .unwrap_or(NEUTRAL_RATING)
    }

    /// Whether the pair was actually rated. A centered rating of 0.0 is a
    /// real rating, so callers filtering "already rated" items must use this
    /// rather than comparing [`RatingStore::get`] against the neutral value.
    pub fn contains(&self, user: UserId, item: ItemId) -> bool {
        self.user_items
            .get(&user)
            .is_some_and(|items| items.contains_key(&item))
    }

    /// The user's (item, centered rating) pairs, ascending by item id.
    /// Empty for unknown users.
    pub fn ratings_for_user(&self, user: UserId) -> impl Iterator<Item = (ItemId, f64)> + '_ {
        self.user_items
            .get(&user)
            .into_iter()
            .flatten()
            .map(|(&item, &rating)| (item, rating))
    }

    /// The item ids a user has rated, ascending.
    pub fn items_for_user(&self, user: UserId) -> impl Iterator<Item = ItemId> + '_ {
        self.ratings_for_user(user).map(|(item, _)| item)
    }

    /// The users who rated an item. Empty (not an error) when nobody has.
    pub fn users_for_item(&self, item: ItemId) -> impl Iterator<Item = UserId> + '_ {
        self.item_users.get(&item).into_iter().flatten().copied()
    }

    /// Every user id with at least one rating.
    pub fn all_user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.user_items.keys().copied()
    }

    /// Every item id with at least one rating.
    pub fn all_item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.item_users.keys().copied()
    }

    /// Whether the user has any ratings at all.
    pub fn has_ratings(&self, user: UserId) -> bool {
        // Empty maps are pruned, so presence of the key is enough.
        self.user_items.contains_key(&user)
    }

    /// Number of ratings made by a user.
    pub fn rating_count_for_user(&self, user: UserId) -> usize {
        self.user_items.get(&user).map_or(0, BTreeMap::len)
    }

    /// (users, items, ratings) counts for logging and validation.
    pub fn counts(&self) -> (usize, usize, usize) {
        let ratings = self.user_items.values().map(BTreeMap::len).sum();
        (self.user_items.len(), self.item_users.len(), ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RatingScale;

    fn store_with_identity() -> RatingStore {
        RatingStore::with_scale(RatingScale::identity())
    }

    #[test]
    fn test_upsert_updates_both_indices() {
        let mut store = store_with_identity();
        store.upsert(1, 10, 2.0);
        store.upsert(1, 20, -1.0);
        store.upsert(2, 10, 1.0);

        assert_eq!(store.get(1, 10), 2.0);
        assert_eq!(store.get(1, 20), -1.0);

        let users: Vec<_> = {
            let mut u: Vec<_> = store.users_for_item(10).collect();
            u.sort_unstable();
            u
        };
        assert_eq!(users, vec![1, 2]);
        assert_eq!(store.counts(), (2, 2, 3));
    }

    #[test]
    fn test_upsert_overwrites() {
        let mut store = store_with_identity();
        store.upsert(1, 10, 2.0);
        store.upsert(1, 10, -2.0);

        assert_eq!(store.get(1, 10), -2.0);
        assert_eq!(store.counts(), (1, 1, 1));
    }

    #[test]
    fn test_default_scale_centers_on_insert() {
        let mut store = RatingStore::new();
        store.upsert(1, 10, 5.0);
        store.upsert(1, 20, 3.0);

        assert_eq!(store.get(1, 10), 2.0);
        assert_eq!(store.get(1, 20), 0.0);
        // Raw 3 centers to neutral but is still a real rating.
        assert!(store.contains(1, 20));
    }

    #[test]
    fn test_get_unrated_is_neutral() {
        let store = store_with_identity();
        assert_eq!(store.get(99, 99), NEUTRAL_RATING);
        assert!(!store.contains(99, 99));
    }

    #[test]
    fn test_items_for_user_ascending() {
        let mut store = store_with_identity();
        store.upsert(1, 30, 1.0);
        store.upsert(1, 10, 1.0);
        store.upsert(1, 20, 1.0);

        let items: Vec<_> = store.items_for_user(1).collect();
        assert_eq!(items, vec![10, 20, 30]);
    }

    #[test]
    fn test_remove_prunes_empty_entries() {
        let mut store = store_with_identity();
        store.upsert(1, 10, 2.0);
        store.upsert(2, 10, 1.0);

        store.remove(1, 10);
        assert!(!store.contains(1, 10));
        assert!(!store.has_ratings(1));
        assert_eq!(store.users_for_item(10).collect::<Vec<_>>(), vec![2]);

        store.remove(2, 10);
        assert_eq!(store.users_for_item(10).count(), 0);
        assert_eq!(store.counts(), (0, 0, 0));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = store_with_identity();
        store.upsert(1, 10, 2.0);

        store.remove(1, 99);
        store.remove(99, 10);
        assert_eq!(store.counts(), (1, 1, 1));
    }

    #[test]
    fn test_reset_user() {
        let mut store = store_with_identity();
        store.upsert(1, 10, 2.0);
        store.upsert(1, 20, 1.0);
        store.upsert(2, 10, -1.0);

        store.reset_user(1);
        assert!(!store.has_ratings(1));
        assert_eq!(store.users_for_item(10).collect::<Vec<_>>(), vec![2]);
        assert_eq!(store.users_for_item(20).count(), 0);
        assert_eq!(store.counts(), (1, 1, 1));
    }
}
