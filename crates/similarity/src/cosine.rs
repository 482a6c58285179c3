//! Cosine-style similarity between two users' sparse rating vectors.
//!
//! ## Algorithm
//! Each user's ratings form a sparse vector over item ids. The dot product
//! is accumulated in a single ascending merge-scan of the two ordered
//! rating sequences, O(|A| + |B|); items rated by only one user contribute
//! zero and are skipped. This is the reason the store keeps each user's
//! ratings ordered by item id.
//!
//! The score divides the dot product by the product of the raw metric sums,
//! with no square root. That departs from textbook cosine, but it is the
//! contract the rest of the system depends on: boosting only needs a total
//! ordering, and the unrooted form keeps zero-length handling simple.
//!
//! Zero-length vectors (possible with signed, centered ratings under a
//! custom metric) yield signed infinity rather than an error, so ranking
//! code always has a comparable score.

use crate::error::Result;
use crate::metric::Metric;
use crate::traits::Similarity;
use rating_store::{RatingStore, UserId};
use std::cmp::Ordering;

/// Which lengths enter the denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `dot / (lenA * lenB)`, so `sim(A, B) == sim(B, A)`.
    Symmetric,
    /// `dot / lenB` - skips `lenA`, which is constant when one fixed user
    /// is compared against many others.
    Asymmetric,
}

/// Pairwise user similarity computed directly from a [`RatingStore`].
///
/// Holds a shared reference to the store; scores always reflect its current
/// contents.
#[derive(Debug, Clone, Copy)]
pub struct CosineSimilarity<'a> {
    store: &'a RatingStore,
    metric: Metric,
    form: Form,
}

impl<'a> CosineSimilarity<'a> {
    pub fn new(store: &'a RatingStore, metric: Metric, form: Form) -> Self {
        Self {
            store,
            metric,
            form,
        }
    }

    /// Symmetric similarity with the Euclidean element metric.
    pub fn euclidean(store: &'a RatingStore) -> Self {
        Self::new(store, Metric::Euclidean, Form::Symmetric)
    }

    /// Symmetric similarity with the Manhattan element metric.
    pub fn manhattan(store: &'a RatingStore) -> Self {
        Self::new(store, Metric::Manhattan, Form::Symmetric)
    }

    /// Asymmetric similarity with the Euclidean element metric.
    pub fn asymmetric_euclidean(store: &'a RatingStore) -> Self {
        Self::new(store, Metric::Euclidean, Form::Asymmetric)
    }

    /// Asymmetric similarity with the Manhattan element metric.
    pub fn asymmetric_manhattan(store: &'a RatingStore) -> Self {
        Self::new(store, Metric::Manhattan, Form::Asymmetric)
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn is_symmetric(&self) -> bool {
        self.form == Form::Symmetric
    }

    /// Sparse dot product between two users' rating vectors.
    ///
    /// Single ascending merge-scan over both ordered rating sequences; a
    /// user with no ratings contributes an empty sequence and the result
    /// is 0.0.
    pub fn dot(&self, a: UserId, b: UserId) -> f64 {
        let mut iter_a = self.store.ratings_for_user(a).peekable();
        let mut iter_b = self.store.ratings_for_user(b).peekable();

        let mut dot = 0.0;
        while let (Some(&(item_a, rating_a)), Some(&(item_b, rating_b))) =
            (iter_a.peek(), iter_b.peek())
        {
            match item_a.cmp(&item_b) {
                Ordering::Less => {
                    iter_a.next();
                }
                Ordering::Greater => {
                    iter_b.next();
                }
                Ordering::Equal => {
                    dot += rating_a * rating_b;
                    iter_a.next();
                    iter_b.next();
                }
            }
        }
        dot
    }

    /// Length of a user's rating vector: the metric sum over their ratings.
    pub fn length(&self, user: UserId) -> f64 {
        self.store
            .ratings_for_user(user)
            .map(|(_, rating)| self.metric.apply(rating))
            .sum()
    }

    /// Similarity score between users `a` and `b` under the configured form.
    pub fn score(&self, a: UserId, b: UserId) -> f64 {
        match self.form {
            Form::Symmetric => self.score_symmetric(a, b),
            Form::Asymmetric => self.score_asymmetric(a, b),
        }
    }

    fn score_symmetric(&self, a: UserId, b: UserId) -> f64 {
        let dot = self.dot(a, b);
        if dot == 0.0 {
            return 0.0;
        }
        let len_a = self.length(a);
        let len_b = self.length(b);
        if len_a == 0.0 && len_b != 0.0 {
            return dot.signum() * len_b.signum() * f64::INFINITY;
        }
        if len_a != 0.0 && len_b == 0.0 {
            return dot.signum() * len_a.signum() * f64::INFINITY;
        }
        if len_a == 0.0 && len_b == 0.0 {
            return dot.signum() * f64::INFINITY;
        }
        dot / (len_a * len_b)
    }

    fn score_asymmetric(&self, a: UserId, b: UserId) -> f64 {
        let dot = self.dot(a, b);
        if dot == 0.0 {
            return 0.0;
        }
        let len_b = self.length(b);
        if len_b == 0.0 {
            return dot.signum() * f64::INFINITY;
        }
        dot / len_b
    }
}

impl Similarity for CosineSimilarity<'_> {
    fn sim(&self, a: UserId, b: UserId) -> Result<f64> {
        Ok(self.score(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rating_store::RatingScale;

    /// Three users rating four of six items each, raw 1-5 centered by -3.
    ///
    /// Centered vectors:
    ///   user 0: item0=0, item1=2,  item3=1, item4=-2
    ///   user 1: item0=1, item2=-2, item3=-1, item5=1
    ///   user 2: item1=0, item2=-1, item3=2, item4=-1
    fn reference_store() -> RatingStore {
        let mut store = RatingStore::new();
        store.upsert(0, 0, 3.0);
        store.upsert(0, 1, 5.0);
        store.upsert(0, 3, 4.0);
        store.upsert(0, 4, 1.0);

        store.upsert(1, 0, 4.0);
        store.upsert(1, 2, 1.0);
        store.upsert(1, 3, 2.0);
        store.upsert(1, 5, 4.0);

        store.upsert(2, 1, 3.0);
        store.upsert(2, 2, 2.0);
        store.upsert(2, 3, 5.0);
        store.upsert(2, 4, 2.0);
        store
    }

    #[test]
    fn test_reference_dot_products() {
        let store = reference_store();
        let sim = CosineSimilarity::euclidean(&store);

        assert_eq!(sim.dot(0, 1), -1.0);
        assert_eq!(sim.dot(0, 2), 4.0);
        assert_eq!(sim.dot(1, 2), 0.0);
    }

    #[test]
    fn test_reference_lengths() {
        let store = reference_store();
        let sim = CosineSimilarity::euclidean(&store);

        assert_eq!(sim.length(0), 9.0);
        assert_eq!(sim.length(1), 7.0);
        assert_eq!(sim.length(2), 6.0);
    }

    #[test]
    fn test_reference_euclidean_scores() {
        let store = reference_store();
        let sim = CosineSimilarity::euclidean(&store);

        // Unrooted denominator: dot / (lenA * lenB).
        assert_eq!(sim.score(0, 1), -1.0 / 63.0);
        assert_eq!(sim.score(0, 2), 4.0 / 54.0);
        // Shared items cancel exactly: no signal.
        assert_eq!(sim.score(1, 2), 0.0);
    }

    #[test]
    fn test_reference_manhattan_scores() {
        let store = reference_store();
        let sim = CosineSimilarity::manhattan(&store);

        // Manhattan lengths: 0+2+1+2 = 5, 1+2+1+1 = 5, 0+1+2+1 = 4.
        assert_eq!(sim.score(0, 1), -1.0 / 25.0);
        assert_eq!(sim.score(0, 2), 4.0 / 20.0);
    }

    #[test]
    fn test_merge_dot_matches_brute_force() {
        // Deterministic pseudo-random sparse vectors (LCG).
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as u32
        };

        let mut store = RatingStore::with_scale(RatingScale::identity());
        for user in 0..8u32 {
            for _ in 0..12 {
                let item = next() % 40;
                let rating = (next() % 5) as f64 - 2.0;
                store.upsert(user, item, rating);
            }
        }

        let sim = CosineSimilarity::euclidean(&store);
        for a in 0..8u32 {
            for b in 0..8u32 {
                let brute: f64 = store
                    .ratings_for_user(a)
                    .map(|(item, rating)| rating * store.get(b, item))
                    .sum();
                assert_eq!(sim.dot(a, b), brute, "dot({a}, {b})");
            }
        }
    }

    #[test]
    fn test_symmetry() {
        let store = reference_store();
        let sim = CosineSimilarity::euclidean(&store);

        for a in 0..3u32 {
            for b in 0..3u32 {
                assert_eq!(sim.score(a, b), sim.score(b, a));
            }
        }
    }

    #[test]
    fn test_self_similarity_unrooted() {
        let store = reference_store();
        let sim = CosineSimilarity::euclidean(&store);

        // dot(A, A) == length(A) under the Euclidean metric, so the
        // unrooted score is 1 / length(A).
        assert_eq!(sim.score(0, 0), 1.0 / 9.0);

        // A single +/-1 rating has unit length and scores exactly 1.
        let mut unit = RatingStore::with_scale(RatingScale::identity());
        unit.upsert(7, 0, -1.0);
        let unit_sim = CosineSimilarity::euclidean(&unit);
        assert_eq!(unit_sim.score(7, 7), 1.0);
    }

    #[test]
    fn test_bounds_for_integer_ratings() {
        let store = reference_store();
        let sim = CosineSimilarity::euclidean(&store);

        for a in 0..3u32 {
            for b in 0..3u32 {
                let score = sim.score(a, b);
                assert!(score.is_finite());
                assert!((-1.0..=1.0).contains(&score), "score({a}, {b}) = {score}");
            }
        }
    }

    #[test]
    fn test_no_overlap_is_zero() {
        let mut store = RatingStore::with_scale(RatingScale::identity());
        store.upsert(1, 10, 2.0);
        store.upsert(2, 20, 2.0);

        let sim = CosineSimilarity::euclidean(&store);
        assert_eq!(sim.score(1, 2), 0.0);
    }

    #[test]
    fn test_unknown_user_is_zero() {
        let store = reference_store();
        let sim = CosineSimilarity::euclidean(&store);

        assert_eq!(sim.score(0, 99), 0.0);
        assert_eq!(sim.score(99, 98), 0.0);
    }

    #[test]
    fn test_zero_dot_wins_over_zero_length() {
        // User 1's signed length is zero AND the dot product cancels; the
        // dot check comes first, so the score is 0, not infinity.
        let mut store = RatingStore::with_scale(RatingScale::identity());
        store.upsert(1, 10, 2.0);
        store.upsert(1, 20, -2.0);
        store.upsert(2, 10, 1.0);
        store.upsert(2, 20, 1.0);

        let sim = CosineSimilarity::new(&store, Metric::Custom(|r| r), Form::Symmetric);
        assert_eq!(sim.score(1, 2), 0.0);
    }

    #[test]
    fn test_zero_length_yields_signed_infinity() {
        // Signed element metric: user 1's length collapses to zero while the
        // dot product against user 2 stays nonzero.
        let mut store = RatingStore::with_scale(RatingScale::identity());
        store.upsert(1, 10, 2.0);
        store.upsert(1, 20, -2.0);
        store.upsert(2, 10, 1.0);

        let sim = CosineSimilarity::new(&store, Metric::Custom(|r| r), Form::Symmetric);
        // length(1) = 0, length(2) = 1, dot = 2.
        assert_eq!(sim.score(1, 2), f64::INFINITY);

        // Negative dot flips the sign.
        let mut negated = RatingStore::with_scale(RatingScale::identity());
        negated.upsert(1, 10, -2.0);
        negated.upsert(1, 20, 2.0);
        negated.upsert(2, 10, 1.0);
        let negated_sim = CosineSimilarity::new(&negated, Metric::Custom(|r| r), Form::Symmetric);
        assert_eq!(negated_sim.score(1, 2), f64::NEG_INFINITY);
    }

    #[test]
    fn test_both_lengths_zero() {
        let mut store = RatingStore::with_scale(RatingScale::identity());
        store.upsert(1, 10, 2.0);
        store.upsert(1, 20, -2.0);
        store.upsert(2, 10, 1.0);
        store.upsert(2, 30, -1.0);

        let sim = CosineSimilarity::new(&store, Metric::Custom(|r| r), Form::Symmetric);
        // dot = 2, both lengths 0.
        assert_eq!(sim.score(1, 2), f64::INFINITY);
    }

    #[test]
    fn test_asymmetric_skips_own_length() {
        let store = reference_store();
        let sim = CosineSimilarity::asymmetric_euclidean(&store);

        // dot(0, 1) = -1, length(1) = 7; length(0) never enters.
        assert_eq!(sim.score(0, 1), -1.0 / 7.0);
        assert_eq!(sim.score(1, 0), -1.0 / 9.0);
    }

    #[test]
    fn test_asymmetric_zero_length_target() {
        let mut store = RatingStore::with_scale(RatingScale::identity());
        store.upsert(1, 10, 1.0);
        store.upsert(2, 10, 2.0);
        store.upsert(2, 20, -2.0);

        let sim = CosineSimilarity::new(&store, Metric::Custom(|r| r), Form::Asymmetric);
        // dot = 2, length(2) = 0.
        assert_eq!(sim.score(1, 2), f64::INFINITY);
    }
}
