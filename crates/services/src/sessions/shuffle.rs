//! The one randomization primitive shared by review ordering and quiz
//! sampling: an unbiased Fisher-Yates shuffle, with sampling as a shuffled
//! prefix.

use rand::Rng;
use rand::seq::SliceRandom;

use vocab_core::model::VocabRecord;

/// Returns an unbiased random permutation of `records`.
#[must_use]
pub fn shuffled<R: Rng + ?Sized>(records: &[VocabRecord], rng: &mut R) -> Vec<VocabRecord> {
    let mut cards = records.to_vec();
    cards.shuffle(rng);
    cards
}

/// Draws up to `count` records without replacement.
///
/// The draw is a fresh independent shuffle; no record appears twice.
#[must_use]
pub fn sample<R: Rng + ?Sized>(
    records: &[VocabRecord],
    count: usize,
    rng: &mut R,
) -> Vec<VocabRecord> {
    let mut cards = shuffled(records, rng);
    cards.truncate(count.min(records.len()));
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use vocab_core::model::RecordStatus;

    fn records(n: u64) -> Vec<VocabRecord> {
        (1..=n)
            .map(|i| VocabRecord::new(i, format!("q{i}"), format!("a{i}"), RecordStatus::Active))
            .collect()
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let pool = records(50);
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = shuffled(&pool, &mut rng);

        assert_eq!(shuffled.len(), pool.len());
        let original: HashSet<u64> = pool.iter().map(VocabRecord::id).collect();
        let permuted: HashSet<u64> = shuffled.iter().map(VocabRecord::id).collect();
        assert_eq!(original, permuted);
    }

    #[test]
    fn sample_caps_at_pool_size() {
        let pool = records(3);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample(&pool, 20, &mut rng).len(), 3);
        assert_eq!(sample(&pool, 2, &mut rng).len(), 2);
    }

    #[test]
    fn sample_draws_without_replacement() {
        let pool = records(40);
        let mut rng = StdRng::seed_from_u64(11);
        let drawn = sample(&pool, 20, &mut rng);

        let distinct: HashSet<u64> = drawn.iter().map(VocabRecord::id).collect();
        assert_eq!(distinct.len(), drawn.len());
    }

    #[test]
    fn empty_pool_yields_empty_results() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffled(&[], &mut rng).is_empty());
        assert!(sample(&[], 20, &mut rng).is_empty());
    }
}
