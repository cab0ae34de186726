//! Rarity-weighted selection of the next discovery.
//!
//! Each rarity tier has a fixed integer weight. A uniform draw in
//! `[0, total)` is walked down the candidate list in order, subtracting each
//! candidate's weight, and the first candidate where the remainder reaches
//! zero or below is selected.
//!
//! Weights belong to tiers, not to entries, and are not renormalized: a tier
//! with three undiscovered entries contributes three times its weight, and
//! a fully discovered tier simply drops out of the total.

use rand::Rng;
use serde::Deserialize;
use stargazer_types::Rarity;

/// Selection weight of each rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RarityWeights {
    /// Weight of [`Rarity::Common`].
    #[serde(default = "default_common")]
    pub common: u32,
    /// Weight of [`Rarity::Rare`].
    #[serde(default = "default_rare")]
    pub rare: u32,
    /// Weight of [`Rarity::Epic`].
    #[serde(default = "default_epic")]
    pub epic: u32,
    /// Weight of [`Rarity::Legendary`].
    #[serde(default = "default_legendary")]
    pub legendary: u32,
}

impl RarityWeights {
    /// The weight of one tier.
    pub const fn weight(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }

    /// Sum of all four tier weights.
    pub fn total(&self) -> u64 {
        Rarity::ALL
            .into_iter()
            .map(|r| u64::from(self.weight(r)))
            .sum()
    }
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: default_common(),
            rare: default_rare(),
            epic: default_epic(),
            legendary: default_legendary(),
        }
    }
}

const fn default_common() -> u32 {
    60
}

const fn default_rare() -> u32 {
    25
}

const fn default_epic() -> u32 {
    12
}

const fn default_legendary() -> u32 {
    3
}

/// Weighted pick over undiscovered entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingPolicy {
    weights: RarityWeights,
}

impl SamplingPolicy {
    /// Create a policy with the given tier weights.
    pub const fn new(weights: RarityWeights) -> Self {
        Self { weights }
    }

    /// The tier weights in use.
    pub const fn weights(&self) -> &RarityWeights {
        &self.weights
    }

    /// Pick one candidate, returning its position in `candidates`.
    ///
    /// Candidates are walked in the order given, so a fixed order and a
    /// seeded `rng` give reproducible picks. Returns `None` only when
    /// `candidates` is empty; if rounding leaves the remainder above zero
    /// after the walk, the last candidate is chosen.
    pub fn pick<T, R>(
        &self,
        candidates: &[T],
        rarity_of: impl Fn(&T) -> Rarity,
        rng: &mut R,
    ) -> Option<usize>
    where
        R: Rng,
    {
        let last = candidates.len().checked_sub(1)?;

        let total: u64 = candidates
            .iter()
            .map(|c| u64::from(self.weights.weight(rarity_of(c))))
            .sum();

        // u64 -> f64 loses precision only above 2^53, far beyond any
        // catalog size times a u32 weight.
        #[allow(clippy::cast_precision_loss)]
        let mut remainder = rng.random::<f64>() * total as f64;

        for (index, candidate) in candidates.iter().enumerate() {
            remainder -= f64::from(self.weights.weight(rarity_of(candidate)));
            if remainder <= 0.0 {
                return Some(index);
            }
        }

        Some(last)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{RngCore, SeedableRng};

    use super::*;

    /// An rng that returns the same bits forever.
    struct FixedBits(u64);

    impl RngCore for FixedBits {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (i, byte) in dst.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 8];
            }
        }
    }

    const ONE_OF_EACH: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    #[test]
    fn empty_pool_is_exhausted() {
        let policy = SamplingPolicy::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let empty: [Rarity; 0] = [];
        assert_eq!(policy.pick(&empty, |r| *r, &mut rng), None);
    }

    #[test]
    fn single_candidate_is_always_chosen() {
        let policy = SamplingPolicy::default();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(policy.pick(&[Rarity::Legendary], |r| *r, &mut rng), Some(0));
        }
    }

    #[test]
    fn zero_draw_selects_first_candidate() {
        let policy = SamplingPolicy::default();
        let mut rng = FixedBits(0);
        assert_eq!(policy.pick(&ONE_OF_EACH, |r| *r, &mut rng), Some(0));
    }

    #[test]
    fn maximal_draw_selects_last_candidate() {
        // All-ones bits give the largest f64 below 1.0.
        let policy = SamplingPolicy::default();
        let mut rng = FixedBits(u64::MAX);
        assert_eq!(policy.pick(&ONE_OF_EACH, |r| *r, &mut rng), Some(3));
    }

    #[test]
    fn zero_weight_pool_still_selects() {
        let policy = SamplingPolicy::new(RarityWeights {
            common: 1,
            rare: 0,
            epic: 0,
            legendary: 0,
        });
        let mut rng = SmallRng::seed_from_u64(3);
        let pool = [Rarity::Epic, Rarity::Legendary];
        let picked = policy.pick(&pool, |r| *r, &mut rng);
        assert!(picked.is_some());
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let policy = SamplingPolicy::default();
        let pool = [
            Rarity::Common,
            Rarity::Common,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ];
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..50)
                .map(|_| policy.pick(&pool, |r| *r, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn tier_frequencies_converge_to_weights() {
        let policy = SamplingPolicy::default();
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        let draws = 200_000_u32;
        let mut counts = [0_u32; 4];

        for _ in 0..draws {
            let index = policy.pick(&ONE_OF_EACH, |r| *r, &mut rng).unwrap();
            counts[index] += 1;
        }

        let expected = [0.60, 0.25, 0.12, 0.03];
        for (tier, (&count, &want)) in counts.iter().zip(expected.iter()).enumerate() {
            let got = f64::from(count) / f64::from(draws);
            assert!(
                (got - want).abs() < 0.01,
                "tier {tier}: got {got:.4}, want {want:.2}"
            );
        }
    }

    #[test]
    fn duplicated_tiers_accumulate_weight() {
        // Two commons (60 each) against one legendary (3): the legendary
        // should come up about 3/123 of the time.
        let policy = SamplingPolicy::default();
        let pool = [Rarity::Common, Rarity::Common, Rarity::Legendary];
        let mut rng = SmallRng::seed_from_u64(11);
        let draws = 100_000_u32;
        let mut legendary = 0_u32;
        for _ in 0..draws {
            if policy.pick(&pool, |r| *r, &mut rng) == Some(2) {
                legendary += 1;
            }
        }
        let got = f64::from(legendary) / f64::from(draws);
        assert!((got - 3.0 / 123.0).abs() < 0.005, "got {got:.4}");
    }
}
