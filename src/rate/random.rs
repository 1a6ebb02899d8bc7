//! Rater that ignores patch contents, for exercising the search machinery.
use super::Rater;
use crate::sample::Patch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random score stretched by `1 / threshold`, so roughly
/// `1 − threshold` of all candidates clear the threshold.
///
/// The score is drawn from a generator seeded by the seed and both patch
/// centres, so one pair always gets the same score regardless of the order
/// (or thread) in which candidates are rated.
#[derive(Clone, Copy, Debug)]
pub struct RandomRater {
    seed: u64,
    scale: f32,
}

impl RandomRater {
    pub fn new(seed: u64, threshold: f32) -> Self {
        let scale = if threshold > 0.0 { 1.0 / threshold } else { 1.0 };
        Self { seed, scale }
    }

    fn pair_seed(&self, target: &Patch, compare: &Patch) -> u64 {
        let (t, c) = (target.center(), compare.center());
        [t.x, t.y, c.x, c.y].iter().fold(self.seed, |h, v| {
            (h.rotate_left(23) ^ v.to_bits()).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        })
    }
}

impl Rater for RandomRater {
    fn rate(&self, target: &Patch, compare: &Patch) -> f32 {
        let mut rng = StdRng::seed_from_u64(self.pair_seed(target, compare));
        let u: f32 = rng.random();
        (u * self.scale).min(1.0)
    }

    fn name(&self) -> &str {
        "random"
    }

    fn is_stochastic(&self) -> bool {
        true
    }
}
