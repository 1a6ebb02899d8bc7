//! Patch similarity raters.
//!
//! A rater maps a `(target, compare)` pair of patches to a confidence in
//! `[0, 1]`, 1 meaning identical. Patches that cannot be reconciled (see
//! [`Alignment`]) score 0. The growth engine only sees the [`Rater`] trait;
//! built-ins are selected through [`RaterKind`], custom scoring functions are
//! plain closures.
pub mod difference;
pub mod gradients;
pub mod match_count;
pub mod random;

pub use difference::{AbsoluteDifference, GlobalNormalizedDifference, LocalNormalizedDifference};
pub use gradients::GradientDifference;
pub use match_count::RelativeMatchCount;
pub use random::RandomRater;

use crate::image::{ImageF32, Raster};
use crate::sample::{Alignment, Patch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub trait Rater: Send + Sync {
    fn rate(&self, target: &Patch, compare: &Patch) -> f32;

    fn name(&self) -> &str {
        "custom"
    }

    /// Stochastic raters do not reproduce their own input and skip the
    /// self-similarity check.
    fn is_stochastic(&self) -> bool {
        false
    }
}

impl<F> Rater for F
where
    F: Fn(&Patch, &Patch) -> f32 + Send + Sync,
{
    fn rate(&self, target: &Patch, compare: &Patch) -> f32 {
        self(target, compare)
    }
}

/// Built-in rater selection as it appears in configuration files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RaterKind {
    AbsoluteDifference,
    LocalNormalizedDifference,
    GlobalNormalizedDifference,
    RelativeMatchCount {
        #[serde(default = "default_match_tolerance")]
        tolerance: f32,
    },
    Gradients,
    Random {
        #[serde(default)]
        seed: u64,
    },
}

fn default_match_tolerance() -> f32 {
    match_count::DEFAULT_TOLERANCE
}

impl RaterKind {
    /// Instantiate against the raster whose value ranges scale the scores.
    /// `threshold` only matters for the random rater.
    pub fn build(&self, raster: &Raster, threshold: f32) -> Arc<dyn Rater> {
        match self {
            RaterKind::AbsoluteDifference => Arc::new(AbsoluteDifference::new(raster)),
            RaterKind::LocalNormalizedDifference => Arc::new(LocalNormalizedDifference),
            RaterKind::GlobalNormalizedDifference => {
                Arc::new(GlobalNormalizedDifference::new(raster))
            }
            RaterKind::RelativeMatchCount { tolerance } => {
                Arc::new(RelativeMatchCount::new(raster, *tolerance))
            }
            RaterKind::Gradients => Arc::new(GradientDifference::new(raster)),
            RaterKind::Random { seed } => Arc::new(RandomRater::new(*seed, threshold)),
        }
    }
}

/// Mean of `f(band, a, b)` over the aligned pixels of every band pair.
/// `None` when band counts differ or the alignment is empty.
pub(crate) fn mean_over_bands(
    target: &[ImageF32],
    compare: &[ImageF32],
    alignment: &Alignment,
    f: impl Fn(usize, f32, f32) -> f32,
) -> Option<f32> {
    if target.len() != compare.len() || alignment.pixel_count() == 0 {
        return None;
    }
    let mut sum = 0.0f64;
    for (band, (a, b)) in target.iter().zip(compare).enumerate() {
        for (ra, rb) in alignment.rows(a, b) {
            sum += ra
                .iter()
                .zip(rb)
                .map(|(&x, &y)| f(band, x, y) as f64)
                .sum::<f64>();
        }
    }
    let n = (alignment.pixel_count() * target.len()) as f64;
    Some((sum / n) as f32)
}

/// Map a mean difference onto a `[0, 1]` confidence.
#[inline]
pub(crate) fn score_from_difference(mean_diff: Option<f32>, scale: f32) -> f32 {
    match mean_diff {
        Some(d) if scale > 0.0 && d.is_finite() => (1.0 - d / scale).clamp(0.0, 1.0),
        _ => 0.0,
    }
}
