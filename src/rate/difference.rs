//! Mean absolute difference raters, on raw or range-normalized values.
use super::{mean_over_bands, score_from_difference, Rater};
use crate::image::Raster;
use crate::sample::{Alignment, Patch};

/// `1 − mean |a − b| / value range of the raster`.
#[derive(Clone, Debug)]
pub struct AbsoluteDifference {
    value_range: f32,
}

impl AbsoluteDifference {
    pub fn new(raster: &Raster) -> Self {
        Self {
            value_range: raster.value_range(),
        }
    }
}

impl Rater for AbsoluteDifference {
    fn rate(&self, target: &Patch, compare: &Patch) -> f32 {
        let Some(al) = Alignment::between(target, compare) else {
            return 0.0;
        };
        let d = mean_over_bands(target.bands(), compare.bands(), &al, |_, a, b| (a - b).abs());
        score_from_difference(d, self.value_range)
    }

    fn name(&self) -> &str {
        "absolute difference"
    }
}

/// Difference of the patches after each is rescaled by its own per-band range.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalNormalizedDifference;

impl Rater for LocalNormalizedDifference {
    fn rate(&self, target: &Patch, compare: &Patch) -> f32 {
        let Some(al) = Alignment::between(target, compare) else {
            return 0.0;
        };
        let d = mean_over_bands(target.normalized(), compare.normalized(), &al, |_, a, b| {
            (a - b).abs()
        });
        score_from_difference(d, 1.0)
    }

    fn name(&self) -> &str {
        "local normalized difference"
    }
}

/// Difference of the patches with each band scaled by the raster-wide range
/// of that band.
#[derive(Clone, Debug)]
pub struct GlobalNormalizedDifference {
    spans: Vec<f32>,
}

impl GlobalNormalizedDifference {
    pub fn new(raster: &Raster) -> Self {
        Self {
            spans: raster.band_ranges().iter().map(|r| r.span()).collect(),
        }
    }
}

impl Rater for GlobalNormalizedDifference {
    fn rate(&self, target: &Patch, compare: &Patch) -> f32 {
        if target.bands().len() != self.spans.len() {
            return 0.0;
        }
        let Some(al) = Alignment::between(target, compare) else {
            return 0.0;
        };
        let d = mean_over_bands(target.bands(), compare.bands(), &al, |band, a, b| {
            (a - b).abs() / self.spans[band]
        });
        score_from_difference(d, 1.0)
    }

    fn name(&self) -> &str {
        "global normalized difference"
    }
}
