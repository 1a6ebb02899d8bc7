//! Fraction of pixels that agree within a tolerance.
use super::{mean_over_bands, Rater};
use crate::image::Raster;
use crate::sample::{Alignment, Patch};

/// Normalized difference below which two pixels count as a match.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Share of aligned pixels whose difference, scaled by the raster-wide band
/// range, is below `tolerance`.
#[derive(Clone, Debug)]
pub struct RelativeMatchCount {
    spans: Vec<f32>,
    tolerance: f32,
}

impl RelativeMatchCount {
    pub fn new(raster: &Raster, tolerance: f32) -> Self {
        Self {
            spans: raster.band_ranges().iter().map(|r| r.span()).collect(),
            tolerance,
        }
    }
}

impl Rater for RelativeMatchCount {
    fn rate(&self, target: &Patch, compare: &Patch) -> f32 {
        if target.bands().len() != self.spans.len() {
            return 0.0;
        }
        let Some(al) = Alignment::between(target, compare) else {
            return 0.0;
        };
        mean_over_bands(target.bands(), compare.bands(), &al, |band, a, b| {
            if (a - b).abs() / self.spans[band] < self.tolerance {
                1.0
            } else {
                0.0
            }
        })
        .map_or(0.0, |v| v.clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        "relative match count"
    }
}
