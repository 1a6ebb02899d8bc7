//! Gradient-field comparison, insensitive to uniform brightness shifts.
use super::{score_from_difference, Rater};
use crate::image::Raster;
use crate::sample::{Alignment, Patch};

/// `1 − mean(|Δgx| + |Δgy|) / 2 / value range of the raster`.
#[derive(Clone, Debug)]
pub struct GradientDifference {
    value_range: f32,
}

impl GradientDifference {
    pub fn new(raster: &Raster) -> Self {
        Self {
            value_range: raster.value_range(),
        }
    }
}

impl Rater for GradientDifference {
    fn rate(&self, target: &Patch, compare: &Patch) -> f32 {
        if target.gradient_radius() != compare.gradient_radius()
            || target.bands().len() != compare.bands().len()
        {
            return 0.0;
        }
        let Some(al) = Alignment::between(target, compare) else {
            return 0.0;
        };
        let Some(al) = al.interior(
            target.gradient_radius(),
            (target.width(), target.height()),
            (compare.width(), compare.height()),
        ) else {
            return 0.0;
        };
        let mut sum = 0.0f64;
        for (ft, fc) in target.gradients().iter().zip(compare.gradients()) {
            for ((ax, bx), (ay, by)) in al.rows(&ft.gx, &fc.gx).zip(al.rows(&ft.gy, &fc.gy)) {
                for i in 0..al.width {
                    sum += 0.5 * ((ax[i] - bx[i]).abs() + (ay[i] - by[i]).abs()) as f64;
                }
            }
        }
        let n = (al.pixel_count() * target.bands().len()) as f64;
        score_from_difference(Some((sum / n) as f32), self.value_range)
    }

    fn name(&self) -> &str {
        "gradients"
    }
}
