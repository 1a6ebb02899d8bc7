//! A multi-band window cut out of the raster around one geographic point.
//!
//! Derived data (per-band min/max, the range-normalized copy and the gradient
//! field) is computed lazily on first access and cached on the patch, so a
//! rater touching the same derived view repeatedly pays for it once.
use super::gradient::{neighbourhood_gradient, GradientField};
use crate::image::{BandRange, ImageF32};
use crate::types::GeoPoint;
use serde::Serialize;
use std::sync::OnceLock;

/// Pixels cut away from each side of the nominal window by raster edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClipOffsets {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl ClipOffsets {
    #[inline]
    pub fn is_clipped(&self) -> bool {
        self.left + self.right + self.top + self.bottom > 0
    }
}

/// Default neighbourhood radius of the gradient field.
pub const DEFAULT_GRADIENT_RADIUS: usize = 2;

#[derive(Clone, Debug)]
pub struct Patch {
    center: GeoPoint,
    bands: Vec<ImageF32>,
    offsets: ClipOffsets,
    gradient_radius: usize,
    ranges: OnceLock<Vec<BandRange>>,
    normalized: OnceLock<Vec<ImageF32>>,
    gradients: OnceLock<Vec<GradientField>>,
}

impl Patch {
    /// Bands must share one size.
    pub fn new(center: GeoPoint, bands: Vec<ImageF32>, offsets: ClipOffsets) -> Self {
        debug_assert!(bands.windows(2).all(|p| p[0].w == p[1].w && p[0].h == p[1].h));
        Self {
            center,
            bands,
            offsets,
            gradient_radius: DEFAULT_GRADIENT_RADIUS,
            ranges: OnceLock::new(),
            normalized: OnceLock::new(),
            gradients: OnceLock::new(),
        }
    }

    pub fn with_gradient_radius(mut self, radius: usize) -> Self {
        self.gradient_radius = radius.max(1);
        self.gradients = OnceLock::new();
        self
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn bands(&self) -> &[ImageF32] {
        &self.bands
    }

    pub fn offsets(&self) -> ClipOffsets {
        self.offsets
    }

    pub fn width(&self) -> usize {
        self.bands.first().map_or(0, |b| b.w)
    }

    pub fn height(&self) -> usize {
        self.bands.first().map_or(0, |b| b.h)
    }

    pub fn gradient_radius(&self) -> usize {
        self.gradient_radius
    }

    /// Local min/max of every band.
    pub fn band_ranges(&self) -> &[BandRange] {
        self.ranges.get_or_init(|| {
            self.bands
                .iter()
                .map(|b| {
                    let (min, max) = b.min_max().unwrap_or((0.0, 0.0));
                    BandRange { min, max }
                })
                .collect()
        })
    }

    /// Bands rescaled to `[0, 1]` by their own local range. A flat band maps
    /// to all zeros.
    pub fn normalized(&self) -> &[ImageF32] {
        self.normalized.get_or_init(|| {
            self.bands
                .iter()
                .zip(self.band_ranges())
                .map(|(b, r)| {
                    let span = r.span();
                    if span > 0.0 {
                        b.map(|v| (v - r.min) / span)
                    } else {
                        b.map(|_| 0.0)
                    }
                })
                .collect()
        })
    }

    pub fn gradients(&self) -> &[GradientField] {
        self.gradients.get_or_init(|| {
            self.bands
                .iter()
                .map(|b| neighbourhood_gradient(b, self.gradient_radius))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_copy_spans_unit_range() {
        let band = ImageF32::from_vec(3, 1, vec![10.0, 15.0, 20.0]).unwrap();
        let flat = ImageF32::from_vec(3, 1, vec![4.0; 3]).unwrap();
        let p = Patch::new(GeoPoint::zeros(), vec![band, flat], ClipOffsets::default());
        assert_eq!(p.band_ranges()[0], BandRange { min: 10.0, max: 20.0 });
        assert_eq!(p.normalized()[0].data, vec![0.0, 0.5, 1.0]);
        assert_eq!(p.normalized()[1].data, vec![0.0; 3]);
        assert!(std::ptr::eq(p.normalized(), p.normalized()));
    }
}
