//! Cut axis-aligned windows out of the raster around geographic points.
use super::patch::{ClipOffsets, Patch};
use crate::image::Raster;
use crate::types::GeoPoint;
use serde::Deserialize;
use std::sync::Arc;

/// Window size of sampled patches.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PatchOptions {
    /// Half-size of the window in spacing units, not counting the half cell
    /// around the centre: the window spans `overlay_radius + 0.5` spacings
    /// to each side.
    pub overlay_radius: f64,
    /// Neighbourhood radius of the gradient field, in pixels.
    pub gradient_radius: usize,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            overlay_radius: 2.0,
            gradient_radius: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PatchSampler {
    raster: Arc<Raster>,
    /// Geographic half-width and half-height of the window.
    half_extent: (f64, f64),
    gradient_radius: usize,
}

impl PatchSampler {
    pub fn new(raster: Arc<Raster>, half_width: f64, half_height: f64) -> Self {
        Self {
            raster,
            half_extent: (half_width.abs(), half_height.abs()),
            gradient_radius: super::patch::DEFAULT_GRADIENT_RADIUS,
        }
    }

    /// Window of `overlay_radius + 0.5` column spacings wide and row spacings
    /// high to each side of the centre.
    pub fn from_spacing(
        raster: Arc<Raster>,
        options: &PatchOptions,
        row_spacing: f64,
        col_spacing: f64,
    ) -> Self {
        let k = options.overlay_radius.max(0.0) + 0.5;
        let mut sampler = Self::new(raster, k * col_spacing, k * row_spacing);
        sampler.gradient_radius = options.gradient_radius.max(1);
        sampler
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn half_extent(&self) -> (f64, f64) {
        self.half_extent
    }

    /// Sample the window centred on `center`. `None` when the window lies
    /// entirely outside the raster.
    pub fn sample(&self, center: GeoPoint) -> Option<Patch> {
        let (hw, hh) = self.half_extent;
        let t = self.raster.transform();
        let corners = [
            GeoPoint::new(center.x - hw, center.y + hh),
            GeoPoint::new(center.x + hw, center.y + hh),
            GeoPoint::new(center.x - hw, center.y - hh),
            GeoPoint::new(center.x + hw, center.y - hh),
        ];
        let mut x_lo = i64::MAX;
        let mut x_hi = i64::MIN;
        let mut y_lo = i64::MAX;
        let mut y_hi = i64::MIN;
        for c in corners {
            let (px, py) = t.to_pixel_rounded(c)?;
            x_lo = x_lo.min(px);
            x_hi = x_hi.max(px);
            y_lo = y_lo.min(py);
            y_hi = y_hi.max(py);
        }

        let w = self.raster.width() as i64;
        let h = self.raster.height() as i64;
        if x_lo >= w || y_lo >= h || x_hi <= 0 || y_hi <= 0 {
            return None;
        }
        let x0 = x_lo.max(0);
        let x1 = x_hi.min(w);
        let y0 = y_lo.max(0);
        let y1 = y_hi.min(h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        let offsets = ClipOffsets {
            left: (x0 - x_lo) as usize,
            right: (x_hi - x1) as usize,
            top: (y0 - y_lo) as usize,
            bottom: (y_hi - y1) as usize,
        };
        let (cw, ch) = ((x1 - x0) as usize, (y1 - y0) as usize);
        let bands = self
            .raster
            .bands()
            .iter()
            .map(|b| b.crop(x0 as usize, y0 as usize, cw, ch))
            .collect();
        Some(Patch::new(center, bands, offsets).with_gradient_radius(self.gradient_radius))
    }
}
