//! Pixel ↔ geographic affine transform in the usual six-coefficient layout:
//!
//! ```text
//! geo_x = c[0] + px * c[1] + py * c[2]
//! geo_y = c[3] + px * c[4] + py * c[5]
//! ```
//!
//! `(px, py)` are continuous pixel coordinates with `(0, 0)` at the outer
//! corner of the first pixel, so pixel `(i, j)` covers `[i, i+1) × [j, j+1)`.
use crate::types::GeoPoint;
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct GeoTransform {
    coeffs: [f64; 6],
}

impl GeoTransform {
    pub fn new(coeffs: [f64; 6]) -> Self {
        Self { coeffs }
    }

    /// North-up transform: top-left corner at `(origin_x, origin_y)`, square
    /// pixels of `pixel_size` geographic units, rows running south.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_size: f64) -> Self {
        Self::new([origin_x, pixel_size, 0.0, origin_y, 0.0, -pixel_size])
    }

    pub fn coeffs(&self) -> [f64; 6] {
        self.coeffs
    }

    /// Pixel width and height in geographic units (absolute values).
    pub fn pixel_size(&self) -> (f64, f64) {
        let c = &self.coeffs;
        (c[1].hypot(c[4]), c[2].hypot(c[5]))
    }

    fn linear(&self) -> Matrix2<f64> {
        let c = &self.coeffs;
        Matrix2::new(c[1], c[2], c[4], c[5])
    }

    pub fn to_geo(&self, px: f64, py: f64) -> GeoPoint {
        let c = &self.coeffs;
        GeoPoint::new(c[0], c[3]) + self.linear() * Vector2::new(px, py)
    }

    /// Continuous pixel coordinates of a geographic point, `None` if the
    /// transform is singular.
    pub fn to_pixel(&self, p: GeoPoint) -> Option<(f64, f64)> {
        let c = &self.coeffs;
        let inv = self.linear().try_inverse()?;
        let v = inv * (p - GeoPoint::new(c[0], c[3]));
        Some((v.x, v.y))
    }

    /// Nearest pixel-grid vertex of a geographic point.
    pub fn to_pixel_rounded(&self, p: GeoPoint) -> Option<(i64, i64)> {
        let (x, y) = self.to_pixel(p)?;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some((x.round() as i64, y.round() as i64))
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(coeffs: [f64; 6]) -> Self {
        Self::new(coeffs)
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(t: GeoTransform) -> Self {
        t.coeffs
    }
}
