//! Neighbourhood finite-difference gradients of a patch band.
//!
//! For each interior pixel the gradient is estimated from every offset
//! `(dx, dy)` within a square neighbourhood of `radius`, the zero offset
//! excluded:
//!
//! ```text
//! gx = Σ (a[x+dx, y+dy] − a[x, y]) · dx / (dx² + dy²)  /  Σ dx² / (dx² + dy²)
//! ```
//!
//! and symmetrically for `gy`. Offsets come in opposite pairs so the estimate
//! is a symmetric difference. Only pixels whose full neighbourhood lies inside
//! the band are evaluated, so the output planes are `(w − 2r) × (h − 2r)`.
//!
//! Complexity: O(W·H·r²) per band.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Gradient components of one band, shrunk by `radius` on every side.
#[derive(Clone, Debug)]
pub struct GradientField {
    /// Derivative along pixel columns (image x)
    pub gx: ImageF32,
    /// Derivative along pixel rows (image y)
    pub gy: ImageF32,
    /// Neighbourhood radius the field was computed with
    pub radius: usize,
}

impl GradientField {
    #[inline]
    pub fn width(&self) -> usize {
        self.gx.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.gx.h
    }
}

struct Tap {
    dx: isize,
    dy: isize,
    wx: f32,
    wy: f32,
}

fn taps(radius: usize) -> (Vec<Tap>, f32, f32) {
    let r = radius as isize;
    let mut out = Vec::with_capacity((2 * radius + 1).pow(2));
    let mut norm_x = 0.0f32;
    let mut norm_y = 0.0f32;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            let d2 = (dx * dx + dy * dy) as f32;
            let wx = dx as f32 / d2;
            let wy = dy as f32 / d2;
            norm_x += (dx * dx) as f32 / d2;
            norm_y += (dy * dy) as f32 / d2;
            out.push(Tap { dx, dy, wx, wy });
        }
    }
    (out, norm_x, norm_y)
}

/// Compute the gradient field of `band` with the given neighbourhood radius.
///
/// Bands no larger than `2·radius` in either dimension yield empty planes.
pub fn neighbourhood_gradient(band: &ImageF32, radius: usize) -> GradientField {
    let radius = radius.max(1);
    let ow = band.w.saturating_sub(2 * radius);
    let oh = band.h.saturating_sub(2 * radius);
    let mut gx = ImageF32::new(ow, oh);
    let mut gy = ImageF32::new(ow, oh);
    if ow == 0 || oh == 0 {
        return GradientField { gx, gy, radius };
    }

    let (taps, norm_x, norm_y) = taps(radius);
    for oy in 0..oh {
        let y = (oy + radius) as isize;
        let out_gx = gx.row_mut(oy);
        for (ox, out) in out_gx.iter_mut().enumerate() {
            let x = (ox + radius) as isize;
            let centre = band.get(x as usize, y as usize);
            let mut sum = 0.0f32;
            for t in &taps {
                let v = band.get((x + t.dx) as usize, (y + t.dy) as usize);
                sum += (v - centre) * t.wx;
            }
            *out = sum / norm_x;
        }
        let out_gy = gy.row_mut(oy);
        for (ox, out) in out_gy.iter_mut().enumerate() {
            let x = (ox + radius) as isize;
            let centre = band.get(x as usize, y as usize);
            let mut sum = 0.0f32;
            for t in &taps {
                let v = band.get((x + t.dx) as usize, (y + t.dy) as usize);
                sum += (v - centre) * t.wy;
            }
            *out = sum / norm_y;
        }
    }
    GradientField { gx, gy, radius }
}
