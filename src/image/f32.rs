//! Owned single-band f32 plane in row-major layout (stride == width).
//!
//! One `ImageF32` holds one band of a raster, of a sampled patch, or of a
//! derived field (normalized values, gradient components).
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Plane width in pixels
    pub w: usize,
    /// Plane height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized plane of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Wrap an existing row-major buffer. `None` if the length does not match.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Copy the `w × h` window whose top-left pixel is `(x0, y0)`.
    ///
    /// The window must lie inside the plane.
    pub fn crop(&self, x0: usize, y0: usize, w: usize, h: usize) -> ImageF32 {
        debug_assert!(x0 + w <= self.w && y0 + h <= self.h);
        let mut out = ImageF32::new(w, h);
        for y in 0..h {
            let src = self.row(y0 + y);
            out.row_mut(y).copy_from_slice(&src[x0..x0 + w]);
        }
        out
    }

    /// Minimum and maximum sample, or `None` for an empty plane.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut it = self.data.iter().copied().filter(|v| v.is_finite());
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Map every sample through `f`.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> ImageF32 {
        ImageF32 {
            w: self.w,
            h: self.h,
            stride: self.stride,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_copies_the_requested_window() {
        let mut img = ImageF32::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                img.set(x, y, (10 * y + x) as f32);
            }
        }
        let c = img.crop(1, 1, 2, 2);
        assert_eq!(c.data, vec![11.0, 12.0, 21.0, 22.0]);
        assert_eq!(img.min_max(), Some((0.0, 23.0)));
        assert_eq!(ImageF32::new(0, 0).min_max(), None);
    }
}
