//! Reconcile two patches whose windows were clipped differently.
//!
//! Both patches come from windows of the same nominal size. Clipping removes
//! pixels from different sides, so pixel `(0, 0)` of one patch need not
//! correspond to pixel `(0, 0)` of the other. The alignment trims from each
//! patch whatever the other lost on the same side, then crops both to their
//! common size. Residual size differences of one pixel (rounding of the
//! window corners) are tolerated; anything larger means the patches cannot be
//! compared.
use super::patch::Patch;
use crate::image::{ImageF32, ImageView};

/// Largest per-axis size difference still reconciled by cropping.
pub const SHAPE_TOLERANCE: usize = 1;

/// Matching windows in two planes: same size, different origins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub target_origin: (usize, usize),
    pub compare_origin: (usize, usize),
    pub width: usize,
    pub height: usize,
}

impl Alignment {
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Align two patches through their clip offsets.
    pub fn between(target: &Patch, compare: &Patch) -> Option<Self> {
        let t = target.offsets();
        let c = compare.offsets();
        let trim_t = (
            c.left.saturating_sub(t.left),
            c.right.saturating_sub(t.right),
            c.top.saturating_sub(t.top),
            c.bottom.saturating_sub(t.bottom),
        );
        let trim_c = (
            t.left.saturating_sub(c.left),
            t.right.saturating_sub(c.right),
            t.top.saturating_sub(c.top),
            t.bottom.saturating_sub(c.bottom),
        );
        let tw = target.width().checked_sub(trim_t.0 + trim_t.1)?;
        let th = target.height().checked_sub(trim_t.2 + trim_t.3)?;
        let cw = compare.width().checked_sub(trim_c.0 + trim_c.1)?;
        let ch = compare.height().checked_sub(trim_c.2 + trim_c.3)?;
        if tw.abs_diff(cw) > SHAPE_TOLERANCE || th.abs_diff(ch) > SHAPE_TOLERANCE {
            return None;
        }
        let width = tw.min(cw);
        let height = th.min(ch);
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            target_origin: (trim_t.0, trim_t.2),
            compare_origin: (trim_c.0, trim_c.2),
            width,
            height,
        })
    }

    /// Restrict the alignment to pixels at least `radius` away from the edge
    /// of both patches and express it in coordinates of planes shrunk by
    /// `radius` on every side (the gradient fields).
    pub fn interior(
        &self,
        radius: usize,
        target_size: (usize, usize),
        compare_size: (usize, usize),
    ) -> Option<Self> {
        let r = radius as isize;
        let axis = |t0: usize, c0: usize, len: usize, tn: usize, cn: usize| {
            let (t0, c0, len, tn, cn) = (t0 as isize, c0 as isize, len as isize, tn as isize, cn as isize);
            let lo = 0.max(r - t0).max(r - c0);
            let hi = len.min(tn - r - t0).min(cn - r - c0);
            (hi > lo).then(|| ((t0 + lo - r) as usize, (c0 + lo - r) as usize, (hi - lo) as usize))
        };
        let (tx, cx, width) = axis(
            self.target_origin.0,
            self.compare_origin.0,
            self.width,
            target_size.0,
            compare_size.0,
        )?;
        let (ty, cy, height) = axis(
            self.target_origin.1,
            self.compare_origin.1,
            self.height,
            target_size.1,
            compare_size.1,
        )?;
        Some(Self {
            target_origin: (tx, ty),
            compare_origin: (cx, cy),
            width,
            height,
        })
    }

    /// Paired rows of the aligned windows of two planes.
    pub fn rows<'a>(
        &self,
        target: &'a ImageF32,
        compare: &'a ImageF32,
    ) -> impl Iterator<Item = (&'a [f32], &'a [f32])> + 'a {
        let a = *self;
        (0..a.height).map(move |y| {
            (
                target.row_window(a.target_origin.1 + y, a.target_origin.0, a.width),
                compare.row_window(a.compare_origin.1 + y, a.compare_origin.0, a.width),
            )
        })
    }
}
