//! Recursive refinement search for the best-matching position near an
//! expected lattice position.
//!
//! The search runs up to `levels` radius levels. Level `k` covers `±k·σ`
//! lattice index units around the expected position (σ being the positional
//! standard deviation relative to the spacing) with a square grid of
//! `iteration_size²` candidates. Within a level the grid is re-centred on the
//! best candidate and its radius halved, `iterations − 1` times: a coarse to
//! fine hill-climb which may settle on a local optimum. Candidates strictly
//! inside the previous level's extent were already covered and are skipped.
//!
//! The first level whose best score reaches the threshold ends the search.
//! Candidates outside the boundary, or whose window misses the raster, do not
//! participate.
pub mod options;
pub mod search_box;

pub use options::SearchOptions;
pub use search_box::SearchBox;

use crate::basis::Basis;
use crate::boundary::Boundary;
use crate::rate::Rater;
use crate::sample::{Patch, PatchSampler};
use crate::types::GeoPoint;
use log::debug;
use serde::Serialize;

/// Accepted search result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub position: GeoPoint,
    pub confidence: f32,
    /// Radius level (1-based) that produced the match.
    pub level: usize,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    offset: (f64, f64),
    position: GeoPoint,
    score: f32,
    dist_sq: f64,
}

pub struct RefinementSearch<'a> {
    sampler: &'a PatchSampler,
    rater: &'a dyn Rater,
    boundary: &'a dyn Boundary,
    basis: Basis,
    /// Positional standard deviation in lattice index units `(col, row)`.
    sigma: (f64, f64),
    options: &'a SearchOptions,
}

impl<'a> RefinementSearch<'a> {
    pub fn new(
        sampler: &'a PatchSampler,
        rater: &'a dyn Rater,
        boundary: &'a dyn Boundary,
        basis: Basis,
        sigma: (f64, f64),
        options: &'a SearchOptions,
    ) -> Self {
        Self {
            sampler,
            rater,
            boundary,
            basis,
            sigma,
            options,
        }
    }

    /// Best position near `approx` matching `target`, or `None` when no level
    /// reaches the threshold.
    pub fn search(&self, target: &Patch, approx: GeoPoint) -> Option<Match> {
        let opts = self.options;
        let mut previous: Option<SearchBox> = None;
        let mut best_seen = 0.0f32;
        for level in 1..=opts.levels.max(1) {
            let k = level as f64;
            let outer = SearchBox::new(
                (0.0, 0.0),
                (k * self.sigma.0, k * self.sigma.1),
                opts.iteration_size,
            );
            if let Some(best) = self.search_level(target, approx, outer, previous.as_ref()) {
                if best.score >= opts.threshold {
                    return Some(Match {
                        position: best.position,
                        confidence: best.score,
                        level,
                    });
                }
                best_seen = best_seen.max(best.score);
            }
            previous = Some(outer);
        }
        debug!(
            "search near ({:.3}, {:.3}) gave up, best score {best_seen:.4} < {:.4}",
            approx.x, approx.y, opts.threshold
        );
        None
    }

    fn search_level(
        &self,
        target: &Patch,
        approx: GeoPoint,
        outer: SearchBox,
        previous: Option<&SearchBox>,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        let mut bx = outer;
        for _ in 0..self.options.iterations.max(1) {
            for offset in bx.candidates() {
                if previous.is_some_and(|p| p.contains_strictly(offset)) {
                    continue;
                }
                if best.is_some_and(|b| b.offset == offset) {
                    continue;
                }
                if let Some(c) = self.evaluate(target, approx, offset) {
                    let better = match best {
                        None => true,
                        Some(b) => c.score > b.score || (c.score == b.score && c.dist_sq < b.dist_sq),
                    };
                    if better {
                        best = Some(c);
                    }
                }
            }
            match best {
                Some(b) => bx = bx.zoom(b.offset),
                None => break,
            }
        }
        best
    }

    fn evaluate(&self, target: &Patch, approx: GeoPoint, offset: (f64, f64)) -> Option<Candidate> {
        let position = approx + self.basis.offset(offset.0, offset.1);
        if !self.boundary.contains(position) {
            return None;
        }
        let patch = self.sampler.sample(position)?;
        let raw = self.rater.rate(target, &patch);
        let dist_sq = (position - approx).norm_squared();
        let score = if self.options.precision_bias > 0.0 {
            raw / (1.0 + self.options.precision_bias * dist_sq) as f32
        } else {
            raw
        };
        (score > 0.0).then_some(Candidate {
            offset,
            position,
            score,
            dist_sq,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Polygon;
    use crate::image::{GeoTransform, ImageF32, Raster};
    use crate::rate::AbsoluteDifference;
    use std::sync::Arc;

    /// Bright 3×3 blob centred on pixel (cx, cy) over a dark 40×40 raster.
    fn blob_raster(cx: usize, cy: usize) -> Arc<Raster> {
        let mut band = ImageF32::new(40, 40);
        for y in 0..40usize {
            for x in 0..40usize {
                let inside = x.abs_diff(cx) <= 1 && y.abs_diff(cy) <= 1;
                band.set(x, y, if inside { 200.0 } else { 20.0 });
            }
        }
        Arc::new(Raster::new(vec![band], GeoTransform::north_up(0.0, 40.0, 1.0)).unwrap())
    }

    fn basis() -> Basis {
        Basis::from_angle(0.0, 10.0, 10.0)
    }

    #[test]
    fn finds_shifted_blob_within_search_radius() {
        let raster = blob_raster(21, 20);
        let sampler = PatchSampler::new(raster.clone(), 4.5, 4.5);
        // target: the blob seen from its true centre
        let target = sampler.sample(GeoPoint::new(21.5, 19.5)).unwrap();
        let rater = AbsoluteDifference::new(&raster);
        let boundary = Polygon::rectangle(0.0, 0.0, 40.0, 40.0);
        let opts = SearchOptions {
            threshold: 0.99,
            ..Default::default()
        };
        let search = RefinementSearch::new(&sampler, &rater, &boundary, basis(), (0.05, 0.05), &opts);
        // expected position one pixel left of the blob
        let m = search.search(&target, GeoPoint::new(20.5, 19.5)).unwrap();
        // windows snap to whole pixels, so any position within half a pixel
        // of the blob centre reproduces the target exactly
        assert!((m.position.x - 21.5).abs() < 0.51, "x={}", m.position.x);
        assert!((m.position.y - 19.5).abs() < 0.51, "y={}", m.position.y);
        assert!(m.confidence >= 0.99);
    }

    #[test]
    fn returns_none_when_nothing_reaches_threshold() {
        let raster = blob_raster(20, 20);
        let sampler = PatchSampler::new(raster.clone(), 4.5, 4.5);
        let target = sampler.sample(GeoPoint::new(20.5, 19.5)).unwrap();
        let rater = |_: &Patch, _: &Patch| 0.4f32;
        let boundary = Polygon::rectangle(0.0, 0.0, 40.0, 40.0);
        let opts = SearchOptions::default();
        let search = RefinementSearch::new(&sampler, &rater, &boundary, basis(), (0.05, 0.05), &opts);
        assert!(search.search(&target, GeoPoint::new(20.5, 19.5)).is_none());
    }

    #[test]
    fn score_equal_to_threshold_is_accepted() {
        let raster = blob_raster(20, 20);
        let sampler = PatchSampler::new(raster.clone(), 4.5, 4.5);
        let target = sampler.sample(GeoPoint::new(20.5, 19.5)).unwrap();
        let rater = |_: &Patch, _: &Patch| 0.5f32;
        let boundary = Polygon::rectangle(0.0, 0.0, 40.0, 40.0);
        let opts = SearchOptions {
            threshold: 0.5,
            ..Default::default()
        };
        let search = RefinementSearch::new(&sampler, &rater, &boundary, basis(), (0.05, 0.05), &opts);
        let m = search.search(&target, GeoPoint::new(20.5, 19.5)).unwrap();
        assert_eq!(m.confidence, 0.5);
        assert_eq!(m.level, 1);
        // equal scores resolve towards the expected position
        assert_eq!(m.position, GeoPoint::new(20.5, 19.5));
    }

    #[test]
    fn precision_bias_penalizes_drift() {
        let raster = blob_raster(20, 20);
        let sampler = PatchSampler::new(raster.clone(), 4.5, 4.5);
        let target = sampler.sample(GeoPoint::new(20.5, 19.5)).unwrap();
        let approx = GeoPoint::new(20.5, 19.5);
        // rater preferring candidates to the right
        let rater = move |_: &Patch, c: &Patch| (0.5 + 0.1 * (c.center().x - 20.5)) as f32;
        let boundary = Polygon::rectangle(0.0, 0.0, 40.0, 40.0);
        let plain = SearchOptions {
            threshold: 0.0,
            ..Default::default()
        };
        let biased = SearchOptions {
            precision_bias: 10.0,
            ..plain.clone()
        };
        let a = RefinementSearch::new(&sampler, &rater, &boundary, basis(), (0.05, 0.05), &plain)
            .search(&target, approx)
            .unwrap();
        let b = RefinementSearch::new(&sampler, &rater, &boundary, basis(), (0.05, 0.05), &biased)
            .search(&target, approx)
            .unwrap();
        assert!(a.position.x > approx.x);
        assert!(b.position.x - approx.x < a.position.x - approx.x);
    }
}
