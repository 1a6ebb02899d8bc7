use super::params::PinParams;
use crate::basis::Basis;
use crate::boundary::Boundary;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    InputDescriptor, PatchingStage, RasterDescriptor, RunReport, TimingBreakdown,
};
use crate::error::PinError;
use crate::graph::PinGraph;
use crate::grow::{CancelToken, GrowthEngine, Matcher};
use crate::image::Raster;
use crate::normalize::{normalize, PinMap};
use crate::patcher::HolePatcher;
use crate::rate::Rater;
use crate::sample::{Patch, PatchSampler};
use crate::types::GeoPoint;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Instant;

/// Minimum score of the root patch rated against itself.
pub const SELF_SIMILARITY_LIMIT: f32 = 0.975;

/// The field a run operates on.
#[derive(Clone)]
pub struct FieldSetup {
    pub boundary: Arc<dyn Boundary>,
    pub boundary_crs: Option<String>,
    /// Start and end point of a row. The start point is the root pin.
    pub row_vector: [GeoPoint; 2],
    pub raster: Option<Arc<Raster>>,
}

impl FieldSetup {
    pub fn new(boundary: impl Boundary + 'static, start: GeoPoint, stop: GeoPoint) -> Self {
        Self {
            boundary: Arc::new(boundary),
            boundary_crs: None,
            row_vector: [start, stop],
            raster: None,
        }
    }

    pub fn with_raster(mut self, raster: Arc<Raster>) -> Self {
        self.raster = Some(raster);
        self
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.boundary_crs = Some(crs.into());
        self
    }
}

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct PinRun {
    pub map: PinMap,
    pub graph: PinGraph,
    pub report: RunReport,
}

pub struct PinLocator {
    params: PinParams,
    field: FieldSetup,
    custom_rater: Option<Arc<dyn Rater>>,
}

impl PinLocator {
    pub fn new(params: PinParams, field: FieldSetup) -> Self {
        Self {
            params,
            field,
            custom_rater: None,
        }
    }

    /// Use `rater` instead of the configured built-in one.
    pub fn with_rater(mut self, rater: impl Rater + 'static) -> Self {
        self.custom_rater = Some(Arc::new(rater));
        self
    }

    pub fn params(&self) -> &PinParams {
        &self.params
    }

    pub fn field(&self) -> &FieldSetup {
        &self.field
    }

    pub fn run(&self) -> Result<PinRun, PinError> {
        self.run_with_cancel(&CancelToken::new())
    }

    /// Run until done or until `cancel` fires. A cancelled run still returns
    /// the nodes placed so far, patched and normalized.
    pub fn run_with_cancel(&self, cancel: &CancelToken) -> Result<PinRun, PinError> {
        let total = Instant::now();
        let mut timings = TimingBreakdown::default();
        let p = &self.params;
        let [start, stop] = self.field.row_vector;

        let basis = Basis::from_row_vector(start, stop, p.row_spacing, p.col_spacing)?;
        let n = p.search.iteration_size;
        if n < 3 || n % 2 == 0 {
            return Err(PinError::InvalidSearchSize(n));
        }
        if p.search.iterations == 0 {
            return Err(PinError::NoSearchIterations);
        }
        let threshold = p.search.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PinError::InvalidThreshold(threshold));
        }
        let boundary = self.field.boundary.as_ref();
        if !boundary.contains(start) {
            return Err(PinError::RowVectorOutsideBoundary);
        }

        let rater = self.resolve_rater()?;
        let mut sampler = None;
        let mut root_patch: Option<Patch> = None;
        let mut self_similarity = None;
        if let (Some(raster), Some(rater)) = (&self.field.raster, &rater) {
            if let (Some(rc), Some(bc)) = (raster.crs(), self.field.boundary_crs.as_deref()) {
                if rc != bc {
                    return Err(PinError::CrsMismatch {
                        raster: rc.to_string(),
                        boundary: bc.to_string(),
                    });
                }
            }
            let s = PatchSampler::from_spacing(
                raster.clone(),
                &p.patch,
                p.row_spacing,
                p.col_spacing,
            );
            let patch = s.sample(start).ok_or(PinError::RootOutsideRaster)?;
            if !rater.is_stochastic() {
                let score = rater.rate(&patch, &patch);
                if score < SELF_SIMILARITY_LIMIT {
                    return Err(PinError::SelfSimilarity(score));
                }
                if score < 0.99 {
                    warn!("root patch self-similarity is only {score:.4} with the {} rater", rater.name());
                }
                self_similarity = Some(score);
            }
            root_patch = Some(patch);
            sampler = Some(s);
        } else if self.field.raster.is_some() {
            debug!("raster given without a rater; pins are placed at their expected positions");
        }

        let max_nodes = p.grow.max_nodes.unwrap_or_else(|| {
            let cells = boundary.area() / basis.cell_area();
            ((2.0 * cells).ceil() as usize).max(1)
        });
        debug!(
            "growing from ({:.3}, {:.3}) with col step {:?}, row step {:?}, cap {max_nodes}",
            start.x, start.y, basis.col_step, basis.row_step
        );

        let mut graph = PinGraph::new(start);
        let mut engine =
            GrowthEngine::new(basis, boundary, &p.grow, max_nodes).with_cancel(cancel);
        if let (Some(s), Some(r)) = (&sampler, &rater) {
            engine = engine.with_matcher(Matcher {
                sampler: s,
                rater: r.as_ref(),
                search: &p.search,
                sigma: p.index_sigma(),
                root_patch: root_patch.as_ref().filter(|_| p.grow.compare_from_root),
            });
        }
        let growth = engine.grow(&mut graph);
        timings.push("growth", growth.elapsed_ms);

        let t_patch = Instant::now();
        let outcome = HolePatcher::new(p.max_patch_size).patch(&mut graph);
        let patching = PatchingStage {
            max_patch_size: p.max_patch_size,
            patched: outcome.patched,
            unpatched: outcome.unpatched,
            elapsed_ms: elapsed_ms(t_patch),
        };
        timings.push("hole_patching", patching.elapsed_ms);

        let t_norm = Instant::now();
        let map = normalize(&graph, &patching.patched, &patching.unpatched, p.start_corner);
        timings.push("normalize", elapsed_ms(t_norm));
        timings.total_ms = elapsed_ms(total);

        let report = RunReport {
            input: InputDescriptor {
                root: start,
                col_step: basis.col_step,
                row_step: basis.row_step,
                raster: self.field.raster.as_ref().map(|r| RasterDescriptor {
                    width: r.width(),
                    height: r.height(),
                    bands: r.band_count(),
                    value_range: r.value_range(),
                }),
                rater: rater.as_ref().map(|r| r.name().to_string()),
            },
            placed: map.placed_count(),
            dead_ends: map.dead_ends,
            unpatched_holes: map.unpatched_holes,
            growth,
            patching,
            self_similarity,
            timings,
        };
        debug!("{}", report.summary());
        Ok(PinRun { map, graph, report })
    }

    fn resolve_rater(&self) -> Result<Option<Arc<dyn Rater>>, PinError> {
        let rater = match (&self.custom_rater, &self.params.rater) {
            (Some(r), _) => Some(r.clone()),
            (None, Some(kind)) => {
                let raster = self
                    .field
                    .raster
                    .as_ref()
                    .ok_or(PinError::RaterWithoutRaster)?;
                Some(kind.build(raster, self.params.search.threshold))
            }
            (None, None) => None,
        };
        if rater.is_some() && self.field.raster.is_none() {
            return Err(PinError::RaterWithoutRaster);
        }
        Ok(rater)
    }
}
