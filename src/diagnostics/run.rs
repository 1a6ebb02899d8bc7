use super::{GrowthStage, PatchingStage, TimingBreakdown};
use crate::types::GeoPoint;
use serde::Serialize;

/// Summary returned by [`PinLocator::run`](crate::PinLocator::run).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub input: InputDescriptor,
    pub growth: GrowthStage,
    pub patching: PatchingStage,
    pub placed: usize,
    pub dead_ends: usize,
    pub unpatched_holes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_similarity: Option<f32>,
    pub timings: TimingBreakdown,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.growth.termination.is_complete()
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        format!(
            "placed={} dead_ends={} unpatched={} patched={} levels={} termination={:?} total_ms={:.3}",
            self.placed,
            self.dead_ends,
            self.unpatched_holes,
            self.patching.patched.len(),
            self.growth.levels.len(),
            self.growth.termination,
            self.timings.total_ms
        )
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub root: GeoPoint,
    pub col_step: GeoPoint,
    pub row_step: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster: Option<RasterDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rater: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterDescriptor {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
    pub value_range: f32,
}
