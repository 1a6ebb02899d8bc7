use crate::types::GridCoord;
use serde::{Deserialize, Serialize};

/// Why growth stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// No loose ends left: the placed region is fully enclosed.
    #[default]
    Exhausted,
    /// The runaway cap on placed nodes was hit with loose ends remaining.
    CapReached,
    Cancelled,
}

impl Termination {
    /// Whether the frontier was fully explored.
    pub fn is_complete(self) -> bool {
        self == Termination::Exhausted
    }
}

/// Statistics of one frontier level.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReport {
    pub level_index: usize,
    pub candidates: usize,
    pub placed: usize,
    pub holes: usize,
    /// Holes caused by the border-distance check rather than the search.
    pub near_border: usize,
    pub dead_ends: usize,
    /// Candidates returned to the frontier unevaluated after cancellation.
    pub skipped: usize,
    pub spawned: usize,
    pub merges: usize,
    pub revived: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_confidence: Option<f32>,
    pub elapsed_ms: f64,
}

/// Frontier expansion trace.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthStage {
    pub termination: Termination,
    pub max_nodes: usize,
    pub levels: Vec<LevelReport>,
    pub elapsed_ms: f64,
}

impl GrowthStage {
    pub fn total_placed(&self) -> usize {
        self.levels.iter().map(|l| l.placed).sum()
    }
}

/// Hole patching outcome.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchingStage {
    pub max_patch_size: usize,
    pub patched: Vec<GridCoord>,
    pub unpatched: Vec<GridCoord>,
    pub elapsed_ms: f64,
}
