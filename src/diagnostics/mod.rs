//! Diagnostics data model returned alongside every run.
//!
//! `RunReport` is the entry point. It bundles the per-level growth trace
//! (`GrowthStage`), the hole patching outcome (`PatchingStage`) and a timing
//! breakdown of the run's stages. All types serialize to camelCase JSON.

pub mod growth;
pub mod run;
pub mod timing;

pub use growth::{GrowthStage, LevelReport, PatchingStage, Termination};
pub use run::{InputDescriptor, RasterDescriptor, RunReport};
pub use timing::{StageTiming, TimingBreakdown};
