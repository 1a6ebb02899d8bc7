//! Raster patch sampling and the derived views raters compare.
pub mod align;
pub mod gradient;
pub mod patch;
pub mod sampler;

pub use align::Alignment;
pub use gradient::{neighbourhood_gradient, GradientField};
pub use patch::{ClipOffsets, Patch};
pub use sampler::{PatchOptions, PatchSampler};
