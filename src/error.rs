//! Fatal configuration errors raised before growth starts.
//!
//! Per-candidate rejections are not errors; they are recorded on the node as
//! [`NodeStatus::DeadEnd`](crate::types::NodeStatus) or `Hole`.
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PinError {
    #[error("{name} must be greater than zero, got {value}")]
    NonPositiveSpacing { name: &'static str, value: f64 },
    #[error("search iteration size must be odd and >= 3 to include the search centre, got {0}")]
    InvalidSearchSize(usize),
    #[error("number of search iterations must be at least 1")]
    NoSearchIterations,
    #[error("match threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f32),
    #[error("row vector endpoints coincide; cannot derive a row direction")]
    DegenerateRowVector,
    #[error("row vector should start within the bounding box")]
    RowVectorOutsideBoundary,
    #[error("boundary polygon needs at least 3 vertices, got {0}")]
    DegenerateBoundary(usize),
    #[error("raster CRS {raster} differs from boundary CRS {boundary}")]
    CrsMismatch { raster: String, boundary: String },
    #[error("raster has no usable bands")]
    EmptyRaster,
    #[error("raster bands differ in size")]
    BandSizeMismatch,
    #[error("a similarity rater needs a raster to sample")]
    RaterWithoutRaster,
    #[error("root patch lies entirely outside the raster")]
    RootOutsideRaster,
    #[error("self-similarity of the root patch is {0:.4}, below the 0.975 sanity limit")]
    SelfSimilarity(f32),
}
