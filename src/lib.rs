#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod boundary;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod locate;
pub mod locator;
pub mod normalize;
pub mod types;

// Building blocks of the run, public for custom pipelines and raters.
pub mod basis;
pub mod config;
pub mod graph;
pub mod grow;
pub mod patcher;
pub mod rate;
pub mod sample;
pub mod search;

// --- High-level re-exports -------------------------------------------------

// Main entry points: locator + results.
pub use crate::locator::{FieldSetup, PinLocator, PinParams, PinRun};
pub use crate::normalize::{Pin, PinMap};

// High-level diagnostics returned by the locator.
pub use crate::diagnostics::RunReport;

pub use crate::error::PinError;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use pin_network::prelude::*;
///
/// # fn main() {
/// let field = FieldSetup::new(
///     Polygon::rectangle(0.0, 0.0, 10.0, 10.0),
///     GeoPoint::new(1.0, 1.0),
///     GeoPoint::new(9.0, 1.0),
/// );
/// let run = PinLocator::new(PinParams::default(), field).run().unwrap();
/// println!("placed={}", run.map.placed_count());
/// # }
/// ```
pub mod prelude {
    pub use crate::boundary::{Boundary, Polygon};
    pub use crate::grow::CancelToken;
    pub use crate::image::{GeoTransform, Raster};
    pub use crate::rate::{Rater, RaterKind};
    pub use crate::sample::Patch;
    pub use crate::types::{GeoPoint, GridCoord, NodeStatus, StartCorner};
    pub use crate::{FieldSetup, PinLocator, PinMap, PinParams, PinRun};
}
