//! Pin locator orchestrating validation, growth, patching and normalization.
//!
//! Overview
//! - Derives the lattice basis from the row vector and spacings.
//! - Validates the configuration up front; any problem is a [`PinError`]
//!   and nothing is grown.
//! - Grows the lattice from the row vector's start point, validating every
//!   candidate against the raster when a rater is configured.
//! - Fills small gaps by interpolation and re-indexes the result from the
//!   configured start corner.
//!
//! Modules
//! - [`params`] – configuration types used by the locator and CLI.
//! - `pipeline` – the main [`PinLocator`] implementation.
//!
//! [`PinError`]: crate::error::PinError

pub mod params;
mod pipeline;

pub use params::{PinParams, DEFAULT_STD_DEV_FRACTION};
pub use pipeline::{FieldSetup, PinLocator, PinRun, SELF_SIMILARITY_LIMIT};
