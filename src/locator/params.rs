//! Parameter types configuring a pin run.
//!
//! Spacings and standard deviations are in geographic units of the boundary
//! CRS. The nested option groups keep their own defaults, so a configuration
//! file only needs the values it changes.
use crate::grow::GrowOptions;
use crate::rate::RaterKind;
use crate::sample::PatchOptions;
use crate::search::SearchOptions;
use crate::types::StartCorner;
use serde::Deserialize;

/// Positional standard deviation assumed when none is configured, as a
/// fraction of the spacing.
pub const DEFAULT_STD_DEV_FRACTION: f64 = 0.05;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PinParams {
    /// Distance between neighbouring rows.
    pub row_spacing: f64,
    /// Distance between neighbouring pins within a row.
    pub col_spacing: f64,
    pub row_std_dev: Option<f64>,
    pub col_std_dev: Option<f64>,
    pub patch: PatchOptions,
    pub search: SearchOptions,
    pub grow: GrowOptions,
    /// Longest run of missing cells the hole patcher fills. Zero disables it.
    pub max_patch_size: usize,
    pub start_corner: StartCorner,
    /// Built-in rater. `None` places pins at their expected positions.
    pub rater: Option<RaterKind>,
}

impl Default for PinParams {
    fn default() -> Self {
        Self {
            row_spacing: 1.0,
            col_spacing: 1.0,
            row_std_dev: None,
            col_std_dev: None,
            patch: PatchOptions::default(),
            search: SearchOptions::default(),
            grow: GrowOptions::default(),
            max_patch_size: 2,
            start_corner: StartCorner::BottomLeft,
            rater: None,
        }
    }
}

impl PinParams {
    /// Positional standard deviation in lattice index units `(col, row)`.
    pub fn index_sigma(&self) -> (f64, f64) {
        let col = self
            .col_std_dev
            .unwrap_or(DEFAULT_STD_DEV_FRACTION * self.col_spacing);
        let row = self
            .row_std_dev
            .unwrap_or(DEFAULT_STD_DEV_FRACTION * self.row_spacing);
        (col.abs() / self.col_spacing, row.abs() / self.row_spacing)
    }
}
