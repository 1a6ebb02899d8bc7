//! Lattice basis: the geographic displacement of one column step and one row
//! step, derived from the row-direction vector and the nominal spacings.
use crate::error::PinError;
use crate::types::{Direction, GeoPoint};

const EPS: f64 = 1e-12;

/// Columns advance along the row vector, rows advance perpendicular to it
/// (90° counter-clockwise).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    /// Geographic displacement of `+1` column.
    pub col_step: GeoPoint,
    /// Geographic displacement of `+1` row.
    pub row_step: GeoPoint,
}

impl Basis {
    /// Build from the two endpoints of a row vector.
    pub fn from_row_vector(
        start: GeoPoint,
        stop: GeoPoint,
        row_spacing: f64,
        col_spacing: f64,
    ) -> Result<Self, PinError> {
        if !(row_spacing > 0.0) {
            return Err(PinError::NonPositiveSpacing {
                name: "row spacing",
                value: row_spacing,
            });
        }
        if !(col_spacing > 0.0) {
            return Err(PinError::NonPositiveSpacing {
                name: "column spacing",
                value: col_spacing,
            });
        }
        let d = stop - start;
        if d.norm() <= EPS {
            return Err(PinError::DegenerateRowVector);
        }
        let theta = d.y.atan2(d.x);
        Ok(Self::from_angle(theta, row_spacing, col_spacing))
    }

    /// Build from the row direction angle (radians, counter-clockwise from +x).
    pub fn from_angle(theta: f64, row_spacing: f64, col_spacing: f64) -> Self {
        let perp = theta + std::f64::consts::FRAC_PI_2;
        Self {
            col_step: GeoPoint::new(theta.cos() * col_spacing, theta.sin() * col_spacing),
            row_step: GeoPoint::new(perp.cos() * row_spacing, perp.sin() * row_spacing),
        }
    }

    /// Displacement of one step towards `dir`.
    #[inline]
    pub fn step(&self, dir: Direction) -> GeoPoint {
        let (dc, dr) = dir.delta();
        self.offset(dc as f64, dr as f64)
    }

    /// Displacement of a fractional `(d_col, d_row)` offset in index units.
    #[inline]
    pub fn offset(&self, d_col: f64, d_row: f64) -> GeoPoint {
        self.col_step * d_col + self.row_step * d_row
    }

    /// The smaller of the two step lengths.
    #[inline]
    pub fn spacing_unit(&self) -> f64 {
        self.col_step.norm().min(self.row_step.norm())
    }

    /// Area of one lattice cell in geographic units.
    #[inline]
    pub fn cell_area(&self) -> f64 {
        (self.col_step.x * self.row_step.y - self.col_step.y * self.row_step.x).abs()
    }
}
