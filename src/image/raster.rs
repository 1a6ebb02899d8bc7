//! Multi-band geo-referenced raster held in memory for the whole run.
//!
//! Bands are stored as separate [`ImageF32`] planes of identical size. Bands
//! whose global minimum equals their maximum carry no signal and are dropped
//! at construction, so every remaining band has a non-zero value range.
use super::{GeoTransform, ImageF32};
use crate::error::PinError;
use serde::Serialize;

/// Global value range of one band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BandRange {
    pub min: f32,
    pub max: f32,
}

impl BandRange {
    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

#[derive(Clone, Debug)]
pub struct Raster {
    width: usize,
    height: usize,
    bands: Vec<ImageF32>,
    ranges: Vec<BandRange>,
    transform: GeoTransform,
    crs: Option<String>,
}

impl Raster {
    /// Build from band planes. Planes must share one size; constant bands are
    /// discarded. Fails when no informative band remains.
    pub fn new(bands: Vec<ImageF32>, transform: GeoTransform) -> Result<Self, PinError> {
        let (width, height) = match bands.first() {
            Some(b) => (b.w, b.h),
            None => return Err(PinError::EmptyRaster),
        };
        let mut kept = Vec::with_capacity(bands.len());
        let mut ranges = Vec::with_capacity(bands.len());
        for band in bands {
            if band.w != width || band.h != height {
                return Err(PinError::BandSizeMismatch);
            }
            match band.min_max() {
                Some((min, max)) if max > min => {
                    ranges.push(BandRange { min, max });
                    kept.push(band);
                }
                _ => {}
            }
        }
        if kept.is_empty() {
            return Err(PinError::EmptyRaster);
        }
        Ok(Self {
            width,
            height,
            bands: kept,
            ranges,
            transform,
            crs: None,
        })
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bands(&self) -> &[ImageF32] {
        &self.bands
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn band_ranges(&self) -> &[BandRange] {
        &self.ranges
    }

    /// Span between the smallest band minimum and the largest band maximum.
    pub fn value_range(&self) -> f32 {
        let lo = self.ranges.iter().map(|r| r.min).fold(f32::INFINITY, f32::min);
        let hi = self
            .ranges
            .iter()
            .map(|r| r.max)
            .fold(f32::NEG_INFINITY, f32::max);
        hi - lo
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }
}
