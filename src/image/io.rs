//! I/O helpers for rasters and JSON.
//!
//! - `load_raster`: read a PNG/JPEG/TIFF into a multi-band [`Raster`].
//! - `save_band_png`: write one band, stretched to its value range, as grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{GeoTransform, ImageF32, ImageView, Raster};
use image::{DynamicImage, GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as one band per colour channel.
///
/// Alpha is discarded. Gray images yield a single band. Constant channels are
/// dropped by [`Raster::new`].
pub fn load_raster(path: &Path, transform: GeoTransform) -> Result<Raster, String> {
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let bands = split_bands(&img);
    Raster::new(bands, transform).map_err(|e| format!("Invalid raster {}: {e}", path.display()))
}

fn split_bands(img: &DynamicImage) -> Vec<ImageF32> {
    let w = img.width() as usize;
    let h = img.height() as usize;
    if img.color().has_color() {
        let rgb = img.to_rgb32f();
        let mut bands = vec![ImageF32::new(w, h), ImageF32::new(w, h), ImageF32::new(w, h)];
        for (x, y, px) in rgb.enumerate_pixels() {
            for (c, band) in bands.iter_mut().enumerate() {
                band.set(x as usize, y as usize, px.0[c]);
            }
        }
        bands
    } else {
        let gray = img.to_luma32f();
        let data = gray.into_raw();
        ImageF32::from_vec(w, h, data).into_iter().collect()
    }
}

/// Save one band to a grayscale PNG, stretched so min maps to 0 and max to 255.
pub fn save_band_png(band: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (lo, hi) = band.min_max().unwrap_or((0.0, 1.0));
    let span = if hi > lo { hi - lo } else { 1.0 };
    let mut out = GrayImage::new(band.w as u32, band.h as u32);
    for (y, row) in band.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = ((px - lo) / span * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
