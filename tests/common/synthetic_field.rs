use pin_network::image::{GeoTransform, ImageF32, Raster};
use pin_network::types::GeoPoint;

pub const PLANT: f32 = 200.0;
pub const SOIL: f32 = 40.0;
pub const PLANT_RADIUS: f64 = 3.0;

/// Square single-band raster of `size` pixels with one geographic unit per
/// pixel and the top-left corner at `(0, size)`. Round plants sit on a
/// `spacing` lattice anchored at `(origin, origin)`, across the whole raster.
/// Plants listed in `missing` are painted as soil.
pub fn plant_field(size: usize, origin: f64, spacing: f64, missing: &[GeoPoint]) -> Raster {
    let transform = GeoTransform::north_up(0.0, size as f64, 1.0);
    let mut band = ImageF32::new(size, size);
    for py in 0..size {
        for px in 0..size {
            let g = transform.to_geo(px as f64 + 0.5, py as f64 + 0.5);
            let centre = GeoPoint::new(
                origin + ((g.x - origin) / spacing).round() * spacing,
                origin + ((g.y - origin) / spacing).round() * spacing,
            );
            let in_plant = (g - centre).norm() <= PLANT_RADIUS
                && !missing.iter().any(|m| (*m - centre).norm() < 1e-9);
            band.set(px, py, if in_plant { PLANT } else { SOIL });
        }
    }
    Raster::new(vec![band], transform).expect("synthetic field has contrast")
}
