pub mod f32;
pub mod io;
pub mod raster;
pub mod traits;
pub mod transform;

pub use self::f32::ImageF32;
pub use self::raster::{BandRange, Raster};
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::transform::GeoTransform;
