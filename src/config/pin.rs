use crate::boundary::Polygon;
use crate::image::GeoTransform;
use crate::locator::PinParams;
use crate::types::GeoPoint;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct RasterConfig {
    pub path: PathBuf,
    /// Six affine coefficients: origin x, pixel width, row rotation,
    /// origin y, column rotation, pixel height.
    pub transform: GeoTransform,
    #[serde(default)]
    pub crs: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BoundaryConfig {
    /// Outer ring; a repeated closing vertex is accepted.
    pub vertices: Polygon,
    #[serde(default)]
    pub crs: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub pins_json: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    /// First band of the root patch, stretched to 8 bits.
    pub root_patch_png: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub raster: Option<RasterConfig>,
    pub boundary: BoundaryConfig,
    /// Start and end point of one row; the start point becomes the root pin.
    pub row_vector: [[f64; 2]; 2],
    #[serde(default)]
    pub params: PinParams,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RuntimeConfig {
    pub fn row_vector_points(&self) -> (GeoPoint, GeoPoint) {
        let [a, b] = self.row_vector;
        (GeoPoint::new(a[0], a[1]), GeoPoint::new(b[0], b[1]))
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary;
    use crate::rate::RaterKind;
    use crate::types::StartCorner;

    #[test]
    fn parses_a_minimal_config_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pins.json");
        fs::write(
            &path,
            r#"{
                "boundary": { "vertices": [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]] },
                "row_vector": [[1, 1], [9, 1]],
                "params": {
                    "row_spacing": 2.0,
                    "col_spacing": 0.5,
                    "start_corner": "topRight",
                    "rater": { "random": { "seed": 4 } },
                    "search": { "threshold": 0.9 }
                }
            }"#,
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.boundary.vertices.vertices().len(), 4);
        assert!((cfg.boundary.vertices.area() - 100.0).abs() < 1e-9);
        assert_eq!(cfg.params.start_corner, StartCorner::TopRight);
        assert_eq!(cfg.params.rater, Some(RaterKind::Random { seed: 4 }));
        assert_eq!(cfg.params.search.threshold, 0.9);
        assert_eq!(cfg.params.search.iteration_size, 5);
        assert_eq!(cfg.params.max_patch_size, 2);
        assert!(cfg.raster.is_none());
        assert_eq!(cfg.row_vector_points().1, GeoPoint::new(9.0, 1.0));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = load_config(Path::new("/no/such/pins.json")).unwrap_err();
        assert!(err.starts_with("Failed to read config /no/such/pins.json"));
    }
}
