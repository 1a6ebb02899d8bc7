//! Reverse lookup: which pin does an arbitrary point belong to.
use crate::normalize::PinMap;
use crate::types::GeoPoint;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestPin {
    pub col: i32,
    pub row: i32,
    pub distance: f64,
}

/// Nearest placed pin to `point`, by Euclidean distance. Linear scan.
pub fn nearest_pin(map: &PinMap, point: GeoPoint) -> Option<NearestPin> {
    map.placed()
        .filter_map(|p| p.position.map(|pos| (p, (pos - point).norm())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, distance)| NearestPin {
            col: p.col,
            row: p.row,
            distance,
        })
}

/// Locate each point of a layer; `None` entries for an empty map.
pub fn locate_points(map: &PinMap, points: &[GeoPoint]) -> Vec<Option<NearestPin>> {
    points.iter().map(|&p| nearest_pin(map, p)).collect()
}
