//! Field boundary: containment and distance-to-edge queries.
//!
//! The growth engine only needs the [`Boundary`] capability. [`Polygon`] is
//! the stock implementation over a single closed ring; multi-part inputs are
//! expected to be reduced to their first ring by the caller.
use crate::error::PinError;
use crate::types::GeoPoint;
use serde::Deserialize;

const HIT_SLOP: f64 = 1e-12;

pub trait Boundary: Send + Sync {
    /// Whether `p` lies strictly inside the boundary. Points on an edge are
    /// outside.
    fn contains(&self, p: GeoPoint) -> bool;

    /// Distance from `p` to the nearest point on the boundary edge.
    fn distance_to_border(&self, p: GeoPoint) -> f64;

    /// Enclosed area, used to size the runaway guard.
    fn area(&self) -> f64;
}

/// Simple polygon given by its vertices (closing edge implied).
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>")]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
}

impl Polygon {
    pub fn new(mut vertices: Vec<GeoPoint>) -> Result<Self, PinError> {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(PinError::DegenerateBoundary(vertices.len()));
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle `[x0, x1] × [y0, y1]`.
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            vertices: vec![
                GeoPoint::new(x0, y0),
                GeoPoint::new(x1, y0),
                GeoPoint::new(x1, y1),
                GeoPoint::new(x0, y1),
            ],
        }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl TryFrom<Vec<[f64; 2]>> for Polygon {
    type Error = PinError;

    fn try_from(raw: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Polygon::new(raw.into_iter().map(|[x, y]| GeoPoint::new(x, y)).collect())
    }
}

impl Boundary for Polygon {
    // Even-odd rule; points on an edge count as outside.
    fn contains(&self, p: GeoPoint) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if segment_distance_sq(p, a, b) < HIT_SLOP {
                return false;
            }
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn distance_to_border(&self, p: GeoPoint) -> f64 {
        self.edges()
            .map(|(a, b)| segment_distance_sq(p, a, b))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    fn area(&self) -> f64 {
        let twice: f64 = self
            .edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        twice.abs() * 0.5
    }
}

fn segment_distance_sq(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < HIT_SLOP {
        return (p - a).norm_squared();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm_squared()
}
