//! Interpolate positions for small gaps left inside the grown region.
//!
//! Rows of the placed bounding rectangle are visited bottom to top. Every cell
//! of the rectangle that is not placed (absent, hole or dead end) is a gap. From a gap the patcher walks
//! along both axes to the nearest placed node on each side. An axis whose two
//! borders enclose at most `max_patch_size` unplaced cells yields a linear
//! interpolation; the gap takes the mean of the qualifying axes. Patched cells
//! count as placed for later gaps of the same pass.
use crate::graph::{IndexBounds, PinGraph};
use crate::types::{GeoPoint, GridCoord};
use log::debug;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatchOutcome {
    pub patched: Vec<GridCoord>,
    pub unpatched: Vec<GridCoord>,
}

#[derive(Clone, Copy, Debug)]
pub struct HolePatcher {
    max_patch_size: usize,
}

impl HolePatcher {
    pub fn new(max_patch_size: usize) -> Self {
        Self { max_patch_size }
    }

    pub fn patch(&self, graph: &mut PinGraph) -> PatchOutcome {
        let mut outcome = PatchOutcome::default();
        let Some(bounds) = graph.bounds() else {
            return outcome;
        };
        for row in bounds.min_row..=bounds.max_row {
            for col in bounds.min_col..=bounds.max_col {
                let c = GridCoord::new(col, row);
                if graph.position(c).is_some() {
                    continue;
                }
                match self.interpolate(graph, &bounds, c) {
                    Some(p) => {
                        graph.insert_patched(c, p);
                        outcome.patched.push(c);
                    }
                    None => outcome.unpatched.push(c),
                }
            }
        }
        graph.refresh_bounds();
        debug!(
            "hole patching (max size {}): {} patched, {} left open",
            self.max_patch_size,
            outcome.patched.len(),
            outcome.unpatched.len()
        );
        outcome
    }

    fn interpolate(&self, graph: &PinGraph, bounds: &IndexBounds, c: GridCoord) -> Option<GeoPoint> {
        if self.max_patch_size == 0 {
            return None;
        }
        let horizontal = self.axis(graph, c, (1, 0), bounds.min_col, bounds.max_col, c.col);
        let vertical = self.axis(graph, c, (0, 1), bounds.min_row, bounds.max_row, c.row);
        match (horizontal, vertical) {
            (Some(h), Some(v)) => Some((h + v) * 0.5),
            (h, v) => h.or(v),
        }
    }

    /// Interpolated position along one axis, if both borders exist within
    /// the bounds and enclose a short enough gap.
    fn axis(
        &self,
        graph: &PinGraph,
        c: GridCoord,
        unit: (i32, i32),
        lo: i32,
        hi: i32,
        at: i32,
    ) -> Option<GeoPoint> {
        let walk = |sign: i32| -> Option<(i32, GeoPoint)> {
            let mut k = 1;
            loop {
                let idx = at + sign * k;
                if idx < lo || idx > hi {
                    return None;
                }
                let n = c + (sign * k * unit.0, sign * k * unit.1);
                if let Some(p) = graph.position(n) {
                    return Some((idx, p));
                }
                k += 1;
            }
        };
        let (i0, p0) = walk(-1)?;
        let (i1, p1) = walk(1)?;
        let span = (i1 - i0 - 1) as usize;
        if span > self.max_patch_size {
            return None;
        }
        let t = (at - i0) as f64 / (i1 - i0) as f64;
        Some(p0 + (p1 - p0) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeStatus;

    /// Full `cols × rows` block on a unit lattice, minus `holes`.
    fn block(cols: i32, rows: i32, holes: &[(i32, i32)]) -> PinGraph {
        let mut g = PinGraph::new(GeoPoint::zeros());
        for row in 0..rows {
            for col in 0..cols {
                if !holes.contains(&(col, row)) {
                    g.insert_patched(GridCoord::new(col, row), GeoPoint::new(col as f64, row as f64));
                }
            }
        }
        for &(col, row) in holes {
            g.mark(GridCoord::new(col, row), NodeStatus::Hole);
        }
        g.refresh_bounds();
        g
    }

    #[test]
    fn single_interior_hole_is_interpolated() {
        let mut g = block(5, 5, &[(2, 2)]);
        let out = HolePatcher::new(1).patch(&mut g);
        assert_eq!(out.patched, vec![GridCoord::new(2, 2)]);
        assert!(out.unpatched.is_empty());
        let p = g.position(GridCoord::new(2, 2)).unwrap();
        assert!((p - GeoPoint::new(2.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn gap_exactly_at_the_limit_is_patched_and_wider_is_not() {
        let holes = [(1, 2), (2, 2), (3, 2), (1, 3), (2, 3), (3, 3)];
        // three-cell horizontal gaps, two-cell vertical gaps
        let mut g = block(5, 6, &holes);
        let out = HolePatcher::new(2).patch(&mut g);
        assert_eq!(out.patched.len(), 6);
        let p = g.position(GridCoord::new(1, 2)).unwrap();
        assert!((p - GeoPoint::new(1.0, 2.0)).norm() < 1e-12, "p={p:?}");

        let mut g = block(5, 6, &holes);
        let out = HolePatcher::new(1).patch(&mut g);
        assert!(out.patched.is_empty());
        assert_eq!(out.unpatched.len(), 6);
    }

    #[test]
    fn long_gap_on_the_bounding_edge_stays_open() {
        // bottom row: horizontal span 4 is too long, no border below
        let holes = [(1, 0), (2, 0), (3, 0), (4, 0)];
        let mut g = block(6, 3, &holes);
        let out = HolePatcher::new(3).patch(&mut g);
        assert!(out.patched.is_empty());
        assert_eq!(out.unpatched.len(), 4);

        let mut g = block(6, 3, &holes);
        let out = HolePatcher::new(4).patch(&mut g);
        assert_eq!(out.patched.len(), 4);
        assert!(g.get(GridCoord::new(2, 0)).unwrap().status.is_placed());
    }

    #[test]
    fn gap_at_a_row_end_is_patched_from_above_and_below() {
        let mut g = block(5, 3, &[(4, 1)]);
        let out = HolePatcher::new(2).patch(&mut g);
        assert_eq!(out.patched, vec![GridCoord::new(4, 1)]);
        assert!(out.unpatched.is_empty());
        let p = g.position(GridCoord::new(4, 1)).unwrap();
        assert!((p - GeoPoint::new(4.0, 1.0)).norm() < 1e-12, "p={p:?}");
    }

    #[test]
    fn unfillable_corner_gap_is_reported() {
        // (4, 2) has no border above it and none to its right
        let mut g = block(5, 3, &[(4, 2)]);
        let out = HolePatcher::new(2).patch(&mut g);
        assert!(out.patched.is_empty());
        assert_eq!(out.unpatched, vec![GridCoord::new(4, 2)]);
    }

    #[test]
    fn zero_size_disables_patching() {
        let mut g = block(3, 3, &[(1, 1)]);
        let out = HolePatcher::new(0).patch(&mut g);
        assert!(out.patched.is_empty());
        assert_eq!(out.unpatched, vec![GridCoord::new(1, 1)]);
    }
}
