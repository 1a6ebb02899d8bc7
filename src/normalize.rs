//! Re-index the grown lattice so the start corner becomes `(1, 1)`.
//!
//! Rows are numbered from the lowest (or, mirrored, highest) row of the map.
//! Columns are numbered per row from that row's own first (or, mirrored,
//! last) cell, which absorbs drift of the row starts along a curved field
//! edge.
use crate::graph::PinGraph;
use crate::types::{GeoPoint, GridCoord, NodeStatus, StartCorner};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// How a pin obtained its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PinSource {
    Root,
    Grown,
    Patched,
    /// Unpatched gap; no position.
    Missing,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub col: i32,
    pub row: i32,
    /// Coordinate in the grown lattice before re-indexing.
    pub lattice: GridCoord,
    pub position: Option<GeoPoint>,
    pub status: NodeStatus,
    pub source: PinSource,
}

/// Normalized output of a run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinMap {
    pub start_corner: StartCorner,
    /// Sorted by `(row, col)`.
    pub pins: Vec<Pin>,
    pub dead_ends: usize,
    pub unpatched_holes: usize,
}

impl PinMap {
    pub fn get(&self, col: i32, row: i32) -> Option<&Pin> {
        self.pins
            .binary_search_by(|p| (p.row, p.col).cmp(&(row, col)))
            .ok()
            .map(|i| &self.pins[i])
    }

    pub fn placed(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.status.is_placed())
    }

    pub fn placed_count(&self) -> usize {
        self.placed().count()
    }

    pub fn rows(&self) -> usize {
        self.pins
            .iter()
            .map(|p| p.row)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Build the normalized map from the placed nodes of `graph` plus the gaps
/// the hole patcher left open.
pub fn normalize(
    graph: &PinGraph,
    patched: &[GridCoord],
    unpatched: &[GridCoord],
    corner: StartCorner,
) -> PinMap {
    let patched: BTreeSet<GridCoord> = patched.iter().copied().collect();
    let mut entries: Vec<(GridCoord, Option<GeoPoint>, NodeStatus, PinSource)> = graph
        .nodes()
        .filter(|n| n.status.is_placed())
        .map(|n| {
            let source = if n.coord == GridCoord::ORIGIN {
                PinSource::Root
            } else if patched.contains(&n.coord) {
                PinSource::Patched
            } else {
                PinSource::Grown
            };
            (n.coord, n.position, NodeStatus::Placed, source)
        })
        .collect();
    entries.extend(
        unpatched
            .iter()
            .map(|&c| (c, None, NodeStatus::Hole, PinSource::Missing)),
    );

    let mut map = PinMap {
        start_corner: corner,
        pins: Vec::with_capacity(entries.len()),
        dead_ends: graph.count(NodeStatus::DeadEnd),
        unpatched_holes: unpatched.len(),
    };
    let (Some(min_row), Some(max_row)) = (
        entries.iter().map(|e| e.0.row).min(),
        entries.iter().map(|e| e.0.row).max(),
    ) else {
        return map;
    };

    let mut row_extent: BTreeMap<i32, (i32, i32)> = BTreeMap::new();
    for (c, ..) in &entries {
        row_extent
            .entry(c.row)
            .and_modify(|e| *e = (e.0.min(c.col), e.1.max(c.col)))
            .or_insert((c.col, c.col));
    }

    for (c, position, status, source) in entries {
        let (lo, hi) = row_extent[&c.row];
        let col = if corner.mirror_columns() {
            hi - c.col + 1
        } else {
            c.col - lo + 1
        };
        let row = if corner.mirror_rows() {
            max_row - c.row + 1
        } else {
            c.row - min_row + 1
        };
        map.pins.push(Pin {
            col,
            row,
            lattice: c,
            position,
            status,
            source,
        });
    }
    map.pins.sort_by_key(|p| (p.row, p.col));
    map
}
