//! The lattice of discovered nodes, stored as an arena keyed by coordinate.
//!
//! Adjacency is kept as neighbour coordinates, never as references, so the
//! graph has a single owner (`nodes`) and stub creation is a map insert.
//! Placing a node links it to every neighbour that already exists and adds
//! loose-end stubs for the ones that do not:
//!
//! - absent cell: a new loose end whose only slot points back at the placed
//!   node, queued on the frontier;
//! - placed neighbour: both slots linked (a merge of two growth fronts);
//! - existing loose end: the placed node links forward, the loose end keeps
//!   its original single parent;
//! - hole or dead end: revived as a loose end with the new node as its sole
//!   parent and queued again.
pub mod bounds;
pub mod node;

pub use bounds::IndexBounds;
pub use node::GridNode;

use crate::types::{Direction, GeoPoint, GridCoord, NodeStatus};
use std::collections::{BTreeMap, BTreeSet};

/// Changes caused by placing one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaceEffects {
    pub spawned: usize,
    pub merged: usize,
    pub revived: usize,
}

impl std::ops::AddAssign for PlaceEffects {
    fn add_assign(&mut self, rhs: Self) {
        self.spawned += rhs.spawned;
        self.merged += rhs.merged;
        self.revived += rhs.revived;
    }
}

#[derive(Clone, Debug)]
pub struct PinGraph {
    nodes: BTreeMap<GridCoord, GridNode>,
    frontier: BTreeSet<GridCoord>,
    bounds: Option<IndexBounds>,
}

impl PinGraph {
    /// Graph holding the placed root at [`GridCoord::ORIGIN`] and its four
    /// loose-end stubs.
    pub fn new(root_position: GeoPoint) -> Self {
        let mut graph = Self {
            nodes: BTreeMap::new(),
            frontier: BTreeSet::new(),
            bounds: None,
        };
        graph
            .nodes
            .insert(GridCoord::ORIGIN, GridNode::placed(GridCoord::ORIGIN, root_position));
        graph.link_neighbours(GridCoord::ORIGIN);
        graph.refresh_bounds();
        graph
    }

    pub fn root(&self) -> &GridNode {
        &self.nodes[&GridCoord::ORIGIN]
    }

    pub fn get(&self, coord: GridCoord) -> Option<&GridNode> {
        self.nodes.get(&coord)
    }

    pub fn status(&self, coord: GridCoord) -> Option<NodeStatus> {
        self.nodes.get(&coord).map(|n| n.status)
    }

    /// Position of a placed node.
    pub fn position(&self, coord: GridCoord) -> Option<GeoPoint> {
        self.nodes
            .get(&coord)
            .filter(|n| n.status.is_placed())
            .and_then(|n| n.position)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GridNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn count(&self, status: NodeStatus) -> usize {
        self.nodes.values().filter(|n| n.status == status).count()
    }

    pub fn placed_count(&self) -> usize {
        self.count(NodeStatus::Placed)
    }

    pub fn frontier(&self) -> &BTreeSet<GridCoord> {
        &self.frontier
    }

    /// Bounding rectangle of placed nodes as of the last refresh.
    pub fn bounds(&self) -> Option<IndexBounds> {
        self.bounds
    }

    /// Drain the frontier in row-major order. New loose ends created while the
    /// snapshot is processed accumulate in a fresh frontier.
    pub fn take_frontier(&mut self) -> Vec<GridCoord> {
        std::mem::take(&mut self.frontier).into_iter().collect()
    }

    /// Re-queue coordinates that were taken but not evaluated.
    pub fn restore_frontier(&mut self, coords: impl IntoIterator<Item = GridCoord>) {
        for c in coords {
            if self.status(c) == Some(NodeStatus::LooseEnd) {
                self.frontier.insert(c);
            }
        }
    }

    /// Record a rejection. Placed nodes are never demoted; returns whether the
    /// status changed.
    pub fn mark(&mut self, coord: GridCoord, status: NodeStatus) -> bool {
        debug_assert!(matches!(status, NodeStatus::DeadEnd | NodeStatus::Hole));
        match self.nodes.get_mut(&coord) {
            Some(n) if !n.status.is_placed() => {
                n.status = status;
                true
            }
            _ => false,
        }
    }

    /// Accept a loose end at `position`. Its neighbours are not touched until
    /// [`PinGraph::link_neighbours`] runs.
    pub fn set_placed(&mut self, coord: GridCoord, position: GeoPoint) -> bool {
        match self.nodes.get_mut(&coord) {
            Some(n) if !n.status.is_placed() => {
                n.status = NodeStatus::Placed;
                n.position = Some(position);
                true
            }
            _ => false,
        }
    }

    /// Accept a loose end and link its neighbourhood.
    pub fn place(&mut self, coord: GridCoord, position: GeoPoint) -> PlaceEffects {
        if self.set_placed(coord, position) {
            self.link_neighbours(coord)
        } else {
            PlaceEffects::default()
        }
    }

    /// Create or link the four neighbours of the placed node at `coord`.
    pub fn link_neighbours(&mut self, coord: GridCoord) -> PlaceEffects {
        let mut effects = PlaceEffects::default();
        if !self.status(coord).is_some_and(NodeStatus::is_placed) {
            return effects;
        }
        for dir in Direction::ALL {
            let n = coord.step(dir);
            let back = dir.reverse();
            match self.nodes.get_mut(&n) {
                None => {
                    self.nodes.insert(n, GridNode::loose_end(n, back, coord));
                    self.frontier.insert(n);
                    effects.spawned += 1;
                }
                Some(other) => match other.status {
                    NodeStatus::Placed => {
                        other.adjacent[back.index()] = Some(coord);
                        effects.merged += 1;
                    }
                    NodeStatus::LooseEnd => {}
                    NodeStatus::Hole | NodeStatus::DeadEnd => {
                        *other = GridNode::loose_end(n, back, coord);
                        self.frontier.insert(n);
                        effects.revived += 1;
                    }
                },
            }
            if let Some(node) = self.nodes.get_mut(&coord) {
                node.adjacent[dir.index()] = Some(n);
            }
        }
        effects
    }

    /// Insert or convert a gap cell into a placed node with an interpolated
    /// position, linking it with its placed neighbours in both directions.
    pub fn insert_patched(&mut self, coord: GridCoord, position: GeoPoint) {
        if self.status(coord).is_some_and(NodeStatus::is_placed) {
            return;
        }
        let mut node = GridNode::placed(coord, position);
        for dir in Direction::ALL {
            let n = coord.step(dir);
            if let Some(other) = self.nodes.get_mut(&n) {
                if other.status.is_placed() {
                    other.adjacent[dir.reverse().index()] = Some(coord);
                    node.adjacent[dir.index()] = Some(n);
                }
            }
        }
        self.frontier.remove(&coord);
        self.nodes.insert(coord, node);
    }

    /// Recompute the bounding rectangle of placed nodes.
    pub fn refresh_bounds(&mut self) {
        self.bounds = IndexBounds::of(
            self.nodes
                .values()
                .filter(|n| n.status.is_placed())
                .map(|n| n.coord),
        );
    }
}
