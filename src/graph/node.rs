use crate::types::{Direction, GeoPoint, GridCoord, NodeStatus};
use serde::Serialize;

/// One lattice cell. Adjacency slots hold neighbour coordinates, indexed by
/// [`Direction::index`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridNode {
    pub coord: GridCoord,
    pub status: NodeStatus,
    pub position: Option<GeoPoint>,
    pub adjacent: [Option<GridCoord>; 4],
}

impl GridNode {
    pub(crate) fn placed(coord: GridCoord, position: GeoPoint) -> Self {
        Self {
            coord,
            status: NodeStatus::Placed,
            position: Some(position),
            adjacent: [None; 4],
        }
    }

    /// Stub created from `parent`, which lies towards `dir`.
    pub(crate) fn loose_end(coord: GridCoord, dir: Direction, parent: GridCoord) -> Self {
        let mut adjacent = [None; 4];
        adjacent[dir.index()] = Some(parent);
        Self {
            coord,
            status: NodeStatus::LooseEnd,
            position: None,
            adjacent,
        }
    }

    #[inline]
    pub fn neighbour(&self, dir: Direction) -> Option<GridCoord> {
        self.adjacent[dir.index()]
    }

    /// Populated adjacency slots.
    pub fn neighbours(&self) -> impl Iterator<Item = (Direction, GridCoord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.neighbour(d).map(|c| (d, c)))
    }

    /// Direction and coordinate of the neighbour this loose end grew from.
    ///
    /// A loose end carries exactly one populated slot.
    pub fn parent_relation(&self) -> Option<(Direction, GridCoord)> {
        debug_assert!(
            self.status != NodeStatus::LooseEnd || self.neighbours().count() == 1,
            "loose end {} must have exactly one parent",
            self.coord
        );
        self.neighbours().next()
    }
}
