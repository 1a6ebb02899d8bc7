//! Shared lattice vocabulary: index coordinates, cardinal directions, node
//! status and the start-corner convention used when numbering the output.
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Geographic position in the CRS of the boundary layer.
pub type GeoPoint = Vector2<f64>;

/// Integer lattice coordinate `(col, row)`.
///
/// Ordering is row-major (row first, then column) so that ordered maps and
/// frontiers walk the lattice the same way on every run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub col: i32,
    pub row: i32,
}

impl GridCoord {
    /// Coordinate of the root node.
    pub const ORIGIN: GridCoord = GridCoord { col: 0, row: 0 };

    #[inline]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Neighbouring coordinate one step towards `dir`.
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        self + dir.delta()
    }
}

impl Add<(i32, i32)> for GridCoord {
    type Output = GridCoord;

    #[inline]
    fn add(self, rhs: (i32, i32)) -> GridCoord {
        GridCoord::new(self.col + rhs.0, self.row + rhs.1)
    }
}

impl Ord for GridCoord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl PartialOrd for GridCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// The four cardinal directions of the lattice.
///
/// `Right`/`Left` move along a row (column index), `Up`/`Down` move across
/// rows (row index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right = 0,
    Up = 1,
    Left = 2,
    Down = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    /// Unit index step `(d_col, d_row)`.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, -1),
        }
    }

    #[inline]
    pub const fn reverse(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
        }
    }

    /// Slot index in a node's adjacency array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Validation state of a lattice node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeStatus {
    /// Created from a placed neighbour, not yet evaluated.
    LooseEnd,
    /// Validated and carrying a geographic position.
    Placed,
    /// Approximate position fell outside the boundary.
    DeadEnd,
    /// No sufficiently similar patch nearby, or too close to the border.
    Hole,
}

impl NodeStatus {
    #[inline]
    pub fn is_placed(self) -> bool {
        self == NodeStatus::Placed
    }
}

/// Corner of the field that receives index `(1, 1)` after normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StartCorner {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl StartCorner {
    /// Whether column numbering within each row runs from the row's far end.
    #[inline]
    pub fn mirror_columns(self) -> bool {
        matches!(self, StartCorner::BottomRight | StartCorner::TopRight)
    }

    /// Whether row numbering runs from the top row.
    #[inline]
    pub fn mirror_rows(self) -> bool {
        matches!(self, StartCorner::TopLeft | StartCorner::TopRight)
    }
}
