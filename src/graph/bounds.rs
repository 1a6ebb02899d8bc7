use crate::types::GridCoord;
use serde::Serialize;

/// Inclusive bounding rectangle of lattice coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexBounds {
    pub min_col: i32,
    pub max_col: i32,
    pub min_row: i32,
    pub max_row: i32,
}

impl IndexBounds {
    pub fn around(c: GridCoord) -> Self {
        Self {
            min_col: c.col,
            max_col: c.col,
            min_row: c.row,
            max_row: c.row,
        }
    }

    pub fn include(&mut self, c: GridCoord) {
        self.min_col = self.min_col.min(c.col);
        self.max_col = self.max_col.max(c.col);
        self.min_row = self.min_row.min(c.row);
        self.max_row = self.max_row.max(c.row);
    }

    /// Bounds of a set of coordinates, `None` if empty.
    pub fn of(coords: impl IntoIterator<Item = GridCoord>) -> Option<Self> {
        let mut it = coords.into_iter();
        let mut b = Self::around(it.next()?);
        for c in it {
            b.include(c);
        }
        Some(b)
    }

    #[inline]
    pub fn contains(&self, c: GridCoord) -> bool {
        (self.min_col..=self.max_col).contains(&c.col) && (self.min_row..=self.max_row).contains(&c.row)
    }

    pub fn cols(&self) -> usize {
        (self.max_col - self.min_col + 1) as usize
    }

    pub fn rows(&self) -> usize {
        (self.max_row - self.min_row + 1) as usize
    }
}
