//! Junctions: the points connectivity is computed over.

use std::collections::BTreeSet;

use super::types::JunctionId;
use crate::layout::GridPoint;

/// A component terminal placed on the workbench grid.
///
/// Two junctions are electrically the same point exactly when their
/// coordinates are equal. Ids only identify the terminal for registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junction {
    pub id: JunctionId,
    pub x: i32,
    pub y: i32,
    /// Junctions known to be wired to this one. Informational only.
    pub neighbors: BTreeSet<JunctionId>,
}

impl Junction {
    /// Create a new junction with no known neighbors.
    pub fn new(id: impl Into<JunctionId>, x: i32, y: i32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            neighbors: BTreeSet::new(),
        }
    }

    /// Create a junction at a grid point.
    pub fn at(id: impl Into<JunctionId>, point: GridPoint) -> Self {
        Self::new(id, point.x, point.y)
    }

    /// Current position.
    pub fn position(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }

    /// Move the junction.
    pub fn set_position(&mut self, point: GridPoint) {
        self.x = point.x;
        self.y = point.y;
    }

    /// Check whether two junctions sit on the same electrical point.
    pub fn coincides_with(&self, other: &Junction) -> bool {
        self.x == other.x && self.y == other.y
    }
}
