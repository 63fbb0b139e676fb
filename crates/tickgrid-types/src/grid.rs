//! Grid coordinates and range arithmetic.
//!
//! All range checks in the simulation (grab, door, perception) use the same
//! metric: Euclidean distance between two cells, rounded up to the next whole
//! cell. Integer arithmetic only; no floating point is involved.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Column, growing to the right.
    pub x: i64,
    /// Row, growing downwards.
    pub y: i64,
}

impl Location {
    /// Create a location from its coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, rounded up.
    ///
    /// Saturates at `u64::MAX` for coordinates far outside any real grid.
    pub fn distance_to(self, other: Self) -> u64 {
        let dx = u128::from(self.x.abs_diff(other.x));
        let dy = u128::from(self.y.abs_diff(other.y));
        let squared = dx
            .saturating_mul(dx)
            .saturating_add(dy.saturating_mul(dy));
        let root = squared.isqrt();
        let ceil = if root.saturating_mul(root) < squared {
            root.saturating_add(1)
        } else {
            root
        };
        u64::try_from(ceil).unwrap_or(u64::MAX)
    }
}

impl From<(i64, i64)> for Location {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// How far a query reaches from its center cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Range {
    /// Cells whose distance is at most the given value.
    Bounded(u64),
    /// Every cell.
    Unbounded,
}

impl Range {
    /// Whether a cell at `distance` lies inside this range.
    pub const fn contains(self, distance: u64) -> bool {
        match self {
            Self::Bounded(limit) => distance <= limit,
            Self::Unbounded => true,
        }
    }
}

impl From<Option<u64>> for Range {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Unbounded, Self::Bounded)
    }
}

/// Width and height of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridShape {
    /// Number of columns.
    pub width: u64,
    /// Number of rows.
    pub height: u64,
}

impl GridShape {
    /// Whether `location` is a cell of this grid.
    pub fn contains(self, location: Location) -> bool {
        let in_x = u64::try_from(location.x).is_ok_and(|x| x < self.width);
        let in_y = u64::try_from(location.y).is_ok_and(|y| y < self.height);
        in_x && in_y
    }
}
