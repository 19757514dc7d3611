//! Grid points, offsets, and the snapping configuration.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::{Rotation, DEFAULT_GRID_ORIGIN_X, DEFAULT_GRID_SIZE};

/// Largest coordinate magnitude a snapped point can take. Pointer input
/// beyond it is clamped, so terminal arithmetic stays inside `i32`.
pub const WORKBENCH_LIMIT: i32 = 1 << 24;

/// An integer position on the workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A terminal position relative to a component's centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    /// Create a new offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Rotate the offset clockwise in screen coordinates (y grows downwards).
    ///
    /// At 90° `(dx, dy)` becomes `(-dy, dx)`, so a horizontal terminal pair
    /// `(-40, 0)`/`(40, 0)` turns into `(0, -40)`/`(0, 40)`.
    pub fn rotated(&self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::Deg0 => *self,
            Rotation::Deg90 => Self::new(-self.dy, self.dx),
        }
    }
}

impl Add<Offset> for GridPoint {
    type Output = GridPoint;

    fn add(self, rhs: Offset) -> GridPoint {
        GridPoint::new(self.x.saturating_add(rhs.dx), self.y.saturating_add(rhs.dy))
    }
}

/// Grid snapping configuration.
///
/// Grid lines run every `size` pixels starting at `(origin_x, origin_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Spacing between grid lines.
    pub size: i32,
    /// X coordinate of a vertical grid line.
    pub origin_x: i32,
    /// Y coordinate of a horizontal grid line.
    pub origin_y: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            origin_x: DEFAULT_GRID_ORIGIN_X,
            origin_y: 0,
        }
    }
}

impl GridConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid spacing. Values below 1 are clamped to 1.
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size.max(1);
        self
    }

    /// Set the grid origin.
    pub fn with_origin(mut self, origin_x: i32, origin_y: i32) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    /// Snap a raw (pointer) position to the nearest grid point.
    ///
    /// Halfway cases round towards positive infinity. Coordinates are clamped
    /// to [`WORKBENCH_LIMIT`] and NaN snaps to the origin.
    pub fn snap(&self, x: f64, y: f64) -> GridPoint {
        GridPoint::new(
            snap_axis(x, self.size, self.origin_x),
            snap_axis(y, self.size, self.origin_y),
        )
    }

    /// Snap an integer point to the nearest grid point.
    pub fn snap_point(&self, point: GridPoint) -> GridPoint {
        self.snap(point.x as f64, point.y as f64)
    }

    /// Check whether a point already lies on the grid.
    pub fn is_on_grid(&self, point: GridPoint) -> bool {
        let size = i64::from(self.size.max(1));
        (i64::from(point.x) - i64::from(self.origin_x)).rem_euclid(size) == 0
            && (i64::from(point.y) - i64::from(self.origin_y)).rem_euclid(size) == 0
    }
}

fn snap_axis(value: f64, size: i32, origin: i32) -> i32 {
    let limit = f64::from(WORKBENCH_LIMIT);
    let size = f64::from(size.max(1));
    let origin = f64::from(origin);
    let value = if value.is_nan() { origin } else { value.clamp(-limit, limit) };
    let snapped = ((value - origin) / size + 0.5).floor() * size + origin;
    snapped.clamp(-limit, limit) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_default_grid() {
        let grid = GridConfig::default();
        assert_eq!(grid.snap(219.0, 19.0), GridPoint::new(200, 0));
        assert_eq!(grid.snap(221.0, 21.0), GridPoint::new(240, 40));
        assert_eq!(grid.snap(263.7, 101.2), GridPoint::new(280, 120));
    }

    #[test]
    fn test_snap_clamps_wild_input() {
        let grid = GridConfig::default();
        assert_eq!(grid.snap(3.0e9, 0.0), GridPoint::new(16_777_200, 0));
        assert_eq!(grid.snap(f64::NEG_INFINITY, 0.0), GridPoint::new(-16_777_200, 0));
        assert_eq!(grid.snap(f64::NAN, f64::NAN), GridPoint::new(200, 0));

        let far = GridPoint::new(i32::MAX, i32::MIN);
        assert_eq!(far + Offset::new(40, -40), far);
        assert!(!grid.is_on_grid(far));
        let snapped = grid.snap_point(far);
        assert_eq!(snapped, GridPoint::new(16_777_200, -16_777_200));
        assert!(snapped.x <= WORKBENCH_LIMIT && grid.is_on_grid(snapped));
    }

    #[test]
    fn test_snap_halfway_rounds_up() {
        let grid = GridConfig::new().with_origin(0, 0);
        assert_eq!(grid.snap(20.0, -20.0), GridPoint::new(40, 0));
        assert_eq!(grid.snap(-60.0, 60.0), GridPoint::new(-40, 80));
    }

    #[test]
    fn test_snap_respects_origin() {
        let grid = GridConfig::new().with_size(10).with_origin(5, 3);
        assert_eq!(grid.snap(12.0, 12.0), GridPoint::new(15, 13));
        assert!(grid.is_on_grid(GridPoint::new(25, -7)));
        assert!(!grid.is_on_grid(GridPoint::new(20, 3)));
    }

    #[test]
    fn test_offset_rotation() {
        let left = Offset::new(-40, 0);
        let right = Offset::new(40, 0);
        assert_eq!(left.rotated(Rotation::Deg0), left);
        assert_eq!(left.rotated(Rotation::Deg90), Offset::new(0, -40));
        assert_eq!(right.rotated(Rotation::Deg90), Offset::new(0, 40));
        assert_eq!(GridPoint::new(240, 80) + right, GridPoint::new(280, 80));
    }
}
