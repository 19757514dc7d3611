//! Workbench geometry: grid snapping, terminal offsets, and rotation.
//!
//! Electrical connectivity is decided purely by coordinate equality, so every
//! terminal position must land exactly on a grid point. All rounding happens
//! in [`GridConfig::snap`]; everything downstream works with integer
//! [`GridPoint`]s.

mod grid;
mod rotation;

pub use grid::{GridConfig, GridPoint, Offset, WORKBENCH_LIMIT};
pub use rotation::Rotation;

/// Default grid spacing in workbench pixels.
pub const DEFAULT_GRID_SIZE: i32 = 40;

/// Default x coordinate of the first grid column (right edge of the palette).
pub const DEFAULT_GRID_ORIGIN_X: i32 = 200;

/// Distance from a component's centre to each of its terminals.
pub const TERMINAL_OFFSET: i32 = 40;
