//! Tilt Maze - roll a ball through a generated maze by tilting the phone
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze generation, layout, collision, physics)
//! - `renderer`: Draw list construction and the canvas backend
//! - `platform`: Sensor feed (device orientation to acceleration)
//! - `settings`: Difficulty and level configuration

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Per-tick velocity damping, applied to both axes
    pub const FRICTION: f32 = 0.992;
    /// Fraction of velocity kept (and inverted) when an axis hits a wall
    pub const BOUNCE: f32 = 0.25;
    /// Acceleration at full 90° tilt, pixels/tick²
    pub const GRAVITY: f32 = 0.32;

    /// Smallest grid edge, in cells
    pub const MIN_GRID: usize = 8;
    /// Margin around the grid, in cells, on each side
    pub const MARGIN_CELLS: usize = 1;
    /// Smallest target cell size, pixels
    pub const MIN_CELL_SIZE: u32 = 18;
    /// Target cell size shrinks by this much per level above 1
    pub const LEVEL_CELL_STEP: u32 = 2;

    /// Path stroke width as a fraction of cell size
    pub const PATH_WIDTH_RATIO: f32 = 0.56;
    /// Ball radius as a fraction of path width
    pub const BALL_RADIUS_RATIO: f32 = 0.45;
    /// Goal radius as a fraction of ball radius
    pub const GOAL_RADIUS_RATIO: f32 = 0.5;

    /// Ball center must come within this fraction of the goal radius
    pub const GOAL_TRIGGER: f32 = 0.9;
    /// Extra width (pixels) added back to the eroded collision stroke
    pub const EROSION_MARGIN: f32 = 2.0;
}
