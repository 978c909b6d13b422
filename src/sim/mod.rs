//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (row-major cells, fixed neighbor order)
//! - No rendering or platform dependencies

pub mod grid;
pub mod layout;
pub mod mask;
pub mod maze;
pub mod sdf;
pub mod state;
pub mod tick;

pub use grid::{Cell, Dir, Grid};
pub use layout::{Layout, Segment, Viewport};
pub use mask::{CapsuleRasterizer, Occupancy, OccupancyMask, Rasterizer, SegmentField, eroded_width};
pub use maze::{Maze, RandomSource, farthest_pair, generate_tree};
pub use sdf::{sd_circle, sd_segment};
pub use state::{Ball, GameEvent, GameState, Geometry, Goal};
pub use tick::{TickInput, integrate, tick};
