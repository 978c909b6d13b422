//! Screen layout for the maze
//!
//! Picks a square pixel cell size and integer grid dimensions that fill the
//! viewport, centers the grid, and maps cells and passages to pixel space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use crate::consts::*;

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A passage in pixel space, from one cell center to its neighbor's
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }
}

/// Grid dimensions and pixel metrics for one viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub viewport: Viewport,
    pub cols: usize,
    pub rows: usize,
    /// Square cell edge, pixels
    pub cell_size: u32,
    /// Pixel position of the grid's top-left corner
    pub offset_x: u32,
    pub offset_y: u32,
    pub path_width: f32,
    pub ball_radius: f32,
    pub goal_radius: f32,
}

/// Floor to whole pixels; the ratios are not exact in binary, so a product
/// that should land on an integer may sit just below it
fn floor_px(x: f32) -> f32 {
    (x + 1e-3).floor()
}

/// Largest count `n >= MIN_GRID` with `(n + 2 margins) * cell <= extent`
fn fit(extent: u32, cell: u32) -> usize {
    let cell = cell.max(1) as usize;
    let extent = extent as usize;
    let mut n = MIN_GRID;
    while (n + 1 + 2 * MARGIN_CELLS) * cell <= extent {
        n += 1;
    }
    n
}

impl Layout {
    /// Lay out a grid for `viewport` aiming at `target_cell` pixels per cell
    pub fn compute(viewport: Viewport, target_cell: u32) -> Self {
        let width = viewport.width.max(1);
        let height = viewport.height.max(1);
        let target = target_cell.max(1);
        let margins = 2 * MARGIN_CELLS as u32;

        // Columns from the target size, then the cell that fills the width
        let cols_guess = (width / target).saturating_sub(margins).max(MIN_GRID as u32);
        let from_width = width / (cols_guess + margins);
        // Never so tall that the minimum row count overflows the height
        let from_height = height / (MIN_GRID as u32 + margins);
        let cell_size = from_width.min(from_height).max(1);

        let cols = fit(width, cell_size);
        let rows = fit(height, cell_size);

        let used_w = cols as u32 * cell_size;
        let used_h = rows as u32 * cell_size;
        let offset_x = width.saturating_sub(used_w) / 2;
        let offset_y = height.saturating_sub(used_h) / 2;

        let path_width = floor_px(cell_size as f32 * PATH_WIDTH_RATIO);
        let ball_radius = floor_px(path_width * BALL_RADIUS_RATIO).max(1.0);
        let goal_radius = floor_px(ball_radius * GOAL_RADIUS_RATIO).max(1.0);

        Self {
            viewport,
            cols,
            rows,
            cell_size,
            offset_x,
            offset_y,
            path_width,
            ball_radius,
            goal_radius,
        }
    }

    /// Pixel center of a cell
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        let size = self.cell_size as f32;
        Vec2::new(
            self.offset_x as f32 + size * cell.col as f32 + size / 2.0,
            self.offset_y as f32 + size * cell.row as f32 + size / 2.0,
        )
    }

    /// One segment per open passage of `grid`
    pub fn segments(&self, grid: &Grid) -> Vec<Segment> {
        grid.passages()
            .map(|(a, b)| Segment {
                a: self.cell_center(a),
                b: self.cell_center(b),
            })
            .collect()
    }
}
