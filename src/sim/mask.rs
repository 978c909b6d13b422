//! Collision mask for the ball center
//!
//! Passages are stroked with the path width shrunk by the ball radius on
//! each side, so testing the ball's center point against the mask stands in
//! for testing its whole disc against the real corridor.

use glam::Vec2;

use super::layout::{Segment, Viewport};
use super::sdf::sd_segment;
use crate::consts::EROSION_MARGIN;

/// Point-containment query: may the ball center sit at (x, y)?
pub trait Occupancy {
    fn contains(&self, x: f32, y: f32) -> bool;
}

/// Stroke width of the eroded corridor, never below one pixel
pub fn eroded_width(path_width: f32, ball_radius: f32) -> f32 {
    (path_width - 2.0 * ball_radius + EROSION_MARGIN).max(1.0)
}

/// Per-pixel bitmap, one bit per pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyMask {
    width: u32,
    height: u32,
    bits: Vec<u64>,
}

impl OccupancyMask {
    /// An all-wall mask
    pub fn empty(viewport: Viewport) -> Self {
        let len = viewport.width as usize * viewport.height as usize;
        Self {
            width: viewport.width,
            height: viewport.height,
            bits: vec![0; len.div_ceil(64)],
        }
    }

    /// Rasterize the eroded corridor for `segments`
    pub fn build(viewport: Viewport, segments: &[Segment], path_width: f32, ball_radius: f32) -> Self {
        Self::build_with(&CapsuleRasterizer, viewport, segments, path_width, ball_radius)
    }

    pub fn build_with<R: Rasterizer + ?Sized>(
        rasterizer: &R,
        viewport: Viewport,
        segments: &[Segment],
        path_width: f32,
        ball_radius: f32,
    ) -> Self {
        rasterizer.stroke(viewport, segments, eroded_width(path_width, ball_radius))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn bit_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn set(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            let i = self.bit_index(x, y);
            self.bits[i / 64] |= 1 << (i % 64);
        }
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.bit_index(x, y);
        self.bits[i / 64] & (1 << (i % 64)) != 0
    }

    /// Number of walkable pixels
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Slack on the stroke distance test, absorbing float error at exact edges
const EDGE_TOLERANCE: f32 = 1e-4;

/// Round to the nearest pixel, clamped into `0..extent`
#[inline]
fn clamp_px(v: f32, extent: u32) -> u32 {
    (v.round() as i64).clamp(0, extent as i64 - 1) as u32
}

impl Occupancy for OccupancyMask {
    fn contains(&self, x: f32, y: f32) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        self.get(clamp_px(x, self.width), clamp_px(y, self.height))
    }
}

/// Turns stroked line segments into a bitmap
pub trait Rasterizer {
    fn stroke(&self, viewport: Viewport, segments: &[Segment], stroke_width: f32) -> OccupancyMask;
}

/// Round-capped thick lines: a pixel is set when its sample point lies
/// within half the stroke width of a segment. Pixel (x, y) samples the point
/// (x, y), matching the rounding in `OccupancyMask::contains`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapsuleRasterizer;

impl Rasterizer for CapsuleRasterizer {
    fn stroke(&self, viewport: Viewport, segments: &[Segment], stroke_width: f32) -> OccupancyMask {
        let mut mask = OccupancyMask::empty(viewport);
        if viewport.width == 0 || viewport.height == 0 {
            return mask;
        }
        let half = stroke_width / 2.0;
        let max_x = viewport.width as f32 - 1.0;
        let max_y = viewport.height as f32 - 1.0;

        for seg in segments {
            let lo = seg.a.min(seg.b) - Vec2::splat(half);
            let hi = seg.a.max(seg.b) + Vec2::splat(half);
            let x0 = lo.x.floor().clamp(0.0, max_x) as u32;
            let y0 = lo.y.floor().clamp(0.0, max_y) as u32;
            let x1 = hi.x.ceil().clamp(0.0, max_x) as u32;
            let y1 = hi.y.ceil().clamp(0.0, max_y) as u32;

            for y in y0..=y1 {
                for x in x0..=x1 {
                    let p = Vec2::new(x as f32, y as f32);
                    if sd_segment(p, seg.a, seg.b) <= half + EDGE_TOLERANCE {
                        mask.set(x, y);
                    }
                }
            }
        }
        mask
    }
}

/// Exact distance test against every segment, for hosts without a bitmap.
/// Slower per query than `OccupancyMask`, but free of rasterization error.
#[derive(Debug, Clone)]
pub struct SegmentField {
    viewport: Viewport,
    segments: Vec<Segment>,
    half_width: f32,
}

impl SegmentField {
    pub fn new(viewport: Viewport, segments: Vec<Segment>, path_width: f32, ball_radius: f32) -> Self {
        Self {
            viewport,
            segments,
            half_width: eroded_width(path_width, ball_radius) / 2.0,
        }
    }
}

impl Occupancy for SegmentField {
    /// Samples the same nearest pixel `OccupancyMask` would
    fn contains(&self, x: f32, y: f32) -> bool {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return false;
        }
        let p = Vec2::new(
            clamp_px(x, self.viewport.width) as f32,
            clamp_px(y, self.viewport.height) as f32,
        );
        self.segments
            .iter()
            .any(|s| sd_segment(p, s.a, s.b) <= self.half_width + EDGE_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{Cell, Grid};
    use crate::sim::layout::Layout;
    use crate::sim::maze::Maze;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sample() -> (Layout, Maze, Vec<Segment>) {
        let layout = Layout::compute(Viewport::new(400, 700), 36);
        let maze = Maze::generate(layout.rows, layout.cols, &mut Pcg32::seed_from_u64(7));
        let segments = layout.segments(&maze.grid);
        (layout, maze, segments)
    }

    /// Points halfway between grid neighbors that share a wall
    fn wall_points(layout: &Layout, grid: &Grid) -> Vec<Vec2> {
        let mut points = Vec::new();
        for i in 0..grid.cell_count() {
            let cell = grid.cell_at(i);
            for n in [Cell::new(cell.row, cell.col + 1), Cell::new(cell.row + 1, cell.col)] {
                if grid.contains(n) && !grid.has_passage(cell, n) {
                    points.push((layout.cell_center(cell) + layout.cell_center(n)) * 0.5);
                }
            }
        }
        points
    }

    #[test]
    fn test_eroded_width() {
        assert_eq!(eroded_width(20.0, 9.0), 4.0);
        // Fat ball: clamps to one pixel
        assert_eq!(eroded_width(10.0, 8.0), 1.0);
    }

    #[test]
    fn test_segment_midpoints_inside() {
        let (layout, _, segments) = sample();
        let mask = OccupancyMask::build(layout.viewport, &segments, layout.path_width, layout.ball_radius);
        for seg in &segments {
            let m = seg.midpoint();
            assert!(mask.contains(m.x, m.y), "midpoint {m:?} outside mask");
            assert!(mask.contains(seg.a.x, seg.a.y));
        }
    }

    #[test]
    fn test_walls_outside() {
        let (layout, maze, segments) = sample();
        let mask = OccupancyMask::build(layout.viewport, &segments, layout.path_width, layout.ball_radius);
        let walls = wall_points(&layout, &maze.grid);
        assert!(!walls.is_empty());
        for p in walls {
            assert!(!mask.contains(p.x, p.y), "wall point {p:?} inside mask");
        }
        // Margin corner
        assert!(!mask.contains(0.0, 0.0));
    }

    #[test]
    fn test_out_of_bounds_queries_clamp() {
        let viewport = Viewport::new(20, 10);
        let mut mask = OccupancyMask::empty(viewport);
        mask.set(0, 0);
        mask.set(19, 9);

        assert!(mask.contains(-3.7, -100.0));
        assert!(mask.contains(500.0, 12.2));
        assert!(!mask.contains(500.0, -1.0));
        assert!(mask.contains(0.4, 0.49));
        assert!(!mask.contains(0.6, 0.0));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_round_caps() {
        let viewport = Viewport::new(40, 40);
        let seg = Segment {
            a: Vec2::new(10.0, 20.0),
            b: Vec2::new(30.0, 20.0),
        };
        let mask = CapsuleRasterizer.stroke(viewport, &[seg], 8.0);
        assert!(mask.contains(20.0, 24.0));
        assert!(!mask.contains(20.0, 25.0));
        // Cap extends past the endpoint by the half width, rounded off
        assert!(mask.contains(6.0, 20.0));
        assert!(!mask.contains(7.0, 24.0));
    }

    #[test]
    fn test_segment_field_agrees_with_mask() {
        let (layout, maze, segments) = sample();
        let field = SegmentField::new(layout.viewport, segments.clone(), layout.path_width, layout.ball_radius);
        for seg in &segments {
            let m = seg.midpoint();
            assert!(field.contains(m.x, m.y));
        }
        for p in wall_points(&layout, &maze.grid) {
            assert!(!field.contains(p.x, p.y));
        }
    }

    #[test]
    fn test_segment_field_matches_mask_at_pixel_edges() {
        let viewport = Viewport::new(40, 40);
        let segments = vec![
            Segment {
                a: Vec2::new(10.0, 20.0),
                b: Vec2::new(30.0, 20.0),
            },
            Segment {
                a: Vec2::new(30.0, 20.0),
                b: Vec2::new(30.0, 36.0),
            },
        ];
        // path 20, ball 8: eroded stroke 6
        let mask = OccupancyMask::build(viewport, &segments, 20.0, 8.0);
        let field = SegmentField::new(viewport, segments, 20.0, 8.0);

        // Quarter-pixel sweep, including off-canvas points and .5 edges
        for j in -8..=168 {
            for i in -8..=168 {
                let (x, y) = (i as f32 * 0.25, j as f32 * 0.25);
                assert_eq!(mask.contains(x, y), field.contains(x, y), "at ({x}, {y})");
            }
        }
        // 23.4 lands on pixel row 23, exactly on the stroke edge
        assert!(field.contains(20.0, 23.4));
        assert!(!field.contains(20.0, 23.6));
    }
}
