//! Game state and core simulation types
//!
//! `GameState` is the simulation context owned by the frame driver. Derived
//! geometry lives in a single `Geometry` value that is rebuilt off to the
//! side and swapped in whole, so a tick never sees a half-built maze.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::layout::{Layout, Segment, Viewport};
use super::mask::OccupancyMask;
use super::maze::{Maze, RandomSource};
use crate::settings::{Difficulty, Settings};

/// Events emitted by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball center reached the goal (once per maze)
    GoalReached,
}

/// The rolling ball, in pixel units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Acceleration applied on the last tick
    pub acc: Vec2,
}

impl Ball {
    /// A ball at rest at `pos`
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }
}

/// Goal marker at the end cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub pos: Vec2,
    pub radius: f32,
    /// Sticky until the next rebuild
    pub solved: bool,
}

/// Everything derived from the maze and viewport
#[derive(Debug, Clone)]
pub struct Geometry {
    pub maze: Maze,
    pub layout: Layout,
    pub segments: Vec<Segment>,
    pub mask: OccupancyMask,
}

impl Geometry {
    /// Generate a maze sized for `viewport` and rasterize its collision mask
    pub fn build<R: RandomSource + ?Sized>(viewport: Viewport, settings: &Settings, rng: &mut R) -> Self {
        let layout = Layout::compute(viewport, settings.target_cell_size());
        let maze = Maze::generate(layout.rows, layout.cols, rng);
        let segments = layout.segments(&maze.grid);
        let mask = OccupancyMask::build(viewport, &segments, layout.path_width, layout.ball_radius);

        log::info!(
            "Built {}x{} maze: cell {}px, path {}px, ball r={}, {} walkable px",
            layout.cols,
            layout.rows,
            layout.cell_size,
            layout.path_width,
            layout.ball_radius,
            mask.count()
        );

        Self {
            maze,
            layout,
            segments,
            mask,
        }
    }

    pub fn start_pos(&self) -> Vec2 {
        self.layout.cell_center(self.maze.start)
    }

    pub fn end_pos(&self) -> Vec2 {
        self.layout.cell_center(self.maze.end)
    }
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub geometry: Geometry,
    pub ball: Ball,
    pub goal: Goal,
    /// How many times geometry has been built
    pub rebuilds: u32,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game with the given seed, viewport and settings
    pub fn new(seed: u64, viewport: Viewport, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let geometry = Geometry::build(viewport, &settings, &mut rng);
        let (ball, goal) = Self::spawn(&geometry);
        Self {
            seed,
            settings,
            geometry,
            ball,
            goal,
            rebuilds: 1,
            rng,
        }
    }

    fn spawn(geometry: &Geometry) -> (Ball, Goal) {
        let ball = Ball::at(geometry.start_pos());
        let goal = Goal {
            pos: geometry.end_pos(),
            radius: geometry.layout.goal_radius,
            solved: false,
        };
        (ball, goal)
    }

    pub fn viewport(&self) -> Viewport {
        self.geometry.layout.viewport
    }

    /// Regenerate the maze for `viewport`, reset the ball and goal
    pub fn rebuild(&mut self, viewport: Viewport) {
        let geometry = Geometry::build(viewport, &self.settings, &mut self.rng);
        let (ball, goal) = Self::spawn(&geometry);
        self.geometry = geometry;
        self.ball = ball;
        self.goal = goal;
        self.rebuilds += 1;
    }

    /// Viewport changed: new maze sized for it
    pub fn resize(&mut self, width: u32, height: u32) {
        self.rebuild(Viewport::new(width, height));
    }

    /// Switch difficulty (level restarts at 1) and rebuild
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings = self.settings.with_difficulty(difficulty);
        log::info!("Difficulty set to {}", difficulty.as_str());
        self.rebuild(self.viewport());
    }
}
