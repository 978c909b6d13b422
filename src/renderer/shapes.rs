//! Draw list for one frame
//!
//! Built from `GameState` without touching any platform API, then replayed
//! by a backend (the canvas renderer on the web).

use glam::Vec2;

use crate::sim::{GameState, Segment};

/// Path fill behind everything
pub const BACKGROUND: &str = "#ffffff";
/// Maze corridors
pub const PATH_COLOR: &str = "#d7d7db";
pub const GOAL_COLOR: &str = "#f59e0b";
pub const BALL_COLOR: &str = "#e11d48";

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Fill the whole canvas
    Clear { color: &'static str },
    /// Round-capped, round-joined strokes sharing one width and color
    Strokes {
        segments: Vec<Segment>,
        width: f32,
        color: &'static str,
    },
    /// Filled circle
    Disc {
        center: Vec2,
        radius: f32,
        color: &'static str,
    },
}

/// Back-to-front list of shapes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Corridors, then the goal, then the ball on top
    pub fn build(state: &GameState) -> Self {
        let layout = &state.geometry.layout;
        let shapes = vec![
            Shape::Clear { color: BACKGROUND },
            Shape::Strokes {
                segments: state.geometry.segments.clone(),
                width: layout.path_width,
                color: PATH_COLOR,
            },
            Shape::Disc {
                center: state.goal.pos,
                radius: state.goal.radius,
                color: GOAL_COLOR,
            },
            Shape::Disc {
                center: state.ball.pos,
                radius: layout.ball_radius,
                color: BALL_COLOR,
            },
        ];
        Self { shapes }
    }

    /// Blank frame shown before the first maze exists
    pub fn blank() -> Self {
        Self {
            shapes: vec![Shape::Clear { color: BACKGROUND }],
        }
    }
}
