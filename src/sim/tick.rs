//! Per-frame simulation tick
//!
//! One call per display frame. Velocity is damped, the ball moves if its
//! center stays inside the occupancy mask, and blocked axes bounce.

use glam::Vec2;

use super::mask::Occupancy;
use super::sdf::sd_circle;
use super::state::{Ball, GameEvent, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Tilt-derived acceleration, pixels/tick² (zero without a sensor)
    pub accel: Vec2,
}

/// Advance the ball one step against `occupancy`
pub fn integrate<O: Occupancy + ?Sized>(ball: &mut Ball, accel: Vec2, occupancy: &O) {
    ball.acc = accel;
    ball.vel = (ball.vel + accel) * FRICTION;

    let next = ball.pos + ball.vel;
    if occupancy.contains(next.x, next.y) {
        ball.pos = next;
        return;
    }

    // Blocked diagonally: try each axis on its own so the ball can slide
    let open_x = occupancy.contains(ball.pos.x + ball.vel.x, ball.pos.y);
    let open_y = occupancy.contains(ball.pos.x, ball.pos.y + ball.vel.y);

    if open_x {
        ball.pos.x += ball.vel.x;
    } else {
        ball.vel.x *= -BOUNCE;
    }
    if open_y {
        ball.pos.y += ball.vel.y;
    } else {
        ball.vel.y *= -BOUNCE;
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Option<GameEvent> {
    integrate(&mut state.ball, input.accel, &state.geometry.mask);

    let goal = &mut state.goal;
    if !goal.solved && sd_circle(state.ball.pos, goal.pos, goal.radius * GOAL_TRIGGER) < 0.0 {
        goal.solved = true;
        log::info!("Goal reached after rebuild #{}", state.rebuilds);
        return Some(GameEvent::GoalReached);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{TiltSample, tilt_to_acceleration};
    use crate::settings::Settings;
    use crate::sim::Viewport;

    /// No walls anywhere
    struct OpenField;

    impl Occupancy for OpenField {
        fn contains(&self, _x: f32, _y: f32) -> bool {
            true
        }
    }

    /// Everything left of `x` is open
    struct WallAt(f32);

    impl Occupancy for WallAt {
        fn contains(&self, x: f32, _y: f32) -> bool {
            x < self.0
        }
    }

    #[test]
    fn test_zero_input_stays_put() {
        let mut state = GameState::new(21, Viewport::new(400, 700), Settings::default());
        let start = state.ball.pos;
        for _ in 0..500 {
            assert_eq!(tick(&mut state, &TickInput::default()), None);
        }
        assert_eq!(state.ball.pos, start);
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_velocity_decays_in_straight_line() {
        let mut ball = Ball::at(Vec2::new(10.0, 10.0));
        ball.vel = Vec2::new(3.0, 4.0);
        let dir = ball.vel.normalize();

        let mut last_speed = ball.vel.length();
        for _ in 0..200 {
            integrate(&mut ball, Vec2::ZERO, &OpenField);
            let speed = ball.vel.length();
            assert!(speed < last_speed);
            last_speed = speed;

            let offset = ball.pos - Vec2::new(10.0, 10.0);
            assert!(offset.perp_dot(dir).abs() < 1e-3);
        }
    }

    #[test]
    fn test_blocked_axis_bounces_other_slides() {
        let mut ball = Ball::at(Vec2::new(45.0, 10.0));
        ball.vel = Vec2::new(10.0, 1.0);

        integrate(&mut ball, Vec2::ZERO, &WallAt(50.0));

        let vx = 10.0 * FRICTION;
        let vy = 1.0 * FRICTION;
        assert_eq!(ball.pos.x, 45.0);
        assert!((ball.pos.y - (10.0 + vy)).abs() < 1e-5);
        assert!((ball.vel.x + vx * BOUNCE).abs() < 1e-5);
        assert!((ball.vel.y - vy).abs() < 1e-5);
    }

    #[test]
    fn test_acceleration_applied_before_friction() {
        let mut ball = Ball::default();
        let accel = Vec2::new(0.5, -0.25);
        integrate(&mut ball, accel, &OpenField);
        assert_eq!(ball.acc, accel);
        assert!((ball.vel - accel * FRICTION).length() < 1e-6);
        assert!((ball.pos - accel * FRICTION).length() < 1e-6);
    }

    #[test]
    fn test_goal_fires_once_until_rebuild() {
        let mut state = GameState::new(1, Viewport::new(400, 700), Settings::default());
        state.goal.pos = Vec2::new(100.0, 100.0);
        state.goal.radius = 10.0;
        state.ball.pos = Vec2::new(100.0, 106.0);
        state.ball.vel = Vec2::ZERO;

        assert_eq!(tick(&mut state, &TickInput::default()), Some(GameEvent::GoalReached));
        assert!(state.goal.solved);
        for _ in 0..10 {
            assert_eq!(tick(&mut state, &TickInput::default()), None);
        }

        state.rebuild(state.viewport());
        assert!(!state.goal.solved);
    }

    #[test]
    fn test_goal_needs_center_inside_trigger_radius() {
        let mut state = GameState::new(1, Viewport::new(400, 700), Settings::default());
        state.goal.pos = Vec2::new(100.0, 100.0);
        state.goal.radius = 10.0;
        state.ball.pos = Vec2::new(100.0, 109.5);
        state.ball.vel = Vec2::ZERO;

        assert_eq!(tick(&mut state, &TickInput::default()), None);
        assert!(!state.goal.solved);
    }

    #[test]
    fn test_tilted_ball_stays_on_board() {
        let mut state = GameState::new(77, Viewport::new(400, 700), Settings::default());
        let layout = state.geometry.layout;
        let size = layout.cell_size as f32;
        let min = Vec2::new(layout.offset_x as f32, layout.offset_y as f32);
        let max = min + Vec2::new(layout.cols as f32 * size, layout.rows as f32 * size);

        let input = TickInput {
            accel: tilt_to_acceleration(TiltSample { gamma: 30.0, beta: 45.0 }),
        };
        let start = state.ball.pos;
        for _ in 0..3000 {
            tick(&mut state, &input);
            let p = state.ball.pos;
            assert!(p.x >= min.x && p.y >= min.y && p.x <= max.x && p.y <= max.y, "ball escaped to {p:?}");
        }
        assert_ne!(state.ball.pos, start);
    }
}
