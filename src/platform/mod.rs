//! Platform abstraction layer
//!
//! Sensor feed: device orientation samples arrive from an event callback and
//! are polled once per tick as an acceleration vector.

use glam::Vec2;

use crate::consts::GRAVITY;

/// One device orientation reading, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltSample {
    /// Left/right tilt
    pub gamma: f32,
    /// Front/back tilt
    pub beta: f32,
}

/// Map tilt angles to ball acceleration
pub fn tilt_to_acceleration(sample: TiltSample) -> Vec2 {
    Vec2::new(
        GRAVITY * sample.gamma.to_radians().sin(),
        GRAVITY * sample.beta.to_radians().sin(),
    )
}

/// Latest-value channel between the orientation callback and the tick
///
/// Stays at zero acceleration until enabled (permission granted or no
/// permission needed). Samples pushed while disabled are kept but ignored.
#[derive(Debug, Clone, Default)]
pub struct TiltChannel {
    enabled: bool,
    latest: TiltSample,
}

impl TiltChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self) {
        if !self.enabled {
            log::info!("Orientation input enabled");
        }
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a sample; missing axes (sensor reported null) read as 0°
    pub fn push(&mut self, gamma: Option<f64>, beta: Option<f64>) {
        self.latest = TiltSample {
            gamma: gamma.unwrap_or(0.0) as f32,
            beta: beta.unwrap_or(0.0) as f32,
        };
    }

    /// Acceleration for this tick
    pub fn poll(&self) -> Vec2 {
        if self.enabled {
            tilt_to_acceleration(self.latest)
        } else {
            Vec2::ZERO
        }
    }
}
