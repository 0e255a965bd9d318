//! Cue stick: turns an aim angle and a shot speed into a cue ball velocity

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CUE_MAX_SPEED, CUE_MIN_SPEED};
use crate::{normalize_angle, polar_to_cartesian};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueStick {
    /// Aim direction (radians, 0 = toward +x)
    pub angle: f64,
    /// Shot speed in units/s
    pub speed: f64,
}

impl Default for CueStick {
    fn default() -> Self {
        Self {
            angle: 0.0, // Head spot toward the rack
            speed: CUE_MAX_SPEED,
        }
    }
}

impl CueStick {
    pub fn rotate(&mut self, delta_angle: f64) {
        self.angle = normalize_angle(self.angle + delta_angle);
    }

    /// Change the shot speed, clamped to the cue's limits
    pub fn adjust_speed(&mut self, delta: f64) {
        self.speed = (self.speed + delta).clamp(CUE_MIN_SPEED, CUE_MAX_SPEED);
    }

    /// Velocity given to the cue ball
    pub fn velocity(&self) -> DVec2 {
        polar_to_cartesian(self.speed, self.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_speed_is_clamped() {
        let mut cue = CueStick::default();
        cue.adjust_speed(5.0);
        assert_eq!(cue.speed, CUE_MAX_SPEED);
        cue.adjust_speed(-100.0);
        assert_eq!(cue.speed, CUE_MIN_SPEED);
        cue.adjust_speed(1.0);
        assert!((cue.speed - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_follows_angle() {
        let mut cue = CueStick { angle: 0.0, speed: 2.0 };
        assert!((cue.velocity() - DVec2::new(2.0, 0.0)).length() < 1e-12);
        cue.rotate(PI / 2.0);
        assert!((cue.velocity() - DVec2::new(0.0, 2.0)).length() < 1e-12);
        cue.rotate(2.0 * PI);
        assert!((cue.angle - PI / 2.0).abs() < 1e-12);
    }
}
