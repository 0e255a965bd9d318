//! Ball bodies
//!
//! Balls are frictionless point-mass discs: no spin, no angular momentum.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// A ball on (or off) the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: DVec2,
    pub vel: DVec2,
    radius: f64,
    mass: f64,
    number: u8,
}

impl Ball {
    /// Create a ball at rest at the origin
    pub fn new(number: u8, radius: f64, mass: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "ball {number}: radius must be positive, got {radius}"
            )));
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "ball {number}: mass must be positive, got {mass}"
            )));
        }
        Ok(Self {
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            radius,
            mass,
            number,
        })
    }

    /// Builder-style placement
    pub fn at(mut self, pos: DVec2) -> Self {
        self.pos = pos;
        self
    }

    /// Builder-style velocity
    pub fn moving(mut self, vel: DVec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn is_cue(&self) -> bool {
        self.number == CUE_BALL
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }
}
