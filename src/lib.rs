//! Pocket Table - a 2D billiards physics core
//!
//! Core modules:
//! - `sim`: Table simulation (geometry, bodies, collisions, stepping)
//! - `settings`: Serializable table configuration
//! - `error`: Error type shared by the whole crate

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::TableSettings;
pub use sim::{AdvanceReport, Ball, CueStick, Table, TableGeometry, create_table};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Pocket radius of a standard table (table short half-length is 1.0)
    pub const DEFAULT_POCKET_RADIUS: f64 = 1.0 / 9.0;
    /// Ball radius: 2.25" balls on a 100" x 50" playing surface
    pub const DEFAULT_BALL_RADIUS: f64 = 0.045;
    /// Cue ball is slightly heavier than the object balls
    pub const DEFAULT_CUE_MASS: f64 = 0.17;
    pub const DEFAULT_OBJECT_MASS: f64 = 0.16;

    /// Velocity damping applied once per sub-step (1.0 disables friction)
    pub const DEFAULT_FRICTION: f64 = 0.99;
    /// Table counts as settled when every ball is slower than this (units/s)
    pub const DEFAULT_SETTLE_SPEED: f64 = 1e-2;
    pub const DEFAULT_SEED: u64 = 0x5EED_B1A1;

    /// Slack on contact tests so grazing contacts are not resolved forever
    pub const CONTACT_EPSILON: f64 = 1e-7;

    /// Resolutions allowed inside a single sub-step before giving up
    pub const MAX_RESOLVE_ITERATIONS: u32 = 10_000;
    /// Random draws allowed when respotting the cue ball
    pub const MAX_RESPOT_ATTEMPTS: u32 = 1_000;
    /// Sub-steps a single advance may plan
    pub const MAX_SUBSTEPS: u32 = 1_000_000;

    /// Table half extents
    pub const TABLE_HALF_LENGTH: f64 = 2.0;
    pub const TABLE_HALF_WIDTH: f64 = 1.0;

    /// Sides of the polygon approximating each pocket
    pub const POCKET_SIDES: usize = 12;

    /// Ball numbers
    pub const CUE_BALL: u8 = 0;
    pub const EIGHT_BALL: u8 = 8;
    pub const BALL_COUNT: u8 = 16;

    /// Rack layout
    pub const RACK_ROWS: usize = 5;
    pub const RACK_APEX_X: f64 = 1.0;
    pub const CUE_SPOT_X: f64 = -1.0;
    /// Extra spacing between racked balls
    pub const RACK_GAP: f64 = 1e-4;

    /// Cue stick speed limits (units/s)
    pub const CUE_MIN_SPEED: f64 = 0.1;
    pub const CUE_MAX_SPEED: f64 = 10.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
