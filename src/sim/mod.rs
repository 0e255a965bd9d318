//! Table simulation module
//!
//! Everything physical lives here. Nothing in this module renders, reads
//! input or touches the clock:
//! - Time only enters through `Table::advance`
//! - Randomness only comes from the table's seeded RNG
//! - Balls are sorted by number between advances

pub mod collision;
pub mod cue;
pub mod geometry;
pub mod rack;
pub mod resolve;
pub mod state;
pub mod table;
pub mod tick;

pub use collision::{
    BallContact, BumperContact, ball_bumper_contact, find_ball_overlap, find_bumper_contact,
};
pub use cue::CueStick;
pub use geometry::{Pocket, Rect, Segment, TableGeometry};
pub use resolve::{elastic_velocities, reflect_velocity};
pub use state::Ball;
pub use table::{Table, create_table};
pub use tick::{AdvanceReport, StepReport, advance, step};
