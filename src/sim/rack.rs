//! Ball placement: the triangular rack and cue ball respotting

use glam::DVec2;
use rand::Rng;

use super::collision::{ball_bumper_contact, balls_overlap};
use super::geometry::TableGeometry;
use super::state::Ball;
use crate::consts::*;
use crate::error::{Result, SimError};

/// Rack slot that always holds the eight-ball (centre of the third row)
pub const EIGHT_BALL_SLOT: usize = 4;

/// Slot centres of a triangular rack
///
/// The apex ball sits at `apex` and rows widen toward +x. Neighbouring slots
/// are exactly `2 * radius` apart, so passing the largest ball radius (plus
/// any gap) guarantees the rack starts without overlap.
pub fn rack_positions(apex: DVec2, radius: f64) -> Vec<DVec2> {
    let dx = radius * 3f64.sqrt();
    let dy = 2.0 * radius;
    let mut slots = Vec::with_capacity(RACK_ROWS * (RACK_ROWS + 1) / 2);
    for row in 0..RACK_ROWS {
        for i in 0..=row {
            let y = (i as f64 - row as f64 / 2.0) * dy;
            slots.push(apex + DVec2::new(row as f64 * dx, y));
        }
    }
    slots
}

/// Rack order: every object ball except the eight shuffled, eight in its slot
pub fn rack_order<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    use rand::seq::SliceRandom;

    let mut numbers: Vec<u8> = (1..BALL_COUNT).filter(|&n| n != EIGHT_BALL).collect();
    numbers.shuffle(rng);
    numbers.insert(EIGHT_BALL_SLOT, EIGHT_BALL);
    numbers
}

/// Whether `ball` could sit where it is without touching anything
pub fn is_clear_spot(ball: &Ball, others: &[Ball], geometry: &TableGeometry) -> bool {
    !others.iter().any(|other| balls_overlap(ball, other))
        && ball_bumper_contact(ball, &geometry.segments).is_none()
        && geometry.pocket_at(ball.pos).is_none()
}

/// Draw a random free spot for `ball` on the playing surface
///
/// Candidates are uniform over the surface inset by the ball radius; any that
/// overlaps another ball, touches a bumper or sits in a pocket is redrawn.
pub fn respot_position<R: Rng + ?Sized>(
    ball: &Ball,
    others: &[Ball],
    geometry: &TableGeometry,
    rng: &mut R,
) -> Result<DVec2> {
    let extent = DVec2::new(TABLE_HALF_LENGTH, TABLE_HALF_WIDTH) - DVec2::splat(ball.radius());
    if extent.min_element() <= 0.0 {
        return Err(SimError::InvalidConfig(format!(
            "ball {} with radius {} does not fit on the table",
            ball.number(),
            ball.radius()
        )));
    }

    let mut probe = ball.clone();
    for _ in 0..MAX_RESPOT_ATTEMPTS {
        probe.pos = DVec2::new(
            rng.random_range(-extent.x..=extent.x),
            rng.random_range(-extent.y..=extent.y),
        );
        if is_clear_spot(&probe, others, geometry) {
            return Ok(probe.pos);
        }
    }

    log::warn!(
        "No free spot for ball {} after {} attempts",
        ball.number(),
        MAX_RESPOT_ATTEMPTS
    );
    Err(SimError::Stalled {
        what: "respot",
        iterations: MAX_RESPOT_ATTEMPTS,
    })
}
