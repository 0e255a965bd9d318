//! Sub-stepping simulation
//!
//! `advance` splits an arbitrary frame time into sub-steps short enough that no
//! ball moves further than `max_advance_distance` in any of them, so nothing
//! can tunnel through a bumper or another ball. Each sub-step integrates,
//! resolves contacts until none are left, sweeps the pockets and applies
//! friction.

use glam::DVec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::collision::{ball_in_pocket, find_ball_overlap, find_bumper_contact};
use super::geometry::Segment;
use super::resolve::{pair_mut, resolve_ball_pair, resolve_bumper};
use super::state::Ball;
use super::table::Table;
use crate::consts::{MAX_RESOLVE_ITERATIONS, MAX_SUBSTEPS};
use crate::error::{Result, SimError};

/// What happened during one sub-step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Contacts resolved before the table was overlap-free
    pub resolutions: u32,
    /// Balls that dropped, by number
    pub pocketed: Vec<u8>,
}

/// What happened during one `advance` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceReport {
    pub substeps: u32,
    pub resolutions: u32,
    /// Balls that dropped, by number, in the order they dropped
    pub pocketed: Vec<u8>,
}

impl AdvanceReport {
    fn absorb(&mut self, step: StepReport) {
        self.substeps += 1;
        self.resolutions += step.resolutions;
        self.pocketed.extend(step.pocketed);
    }
}

/// Speed of the fastest ball
pub fn max_speed(balls: &[Ball]) -> f64 {
    balls.iter().map(Ball::speed).fold(0.0, f64::max)
}

/// Advance the table by `elapsed` seconds of wall-clock time
pub fn advance(table: &mut Table, elapsed: f64) -> Result<AdvanceReport> {
    if !(elapsed.is_finite() && elapsed >= 0.0) {
        return Err(SimError::InvalidArgument(format!(
            "elapsed time must be finite and non-negative, got {elapsed}"
        )));
    }

    let max_distance = table.settings.max_advance_distance();
    let mut report = AdvanceReport::default();
    let mut remaining = elapsed;

    while remaining > 0.0 {
        // Split what is left into equal sub-steps short enough for the
        // fastest ball; a single one when nothing is fast enough to matter
        let speed = max_speed(&table.balls);
        let planned = (speed * remaining / max_distance).ceil().max(1.0);
        if planned > f64::from(MAX_SUBSTEPS) {
            return Err(SimError::InvalidArgument(format!(
                "advancing {remaining}s at speed {speed} needs more than {MAX_SUBSTEPS} sub-steps"
            )));
        }
        let dt = remaining / planned;

        let mut left = planned as u32;
        while left > 0 {
            report.absorb(step(table, dt)?);
            left -= 1;
            // Collisions between unequal masses can speed a ball up: replan
            if max_speed(&table.balls) > speed {
                break;
            }
        }
        remaining = dt * f64::from(left);
    }

    table.normalize_order();
    if report.substeps > 1 {
        log::debug!(
            "Advanced {:.4}s in {} sub-steps ({} contacts resolved)",
            elapsed,
            report.substeps,
            report.resolutions
        );
    }
    Ok(report)
}

/// One fixed-length sub-step
pub fn step(table: &mut Table, dt: f64) -> Result<StepReport> {
    let Table {
        settings,
        geometry,
        balls,
        pocketed,
        rng,
    } = table;

    // Integrate first; contacts are found after the fact
    for ball in balls.iter_mut() {
        ball.pos += ball.vel * dt;
    }

    let resolutions = resolve_contacts(balls, &geometry.segments, rng)?;
    let mut report = StepReport {
        resolutions,
        pocketed: Vec::new(),
    };

    let mut i = 0;
    while i < balls.len() {
        match ball_in_pocket(&balls[i], geometry) {
            Some(pocket) => {
                let mut ball = balls.swap_remove(i);
                log::debug!("Ball {} dropped into pocket {}", ball.number(), pocket);
                ball.vel = DVec2::ZERO;
                report.pocketed.push(ball.number());
                pocketed.push(ball);
            }
            None => i += 1,
        }
    }

    for ball in balls.iter_mut() {
        ball.vel *= settings.friction;
    }

    Ok(report)
}

/// Resolve contacts one at a time until nothing overlaps
///
/// Ball pairs are handled before bumpers. The list is reshuffled before every
/// scan so that no ball is consistently favoured when many contacts exist at
/// once; with a seeded `rng` the outcome is reproducible. Returns the number of
/// contacts resolved.
pub fn resolve_contacts<R: Rng + ?Sized>(
    balls: &mut [Ball],
    segments: &[Segment],
    rng: &mut R,
) -> Result<u32> {
    for resolved in 0..MAX_RESOLVE_ITERATIONS {
        balls.shuffle(rng);

        if let Some(contact) = find_ball_overlap(balls) {
            let (a, b) = pair_mut(balls, contact.first, contact.second);
            resolve_ball_pair(a, b, contact.normal, contact.overlap);
            continue;
        }

        if let Some(contact) = find_bumper_contact(balls, segments) {
            resolve_bumper(&mut balls[contact.ball], contact.point, contact.normal);
            continue;
        }

        return Ok(resolved);
    }

    log::warn!(
        "Contact resolution did not converge after {} iterations",
        MAX_RESOLVE_ITERATIONS
    );
    Err(SimError::Stalled {
        what: "contact resolution",
        iterations: MAX_RESOLVE_ITERATIONS,
    })
}
