//! The table: sole owner of geometry, balls and the random source
//!
//! Renderers read `active_balls()` between `advance` calls; nothing else holds
//! a reference to a ball.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::cue::CueStick;
use super::geometry::TableGeometry;
use super::rack::{rack_order, rack_positions, respot_position};
use super::state::Ball;
use super::tick::{self, AdvanceReport};
use crate::consts::*;
use crate::error::{Result, SimError};
use crate::settings::TableSettings;

#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) settings: TableSettings,
    pub(crate) geometry: TableGeometry,
    /// Balls in play (order is incidental, sorted by number between advances)
    pub(crate) balls: Vec<Ball>,
    /// Balls that dropped, in the order they dropped
    pub(crate) pocketed: Vec<Ball>,
    pub(crate) rng: Pcg32,
}

/// Build a racked table from the common parameters, other settings default
pub fn create_table(
    pocket_radius: f64,
    ball_radius: Option<f64>,
    cue_mass: Option<f64>,
    object_mass: Option<f64>,
) -> Result<Table> {
    let defaults = TableSettings::with_pocket_radius(pocket_radius);
    Table::new(TableSettings {
        ball_radius: ball_radius.unwrap_or(defaults.ball_radius),
        cue_mass: cue_mass.unwrap_or(defaults.cue_mass),
        object_mass: object_mass.unwrap_or(defaults.object_mass),
        ..defaults
    })
}

impl Table {
    /// Validate the settings, build the outline and rack the balls
    pub fn new(settings: TableSettings) -> Result<Self> {
        settings.validate()?;
        let mut table = Self {
            geometry: TableGeometry::new(settings.pocket_radius),
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            balls: Vec::new(),
            pocketed: Vec::new(),
        };
        table.reset_balls()?;
        Ok(table)
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    /// Restart the random stream (shuffles, rack order, respot draws)
    pub fn reseed(&mut self, seed: u64) {
        self.settings.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Rack all sixteen balls
    ///
    /// Object balls form a five-row triangle pointing at the cue ball with the
    /// eight-ball fixed in the middle of the third row; the rest are shuffled.
    /// The cue ball goes on the head spot.
    pub fn reset_balls(&mut self) -> Result<()> {
        self.balls.clear();
        self.pocketed.clear();

        let radius = self.settings.ball_radius;
        let slots = rack_positions(DVec2::new(RACK_APEX_X, 0.0), radius + RACK_GAP / 2.0);
        for (pos, number) in slots.into_iter().zip(rack_order(&mut self.rng)) {
            self.balls
                .push(Ball::new(number, radius, self.settings.object_mass)?.at(pos));
        }
        self.balls.push(
            Ball::new(CUE_BALL, radius, self.settings.cue_mass)?.at(DVec2::new(CUE_SPOT_X, 0.0)),
        );
        self.normalize_order();

        log::info!("Racked {} balls", self.balls.len());
        Ok(())
    }

    /// Remove every ball, active and pocketed
    pub fn clear_balls(&mut self) {
        self.balls.clear();
        self.pocketed.clear();
    }

    /// Put a ball in play as-is (no overlap check, for setting up positions)
    pub fn add_ball(&mut self, ball: Ball) -> Result<()> {
        let number = ball.number();
        if self.balls.iter().chain(&self.pocketed).any(|b| b.number() == number) {
            return Err(SimError::InvalidArgument(format!("ball {number} is already in use")));
        }
        if !(ball.pos.is_finite() && ball.vel.is_finite()) {
            return Err(SimError::InvalidArgument(format!(
                "ball {number} has a non-finite position or velocity"
            )));
        }
        self.balls.push(ball);
        self.normalize_order();
        Ok(())
    }

    /// Run the simulation forward by `elapsed` seconds
    pub fn advance(&mut self, elapsed: f64) -> Result<AdvanceReport> {
        tick::advance(self, elapsed)
    }

    /// Speed of the fastest ball in play
    pub fn max_speed(&self) -> f64 {
        tick::max_speed(&self.balls)
    }

    /// Whether every ball has come to rest
    pub fn is_settled(&self) -> bool {
        self.max_speed() < self.settings.settle_speed
    }

    pub fn active_balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn pocketed_balls(&self) -> &[Ball] {
        &self.pocketed
    }

    /// A ball in play by number
    pub fn find_ball(&self, number: u8) -> Option<&Ball> {
        self.balls.iter().find(|b| b.number() == number)
    }

    pub fn is_pocketed(&self, number: u8) -> bool {
        self.pocketed.iter().any(|b| b.number() == number)
    }

    /// Give the cue ball a velocity
    pub fn strike_cue_ball(&mut self, velocity: DVec2) -> Result<()> {
        if !velocity.is_finite() {
            return Err(SimError::InvalidArgument(format!(
                "shot velocity must be finite, got {velocity}"
            )));
        }
        let cue = self
            .balls
            .iter_mut()
            .find(|b| b.is_cue())
            .ok_or(SimError::CueBallPocketed)?;
        cue.vel = velocity;
        Ok(())
    }

    /// Take a shot with the cue stick; only allowed once the table has settled
    pub fn shoot(&mut self, cue: &CueStick) -> Result<()> {
        if !self.is_settled() {
            return Err(SimError::NotSettled);
        }
        self.strike_cue_ball(cue.velocity())
    }

    /// Bring a pocketed cue ball back at a random free spot
    pub fn replace_cue_ball(&mut self) -> Result<DVec2> {
        if self.find_ball(CUE_BALL).is_some() {
            return Err(SimError::CueBallOnTable);
        }

        let mut cue = match self.pocketed.iter().position(|b| b.is_cue()) {
            Some(i) => self.pocketed[i].clone(),
            None => Ball::new(CUE_BALL, self.settings.ball_radius, self.settings.cue_mass)?,
        };
        let pos = respot_position(&cue, &self.balls, &self.geometry, &mut self.rng)?;

        self.pocketed.retain(|b| !b.is_cue());
        cue.pos = pos;
        cue.vel = DVec2::ZERO;
        self.balls.push(cue);
        self.normalize_order();

        log::info!("Cue ball respotted at ({:.3}, {:.3})", pos.x, pos.y);
        Ok(pos)
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.balls.iter().map(Ball::kinetic_energy).sum()
    }

    pub fn total_momentum(&self) -> DVec2 {
        self.balls.iter().map(Ball::momentum).sum()
    }

    /// Keep balls sorted by number for stable reads
    pub(crate) fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.number());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::balls_overlap;

    fn settled_table() -> Table {
        Table::new(TableSettings::default()).unwrap()
    }

    #[test]
    fn test_new_table_is_racked() {
        let table = settled_table();
        assert_eq!(table.active_balls().len(), BALL_COUNT as usize);
        assert!(table.pocketed_balls().is_empty());
        assert!(table.is_settled());

        let numbers: Vec<u8> = table.active_balls().iter().map(Ball::number).collect();
        assert_eq!(numbers, (0..BALL_COUNT).collect::<Vec<_>>());

        let cue = table.find_ball(CUE_BALL).unwrap();
        assert_eq!(cue.pos, DVec2::new(CUE_SPOT_X, 0.0));
        assert_eq!(cue.mass(), DEFAULT_CUE_MASS);
        assert_eq!(table.find_ball(3).unwrap().mass(), DEFAULT_OBJECT_MASS);
    }

    #[test]
    fn test_rack_has_no_overlap_and_fixed_eight_ball() {
        let table = settled_table();
        let balls = table.active_balls();
        for (i, a) in balls.iter().enumerate() {
            for b in &balls[i + 1..] {
                assert!(!balls_overlap(a, b), "{} overlaps {}", a.number(), b.number());
            }
        }
        let slots = rack_positions(
            DVec2::new(RACK_APEX_X, 0.0),
            DEFAULT_BALL_RADIUS + RACK_GAP / 2.0,
        );
        let eight = table.find_ball(EIGHT_BALL).unwrap();
        assert_eq!(eight.pos, slots[crate::sim::rack::EIGHT_BALL_SLOT]);
    }

    #[test]
    fn test_rack_shuffle_depends_on_seed() {
        let layout = |seed| {
            let table = Table::new(TableSettings { seed, ..Default::default() }).unwrap();
            table.active_balls().iter().map(|b| b.pos).collect::<Vec<_>>()
        };
        assert_eq!(layout(1), layout(1));
        assert_ne!(layout(1), layout(2));
    }

    #[test]
    fn test_create_table_rejects_bad_values() {
        assert!(matches!(create_table(0.0, None, None, None), Err(SimError::InvalidConfig(_))));
        let bad = [
            create_table(0.111, Some(-0.1), None, None),
            create_table(0.111, None, Some(0.0), None),
            create_table(0.111, None, None, Some(f64::NAN)),
        ];
        for result in bad {
            assert!(matches!(result, Err(SimError::InvalidConfig(_))));
        }

        let table = create_table(0.111, Some(0.05), Some(0.2), None).unwrap();
        assert_eq!(table.settings().ball_radius, 0.05);
        assert_eq!(table.find_ball(CUE_BALL).unwrap().mass(), 0.2);
        assert_eq!(table.geometry().pocket_radius, 0.111);
    }

    #[test]
    fn test_add_ball_rejects_duplicates() {
        let mut table = settled_table();
        let dup = Ball::new(5, 0.045, 0.16).unwrap();
        assert!(matches!(table.add_ball(dup), Err(SimError::InvalidArgument(_))));

        table.clear_balls();
        assert!(table.active_balls().is_empty());
        table.add_ball(Ball::new(5, 0.045, 0.16).unwrap()).unwrap();
        assert!(table.find_ball(5).is_some());
    }

    #[test]
    fn test_strike_and_shoot() {
        let mut table = settled_table();
        assert!(matches!(
            table.strike_cue_ball(DVec2::new(f64::NAN, 0.0)),
            Err(SimError::InvalidArgument(_))
        ));

        table.shoot(&CueStick { angle: 0.0, speed: 3.0 }).unwrap();
        assert!(!table.is_settled());
        assert!((table.find_ball(CUE_BALL).unwrap().vel - DVec2::new(3.0, 0.0)).length() < 1e-12);
        assert!(matches!(table.shoot(&CueStick::default()), Err(SimError::NotSettled)));
    }

    #[test]
    fn test_strike_without_cue_ball() {
        let mut table = settled_table();
        table.clear_balls();
        assert!(matches!(table.strike_cue_ball(DVec2::X), Err(SimError::CueBallPocketed)));
    }

    #[test]
    fn test_replace_cue_ball_requires_pocketed_cue() {
        let mut table = settled_table();
        assert!(matches!(table.replace_cue_ball(), Err(SimError::CueBallOnTable)));
    }

    #[test]
    fn test_replace_cue_ball_after_clear() {
        let mut table = settled_table();
        table.clear_balls();
        table.add_ball(Ball::new(1, 0.045, 0.16).unwrap()).unwrap();

        let pos = table.replace_cue_ball().unwrap();
        let cue = table.find_ball(CUE_BALL).unwrap();
        assert_eq!(cue.pos, pos);
        assert_eq!(cue.vel, DVec2::ZERO);
        assert!(!balls_overlap(cue, table.find_ball(1).unwrap()));
    }

    #[test]
    fn test_replace_cue_ball_stalls_when_no_room() {
        let settings = TableSettings {
            ball_radius: 0.1,
            ..Default::default()
        };
        let mut table = Table::new(settings).unwrap();
        table.clear_balls();
        // Tangent grid over the whole surface: every spot is within 0.15 of a centre
        let mut number = 1;
        for i in 0..20 {
            for j in 0..10 {
                let pos = DVec2::new(-1.9 + 0.2 * f64::from(i), -0.9 + 0.2 * f64::from(j));
                table.add_ball(Ball::new(number, 0.1, 0.16).unwrap().at(pos)).unwrap();
                number += 1;
            }
        }
        assert!(matches!(table.replace_cue_ball(), Err(SimError::Stalled { .. })));
        assert!(table.find_ball(CUE_BALL).is_none());
    }

    #[test]
    fn test_totals() {
        let mut table = settled_table();
        assert_eq!(table.total_kinetic_energy(), 0.0);
        table.strike_cue_ball(DVec2::new(2.0, 0.0)).unwrap();
        assert!((table.total_kinetic_energy() - 0.5 * DEFAULT_CUE_MASS * 4.0).abs() < 1e-12);
        let expected = DVec2::new(2.0 * DEFAULT_CUE_MASS, 0.0);
        assert!((table.total_momentum() - expected).length() < 1e-12);
    }
}
