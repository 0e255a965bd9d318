//! Collision detection
//!
//! Read-only queries over the current ball positions. Contacts are found after
//! positions have been integrated, never predicted. Every test carries a small
//! `CONTACT_EPSILON` slack so that a contact restored to exact tangency is not
//! reported again.

use glam::DVec2;

use super::geometry::{Segment, TableGeometry};
use super::state::Ball;
use crate::consts::CONTACT_EPSILON;

/// Two overlapping balls, by index into the active list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallContact {
    pub first: usize,
    pub second: usize,
    /// Unit vector from `first` toward `second`
    pub normal: DVec2,
    /// How far the discs interpenetrate
    pub overlap: f64,
}

/// A ball touching one or more bumpers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BumperContact {
    pub ball: usize,
    /// Mean of the closest points on each touching segment
    pub point: DVec2,
    /// Normalised sum of the touching segments' normals
    pub normal: DVec2,
}

/// Whether two balls overlap by more than the contact slack
#[inline]
pub fn balls_overlap(a: &Ball, b: &Ball) -> bool {
    a.pos.distance(b.pos) < a.radius() + b.radius() - CONTACT_EPSILON
}

/// Contact normal (from `a` to `b`) and overlap depth
///
/// Coincident centres have no separating direction and yield `None`.
pub fn ball_ball_contact(a: &Ball, b: &Ball) -> Option<(DVec2, f64)> {
    if !balls_overlap(a, b) {
        return None;
    }
    let delta = b.pos - a.pos;
    let normal = delta.try_normalize()?;
    Some((normal, a.radius() + b.radius() - delta.length()))
}

/// Closest point and table-facing normal of a segment the ball touches
pub fn ball_segment_contact(ball: &Ball, segment: &Segment) -> Option<(DVec2, DVec2)> {
    let normal = segment.normal()?;
    let closest = segment.closest_point(ball.pos);
    if ball.pos.distance(closest) < ball.radius() - CONTACT_EPSILON {
        Some((closest, normal))
    } else {
        None
    }
}

/// Combined contact of a ball against every bumper it touches
///
/// Near a pocket jaw a ball can touch two segments at once. Their normals are
/// summed and the closest points averaged, which is not exact for corners but
/// keeps the response stable. Returns `(point, normal)`.
pub fn ball_bumper_contact(ball: &Ball, segments: &[Segment]) -> Option<(DVec2, DVec2)> {
    let mut point_sum = DVec2::ZERO;
    let mut normal_sum = DVec2::ZERO;
    let mut count = 0u32;

    for segment in segments {
        if let Some((point, normal)) = ball_segment_contact(ball, segment) {
            point_sum += point;
            normal_sum += normal;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    // Opposing normals cancel out: nothing sensible to push along
    let normal = normal_sum.try_normalize()?;
    Some((point_sum / count as f64, normal))
}

/// First overlapping pair in list order
pub fn find_ball_overlap(balls: &[Ball]) -> Option<BallContact> {
    for (i, a) in balls.iter().enumerate() {
        for (j, b) in balls.iter().enumerate().skip(i + 1) {
            if let Some((normal, overlap)) = ball_ball_contact(a, b) {
                return Some(BallContact {
                    first: i,
                    second: j,
                    normal,
                    overlap,
                });
            }
        }
    }
    None
}

/// First ball in list order that touches a bumper
pub fn find_bumper_contact(balls: &[Ball], segments: &[Segment]) -> Option<BumperContact> {
    balls.iter().enumerate().find_map(|(i, ball)| {
        ball_bumper_contact(ball, segments).map(|(point, normal)| BumperContact {
            ball: i,
            point,
            normal,
        })
    })
}

/// Index of the pocket holding the ball's centre
#[inline]
pub fn ball_in_pocket(ball: &Ball, geometry: &TableGeometry) -> Option<usize> {
    geometry.pocket_at(ball.pos)
}
