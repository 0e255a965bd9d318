//! Collision response
//!
//! Velocity updates are perfectly elastic; energy is only lost through the
//! per sub-step friction applied by the step controller.

use glam::DVec2;

use super::state::Ball;

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce a ball off a bumper and move it back to tangency
///
/// The velocity is only reflected while the ball is heading into the bumper;
/// either way the ball ends up exactly one radius from the contact point.
pub fn resolve_bumper(ball: &mut Ball, point: DVec2, normal: DVec2) {
    if ball.vel.dot(normal) < 0.0 {
        ball.vel = reflect_velocity(ball.vel, normal);
    }
    ball.pos = point + normal * ball.radius();
}

/// Post-collision velocities of two discs along `normal` (pointing from a to b)
///
/// One-dimensional elastic collision on the normal components; the tangential
/// components are untouched. Pairs that are already separating are returned
/// unchanged.
pub fn elastic_velocities(
    vel_a: DVec2,
    mass_a: f64,
    vel_b: DVec2,
    mass_b: f64,
    normal: DVec2,
) -> (DVec2, DVec2) {
    let ua = vel_a.dot(normal);
    let ub = vel_b.dot(normal);
    if ua - ub <= 0.0 {
        return (vel_a, vel_b);
    }

    let total = mass_a + mass_b;
    let va = ((mass_a - mass_b) * ua + 2.0 * mass_b * ub) / total;
    let vb = ((mass_b - mass_a) * ub + 2.0 * mass_a * ua) / total;

    (vel_a + (va - ua) * normal, vel_b + (vb - ub) * normal)
}

/// Resolve an overlapping pair: exchange momentum, then split them apart
///
/// Each ball is pushed half the overlap along the normal so the pair ends up
/// exactly tangent.
pub fn resolve_ball_pair(a: &mut Ball, b: &mut Ball, normal: DVec2, overlap: f64) {
    let (va, vb) = elastic_velocities(a.vel, a.mass(), b.vel, b.mass(), normal);
    a.vel = va;
    b.vel = vb;

    let push = normal * (overlap * 0.5);
    a.pos -= push;
    b.pos += push;
}

/// Two distinct mutable elements of a slice
pub(crate) fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
