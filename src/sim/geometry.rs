//! Fixed table geometry: bumper segments, pockets and the border rectangle
//!
//! Everything here is derived once from the pocket radius. The playing surface
//! spans x in [-2, 2] and y in [-1, 1]; six pockets sit at the corners and at
//! the middle of the long rails, and each pocket mouth is flanked by two short
//! jaw segments.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::polar_to_cartesian;

/// A straight bumper from `a` to `b`
///
/// The outline is wound so that `normal()` (the direction rotated 90° CCW)
/// faces the playing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

impl Segment {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.b - self.a
    }

    /// Unit normal facing the table, `None` for a zero-length segment
    pub fn normal(&self) -> Option<DVec2> {
        self.direction().perp().try_normalize()
    }

    /// Closest point on the segment to `p`, clamped to its endpoints
    pub fn closest_point(&self, p: DVec2) -> DVec2 {
        let d = self.direction();
        let len_sq = d.length_squared();
        if len_sq == 0.0 {
            return self.a;
        }
        let t = ((p - self.a).dot(d) / len_sq).clamp(0.0, 1.0);
        self.a + d * t
    }

    /// Distance from `p` to the nearest point of the segment
    pub fn distance_to(&self, p: DVec2) -> f64 {
        (p - self.closest_point(p)).length()
    }
}

/// A pocket, approximated by a regular polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub center: DVec2,
    pub radius: f64,
    /// Polygon vertices, counter-clockwise
    pub vertices: Vec<DVec2>,
}

impl Pocket {
    pub fn new(center: DVec2, radius: f64, sides: usize) -> Self {
        let sides = sides.max(3);
        let vertices = (0..sides)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / sides as f64;
                center + polar_to_cartesian(radius, theta)
            })
            .collect();
        Self {
            center,
            radius,
            vertices,
        }
    }

    /// Whether `p` lies inside (or on the edge of) the pocket polygon
    pub fn contains(&self, p: DVec2) -> bool {
        let n = self.vertices.len();
        (0..n).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            (b - a).perp_dot(p - a) >= 0.0
        })
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Immutable outline of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGeometry {
    pub pocket_radius: f64,
    pub segments: Vec<Segment>,
    pub pockets: Vec<Pocket>,
    /// Whole table plus pocket overhang, for camera framing
    pub border_rect: Rect,
}

impl TableGeometry {
    pub fn new(pocket_radius: f64) -> Self {
        let r = pocket_radius;
        let o = r * std::f64::consts::SQRT_2;
        let (l, w) = (TABLE_HALF_LENGTH, TABLE_HALF_WIDTH);
        let seg = |ax: f64, ay: f64, bx: f64, by: f64| {
            Segment::new(DVec2::new(ax, ay), DVec2::new(bx, by))
        };

        let segments = vec![
            // Bottom rail, right half
            seg(r, -w - r, o, -w),
            seg(o, -w, l - o, -w),
            seg(l - o, -w, l, -w - o),
            // Right rail
            seg(l + o, -w, l, -w + o),
            seg(l, -w + o, l, w - o),
            seg(l, w - o, l + o, w),
            // Top rail, right half
            seg(l, w + o, l - o, w),
            seg(l - o, w, o, w),
            seg(o, w, r, w + r),
            // Top rail, left half
            seg(-r, w + r, -o, w),
            seg(-o, w, -l + o, w),
            seg(-l + o, w, -l, w + o),
            // Left rail
            seg(-l - o, w, -l, w - o),
            seg(-l, w - o, -l, -w + o),
            seg(-l, -w + o, -l - o, -w),
            // Bottom rail, left half
            seg(-l, -w - o, -l + o, -w),
            seg(-l + o, -w, -o, -w),
            seg(-o, -w, -r, -w - r),
        ];

        let q = r / (2.0 * std::f64::consts::SQRT_2);
        let pockets = [
            DVec2::new(l + q, w + q),
            DVec2::new(0.0, w + r),
            DVec2::new(-l - q, w + q),
            DVec2::new(-l - q, -w - q),
            DVec2::new(0.0, -w - r),
            DVec2::new(l + q, -w - q),
        ]
        .into_iter()
        .map(|center| Pocket::new(center, r, POCKET_SIDES))
        .collect();

        let p = r * (1.0 + std::f64::consts::SQRT_2 / 2.0);
        let border_rect = Rect::new(DVec2::new(-l - p, -w - p), DVec2::new(l + p, w + p));

        Self {
            pocket_radius,
            segments,
            pockets,
            border_rect,
        }
    }

    /// Index of the pocket containing `p`, if any
    pub fn pocket_at(&self, p: DVec2) -> Option<usize> {
        self.pockets.iter().position(|pocket| pocket.contains(p))
    }
}
