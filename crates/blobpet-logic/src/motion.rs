//! Pure motion logic: viewport bounds, boundary reflection, fling.
//!
//! Algorithm for a release or a fling step: "clamp then reflect"
//! 1. Clamp the point into the padded viewport on EACH axis independently
//! 2. If an axis was clamped, flip that velocity component to point back inside
//! 3. Untouched axes keep their velocity

use serde::{Deserialize, Serialize};

/// Velocity magnitude below which a fling is considered at rest.
pub const REST_SPEED: f32 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Points per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

impl Velocity {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn speed(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    pub fn is_at_rest(&self) -> bool {
        self.speed() < REST_SPEED
    }
}

/// Axis-aligned viewport the pet lives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 390.0,
            max_y: 844.0,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True when the viewport has room for a body of `radius`.
    pub fn fits(&self, radius: f32) -> bool {
        self.max_x - self.min_x > 2.0 * radius && self.max_y - self.min_y > 2.0 * radius
    }

    pub fn contains(&self, p: Point, radius: f32) -> bool {
        p.x >= self.min_x + radius
            && p.x <= self.max_x - radius
            && p.y >= self.min_y + radius
            && p.y <= self.max_y - radius
    }
}

/// Which edges a reflection touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl EdgeHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Clamp `pos` into the padded viewport and reflect velocity on crossed edges.
pub fn reflect_into_bounds(
    pos: Point,
    vel: Velocity,
    bounds: &Viewport,
    radius: f32,
) -> (Point, Velocity, EdgeHits) {
    let (x_lo, x_hi) = (bounds.min_x + radius, bounds.max_x - radius);
    let (y_lo, y_hi) = (bounds.min_y + radius, bounds.max_y - radius);
    let mut out_pos = pos;
    let mut out_vel = vel;
    let mut hits = EdgeHits::default();

    if pos.x < x_lo {
        out_pos.x = x_lo;
        out_vel.dx = vel.dx.abs();
        hits.left = true;
    } else if pos.x > x_hi {
        out_pos.x = x_hi;
        out_vel.dx = -vel.dx.abs();
        hits.right = true;
    }

    if pos.y < y_lo {
        out_pos.y = y_lo;
        out_vel.dy = vel.dy.abs();
        hits.top = true;
    } else if pos.y > y_hi {
        out_pos.y = y_hi;
        out_vel.dy = -vel.dy.abs();
        hits.bottom = true;
    }

    (out_pos, out_vel, hits)
}

/// Advance a free-flying pet by `dt` seconds.
///
/// Velocity decays by `friction` per second (0.0 keeps it, 1.0 stops it
/// immediately) and snaps to zero once below [`REST_SPEED`].
pub fn fling_step(
    pos: Point,
    vel: Velocity,
    dt: f32,
    friction: f32,
    bounds: &Viewport,
    radius: f32,
) -> (Point, Velocity) {
    if vel.is_at_rest() {
        return (pos, Velocity::default());
    }
    let moved = Point::new(pos.x + vel.dx * dt, pos.y + vel.dy * dt);
    let (p, v, _) = reflect_into_bounds(moved, vel, bounds, radius);
    let keep = (1.0 - friction.clamp(0.0, 1.0)).powf(dt);
    let v = Velocity::new(v.dx * keep, v.dy * keep);
    if v.is_at_rest() {
        (p, Velocity::default())
    } else {
        (p, v)
    }
}
