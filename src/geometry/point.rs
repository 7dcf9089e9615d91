//! Point, edge and vertex types.
//!
//! A [`Point`] is a plain 2D coordinate in meters. A [`Vertex`] is a point
//! decorated with the per-vertex data derived during polygon analysis
//! (adjacent edges, tangent) and with course-level flags (turn markers,
//! pass and track numbers). Keeping all decorations on one record avoids
//! splicing fields in ad hoc at call sites.

use crate::{Coord, EPSILON};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A 2D point in meters.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> Coord {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> Coord {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Midpoint between this point and another.
    #[inline]
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Rotate the point around the origin by `angle` radians.
    #[inline]
    pub fn rotated(&self, angle: Coord) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Translate the point by the given offsets.
    #[inline]
    pub fn translated(&self, dx: Coord, dy: Coord) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Check if two points coincide within the planner tolerance.
    #[inline]
    pub fn coincides_with(&self, other: &Point) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// A directed edge between two points, with its polar decomposition cached.
///
/// The angle is `atan2(dy, dx)` with a safe branch at ±π/2 when dx ≈ 0,
/// stored in the canonical `(−π, +π]` range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: Point,
    pub to: Point,
    pub dx: Coord,
    pub dy: Coord,
    pub angle: Coord,
    pub length: Coord,
}

impl Edge {
    /// Build an edge between two points.
    pub fn between(from: Point, to: Point) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let (angle, length) = super::to_polar(dx, dy);
        Self {
            from,
            to,
            dx,
            dy,
            angle,
            length,
        }
    }

    /// Translate the edge perpendicular to itself: both endpoints move by
    /// `distance` in the `direction` heading.
    pub fn translated(&self, direction: Coord, distance: Coord) -> Edge {
        Edge::between(
            super::add_polar_vector(&self.from, direction, distance),
            super::add_polar_vector(&self.to, direction, distance),
        )
    }
}

/// A polygon or course vertex: a point plus its derived decorations.
///
/// `prev_edge`/`next_edge`/`tangent` are filled in by polygon analysis;
/// the remaining fields are course-level markers set while composing the
/// final waypoint sequence.
#[derive(Clone, Debug, Default)]
pub struct Vertex {
    pub point: Point,
    /// Edge arriving at this vertex (from the previous one).
    pub prev_edge: Option<Edge>,
    /// Edge leaving this vertex (to the next one).
    pub next_edge: Option<Edge>,
    /// Central-difference vector from the previous to the next vertex,
    /// used for local heading estimates.
    pub tangent: Option<Edge>,
    /// Marks the last waypoint before a 180° turn between tracks.
    pub turn_start: bool,
    /// Marks the first waypoint after a 180° turn between tracks.
    pub turn_end: bool,
    /// Headland pass this waypoint belongs to, if any.
    pub pass_number: Option<usize>,
    /// Center-fill track this waypoint belongs to, if any.
    pub track_number: Option<usize>,
}

impl Vertex {
    /// Create an undecorated vertex at the given point.
    pub fn new(point: Point) -> Self {
        Self {
            point,
            ..Default::default()
        }
    }

    /// Create a vertex tagged with a headland pass number.
    pub fn with_pass(point: Point, pass_number: usize) -> Self {
        Self {
            point,
            pass_number: Some(pass_number),
            ..Default::default()
        }
    }
}
